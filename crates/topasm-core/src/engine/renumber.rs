use super::error::EngineError;
use crate::core::models::index::AtomGroup;
use std::collections::HashMap;

/// Maps each restrain atom onto its 1-based position within `reference`.
///
/// Positions are returned in restrain-group order. This turns absolute ids
/// from a multi-chain index file into the local numbering of the single
/// moleculetype that `reference` spans. When an id occurs more than once in
/// `reference`, its first occurrence is used.
///
/// # Errors
///
/// Returns [`EngineError::GroupNotSubset`] for the first restrain atom that is
/// absent from `reference`.
pub fn renumber(reference: &AtomGroup, restrain: &AtomGroup) -> Result<Vec<usize>, EngineError> {
    let mut positions: HashMap<usize, usize> = HashMap::with_capacity(reference.len());
    for (i, &atom) in reference.atoms().iter().enumerate() {
        positions.entry(atom).or_insert(i + 1);
    }

    restrain
        .atoms()
        .iter()
        .map(|atom| {
            positions
                .get(atom)
                .copied()
                .ok_or_else(|| EngineError::GroupNotSubset {
                    reference: reference.name().to_string(),
                    restrain: restrain.name().to_string(),
                    atom: *atom,
                })
        })
        .collect()
}
