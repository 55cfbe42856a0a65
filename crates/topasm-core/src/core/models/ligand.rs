use super::document::TopologyDocument;
use crate::core::topology::markers;

/// A ligand `.itp` split into its `[ atomtypes ]` block and everything else.
///
/// The atom-type block runs from its header up to, excluding, the next blank
/// line or section header; that terminating line stays in the remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigandFragment {
    pub atomtypes: Vec<String>,
    pub remainder: TopologyDocument,
}

impl LigandFragment {
    pub fn split(source: &TopologyDocument) -> Self {
        let mut atomtypes = Vec::new();
        let mut remainder = Vec::new();
        let mut in_atomtypes = false;

        for line in source.lines() {
            if markers::is_atomtypes_header(line) {
                in_atomtypes = true;
                atomtypes.push(line.to_string());
            } else if in_atomtypes && !markers::is_atomtypes_terminator(line) {
                atomtypes.push(line.to_string());
            } else {
                in_atomtypes = false;
                remainder.push(line.to_string());
            }
        }

        Self {
            atomtypes,
            remainder: TopologyDocument::from_lines(remainder)
                .with_trailing_newline(source.has_trailing_newline()),
        }
    }

    pub fn has_atomtypes(&self) -> bool {
        !self.atomtypes.is_empty()
    }

    /// Atom-type data lines without the header and its leading comments.
    pub fn atomtypes_body(&self) -> &[String] {
        let skip = self
            .atomtypes
            .iter()
            .position(|line| !markers::is_atomtypes_header(line) && !markers::is_comment(line))
            .unwrap_or(self.atomtypes.len());
        &self.atomtypes[skip..]
    }
}
