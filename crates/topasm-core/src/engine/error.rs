use crate::core::io::ndx::NdxError;
use crate::core::io::posres::PosresError;
use crate::core::models::restraint::{RestraintParseError, RestraintTriplet};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Structurally incomplete or malformed input.
    Format,
    /// Inputs that contradict each other.
    Consistency,
    /// Invalid caller-supplied values, or a requested target that is absent.
    Value,
    /// File-system failures.
    Io,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Topology is empty")]
    EmptyTopology,

    #[error("No forcefield include (#include \".../forcefield.itp\") found in topology")]
    MissingForcefieldInclude,

    #[error("Ligand topology declares no [ moleculetype ] name")]
    MissingMoleculetype,

    #[error("Index group '{name}' not found")]
    MissingGroup { name: String },

    #[error("Invalid index file '{path}': {source}", path = path.display())]
    Index {
        path: PathBuf,
        #[source]
        source: NdxError,
    },

    #[error("Expected exactly one .top file in '{dir}', found {found}", dir = dir.display())]
    TopologyFileNotFound { dir: PathBuf, found: usize },

    #[error("Atom {atom} of restrain group '{restrain}' is not in reference group '{reference}'")]
    GroupNotSubset {
        reference: String,
        restrain: String,
        atom: usize,
    },

    #[error("Moleculetype '{molecule}' not found in topology")]
    ChainNotFound { chain: String, molecule: String },

    #[error("At least one restraint triplet is required")]
    NoTriplets,

    #[error("{names} position restraint name(s) given for {triplets} triplet(s)")]
    PosresNameCountMismatch { names: usize, triplets: usize },

    #[error(transparent)]
    InvalidInput(#[from] RestraintParseError),

    #[error("Triplet #{index} {triplet}: {source}")]
    Triplet {
        index: usize,
        triplet: RestraintTriplet,
        #[source]
        source: Box<EngineError>,
    },

    #[error("Failed to write restraint file '{path}': {source}", path = path.display())]
    RestraintFile {
        path: PathBuf,
        #[source]
        source: PosresError,
    },

    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EngineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyTopology
            | Self::MissingForcefieldInclude
            | Self::MissingMoleculetype
            | Self::MissingGroup { .. }
            | Self::Index { .. }
            | Self::TopologyFileNotFound { .. } => ErrorCategory::Format,
            Self::GroupNotSubset { .. } => ErrorCategory::Consistency,
            Self::ChainNotFound { .. }
            | Self::NoTriplets
            | Self::PosresNameCountMismatch { .. }
            | Self::InvalidInput(_) => ErrorCategory::Value,
            Self::Triplet { source, .. } => source.category(),
            Self::RestraintFile { .. } | Self::Io { .. } => ErrorCategory::Io,
        }
    }

    /// Attaches the position and content of the triplet being processed.
    pub fn in_triplet(self, index: usize, triplet: &RestraintTriplet) -> Self {
        Self::Triplet {
            index,
            triplet: triplet.clone(),
            source: Box::new(self),
        }
    }

    pub fn io(path: impl AsRef<Path>) -> impl FnOnce(io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| Self::Io { path, source }
    }

    /// Splits a failed index read into an I/O error or a malformed-index error.
    pub fn index(path: impl AsRef<Path>) -> impl FnOnce(NdxError) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| match source {
            NdxError::Io(source) => Self::Io { path, source },
            source => Self::Index { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_error_taxonomy() {
        assert_eq!(EngineError::EmptyTopology.category(), ErrorCategory::Format);
        assert_eq!(
            EngineError::MissingGroup { name: "A".into() }.category(),
            ErrorCategory::Format
        );
        assert_eq!(
            EngineError::GroupNotSubset {
                reference: "R".into(),
                restrain: "S".into(),
                atom: 4
            }
            .category(),
            ErrorCategory::Consistency
        );
        assert_eq!(
            EngineError::PosresNameCountMismatch {
                names: 1,
                triplets: 2
            }
            .category(),
            ErrorCategory::Value
        );
        assert_eq!(
            EngineError::InvalidInput(RestraintParseError::EmptyTripletList).category(),
            ErrorCategory::Value
        );
    }

    #[test]
    fn triplet_context_keeps_inner_category_and_identity() {
        let triplet = RestraintTriplet::new("Chain_B", "Core_B", "B");
        let err = EngineError::ChainNotFound {
            chain: "B".into(),
            molecule: "Protein_chain_B".into(),
        }
        .in_triplet(1, &triplet);

        assert_eq!(err.category(), ErrorCategory::Value);
        let message = err.to_string();
        assert!(message.contains("#1"));
        assert!(message.contains("(Chain_B, Core_B, B)"));
        assert!(message.contains("Protein_chain_B"));
    }

    #[test]
    fn index_helper_separates_io_from_parse_failures() {
        use crate::core::io::ndx::NdxParseErrorKind;

        let parse = EngineError::index("index.ndx")(NdxError::Parse {
            line: 1,
            kind: NdxParseErrorKind::AtomsOutsideGroup,
        });
        assert_eq!(parse.category(), ErrorCategory::Format);
        assert!(parse.to_string().contains("index.ndx"));

        let missing = EngineError::index("index.ndx")(NdxError::Io(io::Error::from(
            io::ErrorKind::NotFound,
        )));
        assert_eq!(missing.category(), ErrorCategory::Io);
    }

    #[test]
    fn io_helper_records_path() {
        let err = EngineError::io("/tmp/topol.top")(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.to_string().contains("/tmp/topol.top"));
    }
}
