//! # Engine Module
//!
//! Logic shared by the workflows: mapping index atoms onto molecule-local
//! numbering, run configuration, output naming and the error taxonomy.
//!
//! - **Renumbering** ([`renumber`]) - Absolute atom ids to positions within a reference group
//! - **Configuration** ([`config`]) - Run parameters for both workflows, with builders
//! - **Output Naming** ([`naming`]) - Collision-free file names from a prefix and step label
//! - **Error Handling** ([`error`]) - [`error::EngineError`] and its categories

pub mod config;
pub mod error;
pub mod naming;
pub mod renumber;
