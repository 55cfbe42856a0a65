//! High-level procedures operating on a topology directory.
//!
//! - [`restrain`] - Custom position restraints from index groups, one include per triplet
//! - [`ligand`] - Ligand fragment merging into a system topology

pub mod ligand;
pub mod restrain;
