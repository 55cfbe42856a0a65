//! # Core Models Module
//!
//! Data structures shared by the readers, the marker searches and the
//! workflows.
//!
//! ## Key Components
//!
//! - [`index`] - Named, ordered atom groups read from an index file
//! - [`document`] - Ordered, mutable line sequence of one topology file
//! - [`restraint`] - Restraint triplets, force constants and position restraint records
//! - [`ligand`] - A ligand fragment split into its atom-type block and remainder

pub mod document;
pub mod index;
pub mod ligand;
pub mod restraint;
