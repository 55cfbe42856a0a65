//! # topasm Core Library
//!
//! Structural editing of GROMACS topology (`.top`/`.itp`) and index (`.ndx`)
//! files: merging ligand fragments into a system topology and wiring custom
//! position restraints into per-chain molecule definitions.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Line-oriented document models, named marker
//!   predicates for the handful of directives the library interprets, and
//!   readers/writers for the text formats involved.
//!
//! - **[`engine`]: The Logic Core.** Atom renumbering, run configuration,
//!   output naming and the error taxonomy shared by every operation.
//!
//! - **[`workflows`]: The Public API.** Complete procedures (restraint
//!   generation, ligand merging) that tie `engine` and `core` together and
//!   return explicit reports describing every file they touched.

pub mod core;
pub mod engine;
pub mod workflows;
