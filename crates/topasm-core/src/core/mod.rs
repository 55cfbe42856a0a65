//! # Core Module
//!
//! Stateless building blocks for reading and structurally editing topology
//! and index files.
//!
//! - **Data Models** ([`models`]) - Atom groups, topology documents, restraint
//!   records and ligand fragments
//! - **File I/O** ([`io`]) - Reading and writing `.ndx`, `.top`/`.itp` and
//!   position restraint files
//! - **Directive Handling** ([`topology`]) - Marker predicates and the named
//!   searches built on them
//!
//! Only the directives needed for restraint and ligand insertion are
//! interpreted. Everything else is carried through verbatim, in order.

pub mod io;
pub mod models;
pub mod topology;
