//! Directive handling for topology documents.
//!
//! [`markers`] holds one named predicate per directive the library interprets;
//! [`locate`] builds the document-level searches (forcefield include, atom-type
//! block, chain moleculetype block, molecules entries) on top of them.

pub mod locate;
pub mod markers;
