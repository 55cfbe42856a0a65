//! Readers and writers for the text formats the library touches.
//!
//! Every format implements [`traits::TextFile`], which supplies path-based
//! helpers on top of reader/writer primitives.

pub mod ndx;
pub mod posres;
pub mod top;
pub mod traits;
