//! Layered configuration: CLI flags override the TOML file, which overrides
//! built-in defaults.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
