//! CLI command implementations.

pub mod index;
