//! Compiler configuration
//!
//! This crate provides:
//! - The configuration model mapping data elements onto CQL fragments
//! - XML and JSON loaders
//! - Placeholder template rendering
//! - `ConfigResolver`, the read-only lookup surface used by the compiler

mod error;
pub mod parser;
mod resolver;
pub mod template;
mod types;

pub use error::*;
pub use resolver::*;
pub use types::*;
