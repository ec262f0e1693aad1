//! SchemaHub: browse JSON Schema documents and fill forms generated from them
//!
//! Schemas are loaded from local files or a GitHub repository listing into an
//! in-memory registry, filtered by name, selected, turned into an interactive
//! form, and the resulting data is exported as `generated.json`.

pub mod cli;
pub mod core;
pub mod error;
pub mod export;
pub mod schema;
pub mod source;
