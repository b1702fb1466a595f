//! Error types for Schemascope operations.
//!
//! This module provides the main error type [`SchemascopeError`] which wraps
//! the failures that can occur while loading a schema and rendering its
//! relation view. Missing data inside a relation pass (an unresolved type, an
//! element without bounds) is never an error; it only shrinks the diagram.

use std::io;

use thiserror::Error;

use schemascope_core::schema::SchemaError;
use schemascope_parser::error::ParseError;

/// The main error type for Schemascope operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant contains structured error information with source code
/// spans. This provides detailed error information that can be used for rich
/// error reporting.
#[derive(Debug, Error)]
pub enum SchemascopeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown schema node `{0}`")]
    UnknownNode(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for SchemascopeError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl From<SchemaError> for SchemascopeError {
    fn from(error: SchemaError) -> Self {
        match error {
            SchemaError::UnknownNode(name) => Self::UnknownNode(name),
        }
    }
}

impl SchemascopeError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
