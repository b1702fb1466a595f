//! # Schemascope Parser
//!
//! Parser for GraphQL schema documents (SDL). Turns source text into the
//! [`schemascope_core::schema::Schema`] model and prints a schema back to SDL.
//!
//! ## Usage
//!
//! ```
//! # use schemascope_parser::{parse, ParseConfig, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         type User { friend: User }
//!         type Post { author: User }
//!     "#;
//!
//!     let schema = parse(source, &ParseConfig::schema())?;
//!     assert_eq!(schema.len(), 2);
//!     Ok(())
//! }
//! ```

mod elaborate;
pub mod error;
mod lexer;
mod parser;
mod parser_types;
mod printer;
mod span;
mod tokens;

pub use elaborate::ParseConfig;
pub use printer::print_schema;
pub use span::Span;

use schemascope_core::schema::Schema;

use elaborate::Builder;
use error::{Diagnostic, ParseError};

/// Parse a schema document.
///
/// Runs the complete pipeline:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Build definitions from tokens
/// 3. **Elaborate** - Merge extensions, resolve names and build the schema
///
/// Warnings (such as references to undefined types) are logged and dropped;
/// use [`parse_with_warnings`] to receive them.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every diagnostic of the first failing phase.
pub fn parse(source: &str, config: &ParseConfig) -> Result<Schema, ParseError> {
    parse_with_warnings(source, config).map(|(schema, _)| schema)
}

/// Parse a schema document, returning the non-fatal diagnostics alongside it.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every diagnostic of the first failing phase.
pub fn parse_with_warnings(
    source: &str,
    config: &ParseConfig,
) -> Result<(Schema, Vec<Diagnostic>), ParseError> {
    // Step 1: Tokenize
    let tokens = lexer::tokenize(source)?;

    // Step 2: Parse
    let document = parser::build_document(&tokens)?;

    // Step 3: Elaborate
    Builder::new(config).build(document)
}
