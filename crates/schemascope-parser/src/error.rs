//! Error and diagnostic system for the SDL parser.
//!
//! Every problem found while lexing, parsing or elaborating a schema is a
//! [`Diagnostic`]: a severity, an optional [`ErrorCode`], one or more labeled
//! source spans and optional help text. A failed parse returns all of them
//! wrapped in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use schemascope_parser::error::{Diagnostic, ErrorCode};
//! # use schemascope_parser::Span;
//!
//! let diag = Diagnostic::error("type `User` is defined multiple times")
//!     .with_code(ErrorCode::E300)
//!     .with_label(Span::new(40..44), "duplicate definition")
//!     .with_secondary_label(Span::new(5..9), "first defined here")
//!     .with_help("merge the definitions or use `extend type User`");
//! assert_eq!(diag.labels().len(), 2);
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;
pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
