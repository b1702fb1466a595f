//! Export of relation diagrams.
//!
//! # Pipeline Position
//!
//! ```text
//! SDL source
//!     ↓ parse
//! SchemaTrees
//!     ↓ RelationView::refresh
//! RelationSequence
//!     ↓ flow layout + connector routing
//! RelationDiagram
//!     ↓ export (this module)
//! Output file
//! ```
//!
//! Export operations return [`Error`], which converts into
//! [`SchemascopeError::Export`] at the crate boundary.
//!
//! [`SchemascopeError::Export`]: crate::SchemascopeError::Export

/// SVG export backend.
pub mod svg;

use crate::diagram::RelationDiagram;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Exports a laid-out relation diagram.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the diagram cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_diagram(&mut self, diagram: &RelationDiagram) -> Result<(), Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
