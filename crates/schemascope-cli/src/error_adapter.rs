//! Conversion of [`SchemascopeError`] into miette reports.
//!
//! A parse error becomes one [`Reportable`] per diagnostic, each pointing
//! into the schema source. Every other error becomes a single report with a
//! `schemascope::*` code and no source snippet.

use std::{error::Error as StdError, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceCode, SourceSpan};

use schemascope::SchemascopeError;
use schemascope_parser::{Span, error::Diagnostic};

/// One renderable report.
pub struct Reportable<'a> {
    message: String,
    code: Option<String>,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
    src: Option<&'a str>,
    cause: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Reportable<'a> {
    /// Report of a parser diagnostic over `src`.
    pub fn from_diagnostic(diag: &Diagnostic, src: &'a str) -> Self {
        let labels = diag
            .labels()
            .iter()
            .map(|label| {
                let message = Some(label.message().to_string());
                let span = to_source_span(label.span());
                if label.is_primary() {
                    LabeledSpan::new_primary_with_span(message, span)
                } else {
                    LabeledSpan::new_with_span(message, span)
                }
            })
            .collect();

        Self {
            message: diag.message().to_string(),
            code: diag.code().map(|code| code.to_string()),
            help: diag.help().map(str::to_string),
            labels,
            src: Some(src),
            cause: None,
        }
    }

    /// Report of an error that carries no source location.
    pub fn from_error(err: &'a SchemascopeError) -> Self {
        Self {
            message: err.to_string(),
            code: error_code(err).map(str::to_string),
            help: error_help(err).map(str::to_string),
            labels: Vec::new(),
            src: None,
            cause: err.source(),
        }
    }

    /// True if the report points into schema source.
    pub fn has_snippet(&self) -> bool {
        self.src.is_some()
    }
}

fn error_code(err: &SchemascopeError) -> Option<&'static str> {
    match err {
        SchemascopeError::Io(_) => Some("schemascope::io"),
        SchemascopeError::Parse { .. } => None,
        SchemascopeError::Config(_) => Some("schemascope::config"),
        SchemascopeError::UnknownNode(_) => Some("schemascope::unknown_node"),
        SchemascopeError::Export(_) => Some("schemascope::export"),
    }
}

fn error_help(err: &SchemascopeError) -> Option<&'static str> {
    match err {
        SchemascopeError::UnknownNode(_) => {
            Some("run with --list to see the nodes defined by the schema")
        }
        SchemascopeError::Config(_) => Some("check the configuration file for invalid values"),
        _ => None,
    }
}

fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

impl fmt::Debug for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reportable")
            .field("message", &self.message)
            .field("code", &self.code)
            .field("labels", &self.labels.len())
            .finish()
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Reportable<'_> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.src.as_ref().map(|src| src as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            return None;
        }
        Some(Box::new(self.labels.iter().cloned()))
    }
}

/// Converts an error into the reports to render, one per parse diagnostic.
pub fn to_reportables(err: &SchemascopeError) -> Vec<Reportable<'_>> {
    match err {
        SchemascopeError::Parse { err: parse, src } => parse
            .diagnostics()
            .iter()
            .map(|diag| Reportable::from_diagnostic(diag, src))
            .collect(),
        _ => vec![Reportable::from_error(err)],
    }
}
