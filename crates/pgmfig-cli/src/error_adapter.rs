//! Error adapter for converting PgmError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI. Markup errors
//! carry their label text, so the report can point at the offending byte.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use pgmfig::PgmError;

/// Adapter implementing [`MietteDiagnostic`] for a [`PgmError`].
pub struct ErrorAdapter<'a> {
    err: &'a PgmError,
    /// Label text of a markup error, shown as the report's source
    src: Option<&'a str>,
}

impl<'a> ErrorAdapter<'a> {
    /// Create a new error adapter.
    pub fn new(err: &'a PgmError) -> Self {
        let src = match err {
            PgmError::Markup(markup) => Some(markup.source_text()),
            _ => None,
        };
        Self { err, src }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.err, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.err, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.err)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.err {
            PgmError::DuplicateKey { .. } => "pgmfig::duplicate_key",
            PgmError::UnknownNode { .. } => "pgmfig::unknown_node",
            PgmError::InvalidNode { .. } => "pgmfig::invalid_node",
            PgmError::Markup(_) => "pgmfig::markup",
            PgmError::Config(_) => "pgmfig::config",
            PgmError::Render(_) => "pgmfig::render",
            PgmError::Io(_) => "pgmfig::io",
            PgmError::Export(_) => "pgmfig::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.err {
            PgmError::DuplicateKey { .. } => "node ids must be unique within a figure",
            PgmError::UnknownNode { .. } => "declare both nodes before the edge joining them",
            PgmError::InvalidNode { .. } => "use a positive scale and aspect, and finite coordinates",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.src
            .as_ref()
            .map(|src| src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let PgmError::Markup(err) = self.err else {
            return None;
        };
        let text = self.src?;
        let len = text
            .get(err.offset()..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        let span = SourceSpan::new(err.offset().into(), len);
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some(err.message().to_string()),
            span,
        ))))
    }
}
