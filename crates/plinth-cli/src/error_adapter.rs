//! Error adapter for converting PlinthError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::{error::Error, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use plinth::{DecodeError, PlinthError};

/// Adapter for a decode error and the document it was raised on.
pub struct DecodeAdapter<'a> {
    err: &'a DecodeError,
    src: &'a str,
}

impl<'a> DecodeAdapter<'a> {
    /// Create a new decode adapter.
    pub fn new(err: &'a DecodeError, src: &'a str) -> Self {
        Self { err, src }
    }

    /// Returns the byte span of the error position, if the error has one.
    fn span(&self) -> Option<SourceSpan> {
        let (line, column) = self.err.location()?;
        let offset = offset_of(self.src, line, column);
        let len = usize::from(offset < self.src.len());
        Some(SourceSpan::new(offset.into(), len))
    }
}

impl fmt::Debug for DecodeAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for DecodeAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.err, f)
    }
}

impl Error for DecodeAdapter<'_> {}

impl MietteDiagnostic for DecodeAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.err.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.err
            .help()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.span()?;
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span()?;
        let label = LabeledSpan::new_primary_with_span(Some("here".to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`PlinthError`] variants without a document.
pub struct ErrorAdapter<'a>(pub &'a PlinthError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PlinthError::Io(_) => "plinth::io",
            PlinthError::Decode { .. } => return None,
            PlinthError::Config(_) => "plinth::config",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A decode error with its source document.
    Decode(DecodeAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Decode(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Reportable::Decode(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Decode(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Decode(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Decode(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Decode(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a 1-based line and column into a byte offset, clamped to the text.
fn offset_of(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(src.len())
}

/// Convert a [`PlinthError`] into a reportable error.
pub fn to_reportable(err: &PlinthError) -> Reportable<'_> {
    match err {
        PlinthError::Decode { err, src } => Reportable::Decode(DecodeAdapter::new(err, src)),
        _ => Reportable::Error(ErrorAdapter(err)),
    }
}

#[cfg(test)]
mod tests {
    use plinth::ErrorCode;

    use super::*;

    fn decode_error(src: &str) -> PlinthError {
        plinth::DiagramStore::default().load(src).unwrap_err()
    }

    #[test]
    fn test_syntax_error_has_span() {
        let src = "{\n  \"version\": \"3.8\",\n  \"diagram\" \"ClassDiagram\"\n}";
        let err = decode_error(src);
        let reportable = to_reportable(&err);

        let code = reportable.code().unwrap().to_string();
        assert_eq!(code, ErrorCode::E001.to_string());

        let labels: Vec<_> = reportable.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        let offset = labels[0].offset();
        assert!(src[..offset].contains("\"diagram\""));
        assert!(reportable.source_code().is_some());
    }

    #[test]
    fn test_structural_error_has_code_and_help() {
        let err = decode_error(
            r#"{ "version": "3.8", "diagram": "FlowDiagram", "nodes": [], "edges": [] }"#,
        );
        let reportable = to_reportable(&err);

        assert_eq!(reportable.code().unwrap().to_string(), "E100");
        assert!(
            reportable
                .help()
                .unwrap()
                .to_string()
                .contains("ClassDiagram")
        );
        assert!(reportable.labels().is_none());
        assert!(reportable.source_code().is_none());
    }

    #[test]
    fn test_non_decode_error() {
        let err = PlinthError::Config("bad value".to_string());
        let reportable = to_reportable(&err);

        assert!(matches!(reportable, Reportable::Error(_)));
        assert_eq!(reportable.to_string(), "Configuration error: bad value");
        assert_eq!(reportable.code().unwrap().to_string(), "plinth::config");
    }

    #[test]
    fn test_offset_of() {
        let src = "ab\ncd\nef";
        assert_eq!(offset_of(src, 1, 1), 0);
        assert_eq!(offset_of(src, 2, 2), 4);
        assert_eq!(offset_of(src, 3, 9), src.len());
    }
}
