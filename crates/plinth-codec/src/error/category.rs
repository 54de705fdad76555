//! Categories of decode failures.

use std::fmt;

/// How far decoding got before it failed.
///
/// - [`ErrorCategory::Syntactic`] - the text is not a document; nothing was built
/// - [`ErrorCategory::Structural`] - the document does not describe a sound
///   diagram; nothing is returned
/// - [`ErrorCategory::Semantic`] - a full diagram was rebuilt but breaks a rule
///   of its type; the caller decides whether to keep it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Syntactic,
    Structural,
    Semantic,
}

impl ErrorCategory {
    /// Returns `true` if a decoded diagram accompanies errors of this category.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorCategory::Semantic)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Syntactic => write!(f, "syntactic"),
            ErrorCategory::Structural => write!(f, "structural"),
            ErrorCategory::Semantic => write!(f, "semantic"),
        }
    }
}
