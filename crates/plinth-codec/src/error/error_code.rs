//! Error codes for decode failures.
//!
//! Error codes are organized by category:
//! - `E0xx` - Syntactic errors (the text is not a document)
//! - `E1xx` - Structural errors (the document does not describe a sound diagram)
//! - `E2xx` - Semantic errors (the diagram breaks a rule of its type)

use std::fmt;

use crate::error::ErrorCategory;

/// Error codes for categorizing decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntactic Errors (E0xx)
    // =========================================================================
    /// Malformed JSON.
    ///
    /// The input is not well-formed JSON text.
    E001,

    /// Document shape mismatch.
    ///
    /// The input is JSON but lacks a required field, or a field has the
    /// wrong JSON type (for example a string where a node id is expected).
    E002,

    // =========================================================================
    // Structural Errors (E1xx)
    // =========================================================================
    /// Unknown diagram type.
    E100,

    /// Unknown node type.
    ///
    /// The node type does not exist or is not available in this diagram type.
    E101,

    /// Unknown edge type.
    ///
    /// The edge type does not exist or is not available in this diagram type.
    E102,

    /// Unknown property.
    ///
    /// A record carries a property its variant does not declare.
    E103,

    /// Invalid property value.
    ///
    /// A property value has the wrong type, or names an enumeration constant
    /// that does not exist.
    E104,

    /// Missing property.
    ///
    /// A record lacks a property its variant declares.
    E105,

    /// Duplicate node id.
    E106,

    /// Unknown node id.
    ///
    /// A child list or an edge endpoint refers to an id no node record has.
    E107,

    /// Invalid containment.
    ///
    /// A node is listed as a child of more than one node, of itself, or of
    /// one of its own descendants.
    E108,

    /// Structural violation.
    ///
    /// The reconstructed diagram breaks a containment or connectivity rule
    /// of its type.
    E109,

    // =========================================================================
    // Semantic Errors (E2xx)
    // =========================================================================
    /// Semantic violation.
    ///
    /// The reconstructed diagram is structurally sound but an edge breaks a
    /// rule of the diagram type.
    E200,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            ErrorCode::E107 => "E107",
            ErrorCode::E108 => "E108",
            ErrorCode::E109 => "E109",
            ErrorCode::E200 => "E200",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed JSON",
            ErrorCode::E002 => "document shape mismatch",
            ErrorCode::E100 => "unknown diagram type",
            ErrorCode::E101 => "unknown node type",
            ErrorCode::E102 => "unknown edge type",
            ErrorCode::E103 => "unknown property",
            ErrorCode::E104 => "invalid property value",
            ErrorCode::E105 => "missing property",
            ErrorCode::E106 => "duplicate node id",
            ErrorCode::E107 => "unknown node id",
            ErrorCode::E108 => "invalid containment",
            ErrorCode::E109 => "structural violation",
            ErrorCode::E200 => "semantic violation",
        }
    }

    /// Returns the category this code belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::E001 | ErrorCode::E002 => ErrorCategory::Syntactic,
            ErrorCode::E200 => ErrorCategory::Semantic,
            _ => ErrorCategory::Structural,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E107.to_string(), "E107");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "malformed JSON");
        assert_eq!(ErrorCode::E106.description(), "duplicate node id");
        assert_eq!(ErrorCode::E200.description(), "semantic violation");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::E002.category(), ErrorCategory::Syntactic);
        assert_eq!(ErrorCode::E100.category(), ErrorCategory::Structural);
        assert_eq!(ErrorCode::E109.category(), ErrorCategory::Structural);
        assert_eq!(ErrorCode::E200.category(), ErrorCategory::Semantic);
    }
}
