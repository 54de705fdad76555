//! Typed, named element properties.
//!
//! Properties are the only element state that is persisted. Each concrete
//! node or edge variant declares a fixed list of [`PropertyDescriptor`]s, and
//! values move in and out of elements as [`PropertyValue`]s.
//!
//! # Value types
//!
//! Exactly four value types exist: strings, integers, booleans and closed
//! enumerations. Enumeration constants travel as their variant name, which is
//! also how they are written to documents.

use std::fmt;

use thiserror::Error;

/// A property value read from or written to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    /// A constant of a closed enumeration, identified by its name.
    Enum(&'static str),
}

impl PropertyValue {
    /// Returns a short name of the value type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "string",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::Enum(_) => "enumeration",
        }
    }

    /// Returns the text of a string value or the name of an enumeration constant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(text) => Some(text),
            PropertyValue::Enum(constant) => Some(constant),
            _ => None,
        }
    }

    /// Returns the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(text) => write!(f, "\"{text}\""),
            PropertyValue::Integer(value) => write!(f, "{value}"),
            PropertyValue::Boolean(value) => write!(f, "{value}"),
            PropertyValue::Enum(constant) => write!(f, "{constant}"),
        }
    }
}

/// The declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    String,
    /// Carried by the value model and the document mapping. No built-in
    /// variant declares one, so element accessors never yield an integer.
    Integer,
    Boolean,
    /// A closed enumeration with the listed constant names.
    Enum(&'static [&'static str]),
}

impl PropertyKind {
    /// Returns a short name of the declared type, used in error messages.
    pub fn type_name(self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Integer => "integer",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Enum(_) => "enumeration",
        }
    }
}

/// Declaration of one property of an element variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    name: &'static str,
    kind: PropertyKind,
}

impl PropertyDescriptor {
    /// Creates a new descriptor.
    pub const fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self { name, kind }
    }

    /// Returns the property name as written in documents.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared type.
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }
}

/// Errors raised when reading or writing properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("`{element}` has no property `{property}`")]
    Unknown {
        element: &'static str,
        property: String,
    },

    #[error("property `{property}` expects a {expected} value, found {found}")]
    TypeMismatch {
        property: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error(
        "invalid value `{value}` for property `{property}`, valid values: {}",
        allowed.join(", ")
    )]
    InvalidConstant {
        property: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
}

/// Finds the descriptor called `name` among an element's declarations.
pub(crate) fn resolve(
    element: &'static str,
    descriptors: &'static [PropertyDescriptor],
    name: &str,
) -> Result<&'static PropertyDescriptor, PropertyError> {
    descriptors
        .iter()
        .find(|descriptor| descriptor.name() == name)
        .ok_or_else(|| PropertyError::Unknown {
            element,
            property: name.to_string(),
        })
}

/// Checks `value` against the declared type of `descriptor`.
///
/// Enumeration properties accept either a string or an enumeration value;
/// both come back as [`PropertyValue::Enum`] naming one of the declared constants.
pub(crate) fn coerce(
    descriptor: &PropertyDescriptor,
    value: PropertyValue,
) -> Result<PropertyValue, PropertyError> {
    let mismatch = |found: &PropertyValue| PropertyError::TypeMismatch {
        property: descriptor.name(),
        expected: descriptor.kind().type_name(),
        found: found.type_name(),
    };

    match (descriptor.kind(), value) {
        (PropertyKind::String, value @ PropertyValue::String(_))
        | (PropertyKind::Integer, value @ PropertyValue::Integer(_))
        | (PropertyKind::Boolean, value @ PropertyValue::Boolean(_)) => Ok(value),
        (
            PropertyKind::Enum(allowed),
            value @ (PropertyValue::String(_) | PropertyValue::Enum(_)),
        ) => {
            let name = value.as_str().unwrap_or_default();
            allowed
                .iter()
                .find(|constant| **constant == name)
                .copied()
                .map(PropertyValue::Enum)
                .ok_or_else(|| PropertyError::InvalidConstant {
                    property: descriptor.name(),
                    value: name.to_string(),
                    allowed,
                })
        }
        (_, value) => Err(mismatch(&value)),
    }
}

/// Declares a closed enumeration usable as a property type.
///
/// The generated type exposes its constant names through `VARIANTS`, converts
/// to and from those names, and displays as its name.
macro_rules! property_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            /// Names of all constants, in declaration order.
            pub const VARIANTS: &'static [&'static str] = &[$(stringify!($variant)),+];

            /// Returns the constant name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    _ => Err(format!(
                        "invalid {} `{s}`, valid values: {}",
                        stringify!($name),
                        Self::VARIANTS.join(", ")
                    )),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

pub(crate) use property_enum;
