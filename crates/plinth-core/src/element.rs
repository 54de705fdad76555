//! Diagram element types.
//!
//! Every node and edge variant is a case of a closed enumeration
//! ([`NodeKind`], [`EdgeKind`]) carrying its own fields. A fieldless tag
//! enumeration ([`NodeTag`], [`EdgeTag`]) names each case; tags are what
//! documents store in their `type` field and what the registry and the
//! validation rules match on.
//!
//! # Organization
//!
//! - [`node`] - Node variants, containment rules and the positioned [`Node`]
//! - [`edge`] - Edge variants, their enumeration properties and the [`Edge`]

pub mod edge;
pub mod node;

pub use edge::*;
pub use node::*;

use crate::property::{PropertyDescriptor, PropertyError, PropertyValue};

/// Property access shared by node and edge variants.
///
/// Implementations dispatch on their variant; the set of properties an
/// element exposes is fixed by its tag.
pub trait Element {
    /// Returns the variant tag as written in documents.
    fn tag_name(&self) -> &'static str;

    /// Returns the properties this variant declares, in declaration order.
    fn descriptors(&self) -> &'static [PropertyDescriptor];

    /// Reads a property by name.
    fn property(&self, name: &str) -> Option<PropertyValue>;

    /// Writes a property by name.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the variant does not declare the property,
    /// the value has the wrong type, or an enumeration constant is unknown.
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError>;

    /// Returns every declared property with its current value.
    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        self.descriptors()
            .iter()
            .filter_map(|descriptor| {
                self.property(descriptor.name())
                    .map(|value| (descriptor.name(), value))
            })
            .collect()
    }
}
