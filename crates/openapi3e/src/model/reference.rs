//! `$ref` pointers and the reference-or-inline union

use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{OpenApiError, Result};

/// A JSON Reference such as `#/components/schemas/Pet`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pointer: String,
}

impl Reference {
    /// Reference an arbitrary pointer
    ///
    /// # Errors
    /// Returns `MissingField` when `pointer` is blank
    pub fn new(pointer: impl Into<String>) -> Result<Self> {
        let pointer = pointer.into();
        if pointer.trim().is_empty() {
            return Err(OpenApiError::MissingField {
                object: "Reference",
                field: "$ref",
            });
        }
        Ok(Self { pointer })
    }

    /// `#/components/{section}/{name}`
    pub fn component(section: &str, name: &str) -> Self {
        Self {
            pointer: format!("#/components/{section}/{name}"),
        }
    }

    pub fn schema(name: &str) -> Self {
        Self::component("schemas", name)
    }

    pub fn response(name: &str) -> Self {
        Self::component("responses", name)
    }

    pub fn parameter(name: &str) -> Self {
        Self::component("parameters", name)
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Name of the target when it lives in `#/components/{section}/`
    pub fn component_name(&self, section: &str) -> Option<&str> {
        self.pointer
            .strip_prefix("#/components/")
            .and_then(|rest| rest.strip_prefix(section))
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains('/'))
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pointer)
    }
}

impl WireObject for Reference {
    fn kind(&self) -> WireKind {
        WireKind::Reference
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![("dollar_ref", Field::Str(&self.pointer))])
    }
}

/// Either a `$ref` or an inline object
#[derive(Debug, Clone, PartialEq)]
pub enum RefOr<T> {
    Ref(Reference),
    Item(T),
}

impl<T> RefOr<T> {
    pub const fn is_ref(&self) -> bool {
        matches!(self, Self::Ref(_))
    }

    pub const fn as_ref_pointer(&self) -> Option<&Reference> {
        match self {
            Self::Ref(reference) => Some(reference),
            Self::Item(_) => None,
        }
    }

    pub const fn as_item(&self) -> Option<&T> {
        match self {
            Self::Item(item) => Some(item),
            Self::Ref(_) => None,
        }
    }

    pub const fn as_item_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Item(item) => Some(item),
            Self::Ref(_) => None,
        }
    }
}

impl<T: WireObject> WireObject for RefOr<T> {
    fn kind(&self) -> WireKind {
        match self {
            Self::Ref(reference) => reference.kind(),
            Self::Item(item) => item.kind(),
        }
    }

    fn fields(&self) -> Fields<'_> {
        match self {
            Self::Ref(reference) => reference.fields(),
            Self::Item(item) => item.fields(),
        }
    }
}

/// `From` conversions into `RefOr<T>` for each model type, from the item,
/// a borrowed item, and a `Reference`.
macro_rules! ref_or_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for $crate::model::RefOr<$ty> {
                fn from(item: $ty) -> Self {
                    Self::Item(item)
                }
            }

            impl From<&$ty> for $crate::model::RefOr<$ty> {
                fn from(item: &$ty) -> Self {
                    Self::Item(item.clone())
                }
            }

            impl From<$crate::model::Reference> for $crate::model::RefOr<$ty> {
                fn from(reference: $crate::model::Reference) -> Self {
                    Self::Ref(reference)
                }
            }
        )*
    };
}

pub(crate) use ref_or_from;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_serializes_as_dollar_ref() {
        let reference = Reference::schema("Pet");
        assert_eq!(reference.to_wire(), json!({"$ref": "#/components/schemas/Pet"}));
    }

    #[test]
    fn test_blank_pointer_is_rejected() {
        assert!(matches!(
            Reference::new("  "),
            Err(OpenApiError::MissingField { field: "$ref", .. })
        ));
    }

    #[test]
    fn test_component_name() {
        let reference = Reference::schema("Pet");
        assert_eq!(reference.component_name("schemas"), Some("Pet"));
        assert_eq!(reference.component_name("responses"), None);

        let external = Reference::new("other.yaml#/Pet").unwrap();
        assert_eq!(external.component_name("schemas"), None);

        let nested = Reference::new("#/components/schemas/Pet/properties/id").unwrap();
        assert_eq!(nested.component_name("schemas"), None);
    }
}
