//! Tags and external documentation links

use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{Result, require_text};

/// Link to documentation hosted elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalDocumentation {
    url: String,
    description: Option<String>,
}

impl ExternalDocumentation {
    /// # Errors
    /// Returns `MissingField` when `url` is blank
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        require_text(&url, "ExternalDocumentation", "url")?;
        Ok(Self {
            url,
            description: None,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl WireObject for ExternalDocumentation {
    fn kind(&self) -> WireKind {
        WireKind::ExternalDocumentation
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("description", Field::opt_str(&self.description)),
            ("url", Field::Str(&self.url)),
        ])
    }
}

/// A named group of operations.
///
/// Equality covers every field, so two tags with one name but different
/// descriptions are different tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    name: String,
    description: Option<String>,
    external_docs: Option<ExternalDocumentation>,
}

impl Tag {
    /// # Errors
    /// Returns `MissingField` when `name` is blank
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        require_text(&name, "Tag", "name")?;
        Ok(Self {
            name,
            description: None,
            external_docs: None,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_external_docs(mut self, docs: ExternalDocumentation) -> Self {
        self.external_docs = Some(docs);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub const fn external_docs(&self) -> Option<&ExternalDocumentation> {
        self.external_docs.as_ref()
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    pub(crate) fn set_external_docs(&mut self, docs: ExternalDocumentation) {
        self.external_docs = Some(docs);
    }
}

impl WireObject for Tag {
    fn kind(&self) -> WireKind {
        WireKind::Tag
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("name", Field::Str(&self.name)),
            ("description", Field::opt_str(&self.description)),
            ("external_docs", Field::opt_object(&self.external_docs)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpenApiError;
    use serde_json::json;

    #[test]
    fn test_tag_wire_form() {
        let tag = Tag::new("pets")
            .unwrap()
            .with_description("Everything about pets")
            .with_external_docs(ExternalDocumentation::new("https://example.com/pets").unwrap());

        assert_eq!(
            tag.to_wire(),
            json!({
                "name": "pets",
                "description": "Everything about pets",
                "externalDocs": {"url": "https://example.com/pets"}
            })
        );
    }

    #[test]
    fn test_tag_equality_covers_description() {
        let plain = Tag::new("pets").unwrap();
        let described = Tag::new("pets").unwrap().with_description("Pets");
        assert_ne!(plain, described);
        assert_eq!(described, Tag::new("pets").unwrap().with_description("Pets"));
    }

    #[test]
    fn test_required_fields() {
        assert!(matches!(
            Tag::new(""),
            Err(OpenApiError::MissingField { object: "Tag", field: "name" })
        ));
        assert!(ExternalDocumentation::new(" ").is_err());
    }
}
