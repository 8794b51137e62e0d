//! Media types, examples, encodings and headers

use super::reference::{RefOr, ref_or_from};
use super::schema::Schema;
use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{OpenApiError, Result};
use indexmap::IndexMap;
use serde_json::Value;

/// Serialization styles allowed by OpenAPI 3.0
pub const STYLES: &[&str] = &[
    "matrix",
    "label",
    "form",
    "simple",
    "spaceDelimited",
    "pipeDelimited",
    "deepObject",
];

pub(crate) fn check_style(object: &'static str, style: Option<&str>) -> Result<()> {
    match style {
        Some(style) if !STYLES.contains(&style) => Err(OpenApiError::InvalidType {
            object,
            field: "style",
            expected: "matrix, label, form, simple, spaceDelimited, pipeDelimited, deepObject",
            found: style.to_string(),
        }),
        _ => Ok(()),
    }
}

/// `example` and `examples` are mutually exclusive wherever both exist
pub(crate) fn check_examples(
    object: &'static str,
    example: Option<&Value>,
    examples: &IndexMap<String, RefOr<Example>>,
) -> Result<()> {
    if example.is_some() && !examples.is_empty() {
        return Err(OpenApiError::InvalidCombination {
            object,
            reason: "example and examples are mutually exclusive".to_string(),
        });
    }
    Ok(())
}

/// `content` may describe at most one media type
pub(crate) fn check_single_content(
    object: &'static str,
    content: &IndexMap<String, MediaType>,
) -> Result<()> {
    if content.len() > 1 {
        return Err(OpenApiError::InvalidValue {
            object,
            field: "content",
            reason: format!("at most one media type allowed, got {}", content.len()),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Example {
    summary: Option<String>,
    description: Option<String>,
    value: Option<Value>,
    external_value: Option<String>,
}

ref_or_from!(Example);

impl Example {
    pub fn builder() -> ExampleBuilder {
        ExampleBuilder::default()
    }
}

impl WireObject for Example {
    fn kind(&self) -> WireKind {
        WireKind::Example
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("summary", Field::opt_str(&self.summary)),
            ("description", Field::opt_str(&self.description)),
            ("value", Field::opt_json(&self.value)),
            ("external_value", Field::opt_str(&self.external_value)),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExampleBuilder {
    example: Example,
}

impl ExampleBuilder {
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.example.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.example.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: Value) -> Self {
        self.example.value = Some(value);
        self
    }

    #[must_use]
    pub fn external_value(mut self, url: impl Into<String>) -> Self {
        self.example.external_value = Some(url.into());
        self
    }

    /// # Errors
    /// Returns `InvalidCombination` when both `value` and `externalValue` are set
    pub fn build(self) -> Result<Example> {
        if self.example.value.is_some() && self.example.external_value.is_some() {
            return Err(OpenApiError::InvalidCombination {
                object: "Example",
                reason: "value and externalValue are mutually exclusive".to_string(),
            });
        }
        Ok(self.example)
    }
}

/// Per-property serialization of a multipart or form body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoding {
    content_type: Option<String>,
    headers: IndexMap<String, RefOr<Header>>,
    style: Option<String>,
    explode: Option<bool>,
    allow_reserved: bool,
}

impl Encoding {
    pub fn builder() -> EncodingBuilder {
        EncodingBuilder::default()
    }
}

impl WireObject for Encoding {
    fn kind(&self) -> WireKind {
        WireKind::Encoding
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("content_type", Field::opt_str(&self.content_type)),
            ("headers", Field::object_map(&self.headers)),
            ("style", Field::opt_str(&self.style)),
            ("explode", Field::Bool(self.explode.unwrap_or(false))),
            ("allow_reserved", Field::Bool(self.allow_reserved)),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct EncodingBuilder {
    encoding: Encoding,
}

impl EncodingBuilder {
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.encoding.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, header: impl Into<RefOr<Header>>) -> Self {
        self.encoding.headers.insert(name.into(), header.into());
        self
    }

    #[must_use]
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.encoding.style = Some(style.into());
        self
    }

    #[must_use]
    pub const fn explode(mut self, explode: bool) -> Self {
        self.encoding.explode = Some(explode);
        self
    }

    #[must_use]
    pub const fn allow_reserved(mut self) -> Self {
        self.encoding.allow_reserved = true;
        self
    }

    /// # Errors
    /// Returns `InvalidType` for an unknown style
    pub fn build(mut self) -> Result<Encoding> {
        check_style("Encoding", self.encoding.style.as_deref())?;
        if self.encoding.explode.is_none() {
            self.encoding.explode = Some(self.encoding.style.as_deref() == Some("form"));
        }
        Ok(self.encoding)
    }
}

/// A body format together with its schema and examples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaType {
    schema: Option<RefOr<Schema>>,
    example: Option<Value>,
    examples: IndexMap<String, RefOr<Example>>,
    encoding: IndexMap<String, Encoding>,
}

impl MediaType {
    pub fn builder() -> MediaTypeBuilder {
        MediaTypeBuilder::default()
    }

    /// A media type carrying only a schema
    pub fn with_schema(schema: impl Into<RefOr<Schema>>) -> Self {
        Self {
            schema: Some(schema.into()),
            ..Self::default()
        }
    }

    pub const fn schema(&self) -> Option<&RefOr<Schema>> {
        self.schema.as_ref()
    }
}

impl WireObject for MediaType {
    fn kind(&self) -> WireKind {
        WireKind::MediaType
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("schema", Field::opt_object(&self.schema)),
            ("example", Field::opt_json(&self.example)),
            ("examples", Field::object_map(&self.examples)),
            ("encoding", Field::object_map(&self.encoding)),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct MediaTypeBuilder {
    media: MediaType,
}

impl MediaTypeBuilder {
    #[must_use]
    pub fn schema(mut self, schema: impl Into<RefOr<Schema>>) -> Self {
        self.media.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn example(mut self, example: Value) -> Self {
        self.media.example = Some(example);
        self
    }

    #[must_use]
    pub fn named_example(mut self, name: impl Into<String>, example: impl Into<RefOr<Example>>) -> Self {
        self.media.examples.insert(name.into(), example.into());
        self
    }

    #[must_use]
    pub fn encoding(mut self, property: impl Into<String>, encoding: Encoding) -> Self {
        self.media.encoding.insert(property.into(), encoding);
        self
    }

    /// # Errors
    /// Returns `InvalidCombination` when `example` and `examples` are both set
    pub fn build(self) -> Result<MediaType> {
        check_examples("MediaType", self.media.example.as_ref(), &self.media.examples)?;
        Ok(self.media)
    }
}

/// A response or encoding header; a parameter without name and location
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    description: Option<String>,
    required: bool,
    deprecated: bool,
    allow_empty_value: bool,
    style: Option<String>,
    explode: bool,
    allow_reserved: bool,
    schema: Option<RefOr<Schema>>,
    example: Option<Value>,
    examples: IndexMap<String, RefOr<Example>>,
    content: IndexMap<String, MediaType>,
}

ref_or_from!(Header);

impl Header {
    pub fn builder() -> HeaderBuilder {
        HeaderBuilder::default()
    }

    /// A header described by a schema alone
    pub fn with_schema(schema: impl Into<RefOr<Schema>>) -> Self {
        Self {
            schema: Some(schema.into()),
            ..Self::default()
        }
    }
}

impl WireObject for Header {
    fn kind(&self) -> WireKind {
        WireKind::Header
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("description", Field::opt_str(&self.description)),
            ("required", Field::Bool(self.required)),
            ("deprecated", Field::Bool(self.deprecated)),
            ("allow_empty_value", Field::Bool(self.allow_empty_value)),
            ("style", Field::opt_str(&self.style)),
            ("explode", Field::Bool(self.explode)),
            ("allow_reserved", Field::Bool(self.allow_reserved)),
            ("schema", Field::opt_object(&self.schema)),
            ("example", Field::opt_json(&self.example)),
            ("examples", Field::object_map(&self.examples)),
            ("content", Field::object_map(&self.content)),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeaderBuilder {
    header: Header,
}

impl HeaderBuilder {
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.header.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.header.required = true;
        self
    }

    #[must_use]
    pub const fn deprecated(mut self) -> Self {
        self.header.deprecated = true;
        self
    }

    #[must_use]
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.header.style = Some(style.into());
        self
    }

    #[must_use]
    pub const fn explode(mut self) -> Self {
        self.header.explode = true;
        self
    }

    #[must_use]
    pub fn schema(mut self, schema: impl Into<RefOr<Schema>>) -> Self {
        self.header.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn example(mut self, example: Value) -> Self {
        self.header.example = Some(example);
        self
    }

    #[must_use]
    pub fn named_example(mut self, name: impl Into<String>, example: impl Into<RefOr<Example>>) -> Self {
        self.header.examples.insert(name.into(), example.into());
        self
    }

    #[must_use]
    pub fn content(mut self, content_type: impl Into<String>, media: MediaType) -> Self {
        self.header.content.insert(content_type.into(), media);
        self
    }

    /// # Errors
    /// - `InvalidType` for an unknown style
    /// - `InvalidCombination` when `example` and `examples` are both set
    /// - `InvalidValue` when `content` has more than one entry
    pub fn build(self) -> Result<Header> {
        check_style("Header", self.header.style.as_deref())?;
        check_examples("Header", self.header.example.as_ref(), &self.header.examples)?;
        check_single_content("Header", &self.header.content)?;
        Ok(self.header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reference;
    use serde_json::json;

    #[test]
    fn test_example_value_and_external_value_are_exclusive() {
        let result = Example::builder()
            .value(json!({"id": 1}))
            .external_value("https://example.com/pet.json")
            .build();
        assert!(matches!(
            result,
            Err(OpenApiError::InvalidCombination { object: "Example", .. })
        ));

        let example = Example::builder()
            .summary("A cat")
            .value(json!({"id": 1}))
            .build()
            .unwrap();
        assert_eq!(example.to_wire(), json!({"summary": "A cat", "value": {"id": 1}}));
    }

    #[test]
    fn test_encoding_style_is_validated() {
        let result = Encoding::builder().style("tabDelimited").build();
        assert!(matches!(
            result,
            Err(OpenApiError::InvalidType { object: "Encoding", field: "style", .. })
        ));
    }

    #[test]
    fn test_encoding_form_style_explodes_by_default() {
        let form = Encoding::builder().style("form").build().unwrap();
        assert_eq!(form.to_wire(), json!({"style": "form", "explode": true}));

        let simple = Encoding::builder().style("simple").build().unwrap();
        assert_eq!(simple.to_wire(), json!({"style": "simple"}));

        let unexploded = Encoding::builder().style("form").explode(false).build().unwrap();
        assert_eq!(unexploded.to_wire(), json!({"style": "form"}));
    }

    #[test]
    fn test_media_type_examples() {
        let media = MediaType::builder()
            .schema(Reference::schema("Pet"))
            .named_example("cat", Reference::component("examples", "Cat"))
            .build()
            .unwrap();
        assert_eq!(
            media.to_wire(),
            json!({
                "schema": {"$ref": "#/components/schemas/Pet"},
                "examples": {"cat": {"$ref": "#/components/examples/Cat"}}
            })
        );

        let both = MediaType::builder()
            .example(json!("x"))
            .named_example("y", Example::default())
            .build();
        assert!(both.is_err());
    }

    #[test]
    fn test_header_allows_a_single_content_entry() {
        let result = Header::builder()
            .content("application/json", MediaType::default())
            .content("text/plain", MediaType::default())
            .build();
        assert!(matches!(
            result,
            Err(OpenApiError::InvalidValue { field: "content", .. })
        ));

        let header = Header::builder()
            .description("Rate limit")
            .schema(Schema::integer())
            .build()
            .unwrap();
        assert_eq!(
            header.to_wire(),
            json!({"description": "Rate limit", "schema": {"type": "integer"}})
        );
    }
}
