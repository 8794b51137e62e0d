//! Operation parameters and the merge of inferred with declared parameters

use super::media::{Example, MediaType, check_examples, check_single_content, check_style};
use super::merge::{FieldConflict, merge_field, merge_option};
use super::reference::{RefOr, ref_or_from};
use super::schema::Schema;
use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{OpenApiError, Result, require_text};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Query,
    Header,
    Path,
    Cookie,
}

impl Location {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Header => "header",
            Self::Path => "path",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Location {
    type Err = OpenApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "query" => Ok(Self::Query),
            "header" => Ok(Self::Header),
            "path" => Ok(Self::Path),
            "cookie" => Ok(Self::Cookie),
            // Swagger 2 habit; bodies are request bodies in 3.0
            "body" | "requestBody" => Err(OpenApiError::InvalidType {
                object: "Parameter",
                field: "in",
                expected: "query, header, path, cookie (document bodies as a request body)",
                found: s.to_string(),
            }),
            other => Err(OpenApiError::InvalidType {
                object: "Parameter",
                field: "in",
                expected: "query, header, path, cookie",
                found: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    location: Location,
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

ref_or_from!(Parameter);

impl Parameter {
    pub fn builder(name: impl Into<String>, location: Location) -> ParameterBuilder {
        ParameterBuilder {
            parameter: Self {
                name: name.into(),
                location,
                description: None,
                required: false,
                deprecated: false,
                allow_empty_value: false,
                style: None,
                explode: false,
                allow_reserved: false,
                schema: None,
                example: None,
                examples: IndexMap::new(),
                content: IndexMap::new(),
            },
            choices: None,
        }
    }

    /// A required path parameter as inferred from a route placeholder
    pub fn path(name: impl Into<String>, schema: Option<&Schema>) -> Self {
        let mut builder = Self::builder(name, Location::Path);
        builder.parameter.required = true;
        builder.parameter.schema = schema.map(RefOr::from);
        builder.parameter
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn location(&self) -> Location {
        self.location
    }

    pub const fn required(&self) -> bool {
        self.required
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub const fn schema(&self) -> Option<&RefOr<Schema>> {
        self.schema.as_ref()
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    /// Merge two descriptions of the same parameter.
    ///
    /// Unset fields (absent, empty or false) take the other side's value and
    /// equal values pass. A `$ref` schema wins over an inline one. Inline
    /// schemas are merged one level deep; differences below that level are
    /// reported against the enclosing schema field.
    ///
    /// # Errors
    /// Returns `ParameterConflict` naming the first field both sides set
    /// differently
    pub fn merge(&self, incoming: &Self) -> Result<Self> {
        self.merge_fields(incoming)
            .map_err(|conflict| OpenApiError::ParameterConflict {
                parameter: self.name.clone(),
                field: conflict.field,
                existing: conflict.existing,
                incoming: conflict.incoming,
            })
    }

    fn merge_fields(&self, incoming: &Self) -> std::result::Result<Self, FieldConflict> {
        if self.location != incoming.location {
            return Err(FieldConflict {
                field: "in".to_string(),
                existing: self.location.to_string(),
                incoming: incoming.location.to_string(),
            });
        }

        Ok(Self {
            name: self.name.clone(),
            location: self.location,
            description: merge_option("description", &self.description, &incoming.description)?,
            required: self.required || incoming.required,
            deprecated: self.deprecated || incoming.deprecated,
            allow_empty_value: self.allow_empty_value || incoming.allow_empty_value,
            style: merge_option("style", &self.style, &incoming.style)?,
            explode: self.explode || incoming.explode,
            allow_reserved: self.allow_reserved || incoming.allow_reserved,
            schema: merge_schema(self.schema.as_ref(), incoming.schema.as_ref())?,
            example: merge_option("example", &self.example, &incoming.example)?,
            examples: merge_field("examples", &self.examples, &incoming.examples, IndexMap::is_empty)?,
            content: merge_field("content", &self.content, &incoming.content, IndexMap::is_empty)?,
        })
    }
}

fn merge_schema(
    existing: Option<&RefOr<Schema>>,
    incoming: Option<&RefOr<Schema>>,
) -> std::result::Result<Option<RefOr<Schema>>, FieldConflict> {
    let merged = match (existing, incoming) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(RefOr::Ref(a)), Some(RefOr::Ref(b))) => {
            if a != b {
                return Err(FieldConflict {
                    field: "schema".to_string(),
                    existing: a.to_string(),
                    incoming: b.to_string(),
                });
            }
            Some(RefOr::Ref(a.clone()))
        }
        (Some(RefOr::Ref(reference)), Some(RefOr::Item(_)))
        | (Some(RefOr::Item(_)), Some(RefOr::Ref(reference))) => Some(RefOr::Ref(reference.clone())),
        (Some(RefOr::Item(a)), Some(RefOr::Item(b))) => Some(RefOr::Item(
            a.merge(b).map_err(|conflict| conflict.nested_in("schema"))?,
        )),
    };
    Ok(merged)
}

/// A parameter's name and location; a `$ref` is identified by its pointer
pub type ParameterKey = (String, Option<Location>);

/// Parameters of an operation or path item, unique by [`ParameterKey`]
pub type ParameterMap = IndexMap<ParameterKey, RefOr<Parameter>>;

impl RefOr<Parameter> {
    pub fn key(&self) -> ParameterKey {
        match self {
            Self::Ref(reference) => (reference.pointer().to_string(), None),
            Self::Item(item) => (item.name.clone(), Some(item.location)),
        }
    }
}

/// Wire field for a parameter map, emitted as a list in insertion order
pub(crate) fn parameters_field(parameters: &ParameterMap) -> Field<'_> {
    Field::ObjectMap(
        parameters
            .iter()
            .map(|((name, _), parameter)| (name.as_str(), parameter as &dyn WireObject))
            .collect(),
    )
}

impl WireObject for Parameter {
    fn kind(&self) -> WireKind {
        WireKind::Parameter
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("name", Field::Str(&self.name)),
            ("_in", Field::Str(self.location.as_str())),
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

/// Builder for [`Parameter`]; `choices` become the schema's enum
#[derive(Debug, Clone)]
pub struct ParameterBuilder {
    parameter: Parameter,
    choices: Option<Vec<Value>>,
}

impl ParameterBuilder {
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.parameter.description = Some(description.into());
        self
    }

    /// Ignored for path parameters, which are always required
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.parameter.required = required;
        self
    }

    #[must_use]
    pub const fn deprecated(mut self) -> Self {
        self.parameter.deprecated = true;
        self
    }

    #[must_use]
    pub const fn allow_empty_value(mut self) -> Self {
        self.parameter.allow_empty_value = true;
        self
    }

    #[must_use]
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.parameter.style = Some(style.into());
        self
    }

    #[must_use]
    pub const fn explode(mut self) -> Self {
        self.parameter.explode = true;
        self
    }

    #[must_use]
    pub const fn allow_reserved(mut self) -> Self {
        self.parameter.allow_reserved = true;
        self
    }

    #[must_use]
    pub fn schema(mut self, schema: impl Into<RefOr<Schema>>) -> Self {
        self.parameter.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn example(mut self, example: Value) -> Self {
        self.parameter.example = Some(example);
        self
    }

    #[must_use]
    pub fn named_example(mut self, name: impl Into<String>, example: impl Into<RefOr<Example>>) -> Self {
        self.parameter.examples.insert(name.into(), example.into());
        self
    }

    #[must_use]
    pub fn content(mut self, content_type: impl Into<String>, media: MediaType) -> Self {
        self.parameter.content.insert(content_type.into(), media);
        self
    }

    /// Allowed values; the schema type is inferred from them
    #[must_use]
    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// True when nothing describes the parameter's value yet
    pub(crate) fn lacks_schema(&self) -> bool {
        self.parameter.schema.is_none()
            && self.parameter.content.is_empty()
            && self.choices.is_none()
    }

    /// # Errors
    /// - `MissingField` for a blank name
    /// - `InvalidType` for an unknown style
    /// - `InvalidCombination` for example with examples, or schema with content
    /// - `InvalidValue` when `content` has more than one entry
    /// - `ChoicesOnReference` when choices meet a `$ref` schema
    /// - `EnumTypeMismatch` / `MixedChoiceTypes` from the choices
    pub fn build(self) -> Result<Parameter> {
        let Self {
            mut parameter,
            choices,
        } = self;

        require_text(&parameter.name, "Parameter", "name")?;
        check_style("Parameter", parameter.style.as_deref())?;
        check_examples("Parameter", parameter.example.as_ref(), &parameter.examples)?;
        check_single_content("Parameter", &parameter.content)?;
        if parameter.schema.is_some() && !parameter.content.is_empty() {
            return Err(OpenApiError::InvalidCombination {
                object: "Parameter",
                reason: "schema and content are mutually exclusive".to_string(),
            });
        }

        if let Some(choices) = choices {
            parameter.schema = Some(match parameter.schema.take() {
                None => RefOr::Item(Schema::from_choices(choices)?),
                Some(RefOr::Ref(reference)) => {
                    return Err(OpenApiError::ChoicesOnReference {
                        parameter: parameter.name,
                        reference: reference.to_string(),
                    });
                }
                Some(RefOr::Item(mut schema)) => {
                    schema.add_enum(choices)?;
                    RefOr::Item(schema)
                }
            });
        }

        if parameter.location == Location::Path {
            parameter.required = true;
        }

        Ok(parameter)
    }
}
