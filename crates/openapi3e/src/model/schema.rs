//! Schema objects and the shared primitive schemas

use super::merge::{FieldConflict, merge_field, merge_list, merge_option};
use super::reference::{RefOr, ref_or_from};
use super::tag::ExternalDocumentation;
use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{OpenApiError, Result, require_text};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Primitive JSON schema types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl SchemaType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Whether enum literals of type `literal` fit a schema of this type
    const fn accepts(self, literal: Self) -> bool {
        matches!(
            (self, literal),
            (Self::String, Self::String)
                | (Self::Integer, Self::Integer)
                | (Self::Number, Self::Number | Self::Integer)
                | (Self::Boolean, Self::Boolean)
        )
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SchemaType {
    type Err = OpenApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            other => Err(OpenApiError::InvalidType {
                object: "Schema",
                field: "type",
                expected: "string, integer, number, boolean, array, object",
                found: other.to_string(),
            }),
        }
    }
}

/// Selects a schema among `one_of`/`any_of` alternatives by property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminator {
    property_name: String,
    mapping: IndexMap<String, String>,
}

impl Discriminator {
    /// # Errors
    /// Returns `MissingField` when `property_name` is blank
    pub fn new(property_name: impl Into<String>) -> Result<Self> {
        let property_name = property_name.into();
        require_text(&property_name, "Discriminator", "propertyName")?;
        Ok(Self {
            property_name,
            mapping: IndexMap::new(),
        })
    }

    #[must_use]
    pub fn with_mapping(mut self, value: impl Into<String>, reference: impl Into<String>) -> Self {
        self.mapping.insert(value.into(), reference.into());
        self
    }
}

impl WireObject for Discriminator {
    fn kind(&self) -> WireKind {
        WireKind::Discriminator
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("property_name", Field::Str(&self.property_name)),
            ("mapping", Field::str_map(&self.mapping)),
        ])
    }
}

/// XML representation hints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Xml {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub attribute: bool,
    pub wrapped: bool,
}

impl WireObject for Xml {
    fn kind(&self) -> WireKind {
        WireKind::Xml
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("name", Field::opt_str(&self.name)),
            ("namespace", Field::opt_str(&self.namespace)),
            ("prefix", Field::opt_str(&self.prefix)),
            ("attribute", Field::Bool(self.attribute)),
            ("wrapped", Field::Bool(self.wrapped)),
        ])
    }
}

/// `additionalProperties`: a flag or a schema for the extra values
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<RefOr<Schema>>),
}

/// A JSON-schema-like type description.
///
/// Construct through [`Schema::builder`], which validates on `build()`, or
/// start from one of the shared primitives ([`Schema::integer`] and
/// friends) and clone before specializing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    schema_type: Option<SchemaType>,
    format: Option<String>,
    title: Option<String>,
    description: Option<String>,
    default: Option<Value>,
    multiple_of: Option<f64>,
    maximum: Option<f64>,
    exclusive_maximum: bool,
    minimum: Option<f64>,
    exclusive_minimum: bool,
    max_length: Option<u64>,
    min_length: Option<u64>,
    pattern: Option<String>,
    max_items: Option<u64>,
    min_items: Option<u64>,
    unique_items: bool,
    max_properties: Option<u64>,
    min_properties: Option<u64>,
    required: Vec<String>,
    enum_values: Vec<Value>,
    all_of: Vec<RefOr<Self>>,
    one_of: Vec<RefOr<Self>>,
    any_of: Vec<RefOr<Self>>,
    not: Option<Box<RefOr<Self>>>,
    items: Option<Box<RefOr<Self>>>,
    properties: IndexMap<String, RefOr<Self>>,
    additional_properties: Option<AdditionalProperties>,
    nullable: bool,
    discriminator: Option<Discriminator>,
    read_only: bool,
    write_only: bool,
    xml: Option<Xml>,
    external_docs: Option<ExternalDocumentation>,
    example: Option<Value>,
    deprecated: bool,
}

ref_or_from!(Schema);

static INTEGER: Lazy<Schema> = Lazy::new(|| Schema::primitive(SchemaType::Integer, None));
static NUMBER: Lazy<Schema> = Lazy::new(|| Schema::primitive(SchemaType::Number, Some("double")));
static STRING: Lazy<Schema> = Lazy::new(|| Schema::primitive(SchemaType::String, None));
static INTEGERS: Lazy<Schema> = Lazy::new(|| Schema::array_of(&INTEGER));
static NUMBERS: Lazy<Schema> = Lazy::new(|| Schema::array_of(&NUMBER));
static STRINGS: Lazy<Schema> = Lazy::new(|| Schema::array_of(&STRING));

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Shared `{"type": "integer"}`
    pub fn integer() -> &'static Self {
        &INTEGER
    }

    /// Shared `{"type": "number", "format": "double"}`
    pub fn number() -> &'static Self {
        &NUMBER
    }

    /// Shared `{"type": "string"}`
    pub fn string() -> &'static Self {
        &STRING
    }

    /// Shared array of integers
    pub fn integers() -> &'static Self {
        &INTEGERS
    }

    /// Shared array of numbers
    pub fn numbers() -> &'static Self {
        &NUMBERS
    }

    /// Shared array of strings
    pub fn strings() -> &'static Self {
        &STRINGS
    }

    fn primitive(schema_type: SchemaType, format: Option<&str>) -> Self {
        Self {
            schema_type: Some(schema_type),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    fn array_of(items: &Self) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(RefOr::Item(items.clone()))),
            ..Self::default()
        }
    }

    /// A schema of the type inferred from `choices`, enumerating them
    ///
    /// # Errors
    /// Fails like [`infer_choice_type`]
    pub fn from_choices(choices: Vec<Value>) -> Result<Self> {
        let mut schema = Self::default();
        schema.add_enum(choices)?;
        Ok(schema)
    }

    pub const fn schema_type(&self) -> Option<SchemaType> {
        self.schema_type
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn enum_values(&self) -> &[Value] {
        &self.enum_values
    }

    pub fn items(&self) -> Option<&RefOr<Self>> {
        self.items.as_deref()
    }

    pub const fn properties(&self) -> &IndexMap<String, RefOr<Self>> {
        &self.properties
    }

    /// Restrict this schema to `choices`.
    ///
    /// The choices' type must agree with the schema's type (an untyped
    /// schema adopts it). On an array schema the enum applies to the
    /// items, which are created when missing.
    ///
    /// # Errors
    /// - `MixedChoiceTypes` / `InvalidType` / `InvalidValue` from inference
    /// - `EnumTypeMismatch` when the schema already has another type
    /// - `InvalidCombination` when the array items are a `$ref`
    pub fn add_enum(&mut self, choices: Vec<Value>) -> Result<()> {
        let inferred = infer_choice_type(&choices)?;

        if self.schema_type == Some(SchemaType::Array) {
            return match self.items.as_deref_mut() {
                None => {
                    self.items = Some(Box::new(RefOr::Item(Self {
                        schema_type: Some(inferred),
                        enum_values: choices,
                        ..Self::default()
                    })));
                    Ok(())
                }
                Some(RefOr::Item(items)) => items.add_enum(choices),
                Some(RefOr::Ref(reference)) => Err(OpenApiError::InvalidCombination {
                    object: "Schema",
                    reason: format!("cannot add choices to array items referencing {reference}"),
                }),
            };
        }

        match self.schema_type {
            Some(existing) if !existing.accepts(inferred) => {
                return Err(OpenApiError::EnumTypeMismatch {
                    existing: existing.to_string(),
                    inferred: inferred.to_string(),
                });
            }
            Some(_) => {}
            None => self.schema_type = Some(inferred),
        }

        self.enum_values = choices;
        Ok(())
    }

    /// Check every construction-time invariant
    ///
    /// # Errors
    /// Returns the first violated invariant
    pub fn validate(&self) -> Result<()> {
        let composed = !self.all_of.is_empty()
            || !self.one_of.is_empty()
            || !self.any_of.is_empty()
            || self.not.is_some();

        if self.schema_type.is_none() && !composed {
            return Err(OpenApiError::MissingField {
                object: "Schema",
                field: "type",
            });
        }

        if self.schema_type == Some(SchemaType::Array) && self.items.is_none() {
            return Err(OpenApiError::InvalidCombination {
                object: "Schema",
                reason: "array schemas require items".to_string(),
            });
        }

        if self.read_only && self.write_only {
            return Err(OpenApiError::InvalidCombination {
                object: "Schema",
                reason: "readOnly and writeOnly cannot both be true".to_string(),
            });
        }

        if let Some(multiple_of) = self.multiple_of
            && !(multiple_of.is_finite() && multiple_of > 0.0)
        {
            return Err(OpenApiError::InvalidValue {
                object: "Schema",
                field: "multipleOf",
                reason: format!("must be greater than 0, got {multiple_of}"),
            });
        }

        for (field, bound) in [("maximum", self.maximum), ("minimum", self.minimum)] {
            if let Some(bound) = bound
                && !bound.is_finite()
            {
                return Err(OpenApiError::InvalidValue {
                    object: "Schema",
                    field,
                    reason: format!("must be finite, got {bound}"),
                });
            }
        }

        check_bounds("minimum", "maximum", self.minimum, self.maximum)?;
        check_bounds(
            "minLength",
            "maxLength",
            self.min_length.map(to_f64),
            self.max_length.map(to_f64),
        )?;
        check_bounds(
            "minItems",
            "maxItems",
            self.min_items.map(to_f64),
            self.max_items.map(to_f64),
        )?;
        check_bounds(
            "minProperties",
            "maxProperties",
            self.min_properties.map(to_f64),
            self.max_properties.map(to_f64),
        )?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = self.required.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(OpenApiError::InvalidValue {
                object: "Schema",
                field: "required",
                reason: format!("entries must be unique, {duplicate:?} repeats"),
            });
        }

        if !self.enum_values.is_empty() {
            let inferred = infer_choice_type(&self.enum_values)?;
            if let Some(existing) = self.schema_type
                && !existing.accepts(inferred)
            {
                return Err(OpenApiError::EnumTypeMismatch {
                    existing: existing.to_string(),
                    inferred: inferred.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Schema {
    /// One-level merge of two schemas describing the same value.
    ///
    /// Scalar fields must agree when both are set; flags are or-ed. Nested
    /// schemas (items, properties, compositions) are compared whole, not
    /// merged recursively.
    pub(crate) fn merge(&self, incoming: &Self) -> std::result::Result<Self, FieldConflict> {
        Ok(Self {
            schema_type: merge_option("type", &self.schema_type, &incoming.schema_type)?,
            format: merge_option("format", &self.format, &incoming.format)?,
            title: merge_option("title", &self.title, &incoming.title)?,
            description: merge_option("description", &self.description, &incoming.description)?,
            default: merge_option("default", &self.default, &incoming.default)?,
            multiple_of: merge_option("multipleOf", &self.multiple_of, &incoming.multiple_of)?,
            maximum: merge_option("maximum", &self.maximum, &incoming.maximum)?,
            exclusive_maximum: self.exclusive_maximum || incoming.exclusive_maximum,
            minimum: merge_option("minimum", &self.minimum, &incoming.minimum)?,
            exclusive_minimum: self.exclusive_minimum || incoming.exclusive_minimum,
            max_length: merge_option("maxLength", &self.max_length, &incoming.max_length)?,
            min_length: merge_option("minLength", &self.min_length, &incoming.min_length)?,
            pattern: merge_option("pattern", &self.pattern, &incoming.pattern)?,
            max_items: merge_option("maxItems", &self.max_items, &incoming.max_items)?,
            min_items: merge_option("minItems", &self.min_items, &incoming.min_items)?,
            unique_items: self.unique_items || incoming.unique_items,
            max_properties: merge_option(
                "maxProperties",
                &self.max_properties,
                &incoming.max_properties,
            )?,
            min_properties: merge_option(
                "minProperties",
                &self.min_properties,
                &incoming.min_properties,
            )?,
            required: merge_list("required", &self.required, &incoming.required)?,
            enum_values: merge_list("enum", &self.enum_values, &incoming.enum_values)?,
            all_of: merge_list("allOf", &self.all_of, &incoming.all_of)?,
            one_of: merge_list("oneOf", &self.one_of, &incoming.one_of)?,
            any_of: merge_list("anyOf", &self.any_of, &incoming.any_of)?,
            not: merge_option("not", &self.not, &incoming.not)?,
            items: merge_option("items", &self.items, &incoming.items)?,
            properties: merge_field(
                "properties",
                &self.properties,
                &incoming.properties,
                IndexMap::is_empty,
            )?,
            additional_properties: merge_option(
                "additionalProperties",
                &self.additional_properties,
                &incoming.additional_properties,
            )?,
            nullable: self.nullable || incoming.nullable,
            discriminator: merge_option(
                "discriminator",
                &self.discriminator,
                &incoming.discriminator,
            )?,
            read_only: self.read_only || incoming.read_only,
            write_only: self.write_only || incoming.write_only,
            xml: merge_option("xml", &self.xml, &incoming.xml)?,
            external_docs: merge_option(
                "externalDocs",
                &self.external_docs,
                &incoming.external_docs,
            )?,
            example: merge_option("example", &self.example, &incoming.example)?,
            deprecated: self.deprecated || incoming.deprecated,
        })
    }
}

#[allow(clippy::cast_precision_loss)]
const fn to_f64(value: u64) -> f64 {
    value as f64
}

fn check_bounds(
    low_name: &str,
    high_name: &str,
    low: Option<f64>,
    high: Option<f64>,
) -> Result<()> {
    match (low, high) {
        (Some(low), Some(high)) if low > high => Err(OpenApiError::InvalidCombination {
            object: "Schema",
            reason: format!("{low_name} ({low}) exceeds {high_name} ({high})"),
        }),
        _ => Ok(()),
    }
}

/// Schema type shared by every literal in `choices`.
///
/// # Errors
/// - `InvalidValue` when `choices` is empty
/// - `InvalidType` for null, array or object literals
/// - `MixedChoiceTypes` when literals disagree
pub fn infer_choice_type(choices: &[Value]) -> Result<SchemaType> {
    let mut literals = choices.iter();
    let Some(first) = literals.next() else {
        return Err(OpenApiError::InvalidValue {
            object: "Schema",
            field: "enum",
            reason: "choices must not be empty".to_string(),
        });
    };

    let first_type = literal_type(first)?;
    for literal in literals {
        let literal_type = literal_type(literal)?;
        if literal_type != first_type {
            return Err(OpenApiError::MixedChoiceTypes {
                first: first_type.to_string(),
                other: literal_type.to_string(),
            });
        }
    }
    Ok(first_type)
}

fn literal_type(literal: &Value) -> Result<SchemaType> {
    match literal {
        Value::String(_) => Ok(SchemaType::String),
        Value::Bool(_) => Ok(SchemaType::Boolean),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(SchemaType::Integer),
        Value::Number(_) => Ok(SchemaType::Number),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(OpenApiError::InvalidType {
            object: "Schema",
            field: "enum",
            expected: "string, integer, number, boolean",
            found: literal.to_string(),
        }),
    }
}

impl WireObject for Schema {
    fn kind(&self) -> WireKind {
        WireKind::Schema
    }

    fn fields(&self) -> Fields<'_> {
        let additional_properties = match &self.additional_properties {
            None => Field::Absent,
            Some(AdditionalProperties::Allowed(flag)) => Field::ExplicitBool(*flag),
            Some(AdditionalProperties::Schema(schema)) => Field::Object(&**schema),
        };

        Fields::Named(vec![
            ("_type", self.schema_type.map_or(Field::Absent, |t| Field::Str(t.as_str()))),
            ("_format", Field::opt_str(&self.format)),
            ("title", Field::opt_str(&self.title)),
            ("description", Field::opt_str(&self.description)),
            ("default", Field::opt_json(&self.default)),
            ("multiple_of", Field::opt_float(self.multiple_of)),
            ("maximum", Field::opt_float(self.maximum)),
            ("exclusive_maximum", Field::Bool(self.exclusive_maximum)),
            ("minimum", Field::opt_float(self.minimum)),
            ("exclusive_minimum", Field::Bool(self.exclusive_minimum)),
            ("max_length", Field::opt_int(self.max_length)),
            ("min_length", Field::opt_int(self.min_length)),
            ("pattern", Field::opt_str(&self.pattern)),
            ("max_items", Field::opt_int(self.max_items)),
            ("min_items", Field::opt_int(self.min_items)),
            ("unique_items", Field::Bool(self.unique_items)),
            ("max_properties", Field::opt_int(self.max_properties)),
            ("min_properties", Field::opt_int(self.min_properties)),
            ("required", Field::Strs(&self.required)),
            ("enum", Field::Jsons(&self.enum_values)),
            ("all_of", Field::objects(&self.all_of)),
            ("one_of", Field::objects(&self.one_of)),
            ("any_of", Field::objects(&self.any_of)),
            ("_not", Field::opt_object(&self.not)),
            ("items", Field::opt_object(&self.items)),
            ("properties", Field::object_map(&self.properties)),
            ("additional_properties", additional_properties),
            ("nullable", Field::Bool(self.nullable)),
            ("discriminator", Field::opt_object(&self.discriminator)),
            ("read_only", Field::Bool(self.read_only)),
            ("write_only", Field::Bool(self.write_only)),
            ("xml", Field::opt_object(&self.xml)),
            ("external_docs", Field::opt_object(&self.external_docs)),
            ("example", Field::opt_json(&self.example)),
            ("deprecated", Field::Bool(self.deprecated)),
        ])
    }
}

/// Builder for [`Schema`]
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    schema: Schema,
    enum_declared: bool,
}

impl SchemaBuilder {
    /// Start from a copy of an existing schema
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            schema: schema.clone(),
            enum_declared: false,
        }
    }

    #[must_use]
    pub const fn schema_type(mut self, schema_type: SchemaType) -> Self {
        self.schema.schema_type = Some(schema_type);
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.schema.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.schema.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.schema.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.schema.default = Some(value);
        self
    }

    #[must_use]
    pub const fn multiple_of(mut self, value: f64) -> Self {
        self.schema.multiple_of = Some(value);
        self
    }

    #[must_use]
    pub const fn maximum(mut self, value: f64, exclusive: bool) -> Self {
        self.schema.maximum = Some(value);
        self.schema.exclusive_maximum = exclusive;
        self
    }

    #[must_use]
    pub const fn minimum(mut self, value: f64, exclusive: bool) -> Self {
        self.schema.minimum = Some(value);
        self.schema.exclusive_minimum = exclusive;
        self
    }

    #[must_use]
    pub const fn length(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.schema.min_length = min;
        self.schema.max_length = max;
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.schema.pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub const fn item_count(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.schema.min_items = min;
        self.schema.max_items = max;
        self
    }

    #[must_use]
    pub const fn unique_items(mut self) -> Self {
        self.schema.unique_items = true;
        self
    }

    #[must_use]
    pub const fn property_count(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.schema.min_properties = min;
        self.schema.max_properties = max;
        self
    }

    #[must_use]
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.schema.required.push(name.into());
        self
    }

    #[must_use]
    pub fn enum_values(mut self, values: Vec<Value>) -> Self {
        self.schema.enum_values = values;
        self.enum_declared = true;
        self
    }

    #[must_use]
    pub fn all_of(mut self, schema: impl Into<RefOr<Schema>>) -> Self {
        self.schema.all_of.push(schema.into());
        self
    }

    #[must_use]
    pub fn one_of(mut self, schema: impl Into<RefOr<Schema>>) -> Self {
        self.schema.one_of.push(schema.into());
        self
    }

    #[must_use]
    pub fn any_of(mut self, schema: impl Into<RefOr<Schema>>) -> Self {
        self.schema.any_of.push(schema.into());
        self
    }

    #[must_use]
    pub fn not(mut self, schema: impl Into<RefOr<Schema>>) -> Self {
        self.schema.not = Some(Box::new(schema.into()));
        self
    }

    #[must_use]
    pub fn items(mut self, schema: impl Into<RefOr<Schema>>) -> Self {
        self.schema.items = Some(Box::new(schema.into()));
        self
    }

    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: impl Into<RefOr<Schema>>) -> Self {
        self.schema.properties.insert(name.into(), schema.into());
        self
    }

    #[must_use]
    pub fn additional_properties(mut self, additional: AdditionalProperties) -> Self {
        self.schema.additional_properties = Some(additional);
        self
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.schema.nullable = true;
        self
    }

    #[must_use]
    pub fn discriminator(mut self, discriminator: Discriminator) -> Self {
        self.schema.discriminator = Some(discriminator);
        self
    }

    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.schema.read_only = true;
        self
    }

    #[must_use]
    pub const fn write_only(mut self) -> Self {
        self.schema.write_only = true;
        self
    }

    #[must_use]
    pub fn xml(mut self, xml: Xml) -> Self {
        self.schema.xml = Some(xml);
        self
    }

    #[must_use]
    pub fn external_docs(mut self, docs: ExternalDocumentation) -> Self {
        self.schema.external_docs = Some(docs);
        self
    }

    #[must_use]
    pub fn example(mut self, example: Value) -> Self {
        self.schema.example = Some(example);
        self
    }

    #[must_use]
    pub const fn deprecated(mut self) -> Self {
        self.schema.deprecated = true;
        self
    }

    /// Validate and produce the schema. An untyped schema with an enum takes
    /// the enum's type.
    ///
    /// # Errors
    /// Returns the first violated invariant (see [`Schema::validate`])
    pub fn build(mut self) -> Result<Schema> {
        if self.enum_declared && self.schema.enum_values.is_empty() {
            return Err(OpenApiError::InvalidValue {
                object: "Schema",
                field: "enum",
                reason: "must not be empty".to_string(),
            });
        }

        if self.schema.schema_type.is_none() && !self.schema.enum_values.is_empty() {
            self.schema.schema_type = Some(infer_choice_type(&self.schema.enum_values)?);
        }

        self.schema.validate()?;
        Ok(self.schema)
    }
}
