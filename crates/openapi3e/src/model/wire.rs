//! Generic conversion of model objects into their JSON wire form
//!
//! Every model type describes itself as a list of named [`Field`]s (or, for
//! the map-like wrapper types, a list of keyed entries). [`to_wire`] walks
//! that description and applies the presentation rules in one place:
//!
//! 1. fields whose internal name starts with [`INTERNAL_PREFIX`] are skipped
//! 2. `false` booleans are omitted
//! 3. empty strings, lists, maps and nested objects are omitted, numbers
//!    (including zero) are kept
//! 4. field names go through [`wire_name`]
//! 5. a few container fields get special handling, looked up in
//!    [`FIELD_RULES`] by (object kind, field name)

use crate::keyname::wire_name;
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// Field-name prefix for staging data that never reaches the document
pub const INTERNAL_PREFIX: &str = "x_";

/// The kind of object being serialized, used to key [`FIELD_RULES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    Contact,
    License,
    Info,
    ServerVariable,
    Server,
    ExternalDocumentation,
    Reference,
    Discriminator,
    Xml,
    Schema,
    Example,
    Encoding,
    MediaType,
    Header,
    Parameter,
    Link,
    Response,
    Responses,
    RequestBody,
    OAuthFlow,
    OAuthFlows,
    SecurityScheme,
    SecurityRequirement,
    Callback,
    Components,
    Operation,
    PathItem,
    Paths,
    Tag,
    Document,
    RouteDoc,
}

/// Non-default handling for specific container fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Apply the generic rules
    Default,
    /// Emit a keyed map as a sequence of its values
    Sequence,
    /// Emit a keyed map with its keys sorted
    SortedKeys,
    /// Emit empty lists and maps instead of omitting them
    KeepEmpty,
}

/// Special cases by (object kind, field). `None` matches every field of the
/// kind, including the entries of keyed wrapper types.
pub const FIELD_RULES: &[(WireKind, Option<&str>, FieldRule)] = &[
    (WireKind::Operation, Some("parameters"), FieldRule::Sequence),
    (WireKind::PathItem, Some("parameters"), FieldRule::Sequence),
    (WireKind::Components, Some("schemas"), FieldRule::SortedKeys),
    // An explicit empty override means "no auth for this operation"
    (WireKind::Operation, Some("security"), FieldRule::KeepEmpty),
    // An empty scope list means "no scopes", not "absent"
    (WireKind::SecurityRequirement, None, FieldRule::KeepEmpty),
    (WireKind::OAuthFlow, Some("scopes"), FieldRule::KeepEmpty),
    // A document with no visible routes still carries `paths: {}`
    (WireKind::Document, Some("paths"), FieldRule::KeepEmpty),
];

/// Rule for `field` of an object of `kind`
pub fn field_rule(kind: WireKind, field: Option<&str>) -> FieldRule {
    FIELD_RULES
        .iter()
        .find(|(k, f, _)| *k == kind && (f.is_none() || *f == field))
        .map_or(FieldRule::Default, |(_, _, rule)| *rule)
}

/// One field value, borrowed from the object that owns it
pub enum Field<'a> {
    /// Unset optional value
    Absent,
    Str(&'a str),
    /// Omitted when false
    Bool(bool),
    /// Emitted whether true or false
    ExplicitBool(bool),
    Int(u64),
    /// Integral values are emitted as integers
    Float(f64),
    /// Arbitrary JSON, omitted only when null
    Json(&'a Value),
    Strs(&'a [String]),
    Jsons(&'a [Value]),
    StrMap(Vec<(&'a str, &'a str)>),
    Object(&'a dyn WireObject),
    Objects(Vec<&'a dyn WireObject>),
    ObjectMap(Vec<(&'a str, &'a dyn WireObject)>),
}

impl<'a> Field<'a> {
    pub fn opt_str(value: &'a Option<String>) -> Self {
        value.as_deref().map_or(Self::Absent, Self::Str)
    }

    pub fn opt_int(value: Option<u64>) -> Self {
        value.map_or(Self::Absent, Self::Int)
    }

    pub fn opt_float(value: Option<f64>) -> Self {
        value.map_or(Self::Absent, Self::Float)
    }

    pub fn opt_json(value: &'a Option<Value>) -> Self {
        value.as_ref().map_or(Self::Absent, Self::Json)
    }

    pub fn opt_object<T: WireObject>(value: &'a Option<T>) -> Self {
        value
            .as_ref()
            .map_or(Self::Absent, |object| Self::Object(object))
    }

    pub fn objects<T: WireObject>(items: &'a [T]) -> Self {
        Self::Objects(items.iter().map(|item| item as &dyn WireObject).collect())
    }

    pub fn object_map<T: WireObject>(map: &'a IndexMap<String, T>) -> Self {
        Self::ObjectMap(
            map.iter()
                .map(|(key, value)| (key.as_str(), value as &dyn WireObject))
                .collect(),
        )
    }

    pub fn str_map(map: &'a IndexMap<String, String>) -> Self {
        Self::StrMap(map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect())
    }
}

/// How an object lays out its content
pub enum Fields<'a> {
    /// Named fields; names are internal and mapped to wire names
    Named(Vec<(&'static str, Field<'a>)>),
    /// User-keyed entries (status codes, URIs, scheme names) emitted verbatim
    Keyed(Vec<(&'a str, Field<'a>)>),
}

/// Rendering switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WireOptions {
    /// Also emit internal staging fields, for debug output
    pub include_internal: bool,
}

/// A model type that can be rendered as part of an OpenAPI document
pub trait WireObject {
    fn kind(&self) -> WireKind;

    fn fields(&self) -> Fields<'_>;

    /// The JSON wire representation
    fn to_wire(&self) -> Value
    where
        Self: Sized,
    {
        to_wire(self, WireOptions::default())
    }

    /// Wire representation including internal staging fields
    fn to_debug_wire(&self) -> Value
    where
        Self: Sized,
    {
        to_wire(
            self,
            WireOptions {
                include_internal: true,
            },
        )
    }
}

impl<T: WireObject + ?Sized> WireObject for Box<T> {
    fn kind(&self) -> WireKind {
        (**self).kind()
    }

    fn fields(&self) -> Fields<'_> {
        (**self).fields()
    }
}

/// Render any model object
pub fn to_wire(object: &dyn WireObject, options: WireOptions) -> Value {
    Value::Object(serialize_object(object, options))
}

fn serialize_object(object: &dyn WireObject, options: WireOptions) -> Map<String, Value> {
    let kind = object.kind();
    let mut out = Map::new();

    match object.fields() {
        Fields::Named(fields) => {
            for (name, field) in fields {
                if name.starts_with(INTERNAL_PREFIX) && !options.include_internal {
                    continue;
                }
                let rule = field_rule(kind, Some(name));
                if let Some(value) = serialize_field(field, rule, options) {
                    out.insert(wire_name(name).to_string(), value);
                }
            }
        }
        Fields::Keyed(entries) => {
            let rule = field_rule(kind, None);
            for (key, field) in entries {
                if let Some(value) = serialize_field(field, rule, options) {
                    out.insert(key.to_string(), value);
                }
            }
        }
    }

    out
}

fn serialize_field(field: Field<'_>, rule: FieldRule, options: WireOptions) -> Option<Value> {
    let keep_empty = rule == FieldRule::KeepEmpty;

    match field {
        Field::Absent => None,
        Field::Str(text) => (!text.is_empty()).then(|| Value::String(text.to_string())),
        Field::Bool(flag) => flag.then_some(Value::Bool(true)),
        Field::ExplicitBool(flag) => Some(Value::Bool(flag)),
        Field::Int(number) => Some(Value::from(number)),
        Field::Float(number) => float_value(number),
        Field::Json(value) => (!value.is_null()).then(|| value.clone()),
        Field::Strs(items) => non_empty_array(
            items.iter().map(|s| Value::String(s.clone())).collect(),
            keep_empty,
        ),
        Field::Jsons(items) => non_empty_array(items.to_vec(), keep_empty),
        Field::StrMap(entries) => {
            // Values are kept even when empty (scope descriptions may be "")
            let map: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect();
            (!map.is_empty() || keep_empty).then_some(Value::Object(map))
        }
        Field::Object(object) => {
            let map = serialize_object(object, options);
            (!map.is_empty() || keep_empty).then_some(Value::Object(map))
        }
        Field::Objects(items) => non_empty_array(
            items
                .into_iter()
                .map(|item| Value::Object(serialize_object(item, options)))
                .collect(),
            keep_empty,
        ),
        Field::ObjectMap(entries) => serialize_object_map(entries, rule, options),
    }
}

fn serialize_object_map(
    mut entries: Vec<(&str, &dyn WireObject)>,
    rule: FieldRule,
    options: WireOptions,
) -> Option<Value> {
    if entries.is_empty() && rule != FieldRule::KeepEmpty {
        return None;
    }

    match rule {
        FieldRule::Sequence => Some(Value::Array(
            entries
                .into_iter()
                .map(|(_, object)| Value::Object(serialize_object(object, options)))
                .collect(),
        )),
        FieldRule::SortedKeys => {
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Some(keyed_object(entries, options))
        }
        FieldRule::Default | FieldRule::KeepEmpty => Some(keyed_object(entries, options)),
    }
}

fn keyed_object(entries: Vec<(&str, &dyn WireObject)>, options: WireOptions) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(key, object)| (key.to_string(), Value::Object(serialize_object(object, options))))
            .collect(),
    )
}

fn non_empty_array(items: Vec<Value>, keep_empty: bool) -> Option<Value> {
    (!items.is_empty() || keep_empty).then_some(Value::Array(items))
}

/// Largest integer an f64 represents exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[allow(clippy::cast_possible_truncation)]
fn float_value(number: f64) -> Option<Value> {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < MAX_EXACT_INTEGER {
        Some(Value::from(number as i64))
    } else {
        Number::from_f64(number).map(Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Sample {
        name: String,
        flag: bool,
        zero: u64,
        tags: Vec<String>,
        hidden: bool,
        children: IndexMap<String, Child>,
    }

    struct Child(&'static str);

    impl WireObject for Child {
        fn kind(&self) -> WireKind {
            WireKind::Tag
        }

        fn fields(&self) -> Fields<'_> {
            Fields::Named(vec![("name", Field::Str(self.0))])
        }
    }

    impl WireObject for Sample {
        fn kind(&self) -> WireKind {
            WireKind::Components
        }

        fn fields(&self) -> Fields<'_> {
            Fields::Named(vec![
                ("name", Field::Str(&self.name)),
                ("read_only", Field::Bool(self.flag)),
                ("min_length", Field::Int(self.zero)),
                ("tags", Field::Strs(&self.tags)),
                ("x_hidden", Field::Bool(self.hidden)),
                ("schemas", Field::object_map(&self.children)),
            ])
        }
    }

    fn sample() -> Sample {
        let mut children = IndexMap::new();
        children.insert("zebra".to_string(), Child("z"));
        children.insert("aardvark".to_string(), Child("a"));
        Sample {
            name: String::new(),
            flag: false,
            zero: 0,
            tags: Vec::new(),
            hidden: true,
            children,
        }
    }

    #[test]
    fn test_falsy_values_are_suppressed_but_zero_is_kept() {
        let mut object = sample();
        object.children.clear();

        assert_eq!(object.to_wire(), json!({"minLength": 0}));
    }

    #[test]
    fn test_internal_fields_only_in_debug_output() {
        let object = sample();

        assert!(object.to_wire().get("xHidden").is_none());
        assert_eq!(object.to_debug_wire()["xHidden"], json!(true));
    }

    #[test]
    fn test_components_schemas_are_sorted() {
        let wire = sample().to_wire();
        let keys: Vec<&String> = wire["schemas"].as_object().unwrap().keys().collect();

        assert_eq!(keys, ["aardvark", "zebra"]);
    }

    #[test]
    fn test_rule_table_lookup() {
        assert_eq!(
            field_rule(WireKind::Operation, Some("parameters")),
            FieldRule::Sequence
        );
        assert_eq!(
            field_rule(WireKind::PathItem, Some("parameters")),
            FieldRule::Sequence
        );
        assert_eq!(
            field_rule(WireKind::Operation, Some("responses")),
            FieldRule::Default
        );
        assert_eq!(
            field_rule(WireKind::SecurityRequirement, None),
            FieldRule::KeepEmpty
        );
        assert_eq!(
            field_rule(WireKind::SecurityRequirement, Some("anything")),
            FieldRule::KeepEmpty
        );
        assert_eq!(field_rule(WireKind::Schema, Some("schemas")), FieldRule::Default);
    }

    #[test]
    fn test_integral_floats_render_as_integers() {
        assert_eq!(float_value(4.0), Some(json!(4)));
        assert_eq!(float_value(-2.0), Some(json!(-2)));
        assert_eq!(float_value(0.5), Some(json!(0.5)));
        assert_eq!(float_value(f64::NAN), None);
    }
}
