//! Error types for document construction and assembly

use thiserror::Error;

/// Everything that can go wrong while building a document.
///
/// All of these are startup failures: a document that raised any of them
/// is never served.
#[derive(Debug, Error)]
pub enum OpenApiError {
    /// A value of the wrong shape was supplied for a field
    #[error("{object}.{field} must be one of {expected}, got {found}")]
    InvalidType {
        object: &'static str,
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    /// A required field was not supplied
    #[error("{object}.{field} is required")]
    MissingField {
        object: &'static str,
        field: &'static str,
    },

    /// Fields that may not be combined were both set (or neither was)
    #[error("{object}: {reason}")]
    InvalidCombination { object: &'static str, reason: String },

    /// A field holds a value outside its allowed range
    #[error("{object}.{field}: {reason}")]
    InvalidValue {
        object: &'static str,
        field: &'static str,
        reason: String,
    },

    /// A tag was registered twice with different descriptions
    #[error("tag {name:?} is already described as {existing:?}, refusing {conflicting:?}")]
    TagConflict {
        name: String,
        existing: String,
        conflicting: String,
    },

    /// Choices were applied to a schema of a different type
    #[error("choices are of type {inferred} but the schema is of type {existing}")]
    EnumTypeMismatch { existing: String, inferred: String },

    /// Choices mix literal types
    #[error("choices must all share one type, found {first} and {other}")]
    MixedChoiceTypes { first: String, other: String },

    /// Choices were applied to a parameter whose schema is a reference
    #[error("parameter {parameter:?} has a $ref schema ({reference}); choices cannot be added to it")]
    ChoicesOnReference { parameter: String, reference: String },

    /// Router-inferred and declared parameters disagree
    #[error("parameter {parameter:?} disagrees on {field}: {existing} vs {incoming}")]
    ParameterConflict {
        parameter: String,
        field: String,
        existing: String,
        incoming: String,
    },

    /// Two top-level tags share a name
    #[error("duplicate tag {name:?}")]
    DuplicateTag { name: String },

    /// Two components of one kind share a name
    #[error("duplicate {kind} component {name:?}")]
    DuplicateComponent { kind: &'static str, name: String },

    /// A URI template was added to the paths twice
    #[error("duplicate path {uri:?}")]
    DuplicatePath { uri: String },

    /// One method on one URI was documented twice
    #[error("{method} {uri} is documented by more than one handler")]
    DuplicateOperation { method: String, uri: String },

    /// Two operations share an operationId
    #[error("operationId {operation_id:?} is used by both {first} and {second}")]
    DuplicateOperationId {
        operation_id: String,
        first: String,
        second: String,
    },

    /// JSON encoding failed
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML encoding failed
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration could not be turned into document values
    #[error("configuration error: {0}")]
    Config(#[from] openapi3e_config::ConfigError),
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, OpenApiError>;

/// Fail with `MissingField` when `value` is blank
pub(crate) fn require_text(
    value: &str,
    object: &'static str,
    field: &'static str,
) -> Result<()> {
    if value.trim().is_empty() {
        Err(OpenApiError::MissingField { object, field })
    } else {
        Ok(())
    }
}
