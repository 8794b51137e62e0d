//! Server entries and their URL template variables

use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{OpenApiError, Result, require_text};
use indexmap::IndexMap;
use std::collections::HashSet;

/// A substitution variable in a server URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerVariable {
    enum_values: Vec<String>,
    default: serde_json::Value,
    description: Option<String>,
}

impl ServerVariable {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            enum_values: Vec::new(),
            default: serde_json::Value::String(default.into()),
            description: None,
        }
    }

    /// Restrict the variable to `values`
    ///
    /// # Errors
    /// Returns `InvalidValue` when `values` repeats an entry
    pub fn with_enum<I, S>(mut self, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        if let Some(duplicate) = values.iter().find(|v| !seen.insert(v.as_str())) {
            return Err(OpenApiError::InvalidValue {
                object: "ServerVariable",
                field: "enum",
                reason: format!("entries must be unique, {duplicate:?} repeats"),
            });
        }
        self.enum_values = values;
        Ok(self)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl WireObject for ServerVariable {
    fn kind(&self) -> WireKind {
        WireKind::ServerVariable
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("enum", Field::Strs(&self.enum_values)),
            // An empty default is still a default
            ("default", Field::Json(&self.default)),
            ("description", Field::opt_str(&self.description)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    url: String,
    description: Option<String>,
    variables: IndexMap<String, ServerVariable>,
}

impl Server {
    /// # Errors
    /// Returns `MissingField` when `url` is blank
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        require_text(&url, "Server", "url")?;
        Ok(Self {
            url,
            description: None,
            variables: IndexMap::new(),
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, variable: ServerVariable) -> Self {
        self.variables.insert(name.into(), variable);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl WireObject for Server {
    fn kind(&self) -> WireKind {
        WireKind::Server
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("url", Field::Str(&self.url)),
            ("description", Field::opt_str(&self.description)),
            ("variables", Field::object_map(&self.variables)),
        ])
    }
}
