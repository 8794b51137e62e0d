//! Security schemes and requirements

use super::parameter::Location;
use super::reference::ref_or_from;
use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{OpenApiError, Result, require_text};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthFlow {
    authorization_url: Option<String>,
    token_url: Option<String>,
    refresh_url: Option<String>,
    scopes: IndexMap<String, String>,
}

impl OAuthFlow {
    /// # Errors
    /// Returns `MissingField` when the URL is blank
    pub fn implicit(authorization_url: impl Into<String>) -> Result<Self> {
        let authorization_url = authorization_url.into();
        require_text(&authorization_url, "OAuthFlow", "authorizationUrl")?;
        Ok(Self {
            authorization_url: Some(authorization_url),
            ..Self::default()
        })
    }

    /// # Errors
    /// Returns `MissingField` when the URL is blank
    pub fn password(token_url: impl Into<String>) -> Result<Self> {
        Self::with_token_url(token_url)
    }

    /// # Errors
    /// Returns `MissingField` when the URL is blank
    pub fn client_credentials(token_url: impl Into<String>) -> Result<Self> {
        Self::with_token_url(token_url)
    }

    /// # Errors
    /// Returns `MissingField` when either URL is blank
    pub fn authorization_code(
        authorization_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Result<Self> {
        let mut flow = Self::implicit(authorization_url)?;
        flow.token_url = Self::with_token_url(token_url)?.token_url;
        Ok(flow)
    }

    fn with_token_url(token_url: impl Into<String>) -> Result<Self> {
        let token_url = token_url.into();
        require_text(&token_url, "OAuthFlow", "tokenUrl")?;
        Ok(Self {
            token_url: Some(token_url),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_refresh_url(mut self, url: impl Into<String>) -> Self {
        self.refresh_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>, description: impl Into<String>) -> Self {
        self.scopes.insert(scope.into(), description.into());
        self
    }
}

impl WireObject for OAuthFlow {
    fn kind(&self) -> WireKind {
        WireKind::OAuthFlow
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("authorization_url", Field::opt_str(&self.authorization_url)),
            ("token_url", Field::opt_str(&self.token_url)),
            ("refresh_url", Field::opt_str(&self.refresh_url)),
            ("scopes", Field::str_map(&self.scopes)),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthFlows {
    pub implicit: Option<OAuthFlow>,
    pub password: Option<OAuthFlow>,
    pub client_credentials: Option<OAuthFlow>,
    pub authorization_code: Option<OAuthFlow>,
}

impl WireObject for OAuthFlows {
    fn kind(&self) -> WireKind {
        WireKind::OAuthFlows
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("implicit", Field::opt_object(&self.implicit)),
            ("password", Field::opt_object(&self.password)),
            ("client_credentials", Field::opt_object(&self.client_credentials)),
            ("authorization_code", Field::opt_object(&self.authorization_code)),
        ])
    }
}

/// How a client authenticates; the constructors enforce the fields each
/// scheme type requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityScheme {
    scheme_type: &'static str,
    description: Option<String>,
    name: Option<String>,
    location: Option<Location>,
    scheme: Option<String>,
    bearer_format: Option<String>,
    flows: Option<OAuthFlows>,
    open_id_connect_url: Option<String>,
}

ref_or_from!(SecurityScheme);

impl SecurityScheme {
    const fn empty(scheme_type: &'static str) -> Self {
        Self {
            scheme_type,
            description: None,
            name: None,
            location: None,
            scheme: None,
            bearer_format: None,
            flows: None,
            open_id_connect_url: None,
        }
    }

    /// An API key carried in a query parameter, header or cookie
    ///
    /// # Errors
    /// - `MissingField` for a blank name
    /// - `InvalidType` for a path location
    pub fn api_key(name: impl Into<String>, location: Location) -> Result<Self> {
        let name = name.into();
        require_text(&name, "SecurityScheme", "name")?;
        if location == Location::Path {
            return Err(OpenApiError::InvalidType {
                object: "SecurityScheme",
                field: "in",
                expected: "query, header, cookie",
                found: location.to_string(),
            });
        }
        Ok(Self {
            name: Some(name),
            location: Some(location),
            ..Self::empty("apiKey")
        })
    }

    /// HTTP authentication such as `basic` or `bearer`
    ///
    /// # Errors
    /// Returns `MissingField` for a blank scheme
    pub fn http(scheme: impl Into<String>) -> Result<Self> {
        let scheme = scheme.into();
        require_text(&scheme, "SecurityScheme", "scheme")?;
        Ok(Self {
            scheme: Some(scheme),
            ..Self::empty("http")
        })
    }

    /// # Errors
    /// Returns `MissingField` when no flow is configured
    pub fn oauth2(flows: OAuthFlows) -> Result<Self> {
        if flows == OAuthFlows::default() {
            return Err(OpenApiError::MissingField {
                object: "SecurityScheme",
                field: "flows",
            });
        }
        Ok(Self {
            flows: Some(flows),
            ..Self::empty("oauth2")
        })
    }

    /// # Errors
    /// Returns `MissingField` for a blank URL
    pub fn open_id_connect(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        require_text(&url, "SecurityScheme", "openIdConnectUrl")?;
        Ok(Self {
            open_id_connect_url: Some(url),
            ..Self::empty("openIdConnect")
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Only meaningful for `http` bearer schemes
    #[must_use]
    pub fn with_bearer_format(mut self, format: impl Into<String>) -> Self {
        self.bearer_format = Some(format.into());
        self
    }
}

impl WireObject for SecurityScheme {
    fn kind(&self) -> WireKind {
        WireKind::SecurityScheme
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("_type", Field::Str(self.scheme_type)),
            ("description", Field::opt_str(&self.description)),
            ("name", Field::opt_str(&self.name)),
            ("_in", self.location.map_or(Field::Absent, |l| Field::Str(l.as_str()))),
            ("scheme", Field::opt_str(&self.scheme)),
            ("bearer_format", Field::opt_str(&self.bearer_format)),
            ("flows", Field::opt_object(&self.flows)),
            ("open_id_connect_url", Field::opt_str(&self.open_id_connect_url)),
        ])
    }
}

/// Scheme name to required scopes. All entries must be satisfied together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityRequirement {
    entries: IndexMap<String, Vec<String>>,
}

impl SecurityRequirement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `scheme` with `scopes`; pass no scopes for non-OAuth schemes
    #[must_use]
    pub fn with<I, S>(mut self, scheme: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(scheme.into(), scopes.into_iter().map(Into::into).collect());
        self
    }

    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl WireObject for SecurityRequirement {
    fn kind(&self) -> WireKind {
        WireKind::SecurityRequirement
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Keyed(
            self.entries
                .iter()
                .map(|(scheme, scopes)| (scheme.as_str(), Field::Strs(scopes)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_key_scheme() {
        let scheme = SecurityScheme::api_key("X-API-Key", Location::Header).unwrap();
        assert_eq!(
            scheme.to_wire(),
            json!({"type": "apiKey", "name": "X-API-Key", "in": "header"})
        );
        assert!(SecurityScheme::api_key("key", Location::Path).is_err());
        assert!(SecurityScheme::api_key("", Location::Query).is_err());
    }

    #[test]
    fn test_http_bearer_scheme() {
        let scheme = SecurityScheme::http("bearer")
            .unwrap()
            .with_bearer_format("JWT");
        assert_eq!(
            scheme.to_wire(),
            json!({"type": "http", "scheme": "bearer", "bearerFormat": "JWT"})
        );
    }

    #[test]
    fn test_oauth2_requires_a_flow() {
        assert!(SecurityScheme::oauth2(OAuthFlows::default()).is_err());

        let flows = OAuthFlows {
            client_credentials: Some(OAuthFlow::client_credentials("https://auth.example.com/token").unwrap()),
            ..OAuthFlows::default()
        };
        let scheme = SecurityScheme::oauth2(flows).unwrap();
        assert_eq!(
            scheme.to_wire(),
            json!({
                "type": "oauth2",
                "flows": {
                    "clientCredentials": {
                        "tokenUrl": "https://auth.example.com/token",
                        "scopes": {}
                    }
                }
            })
        );
    }

    #[test]
    fn test_empty_scope_list_is_emitted() {
        let requirement = SecurityRequirement::new()
            .with("api_key", Vec::<String>::new())
            .with("oauth", ["read:pets"]);
        assert_eq!(
            requirement.to_wire(),
            json!({"api_key": [], "oauth": ["read:pets"]})
        );
    }
}
