//! The OpenAPI 3.0 object model
//!
//! Every type renders through [`WireObject`]; construction validates, so a
//! value that exists is a value that may be emitted.

pub mod components;
pub mod document;
pub mod info;
pub mod media;
pub mod merge;
pub mod operation;
pub mod parameter;
pub mod path;
pub mod reference;
pub mod response;
pub mod schema;
pub mod security;
pub mod server;
pub mod tag;
pub mod wire;

pub use components::Components;
pub use document::{OPENAPI_VERSION, OpenApiDocument};
pub use info::{Contact, Info, License};
pub use media::{Encoding, Example, Header, MediaType};
pub use merge::FieldConflict;
pub use operation::{Callback, Operation};
pub use parameter::{Location, Parameter, ParameterBuilder, ParameterKey, ParameterMap};
pub use path::{HttpMethod, PathItem, Paths};
pub use reference::{RefOr, Reference};
pub use response::{DEFAULT_RESPONSES, Link, RequestBody, Response, Responses};
pub use schema::{AdditionalProperties, Discriminator, Schema, SchemaBuilder, SchemaType, Xml};
pub use security::{OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme};
pub use server::{Server, ServerVariable};
pub use tag::{ExternalDocumentation, Tag};
pub use wire::{Field, Fields, WireKind, WireObject, WireOptions, to_wire};
