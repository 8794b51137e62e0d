//! OpenAPI 3.0 document generation.
//!
//! Handlers are documented through a [`DocRegistry`] while the API is
//! defined. At startup the [`assembler`] joins the router's
//! [`RouteSource`] with that registry into an [`OpenApiDocument`], and the
//! [`DocumentCache`] keeps every variant serialized for serving.

pub mod assembler;
pub mod cache;
pub mod error;
pub mod keyname;
pub mod model;
pub mod registry;
pub mod router;

pub use assembler::{
    BuildOptions, CloakFn, OperationContext, OperationIdFn, Visibility, build,
    camel_case_operation_id, default_operation_id,
};
pub use cache::{DocumentCache, SpecFormat, SpecVariant};
pub use error::{OpenApiError, Result};
pub use model::OpenApiDocument;
pub use registry::{DocRegistry, RouteDoc, RouteDocBuilder, TagRegistry};
pub use router::{HandlerId, ParamCast, Route, RouteHandler, RouteSource, RouteTable};
