//! The cached OpenAPI documents, served verbatim

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use openapi3e::{SpecFormat, SpecVariant};
use tracing::{debug, instrument};

const JSON_CONTENT_TYPE: &str = "application/json";

pub fn routes() -> Router<AppState> {
    Router::new().route("/openapi/{file}", get(serve_document))
}

/// Map a file name such as `spec.all.yml` to the document it names
pub fn parse_document_name(file: &str) -> Option<(SpecVariant, SpecFormat)> {
    let (stem, extension) = file.rsplit_once('.')?;
    let format = match extension {
        "json" => SpecFormat::Json,
        "yml" => SpecFormat::Yaml,
        _ => return None,
    };
    let variant = match stem {
        "spec" => SpecVariant::Public,
        "uncloaked" => SpecVariant::Uncloaked,
        "spec.all" => SpecVariant::All,
        _ => return None,
    };
    Some((variant, format))
}

/// Serve one document variant as JSON or YAML
///
/// # Errors
///
/// Returns 404 for unknown file names and for variants the configuration
/// did not enable
#[instrument(skip(state))]
pub async fn serve_document(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> ApiResult<Response> {
    let (variant, format) =
        parse_document_name(&file).ok_or_else(|| ApiError::UnknownDocument { file: file.clone() })?;
    let body = state
        .cache
        .get(variant, format)
        .ok_or(ApiError::VariantNotBuilt { variant })?;

    let content_type = match format {
        SpecFormat::Json => JSON_CONTENT_TYPE.to_string(),
        SpecFormat::Yaml => state.yaml_content_type.to_string(),
    };
    debug!(%variant, bytes = body.len(), "serving document");

    Ok(([(header::CONTENT_TYPE, content_type)], body.to_string()).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_names() {
        assert_eq!(
            parse_document_name("spec.json"),
            Some((SpecVariant::Public, SpecFormat::Json))
        );
        assert_eq!(
            parse_document_name("uncloaked.yml"),
            Some((SpecVariant::Uncloaked, SpecFormat::Yaml))
        );
        assert_eq!(
            parse_document_name("spec.all.json"),
            Some((SpecVariant::All, SpecFormat::Json))
        );
        assert_eq!(parse_document_name("spec.xml"), None);
        assert_eq!(parse_document_name("swagger.json"), None);
        assert_eq!(parse_document_name("spec"), None);
    }
}
