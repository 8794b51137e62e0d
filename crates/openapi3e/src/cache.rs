//! Serialized documents, built once and served read-only

use crate::assembler::{BuildOptions, Visibility, build};
use crate::error::Result;
use crate::model::OpenApiDocument;
use crate::registry::DocRegistry;
use crate::router::RouteSource;
use std::fmt;
use tracing::info;

/// Which operations a served document includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecVariant {
    /// Excluded and cloaked operations hidden
    Public,
    /// Cloaked operations shown
    Uncloaked,
    /// Everything shown; built only when excluded operations may be shown
    All,
}

impl SpecVariant {
    pub const ALL: [Self; 3] = [Self::Public, Self::Uncloaked, Self::All];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Uncloaked => "uncloaked",
            Self::All => "all",
        }
    }
}

impl fmt::Display for SpecVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone)]
struct CachedSpec {
    document: OpenApiDocument,
    json: String,
    yaml: String,
}

impl CachedSpec {
    fn new(document: OpenApiDocument) -> Result<Self> {
        let json = document.to_json()?;
        let yaml = document.to_yaml()?;
        Ok(Self {
            document,
            json,
            yaml,
        })
    }
}

/// Every document variant, rendered as JSON and YAML.
///
/// Built once from a route table and the registry filled while defining
/// the API; the registry is consumed so no documentation can be attached
/// after the documents exist.
#[derive(Debug, Clone)]
pub struct DocumentCache {
    public: CachedSpec,
    uncloaked: CachedSpec,
    all: Option<CachedSpec>,
}

impl DocumentCache {
    /// # Errors
    /// Returns the first assembly or serialization failure
    pub fn build(routes: &dyn RouteSource, registry: DocRegistry, options: &BuildOptions) -> Result<Self> {
        let public = CachedSpec::new(build(
            routes,
            &registry,
            options,
            Visibility::public(options.show_unused_tags),
        )?)?;
        let uncloaked = CachedSpec::new(build(routes, &registry, options, Visibility::uncloaked())?)?;
        let all = if options.show_excluded {
            Some(CachedSpec::new(build(routes, &registry, options, Visibility::all())?)?)
        } else {
            None
        };

        info!(
            public_bytes = public.json.len(),
            uncloaked_bytes = uncloaked.json.len(),
            all_built = all.is_some(),
            "document cache ready"
        );

        Ok(Self {
            public,
            uncloaked,
            all,
        })
    }

    fn variant(&self, variant: SpecVariant) -> Option<&CachedSpec> {
        match variant {
            SpecVariant::Public => Some(&self.public),
            SpecVariant::Uncloaked => Some(&self.uncloaked),
            SpecVariant::All => self.all.as_ref(),
        }
    }

    /// The serialized document, or `None` when the variant was not built
    pub fn get(&self, variant: SpecVariant, format: SpecFormat) -> Option<&str> {
        self.variant(variant).map(|spec| match format {
            SpecFormat::Json => spec.json.as_str(),
            SpecFormat::Yaml => spec.yaml.as_str(),
        })
    }

    pub fn document(&self, variant: SpecVariant) -> Option<&OpenApiDocument> {
        self.variant(variant).map(|spec| &spec.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, Info};
    use crate::router::{Route, RouteTable};

    fn routes() -> RouteTable {
        RouteTable::new()
            .with(Route::new("/pets", [HttpMethod::Get], "list_pets"))
            .with(Route::new("/admin", [HttpMethod::Get], "admin"))
    }

    fn registry() -> DocRegistry {
        let mut registry = DocRegistry::new();
        registry.handler("admin").exclude();
        registry
    }

    #[test]
    fn test_all_variant_only_when_enabled() {
        let options = BuildOptions::new(Info::new("API", "1").unwrap());
        let cache = DocumentCache::build(&routes(), registry(), &options).unwrap();

        assert!(cache.get(SpecVariant::Public, SpecFormat::Json).is_some());
        assert!(cache.get(SpecVariant::Uncloaked, SpecFormat::Yaml).is_some());
        assert!(cache.get(SpecVariant::All, SpecFormat::Json).is_none());
    }

    #[test]
    fn test_excluded_route_in_all_variant() {
        let mut options = BuildOptions::new(Info::new("API", "1").unwrap());
        options.show_excluded = true;
        let cache = DocumentCache::build(&routes(), registry(), &options).unwrap();

        let public = cache.document(SpecVariant::Public).unwrap();
        assert!(public.paths().get("/admin").is_none());

        let all = cache.document(SpecVariant::All).unwrap();
        let admin = all.paths().get("/admin").unwrap();
        assert_eq!(
            admin.operation(HttpMethod::Get).unwrap().summary(),
            Some("[excluded] ")
        );

        let json = cache.get(SpecVariant::All, SpecFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(json).unwrap();
        assert!(parsed["paths"]["/admin"].is_object());
    }
}
