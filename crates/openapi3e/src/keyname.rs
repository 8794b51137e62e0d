//! Mapping from internal field names to OpenAPI wire names
//!
//! Internal names are snake_case; reserved words carry a leading underscore
//! (`_type`, `_in`) because they clash with Rust keywords or model fields.
//! The default rule camel-cases the name; the exception table covers
//! reserved words and keys whose spelling in the OpenAPI document is not
//! plain camelCase.

use dashmap::DashMap;
use once_cell::sync::Lazy;

/// Names whose wire form does not follow (or must be pinned against) the
/// default rule.
const EXCEPTIONS: &[(&str, &str)] = &[
    ("_type", "type"),
    ("_in", "in"),
    ("_format", "format"),
    ("_not", "not"),
    ("_ref", "$ref"),
    ("dollar_ref", "$ref"),
    ("_license", "license"),
    ("operation_id", "operationId"),
    ("operation_ref", "operationRef"),
    ("external_docs", "externalDocs"),
    ("external_value", "externalValue"),
    ("read_only", "readOnly"),
    ("write_only", "writeOnly"),
    ("request_body", "requestBody"),
    ("request_bodies", "requestBodies"),
    ("security_schemes", "securitySchemes"),
    ("bearer_format", "bearerFormat"),
    ("terms_of_service", "termsOfService"),
    ("additional_properties", "additionalProperties"),
    ("all_of", "allOf"),
    ("one_of", "oneOf"),
    ("any_of", "anyOf"),
    ("exclusive_maximum", "exclusiveMaximum"),
    ("exclusive_minimum", "exclusiveMinimum"),
    ("max_items", "maxItems"),
    ("min_items", "minItems"),
    ("max_length", "maxLength"),
    ("min_length", "minLength"),
    ("max_properties", "maxProperties"),
    ("min_properties", "minProperties"),
    ("multiple_of", "multipleOf"),
    ("unique_items", "uniqueItems"),
    ("property_name", "propertyName"),
    ("open_id_connect_url", "openIdConnectUrl"),
    ("authorization_url", "authorizationUrl"),
    ("token_url", "tokenUrl"),
    ("refresh_url", "refreshUrl"),
    ("client_credentials", "clientCredentials"),
    ("authorization_code", "authorizationCode"),
    ("allow_empty_value", "allowEmptyValue"),
    ("allow_reserved", "allowReserved"),
    ("content_type", "contentType"),
];

static CACHE: Lazy<DashMap<&'static str, &'static str>> = Lazy::new(DashMap::new);

/// Wire name for an internal field name.
///
/// Results are memoized. Field names are `'static` and drawn from the
/// model's fixed set, so the cache is bounded by the number of distinct
/// fields in the program.
pub fn wire_name(field: &'static str) -> &'static str {
    if let Some(hit) = CACHE.get(field) {
        return *hit;
    }
    *CACHE.entry(field).or_insert_with(|| compute(field))
}

fn compute(field: &'static str) -> &'static str {
    if let Some((_, mapped)) = EXCEPTIONS.iter().find(|(name, _)| *name == field) {
        return *mapped;
    }

    let camel = snake_to_camel(field);
    if camel == field {
        field
    } else {
        // Computed once per distinct field name
        Box::leak(camel.into_boxed_str())
    }
}

/// Convert `snake_case` to `camelCase`.
///
/// Leading underscores are dropped, the first token is lower-cased and
/// every following token is capitalized.
pub fn snake_to_camel(name: &str) -> String {
    let mut tokens = name.trim_start_matches('_').split('_').filter(|t| !t.is_empty());

    let mut out = String::with_capacity(name.len());
    if let Some(first) = tokens.next() {
        out.push_str(&first.to_lowercase());
    }
    for token in tokens {
        let mut chars = token.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words_lose_their_prefix() {
        assert_eq!(wire_name("_type"), "type");
        assert_eq!(wire_name("_in"), "in");
        assert_eq!(wire_name("_format"), "format");
        assert_eq!(wire_name("_not"), "not");
        assert_eq!(wire_name("_license"), "license");
        assert_eq!(wire_name("_ref"), "$ref");
        assert_eq!(wire_name("dollar_ref"), "$ref");
    }

    #[test]
    fn test_exception_table_entries() {
        assert_eq!(wire_name("operation_id"), "operationId");
        assert_eq!(wire_name("security_schemes"), "securitySchemes");
        assert_eq!(wire_name("terms_of_service"), "termsOfService");
        assert_eq!(wire_name("exclusive_maximum"), "exclusiveMaximum");
        assert_eq!(wire_name("open_id_connect_url"), "openIdConnectUrl");
    }

    #[test]
    fn test_default_rule_camel_cases() {
        assert_eq!(wire_name("summary"), "summary");
        assert_eq!(wire_name("x_tags_holder"), "xTagsHolder");
        assert_eq!(snake_to_camel("get_user_by_id"), "getUserById");
        assert_eq!(snake_to_camel("__private_name"), "privateName");
        assert_eq!(snake_to_camel("double__underscore"), "doubleUnderscore");
        assert_eq!(snake_to_camel("LIST_PETS"), "listPets");
    }

    #[test]
    fn test_memoized_names_are_stable() {
        let first = wire_name("max_length");
        let second = wire_name("max_length");
        assert_eq!(first, "maxLength");
        assert!(std::ptr::eq(first, second));

        let computed = wire_name("bearer_token_hint");
        assert!(std::ptr::eq(computed, wire_name("bearer_token_hint")));
        assert_eq!(computed, "bearerTokenHint");
    }
}
