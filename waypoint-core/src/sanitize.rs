//! Sanitization policy for outbound responses.
//!
//! Pure function of the configured flags and allow-lists: the same inputs
//! always produce the same outputs, and nothing is logged or mutated here.

use crate::config::ResponsesConfig;
use crate::envelope::{ErrorBag, HeaderMap};
use crate::strategy::Strategy;

/// Fixed message replacing 5xx internals when debug details are disabled.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// The cleaned message, errors, and headers produced by one sanitize pass.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Sanitized {
    pub message: String,
    pub errors: ErrorBag,
    pub headers: HeaderMap,
}

/// Filters messages, error bags, and headers based on status code, debug
/// mode, and the configured allow-lists.
#[derive(Debug, Clone)]
pub struct SanitizationPolicy {
    include_debug_details: bool,
    /// Lowercased at construction; header matching is case-insensitive.
    allowed_headers: Vec<String>,
    allowed_error_fields: Vec<String>,
}

impl SanitizationPolicy {
    /// Builds the policy from configuration.
    #[must_use]
    pub fn new(config: &ResponsesConfig) -> Self {
        Self {
            include_debug_details: config.include_debug_details,
            allowed_headers: config
                .allowed_headers
                .iter()
                .map(|h| h.to_ascii_lowercase())
                .collect(),
            allowed_error_fields: config.allowed_error_fields.clone(),
        }
    }

    /// Cleans the response inputs for the selected strategy.
    ///
    /// Internals of 5xx responses never pass this boundary when debug
    /// details are disabled: the message becomes [`GENERIC_ERROR_MESSAGE`]
    /// and the error bag is emptied, whatever was passed in.
    #[must_use]
    pub fn sanitize(
        &self,
        status: u16,
        message: &str,
        errors: &ErrorBag,
        headers: &HeaderMap,
        strategy: Strategy,
    ) -> Sanitized {
        let (message, errors) = if status >= 500 && !self.include_debug_details {
            (GENERIC_ERROR_MESSAGE.to_owned(), ErrorBag::new())
        } else {
            (message.to_owned(), errors.clone())
        };

        Sanitized { message, errors, headers: self.filter_headers(headers, strategy) }
    }

    /// Error-bag keys the redirect strategy may flash; empty means no key
    /// restriction.
    #[must_use]
    pub fn allowed_error_fields(&self) -> &[String] {
        &self.allowed_error_fields
    }

    fn filter_headers(&self, headers: &HeaderMap, strategy: Strategy) -> HeaderMap {
        headers
            .iter()
            .filter(|(name, value)| is_valid_header_name(name) && is_valid_header_value(value))
            .filter(|(name, _)| {
                if !strategy.requires_header_allow_list() {
                    return true;
                }
                // Empty allow-list keeps nothing: fail closed.
                let lowered = name.to_ascii_lowercase();
                self.allowed_headers.iter().any(|allowed| *allowed == lowered)
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

/// RFC 7230 token check; the analogue of the original's "key must be a
/// string" defensive filter for a typed header map.
fn is_valid_header_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

/// Field values must stay within visible ASCII plus space and tab.
fn is_valid_header_value(value: &str) -> bool {
    value.bytes().all(|b| b == b'\t' || (b' '..=b'~').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy(config: &ResponsesConfig) -> SanitizationPolicy {
        SanitizationPolicy::new(config)
    }

    fn bag(field: &str, value: &str) -> ErrorBag {
        let mut bag = ErrorBag::new();
        bag.insert(field.to_owned(), json!(value));
        bag
    }

    fn headers(entries: &[(&str, &str)]) -> HeaderMap {
        entries.iter().map(|(n, v)| ((*n).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn debug_gate_replaces_5xx_internals() {
        let p = policy(&ResponsesConfig::default());
        let out = p.sanitize(
            500,
            "database password rejected",
            &bag("trace", "stack"),
            &HeaderMap::new(),
            Strategy::Json,
        );
        assert_eq!(out.message, GENERIC_ERROR_MESSAGE);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn debug_gate_covers_the_whole_5xx_range() {
        let p = policy(&ResponsesConfig::default());
        for status in [500, 502, 503, 599] {
            let out = p.sanitize(status, "secret", &bag("k", "v"), &HeaderMap::new(), Strategy::Console);
            assert_eq!(out.message, GENERIC_ERROR_MESSAGE, "status {status} must be gated");
            assert!(out.errors.is_empty());
        }
    }

    #[test]
    fn debug_mode_passes_5xx_details_through() {
        let config = ResponsesConfig { include_debug_details: true, ..ResponsesConfig::default() };
        let p = policy(&config);
        let out = p.sanitize(500, "boom in worker 3", &bag("trace", "stack"), &HeaderMap::new(), Strategy::Json);
        assert_eq!(out.message, "boom in worker 3");
        assert_eq!(out.errors.get("trace"), Some(&json!("stack")));
    }

    #[test]
    fn client_errors_are_never_gated() {
        let p = policy(&ResponsesConfig::default());
        let out = p.sanitize(422, "name is required", &bag("name", "required"), &HeaderMap::new(), Strategy::Json);
        assert_eq!(out.message, "name is required");
        assert_eq!(out.errors.get("name"), Some(&json!("required")));
    }

    #[test]
    fn allow_list_applies_only_to_requiring_strategies() {
        let p = policy(&ResponsesConfig::default());
        let input = headers(&[("Retry-After", "30"), ("X-Internal", "secret")]);

        let json_out = p.sanitize(200, "OK", &ErrorBag::new(), &input, Strategy::Json);
        assert_eq!(json_out.headers.len(), 2, "JSON strategy keeps valid headers untouched");

        let redirect_out = p.sanitize(200, "OK", &ErrorBag::new(), &input, Strategy::Redirect);
        assert_eq!(redirect_out.headers.len(), 1);
        assert!(redirect_out.headers.contains_key("Retry-After"));
        assert!(!redirect_out.headers.contains_key("X-Internal"));
    }

    #[test]
    fn allow_list_matching_is_case_insensitive() {
        let p = policy(&ResponsesConfig::default());
        let input = headers(&[("retry-after", "30"), ("CACHE-CONTROL", "no-store")]);
        let out = p.sanitize(200, "OK", &ErrorBag::new(), &input, Strategy::Redirect);
        assert_eq!(out.headers.len(), 2);
    }

    #[test]
    fn empty_allow_list_fails_closed() {
        let config = ResponsesConfig { allowed_headers: Vec::new(), ..ResponsesConfig::default() };
        let p = policy(&config);
        let input = headers(&[("Retry-After", "30"), ("Cache-Control", "no-store")]);
        let out = p.sanitize(200, "OK", &ErrorBag::new(), &input, Strategy::Redirect);
        assert!(out.headers.is_empty(), "empty allow-list must deny every header");
    }

    #[test]
    fn malformed_header_entries_are_dropped_for_every_strategy() {
        let p = policy(&ResponsesConfig::default());
        let input = headers(&[
            ("Good-Header", "ok"),
            ("", "empty name"),
            ("Bad Name", "space in token"),
            ("Bad-Value", "line\nbreak"),
        ]);
        let out = p.sanitize(200, "OK", &ErrorBag::new(), &input, Strategy::Json);
        assert_eq!(out.headers.len(), 1);
        assert!(out.headers.contains_key("Good-Header"));
    }

    #[test]
    fn sanitize_is_idempotent() {
        let p = policy(&ResponsesConfig::default());
        let input = headers(&[("Retry-After", "30"), ("X-Internal", "secret")]);
        let first = p.sanitize(503, "internal", &bag("k", "v"), &input, Strategy::Redirect);
        let second =
            p.sanitize(503, &first.message, &first.errors, &first.headers, Strategy::Redirect);
        assert_eq!(first, second);
    }

    proptest::proptest! {
        #[test]
        fn proptest_debug_gate_holds_for_any_payload(
            status in 500u16..600,
            message in ".{0,256}",
            field in "[a-z]{1,12}",
            value in ".{0,256}",
        ) {
            let p = policy(&ResponsesConfig::default());
            let out = p.sanitize(status, &message, &bag(&field, &value), &HeaderMap::new(), Strategy::Json);
            proptest::prop_assert_eq!(out.message, GENERIC_ERROR_MESSAGE);
            proptest::prop_assert!(out.errors.is_empty());
        }

        #[test]
        fn proptest_redirect_headers_subset_of_allow_list(
            names in proptest::collection::vec("[A-Za-z-]{1,16}", 0..8),
        ) {
            let p = policy(&ResponsesConfig::default());
            let input: HeaderMap = names.iter().map(|n| (n.clone(), "v".to_owned())).collect();
            let out = p.sanitize(200, "OK", &ErrorBag::new(), &input, Strategy::Redirect);
            for name in out.headers.keys() {
                let lowered = name.to_ascii_lowercase();
                proptest::prop_assert!(
                    lowered == "cache-control" || lowered == "retry-after",
                    "unexpected surviving header {name}"
                );
            }
        }
    }
}
