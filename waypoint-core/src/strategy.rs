//! Response strategies: the closed set of terminal render variants.
//!
//! A strategy is selected once per dispatch and renders the envelope into a
//! framework-agnostic [`Rendered`] value; the adapter crate turns that into
//! a host response. None of the renderers can fail — malformed data
//! degrades to a placeholder instead of erroring.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RouteContext;
use crate::envelope::{ErrorBag, HeaderMap, ResponseEnvelope};
use crate::status;

/// Placeholder emitted when a payload cannot be JSON-encoded.
const UNSERIALIZABLE: &str = "[unserializable payload]";

/// Message flashed by 204 responses when the caller supplies none.
pub const DEFAULT_NO_CONTENT_MESSAGE: &str = "Operation completed successfully";

/// One of the three terminal rendering behaviors. A closed set: dispatch
/// matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Human-readable text block for CLI output.
    Console,
    /// Structured JSON body.
    Json,
    /// HTTP redirect with session flash.
    Redirect,
}

impl Strategy {
    /// Picks the strategy for a classified call. Total: every context maps
    /// to exactly one strategy.
    #[must_use]
    pub fn select(context: RouteContext, wants_json: bool) -> Self {
        if context == RouteContext::Console {
            Strategy::Console
        } else if wants_json {
            Strategy::Json
        } else {
            Strategy::Redirect
        }
    }

    /// Whether the sanitization policy must apply the header allow-list for
    /// this strategy. Only redirects leak headers into a browser
    /// navigation, so only they are filtered.
    #[must_use]
    pub fn requires_header_allow_list(self) -> bool {
        matches!(self, Strategy::Redirect)
    }
}

/// The terminal result of a dispatch, one variant per strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Plain text block.
    Console(String),
    /// JSON body plus status and headers.
    Json(JsonReply),
    /// Redirect with session-flash payload.
    Redirect(RedirectReply),
}

/// A rendered JSON response.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct JsonReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body; `None` renders as an empty body (204).
    pub body: Option<Value>,
    /// Headers to attach.
    pub headers: HeaderMap,
}

/// A rendered redirect response.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct RedirectReply {
    /// Absolute or relative target URL.
    pub target: String,
    /// Headers that survived the allow-list.
    pub headers: HeaderMap,
    /// Session-flash payload for the next request.
    pub flash: FlashPayload,
    /// Cleaned error bag flashed as form-validation errors.
    pub errors: ErrorBag,
    /// Whether current input should be flashed for form repopulation.
    pub flash_input: bool,
}

/// The `{status, message, errors, data}` payload flashed to the session on
/// redirect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct FlashPayload {
    pub status: u16,
    pub message: String,
    pub errors: ErrorBag,
    pub data: Option<Value>,
}

/// Renders the console text block.
pub(crate) fn render_console(envelope: &ResponseEnvelope) -> String {
    let mut lines = vec![format!("[{}] {}", envelope.status, envelope.message)];

    if !envelope.errors.is_empty() {
        lines.push("Errors:".to_owned());
        lines.push(encode_map(&envelope.errors));
    }

    if let Some(data) = &envelope.data {
        lines.push("Data:".to_owned());
        lines.push(stringify(data));
    }

    if !envelope.headers.is_empty() {
        lines.push("Headers:".to_owned());
        lines.push(
            serde_json::to_string(&envelope.headers).unwrap_or_else(|_| UNSERIALIZABLE.to_owned()),
        );
    }

    if let Some(url) = &envelope.forward_url {
        lines.push(format!("Forward: {url}"));
    }

    lines.join("\n")
}

/// Scalars render verbatim; structured values are JSON-encoded.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_else(|_| UNSERIALIZABLE.to_owned()),
    }
}

fn encode_map(errors: &ErrorBag) -> String {
    serde_json::to_string(errors).unwrap_or_else(|_| UNSERIALIZABLE.to_owned())
}

/// Renders the JSON body. 204 carries no body; `data` appears only when
/// present; `errors` appears exactly when the status is an error.
pub(crate) fn render_json(envelope: &ResponseEnvelope) -> JsonReply {
    if envelope.status == status::NO_CONTENT {
        return JsonReply { status: envelope.status, body: None, headers: envelope.headers.clone() };
    }

    let mut body = serde_json::Map::new();
    body.insert("status".to_owned(), Value::from(envelope.status));
    body.insert("message".to_owned(), Value::from(envelope.message.clone()));

    if let Some(data) = &envelope.data {
        body.insert("data".to_owned(), data.clone());
    }

    if envelope.status >= status::BAD_REQUEST {
        let errors =
            serde_json::to_value(&envelope.errors).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        body.insert("errors".to_owned(), errors);
    }

    JsonReply {
        status: envelope.status,
        body: Some(Value::Object(body)),
        headers: envelope.headers.clone(),
    }
}

/// Renders the redirect. The target falls back from `forward_url` to the
/// caller's previous URL to the site root.
pub(crate) fn render_redirect(
    envelope: ResponseEnvelope,
    previous_url: Option<&str>,
    allowed_error_fields: &[String],
) -> RedirectReply {
    let target = envelope
        .forward_url
        .clone()
        .unwrap_or_else(|| previous_url.unwrap_or("/").to_owned());

    let errors = clean_error_fields(&envelope.errors, allowed_error_fields);

    RedirectReply {
        target,
        headers: envelope.headers.clone(),
        flash: FlashPayload {
            status: envelope.status,
            message: envelope.message.clone(),
            errors: errors.clone(),
            data: envelope.data,
        },
        errors,
        flash_input: true,
    }
}

/// Redirect-specific error cleaning: only scalar (string-convertible)
/// values survive, coerced to strings; arrays are converted element-wise,
/// dropping non-scalar elements; a non-empty allow-list also drops unlisted
/// keys.
fn clean_error_fields(errors: &ErrorBag, allowed: &[String]) -> ErrorBag {
    errors
        .iter()
        .filter(|(field, _)| allowed.is_empty() || allowed.iter().any(|a| a == *field))
        .filter_map(|(field, value)| coerce(value).map(|v| (field.clone(), v)))
        .collect()
}

fn coerce(value: &Value) -> Option<Value> {
    match value {
        Value::Array(items) => {
            let strings: Vec<Value> =
                items.iter().filter_map(coerce_scalar).map(Value::String).collect();
            Some(Value::Array(strings))
        }
        other => coerce_scalar(other).map(Value::String),
    }
}

fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(status: u16, message: &str) -> ResponseEnvelope {
        ResponseEnvelope {
            status,
            message: message.to_owned(),
            errors: ErrorBag::new(),
            data: None,
            headers: HeaderMap::new(),
            forward_url: None,
        }
    }

    #[test]
    fn selection_is_total_over_contexts() {
        assert_eq!(Strategy::select(RouteContext::Console, false), Strategy::Console);
        assert_eq!(Strategy::select(RouteContext::Console, true), Strategy::Console);
        assert_eq!(Strategy::select(RouteContext::Api, true), Strategy::Json);
        assert_eq!(Strategy::select(RouteContext::Hook, true), Strategy::Json);
        assert_eq!(Strategy::select(RouteContext::IoT, true), Strategy::Json);
        assert_eq!(Strategy::select(RouteContext::Web, true), Strategy::Json);
        assert_eq!(Strategy::select(RouteContext::Web, false), Strategy::Redirect);
    }

    #[test]
    fn only_redirect_requires_the_header_allow_list() {
        assert!(!Strategy::Console.requires_header_allow_list());
        assert!(!Strategy::Json.requires_header_allow_list());
        assert!(Strategy::Redirect.requires_header_allow_list());
    }

    #[test]
    fn console_block_lists_each_section() {
        let mut env = envelope(400, "Bad");
        env.errors.insert("field".to_owned(), json!("required"));
        env.data = Some(json!({"id": 1}));
        env.headers.insert("Retry-After".to_owned(), "30".to_owned());
        env.forward_url = Some("/back".to_owned());

        let text = render_console(&env);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[400] Bad");
        assert_eq!(lines[1], "Errors:");
        assert_eq!(lines[2], r#"{"field":"required"}"#);
        assert_eq!(lines[3], "Data:");
        assert_eq!(lines[4], r#"{"id":1}"#);
        assert_eq!(lines[5], "Headers:");
        assert_eq!(lines[6], r#"{"Retry-After":"30"}"#);
        assert_eq!(lines[7], "Forward: /back");
    }

    #[test]
    fn console_block_skips_absent_sections() {
        let text = render_console(&envelope(200, "OK"));
        assert_eq!(text, "[200] OK");
    }

    #[test]
    fn console_scalar_data_renders_verbatim() {
        let mut env = envelope(200, "Done");
        env.data = Some(json!(42));
        let text = render_console(&env);
        assert!(text.ends_with("Data:\n42"), "scalar data must not be quoted: {text}");
    }

    #[test]
    fn json_success_has_no_errors_key() {
        let mut env = envelope(200, "OK");
        env.data = Some(json!({"id": 1}));
        let reply = render_json(&env);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, Some(json!({"status": 200, "message": "OK", "data": {"id": 1}})));
    }

    #[test]
    fn json_omits_data_key_when_absent() {
        let reply = render_json(&envelope(201, "Created"));
        assert_eq!(reply.body, Some(json!({"status": 201, "message": "Created"})));
    }

    #[test]
    fn json_error_always_carries_errors_key() {
        let reply = render_json(&envelope(404, "Missing"));
        assert_eq!(
            reply.body,
            Some(json!({"status": 404, "message": "Missing", "errors": {}})),
            "errors key must be present even when the bag is empty"
        );
    }

    #[test]
    fn json_no_content_has_empty_body() {
        let mut env = envelope(204, "ignored");
        env.data = Some(json!({"leftover": true}));
        let reply = render_json(&env);
        assert_eq!(reply.status, 204);
        assert!(reply.body.is_none());
    }

    #[test]
    fn redirect_prefers_forward_url_then_previous_then_root() {
        let mut env = envelope(403, "Blocked");
        env.forward_url = Some("/login".to_owned());
        let reply = render_redirect(env, Some("/came-from"), &[]);
        assert_eq!(reply.target, "/login");

        let reply = render_redirect(envelope(403, "Blocked"), Some("/came-from"), &[]);
        assert_eq!(reply.target, "/came-from");

        let reply = render_redirect(envelope(403, "Blocked"), None, &[]);
        assert_eq!(reply.target, "/");
    }

    #[test]
    fn redirect_flash_carries_envelope_fields_and_input_flag() {
        let mut env = envelope(422, "Invalid");
        env.errors.insert("name".to_owned(), json!("required"));
        env.data = Some(json!({"draft": true}));
        let reply = render_redirect(env, None, &[]);
        assert_eq!(reply.flash.status, 422);
        assert_eq!(reply.flash.message, "Invalid");
        assert_eq!(reply.flash.errors.get("name"), Some(&json!("required")));
        assert_eq!(reply.flash.data, Some(json!({"draft": true})));
        assert!(reply.flash_input);
    }

    #[test]
    fn redirect_coerces_scalar_error_values_to_strings() {
        let mut env = envelope(422, "Invalid");
        env.errors.insert("age".to_owned(), json!(17));
        env.errors.insert("active".to_owned(), json!(false));
        env.errors.insert("tags".to_owned(), json!(["a", 2, {"nested": true}, "b"]));
        env.errors.insert("trace".to_owned(), json!({"frames": []}));
        env.errors.insert("gone".to_owned(), json!(null));

        let reply = render_redirect(env, None, &[]);
        assert_eq!(reply.errors.get("age"), Some(&json!("17")));
        assert_eq!(reply.errors.get("active"), Some(&json!("false")));
        assert_eq!(reply.errors.get("tags"), Some(&json!(["a", "2", "b"])));
        assert!(!reply.errors.contains_key("trace"), "objects must be dropped");
        assert!(!reply.errors.contains_key("gone"), "nulls must be dropped");
    }

    #[test]
    fn redirect_error_field_allow_list_drops_unlisted_keys() {
        let mut env = envelope(422, "Invalid");
        env.errors.insert("name".to_owned(), json!("required"));
        env.errors.insert("debug".to_owned(), json!("stack trace"));
        let reply = render_redirect(env, None, &["name".to_owned()]);
        assert_eq!(reply.errors.get("name"), Some(&json!("required")));
        assert!(!reply.errors.contains_key("debug"));
    }
}
