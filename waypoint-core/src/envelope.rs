use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error details keyed by field name.
///
/// Values are a single message, an array of messages, or (before
/// sanitization) arbitrary JSON handed in by the caller. Insertion order is
/// preserved through rendering.
pub type ErrorBag = IndexMap<String, Value>;

/// Response headers keyed by name, in caller order.
pub type HeaderMap = IndexMap<String, String>;

/// The fully assembled inputs of a single response rendering.
///
/// Built fresh per dispatch after the sanitization policy has run; the
/// selected strategy consumes it and never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ResponseEnvelope {
    /// HTTP status code of the operation.
    pub status: u16,
    /// Human-readable message describing the result.
    pub message: String,
    /// Error details, empty for success responses.
    pub errors: ErrorBag,
    /// Optional structured data for body-bearing responses.
    pub data: Option<Value>,
    /// Extra headers to send with the response.
    pub headers: HeaderMap,
    /// Explicit redirect target for the web context.
    pub forward_url: Option<String>,
}

/// Optional arguments accepted by every dispatch entry point.
///
/// Mirrors the `(message, data?, errors?, headers?, forward_url?)` call
/// shape: construct with the message, then chain the extras that apply.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    pub message: String,
    pub data: Option<Value>,
    pub errors: ErrorBag,
    pub headers: HeaderMap,
    pub forward_url: Option<String>,
}

impl Payload {
    /// Creates a payload carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), ..Self::default() }
    }

    /// Attaches structured data (success responses only; error entry points
    /// and 204 discard it).
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Replaces the error bag.
    #[must_use]
    pub fn with_errors(mut self, errors: ErrorBag) -> Self {
        self.errors = errors;
        self
    }

    /// Adds a single error entry.
    #[must_use]
    pub fn with_error(mut self, field: impl Into<String>, message: impl Into<Value>) -> Self {
        self.errors.insert(field.into(), message.into());
        self
    }

    /// Adds a response header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the redirect target used by the web context.
    #[must_use]
    pub fn with_forward_url(mut self, url: impl Into<String>) -> Self {
        self.forward_url = Some(url.into());
        self
    }
}

impl From<&str> for Payload {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Payload {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
