//! Error types: the HTTP error taxonomy and configuration failures.

use serde_json::json;

use crate::envelope::ErrorBag;
use crate::status;

/// The semantic kind of an HTTP error, fixing its status code and default
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 — the request is malformed or contains invalid values.
    BadRequest,
    /// 401 — authentication is missing or invalid.
    Unauthorized,
    /// 403 — the caller is authenticated but not allowed.
    Forbidden,
    /// 404 — the resource does not exist.
    NotFound,
    /// 406 — no acceptable representation can be produced.
    NotAcceptable,
    /// 409 — the request conflicts with the current state.
    Conflict,
    /// 422 — the payload is well-formed but semantically invalid.
    UnprocessableEntity,
    /// 429 — the caller exceeded a rate limit.
    TooManyRequests,
    /// 500 — an unexpected internal failure.
    Internal,
}

impl ErrorKind {
    /// The HTTP status code for this kind.
    #[must_use]
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::BadRequest => status::BAD_REQUEST,
            ErrorKind::Unauthorized => status::UNAUTHORIZED,
            ErrorKind::Forbidden => status::FORBIDDEN,
            ErrorKind::NotFound => status::NOT_FOUND,
            ErrorKind::NotAcceptable => status::NOT_ACCEPTABLE,
            ErrorKind::Conflict => status::CONFLICT,
            ErrorKind::UnprocessableEntity => status::UNPROCESSABLE_ENTITY,
            ErrorKind::TooManyRequests => status::TOO_MANY_REQUESTS,
            ErrorKind::Internal => status::INTERNAL_SERVER_ERROR,
        }
    }

    /// The default message used when the caller supplies none.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::NotAcceptable => "Not Acceptable",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::UnprocessableEntity => "Unprocessable Entity",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::Internal => "Internal Server Error",
        }
    }

    /// Maps a status code back to its kind, if it belongs to the taxonomy.
    #[must_use]
    pub fn from_status(code: u16) -> Option<Self> {
        match code {
            status::BAD_REQUEST => Some(ErrorKind::BadRequest),
            status::UNAUTHORIZED => Some(ErrorKind::Unauthorized),
            status::FORBIDDEN => Some(ErrorKind::Forbidden),
            status::NOT_FOUND => Some(ErrorKind::NotFound),
            status::NOT_ACCEPTABLE => Some(ErrorKind::NotAcceptable),
            status::CONFLICT => Some(ErrorKind::Conflict),
            status::UNPROCESSABLE_ENTITY => Some(ErrorKind::UnprocessableEntity),
            status::TOO_MANY_REQUESTS => Some(ErrorKind::TooManyRequests),
            status::INTERNAL_SERVER_ERROR => Some(ErrorKind::Internal),
            _ => None,
        }
    }
}

/// An HTTP-semantic error raised by calling code and rendered terminally by
/// the dispatch pipeline.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
#[non_exhaustive]
pub struct HttpError {
    kind: ErrorKind,
    message: String,
    errors: Option<ErrorBag>,
}

impl HttpError {
    /// Creates an error of the given kind with its default message.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, message: kind.default_message().to_owned(), errors: None }
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request() -> Self {
        Self::new(ErrorKind::BadRequest)
    }

    /// 401 Unauthorized.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized)
    }

    /// 403 Forbidden.
    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(ErrorKind::Forbidden)
    }

    /// 404 Not Found.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    /// 406 Not Acceptable.
    #[must_use]
    pub fn not_acceptable() -> Self {
        Self::new(ErrorKind::NotAcceptable)
    }

    /// 409 Conflict.
    #[must_use]
    pub fn conflict() -> Self {
        Self::new(ErrorKind::Conflict)
    }

    /// 422 Unprocessable Entity.
    #[must_use]
    pub fn unprocessable_entity() -> Self {
        Self::new(ErrorKind::UnprocessableEntity)
    }

    /// 429 Too Many Requests.
    #[must_use]
    pub fn too_many_requests() -> Self {
        Self::new(ErrorKind::TooManyRequests)
    }

    /// 500 Internal Server Error.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal)
    }

    /// Replaces the default message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches structured error details.
    #[must_use]
    pub fn with_errors(mut self, errors: ErrorBag) -> Self {
        self.errors = Some(errors);
        self
    }

    /// The error kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.kind.status()
    }

    /// The message carried by this error.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error bag to render: the attached details, or a single
    /// `message` entry when none were attached.
    #[must_use]
    pub fn bag(&self) -> ErrorBag {
        self.errors.clone().unwrap_or_else(|| {
            let mut bag = ErrorBag::new();
            bag.insert("message".to_owned(), json!(self.message));
            bag
        })
    }

    /// Logs the error with its status and details.
    pub fn report(&self) {
        tracing::error!(
            status = self.status(),
            errors = ?self.errors,
            message = %self.message,
            "http error reported"
        );
    }
}

impl From<ErrorKind> for HttpError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Raised when toolkit configuration is missing or invalid.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// The configuration document could not be parsed.
    #[error("configuration parse failed: {reason}")]
    Parse { reason: String },

    /// The pagination default must be a positive integer.
    #[error("pagination per-page value must be a positive integer")]
    NonPositivePageItems,
}
