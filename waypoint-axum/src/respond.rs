//! Converts core render results into axum responses.

use axum::http::{header, HeaderMap as AxumHeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use waypoint_core::envelope::{ErrorBag, HeaderMap};
use waypoint_core::sanitize::GENERIC_ERROR_MESSAGE;
use waypoint_core::strategy::{FlashPayload, JsonReply, RedirectReply, Rendered};
use waypoint_core::HttpError;

/// Response extension carrying the redirect's session-flash state, for a
/// host session layer to persist before the response leaves the stack.
#[derive(Debug, Clone)]
pub struct FlashState {
    /// The `{status, message, errors, data}` payload to flash.
    pub flash: FlashPayload,
    /// Cleaned error bag to flash as form-validation errors.
    pub errors: ErrorBag,
    /// Whether current input should be flashed for form repopulation.
    pub flash_input: bool,
}

/// Newtype giving [`Rendered`] an axum [`IntoResponse`] conversion.
#[derive(Debug, Clone)]
pub struct Reply(pub Rendered);

impl From<Rendered> for Reply {
    fn from(rendered: Rendered) -> Self {
        Self(rendered)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.0 {
            Rendered::Console(text) => (StatusCode::OK, text).into_response(),
            Rendered::Json(reply) => json_response(reply),
            Rendered::Redirect(reply) => redirect_response(reply),
        }
    }
}

fn json_response(reply: JsonReply) -> Response {
    let status =
        StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = match reply.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    };
    apply_headers(response.headers_mut(), &reply.headers);
    response
}

fn redirect_response(reply: RedirectReply) -> Response {
    let mut response = StatusCode::FOUND.into_response();
    if let Ok(location) = HeaderValue::from_str(&reply.target) {
        response.headers_mut().insert(header::LOCATION, location);
    }
    apply_headers(response.headers_mut(), &reply.headers);
    response.extensions_mut().insert(FlashState {
        flash: reply.flash,
        errors: reply.errors,
        flash_input: reply.flash_input,
    });
    response
}

/// Copies already-sanitized headers onto the response, skipping any entry
/// the `http` types reject.
fn apply_headers(target: &mut AxumHeaderMap, headers: &HeaderMap) {
    for (name, value) in headers {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            continue;
        };
        let Ok(value) = HeaderValue::from_str(value) else {
            continue;
        };
        target.insert(name, value);
    }
}

/// Newtype rendering [`HttpError`] as a JSON error response, enabling `?`
/// in handlers via `From<HttpError>`.
///
/// No sanitization policy is in scope here, so the debug gate fails
/// closed: 5xx responses always carry the generic message.
#[derive(Debug)]
pub struct ApiError(pub HttpError);

impl From<HttpError> for ApiError {
    fn from(error: HttpError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.report();
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let (message, errors) = if self.0.status() >= 500 {
            (GENERIC_ERROR_MESSAGE.to_owned(), ErrorBag::new())
        } else {
            (self.0.message().to_owned(), self.0.bag())
        };
        let body = json!({
            "status": self.0.status(),
            "message": message,
            "errors": errors,
        });
        (status, Json(body)).into_response()
    }
}
