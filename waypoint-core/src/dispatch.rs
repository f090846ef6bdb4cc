//! The dispatch pipeline: classify, select, sanitize, render.
//!
//! [`Responder`] is the public entry surface. It is built once from
//! read-only configuration and is safe to share across requests; each call
//! runs the full pipeline synchronously and returns a [`Rendered`] value
//! for the adapter to hand to the host framework.

use crate::config::ToolkitConfig;
use crate::context::{ExecutionContext, RouteClassifier};
use crate::envelope::{Payload, ResponseEnvelope};
use crate::error::HttpError;
use crate::sanitize::SanitizationPolicy;
use crate::status;
use crate::strategy::{self, Rendered, Strategy, DEFAULT_NO_CONTENT_MESSAGE};

/// Context-aware response dispatcher.
#[derive(Debug, Clone)]
pub struct Responder {
    classifier: RouteClassifier,
    policy: SanitizationPolicy,
}

impl Responder {
    /// Builds a responder from configuration.
    #[must_use]
    pub fn new(config: &ToolkitConfig) -> Self {
        Self {
            classifier: RouteClassifier::new(&config.route),
            policy: SanitizationPolicy::new(&config.responses),
        }
    }

    /// Builds a responder from pre-constructed parts.
    #[must_use]
    pub fn from_parts(classifier: RouteClassifier, policy: SanitizationPolicy) -> Self {
        Self { classifier, policy }
    }

    /// The classifier backing this responder.
    #[must_use]
    pub fn classifier(&self) -> &RouteClassifier {
        &self.classifier
    }

    fn dispatch(&self, ctx: &ExecutionContext, status: u16, payload: Payload) -> Rendered {
        let context = self.classifier.classify(ctx);
        let wants_json = self.classifier.wants_json(ctx);
        let selected = Strategy::select(context, wants_json);

        tracing::debug!(status, context = ?context, strategy = ?selected, "dispatching response");

        let clean =
            self.policy.sanitize(status, &payload.message, &payload.errors, &payload.headers, selected);

        let envelope = ResponseEnvelope {
            status,
            message: clean.message,
            errors: clean.errors,
            data: payload.data,
            headers: clean.headers,
            forward_url: payload.forward_url,
        };

        match selected {
            Strategy::Console => Rendered::Console(strategy::render_console(&envelope)),
            Strategy::Json => Rendered::Json(strategy::render_json(&envelope)),
            Strategy::Redirect => Rendered::Redirect(strategy::render_redirect(
                envelope,
                ctx.previous_url(),
                self.policy.allowed_error_fields(),
            )),
        }
    }

    /// Error responses never carry a data payload.
    fn dispatch_error(&self, ctx: &ExecutionContext, status: u16, mut payload: Payload) -> Rendered {
        payload.data = None;
        self.dispatch(ctx, status, payload)
    }

    /// 200 OK.
    pub fn success(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        self.dispatch(ctx, status::OK, payload.into())
    }

    /// 201 Created.
    pub fn created(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        self.dispatch(ctx, status::CREATED, payload.into())
    }

    /// 202 Accepted, for asynchronous processing.
    pub fn accepted(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        self.dispatch(ctx, status::ACCEPTED, payload.into())
    }

    /// 204 No Content with the default message.
    pub fn no_content(&self, ctx: &ExecutionContext) -> Rendered {
        self.no_content_with(ctx, Payload::default())
    }

    /// 204 No Content with custom message, headers, or forward URL. Any
    /// data in the payload is discarded: 204 carries no body.
    pub fn no_content_with(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        let mut payload = payload.into();
        if payload.message.is_empty() {
            payload.message = DEFAULT_NO_CONTENT_MESSAGE.to_owned();
        }
        payload.data = None;
        self.dispatch(ctx, status::NO_CONTENT, payload)
    }

    /// 400 Bad Request.
    pub fn bad_request(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        self.dispatch_error(ctx, status::BAD_REQUEST, payload.into())
    }

    /// 401 Unauthorized.
    pub fn unauthorized(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        self.dispatch_error(ctx, status::UNAUTHORIZED, payload.into())
    }

    /// 403 Forbidden.
    pub fn forbidden(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        self.dispatch_error(ctx, status::FORBIDDEN, payload.into())
    }

    /// 404 Not Found.
    pub fn not_found(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        self.dispatch_error(ctx, status::NOT_FOUND, payload.into())
    }

    /// 406 Not Acceptable.
    pub fn not_acceptable(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        self.dispatch_error(ctx, status::NOT_ACCEPTABLE, payload.into())
    }

    /// 409 Conflict.
    pub fn conflict(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        self.dispatch_error(ctx, status::CONFLICT, payload.into())
    }

    /// 422 Unprocessable Entity.
    pub fn unprocessable_entity(
        &self,
        ctx: &ExecutionContext,
        payload: impl Into<Payload>,
    ) -> Rendered {
        self.dispatch_error(ctx, status::UNPROCESSABLE_ENTITY, payload.into())
    }

    /// 429 Too Many Requests.
    pub fn too_many_requests(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        self.dispatch_error(ctx, status::TOO_MANY_REQUESTS, payload.into())
    }

    /// 500 Internal Server Error. Subject to the debug gate: without debug
    /// details enabled the rendered message is generic.
    pub fn error(&self, ctx: &ExecutionContext, payload: impl Into<Payload>) -> Rendered {
        self.dispatch_error(ctx, status::INTERNAL_SERVER_ERROR, payload.into())
    }

    /// Maps an exception-like `(code, message)` pair to the matching entry
    /// point. Codes outside the known table collapse to a 500 whose message
    /// names the original code — and is then still debug-gated like any
    /// other 5xx.
    pub fn handle_exception(
        &self,
        ctx: &ExecutionContext,
        code: u16,
        message: impl Into<String>,
        extras: impl Into<Payload>,
    ) -> Rendered {
        let mut payload = extras.into();
        payload.message = message.into();

        if !status::KNOWN.contains(&code) {
            payload.message =
                format!("An unexpected error occurred. ({code}: {})", payload.message);
            return self.error(ctx, payload);
        }

        match code {
            status::OK => self.success(ctx, payload),
            status::CREATED => self.created(ctx, payload),
            status::ACCEPTED => self.accepted(ctx, payload),
            status::NO_CONTENT => self.no_content_with(ctx, payload),
            status::BAD_REQUEST => self.bad_request(ctx, payload),
            status::UNAUTHORIZED => self.unauthorized(ctx, payload),
            status::FORBIDDEN => self.forbidden(ctx, payload),
            status::NOT_FOUND => self.not_found(ctx, payload),
            status::NOT_ACCEPTABLE => self.not_acceptable(ctx, payload),
            status::CONFLICT => self.conflict(ctx, payload),
            status::UNPROCESSABLE_ENTITY => self.unprocessable_entity(ctx, payload),
            status::TOO_MANY_REQUESTS => self.too_many_requests(ctx, payload),
            _ => self.error(ctx, payload),
        }
    }

    /// Renders a taxonomy error through the same table, attaching its error
    /// bag.
    pub fn respond_error(&self, ctx: &ExecutionContext, error: &HttpError) -> Rendered {
        self.handle_exception(
            ctx,
            error.status(),
            error.message(),
            Payload::default().with_errors(error.bag()),
        )
    }
}
