//! Context-aware response toolkit for web services.
//!
//! Classifies each call into a route context (console, API, hook, IoT,
//! web), selects one of three rendering strategies, runs the sanitization
//! policy, and renders a console text block, a JSON payload, or a redirect.
//! The core never touches the host framework: callers pass their context
//! explicitly and receive a [`Rendered`] value to hand off.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod context;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod pagination;
pub mod pattern;
pub mod sanitize;
pub mod status;
pub mod strategy;

pub use config::{PaginatorConfig, ResponsesConfig, RouteConfig, ToolkitConfig};
pub use context::{ExecutionContext, RequestFacts, RouteClassifier, RouteContext};
pub use dispatch::Responder;
pub use envelope::{ErrorBag, HeaderMap, Payload, ResponseEnvelope};
pub use error::{ConfigurationError, ErrorKind, HttpError};
pub use pagination::{Page, Paginator};
pub use sanitize::{SanitizationPolicy, Sanitized, GENERIC_ERROR_MESSAGE};
pub use strategy::{FlashPayload, JsonReply, RedirectReply, Rendered, Strategy};
