//! Builds [`RequestFacts`] from axum request parts.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::header;

use waypoint_core::{ExecutionContext, RequestFacts};

use crate::middleware::ExcludeFromHistory;

/// Request extension carrying the matched route name, for hosts whose
/// router assigns one.
#[derive(Debug, Clone)]
pub struct RouteName(pub String);

/// Derives the toolkit's request facts from raw request parts.
///
/// The previous URL comes from `Referer` unless the request carries the
/// [`ExcludeFromHistory`] marker.
#[must_use]
pub fn facts_from_parts(parts: &Parts) -> RequestFacts {
    let mut facts = RequestFacts::new(parts.uri.path())
        .with_method(parts.method.as_str())
        .with_accepts_json(accepts_json(parts))
        .with_current_url(parts.uri.to_string());

    if parts.extensions.get::<ExcludeFromHistory>().is_none() {
        facts.previous_url = header_value(parts, header::REFERER);
    }

    if let Some(RouteName(name)) = parts.extensions.get::<RouteName>() {
        facts.route_name = Some(name.clone());
    }

    facts
}

/// Whether the first `Accept` entry negotiates JSON (`*/json` or `*+json`).
fn accepts_json(parts: &Parts) -> bool {
    let Some(accept) = header_value(parts, header::ACCEPT) else {
        return false;
    };
    let Some(first) = accept.split(',').next() else {
        return false;
    };
    let media_type = first.split(';').next().unwrap_or("").trim();
    media_type.contains("/json") || media_type.contains("+json")
}

fn header_value(parts: &Parts, name: header::HeaderName) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Extractor handing handlers the derived [`RequestFacts`]. Infallible:
/// absent headers simply leave the corresponding facts empty.
#[derive(Debug, Clone)]
pub struct Facts(pub RequestFacts);

impl Facts {
    /// Wraps the facts in an HTTP execution context for dispatch.
    #[must_use]
    pub fn into_context(self) -> ExecutionContext {
        ExecutionContext::Http(self.0)
    }
}

impl<S> FromRequestParts<S> for Facts
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(facts_from_parts(parts)))
    }
}
