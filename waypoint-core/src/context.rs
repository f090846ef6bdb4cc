//! Route-context classification.
//!
//! Every call receives its caller context explicitly — there is no ambient
//! "current request" lookup. A missing request is a first-class state
//! ([`ExecutionContext::Detached`]) and classifies as plain web traffic
//! instead of erroring.

use serde::{Deserialize, Serialize};

use crate::config::RouteConfig;
use crate::pattern::PatternList;

/// The inferred channel a call is served on, driving response shape
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteContext {
    /// CLI entry point; no HTTP request exists.
    Console,
    /// Request path matched the API matchers.
    Api,
    /// Request path matched the inbound-hook matchers.
    Hook,
    /// Request path matched the IoT matchers.
    IoT,
    /// Fallback for everything else.
    Web,
}

impl RouteContext {
    /// API-style channels always receive JSON, whether or not they sent an
    /// `Accept` header.
    #[must_use]
    pub fn implies_json(self) -> bool {
        matches!(self, RouteContext::Api | RouteContext::Hook | RouteContext::IoT)
    }
}

/// The facts about an HTTP request the toolkit needs; an opaque stand-in
/// for the host framework's request object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub struct RequestFacts {
    /// Decoded request path, e.g. `/api/users/3`.
    pub path: String,
    /// HTTP method, e.g. `GET`.
    pub method: Option<String>,
    /// Matched route name, when the host router assigns one.
    pub route_name: Option<String>,
    /// Whether the declared `Accept` header negotiates JSON.
    pub accepts_json: bool,
    /// Full current URL, used to pin pagination links.
    pub current_url: Option<String>,
    /// Previous URL, used as the redirect fallback target.
    pub previous_url: Option<String>,
}

impl RequestFacts {
    /// Creates facts for the given path; everything else starts absent.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Self::default() }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the matched route name.
    #[must_use]
    pub fn with_route_name(mut self, name: impl Into<String>) -> Self {
        self.route_name = Some(name.into());
        self
    }

    /// Declares whether the request negotiates JSON.
    #[must_use]
    pub fn with_accepts_json(mut self, accepts_json: bool) -> Self {
        self.accepts_json = accepts_json;
        self
    }

    /// Sets the full current URL.
    #[must_use]
    pub fn with_current_url(mut self, url: impl Into<String>) -> Self {
        self.current_url = Some(url.into());
        self
    }

    /// Sets the previous URL.
    #[must_use]
    pub fn with_previous_url(mut self, url: impl Into<String>) -> Self {
        self.previous_url = Some(url.into());
        self
    }
}

/// The caller context of a dispatch, passed explicitly to every call.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ExecutionContext {
    /// Running from a CLI entry point; there is no request.
    Console,
    /// Serving the given HTTP request.
    Http(RequestFacts),
    /// No request could be resolved (queued jobs, detached execution).
    /// Classifies as web traffic; never an error.
    Detached,
}

impl ExecutionContext {
    /// The request facts, when serving a request.
    #[must_use]
    pub fn request(&self) -> Option<&RequestFacts> {
        match self {
            ExecutionContext::Http(facts) => Some(facts),
            ExecutionContext::Console | ExecutionContext::Detached => None,
        }
    }

    /// True for the console context.
    #[must_use]
    pub fn is_console(&self) -> bool {
        matches!(self, ExecutionContext::Console)
    }

    /// The HTTP method, absent outside request scope.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.request().and_then(|f| f.method.as_deref())
    }

    /// Whether the request method equals the given verb (case-insensitive).
    #[must_use]
    pub fn is_method(&self, method: &str) -> bool {
        self.method().is_some_and(|m| m.eq_ignore_ascii_case(method))
    }

    /// The matched route name, absent outside request scope.
    #[must_use]
    pub fn route_name(&self) -> Option<&str> {
        self.request().and_then(|f| f.route_name.as_deref())
    }

    /// Whether the current route name equals the given value.
    #[must_use]
    pub fn is_route_name(&self, name: &str) -> bool {
        self.route_name() == Some(name)
    }

    /// Whether the current route name contains the given substring.
    #[must_use]
    pub fn route_contains(&self, needle: &str) -> bool {
        self.route_name().is_some_and(|name| name.contains(needle))
    }

    /// The previous URL, absent outside request scope.
    #[must_use]
    pub fn previous_url(&self) -> Option<&str> {
        self.request().and_then(|f| f.previous_url.as_deref())
    }

    /// The current URL, absent outside request scope.
    #[must_use]
    pub fn current_url(&self) -> Option<&str> {
        self.request().and_then(|f| f.current_url.as_deref())
    }
}

impl From<RequestFacts> for ExecutionContext {
    fn from(facts: RequestFacts) -> Self {
        ExecutionContext::Http(facts)
    }
}

/// Classifies calls into route contexts using the configured matcher lists.
///
/// Built once from read-only configuration; safe to share across requests.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    api: PatternList,
    hook: PatternList,
    iot: PatternList,
    json: PatternList,
}

impl RouteClassifier {
    /// Compiles the matcher lists from configuration.
    #[must_use]
    pub fn new(config: &RouteConfig) -> Self {
        Self {
            api: PatternList::new(&config.api_matchers),
            hook: PatternList::new(&config.hook_matchers),
            iot: PatternList::new(&config.iot_matchers),
            json: PatternList::new(&config.json_matchers),
        }
    }

    /// Classifies the caller context. Console and Detached never consult the
    /// matchers; HTTP requests take the first match of API, hook, IoT, in
    /// that order, falling back to web.
    #[must_use]
    pub fn classify(&self, ctx: &ExecutionContext) -> RouteContext {
        match ctx {
            ExecutionContext::Console => RouteContext::Console,
            ExecutionContext::Detached => RouteContext::Web,
            ExecutionContext::Http(facts) => {
                if self.api.matches(&facts.path) {
                    RouteContext::Api
                } else if self.hook.matches(&facts.path) {
                    RouteContext::Hook
                } else if self.iot.matches(&facts.path) {
                    RouteContext::IoT
                } else {
                    RouteContext::Web
                }
            }
        }
    }

    /// Whether the request path matches the API matchers.
    #[must_use]
    pub fn is_api(&self, ctx: &ExecutionContext) -> bool {
        ctx.request().is_some_and(|f| self.api.matches(&f.path))
    }

    /// Whether the request path matches the hook matchers.
    #[must_use]
    pub fn is_hook(&self, ctx: &ExecutionContext) -> bool {
        ctx.request().is_some_and(|f| self.hook.matches(&f.path))
    }

    /// Whether the request path matches the IoT matchers.
    #[must_use]
    pub fn is_iot(&self, ctx: &ExecutionContext) -> bool {
        ctx.request().is_some_and(|f| self.iot.matches(&f.path))
    }

    /// Whether the call is plain web traffic: none of the API-style
    /// channels and not the console.
    #[must_use]
    pub fn is_web(&self, ctx: &ExecutionContext) -> bool {
        !(ctx.is_console() || self.is_api(ctx) || self.is_hook(ctx) || self.is_iot(ctx))
    }

    /// Whether the response should be JSON.
    ///
    /// The API-style channels are checked before generic negotiation: they
    /// may legitimately omit `Accept: application/json` yet still require
    /// JSON, so the chain short-circuits on them first.
    #[must_use]
    pub fn wants_json(&self, ctx: &ExecutionContext) -> bool {
        match ctx {
            ExecutionContext::Console | ExecutionContext::Detached => false,
            ExecutionContext::Http(facts) => {
                self.is_api(ctx)
                    || self.is_hook(ctx)
                    || self.is_iot(ctx)
                    || self.json.matches(&facts.path)
                    || facts.accepts_json
            }
        }
    }

    /// One-off glob check of the request path; false outside request scope.
    #[must_use]
    pub fn matches_expression(&self, ctx: &ExecutionContext, expression: &str) -> bool {
        ctx.request()
            .is_some_and(|f| PatternList::new(&[expression.to_owned()]).matches(&f.path))
    }
}
