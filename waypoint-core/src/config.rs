//! Typed toolkit configuration.
//!
//! Loaded once at startup (TOML or hand-built) and shared read-only across
//! requests; nothing in the toolkit mutates it afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Root configuration for the toolkit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct ToolkitConfig {
    /// Route-context matcher lists.
    pub route: RouteConfig,
    /// Response sanitization settings.
    pub responses: ResponsesConfig,
    /// Pagination defaults.
    pub paginator: PaginatorConfig,
}

impl ToolkitConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::Parse`] for malformed TOML and the
    /// relevant validation error for out-of-range values.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigurationError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| ConfigurationError::Parse { reason: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the loaded values; call once at startup to fail fast.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::NonPositivePageItems`] when the
    /// pagination default is zero.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.paginator.page_items == 0 {
            return Err(ConfigurationError::NonPositivePageItems);
        }
        Ok(())
    }
}

/// Glob lists deciding which paths belong to each route context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct RouteConfig {
    /// Paths served as API traffic.
    pub api_matchers: Vec<String>,
    /// Paths served as inbound hook traffic.
    pub hook_matchers: Vec<String>,
    /// Paths served as IoT device traffic.
    pub iot_matchers: Vec<String>,
    /// Extra paths that want JSON without being API/hook/IoT.
    pub json_matchers: Vec<String>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            api_matchers: vec!["api*".to_owned(), "*-api*".to_owned()],
            hook_matchers: vec!["hooks/*".to_owned()],
            iot_matchers: vec!["iot/*".to_owned()],
            json_matchers: Vec::new(),
        }
    }
}

/// Sanitization settings for outbound responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct ResponsesConfig {
    /// Header names (case-insensitive) that may survive an allow-listing
    /// strategy. Empty means no header survives.
    pub allowed_headers: Vec<String>,
    /// Error-bag keys the redirect strategy may flash. Empty means no key
    /// restriction (scalar coercion still applies).
    pub allowed_error_fields: Vec<String>,
    /// When `false`, 5xx responses carry only a generic message.
    pub include_debug_details: bool,
}

impl Default for ResponsesConfig {
    fn default() -> Self {
        Self {
            allowed_headers: vec!["Cache-Control".to_owned(), "Retry-After".to_owned()],
            allowed_error_fields: Vec::new(),
            include_debug_details: false,
        }
    }
}

/// Pagination defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct PaginatorConfig {
    /// Items per page when the caller does not specify one.
    pub page_items: usize,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self { page_items: 15 }
    }
}
