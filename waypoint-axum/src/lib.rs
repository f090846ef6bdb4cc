//! Axum adapter for the waypoint response toolkit.
//!
//! Derives [`waypoint_core::RequestFacts`] from incoming requests, converts
//! [`waypoint_core::Rendered`] values into axum responses, and provides the
//! request-lifecycle middlewares.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod extract;
pub mod middleware;
pub mod respond;

pub use extract::{facts_from_parts, Facts, RouteName};
pub use middleware::{ExcludeFromHistory, ExcludeFromHistoryLayer, ForceJsonLayer};
pub use respond::{ApiError, FlashState, Reply};
