//! Fuzz target: console rendering of arbitrary JSON payloads.
//!
//! Any JSON value must render to a text block without panicking, via the
//! console-context dispatch path.

#![no_main]

use libfuzzer_sys::fuzz_target;
use waypoint_core::{ExecutionContext, Payload, Responder, ToolkitConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let responder = Responder::new(&ToolkitConfig::default());
    let mut payload = Payload::new("fuzz").with_data(value.clone());
    payload.errors.insert("field".to_owned(), value);
    let _ = responder.bad_request(&ExecutionContext::Console, payload);
});
