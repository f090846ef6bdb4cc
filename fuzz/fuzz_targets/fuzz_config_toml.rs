//! Fuzz target: TOML parsing of `ToolkitConfig`.
//!
//! Verifies that arbitrary byte sequences fed to the config loader never
//! cause panics — parse and validation errors are expected and fine.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        let _ = waypoint_core::ToolkitConfig::from_toml_str(raw);
    }
});
