//! Fuzz target: glob compilation and path matching.
//!
//! The first line of input is treated as a glob pattern, the rest as the
//! request path. Neither compilation nor matching may panic, whatever the
//! pattern contains.

#![no_main]

use libfuzzer_sys::fuzz_target;
use waypoint_core::pattern::PatternList;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let (pattern, path) = match input.split_once('\n') {
        Some(parts) => parts,
        None => (input, "/"),
    };
    let list = PatternList::new(&[pattern.to_owned()]);
    let _ = list.matches(path);
});
