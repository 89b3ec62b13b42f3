#![no_main]
use libfuzzer_sys::fuzz_target;
use ord_diff::model::NameRule;
use ord_diff::pipeline::{groups_from_value, records_from_value};

/// Fuzz the collection and group shape checks on arbitrary JSON.
fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let rule = NameRule::default();
        let _ = records_from_value(value.clone(), &rule);
        let _ = groups_from_value(value, &rule);
    }
});
