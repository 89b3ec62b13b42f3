#![no_main]
use libfuzzer_sys::fuzz_target;
use ord_diff::{DiffEngine, Record};

/// Fuzz the record diff on two arbitrary JSON documents.
///
/// The input is split at the first NUL byte; both halves must parse as JSON
/// to reach the differ.
fuzz_target!(|data: &[u8]| {
    let Some(split) = data.iter().position(|&b| b == 0) else {
        return;
    };
    let (Ok(a), Ok(b)) = (
        serde_json::from_slice::<serde_json::Value>(&data[..split]),
        serde_json::from_slice::<serde_json::Value>(&data[split + 1..]),
    ) else {
        return;
    };

    let (m1, m2) = (Record::new(a), Record::new(b));
    let diff = DiffEngine::new()
        .diff_records(&m1, &m2)
        .expect("differ paths must resolve to leaves");
    assert!((0.0..=1.0).contains(&diff.distance()));
});
