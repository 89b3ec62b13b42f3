//! Content hashing utilities.

use serde_json::Value;
use xxhash_rust::xxh3::xxh3_64;

/// Compute a content hash for arbitrary bytes
pub fn content_hash(data: &[u8]) -> u64 {
    xxh3_64(data)
}

/// Hash a tree by its canonical JSON encoding.
///
/// Mapping keys keep their stored order, so two equal mappings built in a
/// different key order can hash differently. Callers bucket by this hash and
/// confirm with `==`.
pub fn value_hash(value: &Value) -> u64 {
    serde_json::to_vec(value).map_or(0, |bytes| content_hash(&bytes))
}
