//! Cache key generation.
//!
//! Queries are normalized before keying so "  Café " and "café" share an
//! entry; keys are hashed so arbitrary query text never leaks into SQL.

use sha2::{Digest, Sha256};

/// Normalize a search query for cache keying: trim, lowercase,
/// collapse internal whitespace.
pub fn normalize_query(query: &str) -> String {
    query
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Key for a tenant's image config entry.
pub fn config_key(tenant_id: &str) -> String {
    hash_key("config", tenant_id, "")
}

/// Key for a (tenant, normalized query) search-result entry.
pub fn search_key(tenant_id: &str, query: &str) -> String {
    hash_key("search", tenant_id, &normalize_query(query))
}

fn hash_key(kind: &str, tenant_id: &str, detail: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(b"\n");
    hasher.update(tenant_id.as_bytes());
    hasher.update(b"\n");
    hasher.update(detail.as_bytes());
    hex::encode(hasher.finalize())
}
