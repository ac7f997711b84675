//! Deterministic, order-insensitive cache-key construction (component B).
//!
//! Layout (illustrative per the external interface, not a required wire
//! format): `v1:<domain>:<op>:<sorted-kv-pairs>|limit=<n>|offset=<m>`. Filter
//! keys are sorted lexicographically before serialization so that two filter
//! maps with equal content but different iteration order collapse to the
//! same key. `:`, `=`, `|`, and `,` inside a value are escaped so the
//! encoding stays injective.
use std::collections::BTreeMap;
use std::fmt::Write as _;

const MAX_PLAIN_LEN: usize = 512;

/// A scalar filter value. Kept narrow (no nested structures) since filters
/// are query-string-shaped by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Str(v.to_string())
    }
}
impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Str(v)
    }
}
impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}
impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

impl FilterValue {
    fn encode(&self) -> String {
        match self {
            FilterValue::Str(s) => escape(s),
            FilterValue::Int(i) => i.to_string(),
            FilterValue::Bool(b) => b.to_string(),
        }
    }
}

/// Escape the delimiters used by the fingerprint encoding (`:`, `=`, `|`,
/// `,`) plus the escape character itself, so no escaped value can be
/// mistaken for a delimiter.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            ':' | '=' | '|' | ',' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

fn digest(s: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

/// Build the fingerprint for a parameterized list/search read.
pub fn for_query(
    domain: &str,
    operation: &str,
    filters: &BTreeMap<String, FilterValue>,
    limit: i64,
    offset: i64,
) -> String {
    let mut body = String::new();
    let mut first = true;
    for (k, v) in filters {
        if !first {
            body.push(',');
        }
        first = false;
        let _ = write!(body, "{}={}", escape(k), v.encode());
    }

    let plain = format!(
        "v1:{}:{}:{}|limit={}|offset={}",
        escape(domain),
        escape(operation),
        body,
        limit,
        offset
    );
    fold(plain)
}

/// Build the fingerprint for a lookup by primary identifier.
pub fn for_id(domain: &str, id: &str) -> String {
    let plain = format!("v1:{}:by_id:{}", escape(domain), escape(id));
    fold(plain)
}

/// Keep the key human-readable for observability while bounding its length:
/// past `MAX_PLAIN_LEN`, fold everything after a short prefix through SHA-256.
fn fold(plain: String) -> String {
    if plain.len() <= MAX_PLAIN_LEN {
        return plain;
    }
    let prefix: String = plain.chars().take(64).collect();
    format!("{prefix}#{}", digest(&plain))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(pairs: &[(&str, FilterValue)]) -> BTreeMap<String, FilterValue> {
        pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn order_insensitive_over_filters() {
        let f1 = filters(&[
            ("category", FilterValue::from("dairy")),
            ("brand", FilterValue::from("Apple")),
        ]);
        let f2 = filters(&[
            ("brand", FilterValue::from("Apple")),
            ("category", FilterValue::from("dairy")),
        ]);
        assert_eq!(
            for_query("products", "list", &f1, 10, 0),
            for_query("products", "list", &f2, 10, 0)
        );
    }

    #[test]
    fn deterministic_for_identical_input() {
        let f = filters(&[("category", FilterValue::from("dairy"))]);
        assert_eq!(
            for_query("products", "list", &f, 10, 0),
            for_query("products", "list", &f, 10, 0)
        );
    }

    #[test]
    fn distinguishes_differing_pagination() {
        let f = filters(&[("category", FilterValue::from("dairy"))]);
        assert_ne!(
            for_query("products", "list", &f, 10, 0),
            for_query("products", "list", &f, 10, 10)
        );
    }

    #[test]
    fn escapes_delimiter_characters_in_values() {
        let f1 = filters(&[("name", FilterValue::from("a:b"))]);
        let f2 = filters(&[("name", FilterValue::from("a"))]);
        assert_ne!(for_query("products", "list", &f1, 1, 0), for_query("products", "list", &f2, 1, 0));
    }

    #[test]
    fn long_keys_are_folded_but_bounded() {
        let mut f = BTreeMap::new();
        f.insert("q".to_string(), FilterValue::from("x".repeat(2000)));
        let key = for_query("products", "search", &f, 10, 0);
        assert!(key.len() < MAX_PLAIN_LEN);
        assert!(key.contains('#'));
    }

    #[test]
    fn by_id_is_distinct_from_query_shape() {
        assert_ne!(for_id("products", "abc"), for_query("products", "by_id", &BTreeMap::new(), 0, 0));
    }
}
