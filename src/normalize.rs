//! Record validation and normalization.
//!
//! This module is the leaf of the crate: it has no knowledge of codecs or
//! registries and enforces the format-independent record rules every codec
//! relies on.
//!
//! # Rules
//!
//! - Every key must be non-empty, contain none of space/tab/CR/LF, and must
//!   not consist purely of ASCII digits. Digit-only keys are reserved for
//!   list indices, which is what disambiguates maps from lists.
//! - A non-empty [`Value::Map`] whose keys are *all* digit-only strings is
//!   structurally a list: normalization turns it into a [`Value::List`],
//!   keeping the values in insertion order. The decision is recomputed at
//!   every nesting level. An empty map stays a map.
//! - Validation visits entries in insertion order and fails on the first
//!   violation, naming the path of the offending entry.
//!
//! The `is_valid_*` probes are thin adapters over their `validate_*`
//! counterparts and share the exact same traversal, so for any input
//! `is_valid_x(v)` is `true` if and only if `validate_x(v)` succeeds. The
//! failure detail a probe swallows is available from the validating form's
//! `Err` value.
//!
//! # Examples
//!
//! ```rust
//! use record_codec::normalize;
//!
//! assert!(normalize::is_valid_name("foo_bar-1"));
//! assert!(!normalize::is_valid_name("123"));
//! assert!(!normalize::is_valid_name(" foo"));
//!
//! assert_eq!(
//!     normalize::normalize_type("Application/JSON").unwrap(),
//!     "application/json"
//! );
//! ```

use crate::error::{Error, Result};
use crate::map::RecordMap;
use crate::value::Value;

/// Validates a whole record in insertion order.
///
/// Fails with [`Error::InvalidKey`] at the first offending entry. The
/// top level of a record is always treated as a map, so digit-only keys
/// are rejected here even if every key is numeric.
pub fn validate_data(data: &RecordMap) -> Result<()> {
    validate_data_at(data, &mut Vec::new())
}

/// Validates a single item, recursing into nested maps and lists.
pub fn validate_item(item: &Value) -> Result<()> {
    validate_item_at(item, &mut Vec::new())
}

/// Validates a record key against the key invariants.
pub fn validate_name(name: &str) -> Result<()> {
    validate_name_at(name, &[])
}

/// Validates a media type against the `token/token` grammar of RFC 2046.
pub fn validate_type(media_type: &str) -> Result<()> {
    if is_valid_type(media_type) {
        Ok(())
    } else {
        Err(Error::InvalidType(media_type.to_string()))
    }
}

/// Returns the validated, canonical copy of a record.
///
/// Conceptually validate-then-copy: the result has the same shape as the
/// input except that digit-keyed nested maps are reclassified as lists.
/// An invariant violation is an error, never a silent fix.
///
/// # Examples
///
/// ```rust
/// use record_codec::{normalize, record, Value};
///
/// let data = record!({ "items": { "0": "a", "1": "b" } })
///     .into_map()
///     .unwrap();
/// let normalized = normalize::normalize_data(&data).unwrap();
/// assert!(normalized.get("items").unwrap().is_list());
/// ```
pub fn normalize_data(data: &RecordMap) -> Result<RecordMap> {
    normalize_data_at(data, &mut Vec::new())
}

/// Returns the validated, canonical copy of a single item.
pub fn normalize_item(item: &Value) -> Result<Value> {
    normalize_item_at(item, &mut Vec::new())
}

/// Validates a media type and returns its lowercase canonical form.
///
/// This is the sole key space used by the codec registry; every type
/// lookup and registration passes through here first.
pub fn normalize_type(media_type: &str) -> Result<String> {
    validate_type(media_type)?;
    Ok(media_type.to_ascii_lowercase())
}

/// Returns `true` if [`validate_data`] would succeed.
#[must_use]
pub fn is_valid_data(data: &RecordMap) -> bool {
    validate_data(data).is_ok()
}

/// Returns `true` if [`validate_item`] would succeed.
#[must_use]
pub fn is_valid_item(item: &Value) -> bool {
    validate_item(item).is_ok()
}

/// Returns `true` if [`validate_name`] would succeed.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    validate_name(name).is_ok()
}

/// Returns `true` if the media type matches
/// `[a-z]+([+_.-]?[a-z0-9]+)* "/" [a-z]+([+_.-]?[a-z0-9]+)*`,
/// case-insensitively.
#[must_use]
pub fn is_valid_type(media_type: &str) -> bool {
    let mut parts = media_type.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(main), Some(sub), None) => is_valid_token(main) && is_valid_token(sub),
        _ => false,
    }
}

fn is_valid_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    let mut pos = 0;

    // leading run of letters
    while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
        pos += 1;
    }
    if pos == 0 {
        return false;
    }

    // zero or more groups: optional single separator, then alphanumerics
    while pos < bytes.len() {
        if matches!(bytes[pos], b'+' | b'_' | b'.' | b'-') {
            pos += 1;
        }
        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphanumeric() {
            pos += 1;
        }
        if pos == start {
            return false;
        }
    }

    true
}

fn validate_name_at(name: &str, path: &[String]) -> Result<()> {
    let has_whitespace = name
        .chars()
        .any(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
    let digits_only = !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit());

    if name.is_empty() || has_whitespace || digits_only {
        return Err(Error::InvalidKey {
            path: path.join("/"),
            key: name.to_string(),
        });
    }

    Ok(())
}

fn validate_data_at(data: &RecordMap, path: &mut Vec<String>) -> Result<()> {
    for (name, item) in data.iter() {
        validate_name_at(name, path)?;
        path.push(name.clone());
        validate_item_at(item, path)?;
        path.pop();
    }
    Ok(())
}

fn validate_item_at(item: &Value, path: &mut Vec<String>) -> Result<()> {
    match item {
        Value::Map(map) if is_index_keyed(map) => {
            validate_values_at(map.values(), path)
        }
        Value::Map(map) => validate_data_at(map, path),
        Value::List(list) => validate_values_at(list.iter(), path),
        // Scalars and null carry no keys to check.
        _ => Ok(()),
    }
}

fn validate_values_at<'a, I>(values: I, path: &mut Vec<String>) -> Result<()>
where
    I: Iterator<Item = &'a Value>,
{
    for (index, item) in values.enumerate() {
        path.push(index.to_string());
        validate_item_at(item, path)?;
        path.pop();
    }
    Ok(())
}

fn normalize_data_at(data: &RecordMap, path: &mut Vec<String>) -> Result<RecordMap> {
    let mut normalized = RecordMap::with_capacity(data.len());

    for (name, item) in data.iter() {
        validate_name_at(name, path)?;
        path.push(name.clone());
        let item = normalize_item_at(item, path)?;
        path.pop();
        normalized.insert(name.clone(), item);
    }

    Ok(normalized)
}

fn normalize_item_at(item: &Value, path: &mut Vec<String>) -> Result<Value> {
    let normalized = match item {
        Value::Map(map) if is_index_keyed(map) => {
            Value::List(normalize_values_at(map.values(), path)?)
        }
        Value::Map(map) => Value::Map(normalize_data_at(map, path)?),
        Value::List(list) => Value::List(normalize_values_at(list.iter(), path)?),
        scalar => scalar.clone(),
    };

    Ok(normalized)
}

fn normalize_values_at<'a, I>(values: I, path: &mut Vec<String>) -> Result<Vec<Value>>
where
    I: Iterator<Item = &'a Value>,
{
    let mut normalized = Vec::new();

    for (index, item) in values.enumerate() {
        path.push(index.to_string());
        normalized.push(normalize_item_at(item, path)?);
        path.pop();
    }

    Ok(normalized)
}

/// A non-empty map whose keys are all digit-only strings is considered a
/// list rather than a map. Empty maps stay maps, so an explicitly empty
/// record survives a round-trip as a map.
fn is_index_keyed(map: &RecordMap) -> bool {
    !map.is_empty()
        && map
            .keys()
            .all(|key| !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn test_name_rules() {
        assert!(is_valid_name("foo"));
        assert!(is_valid_name("foo_bar-1"));
        assert!(is_valid_name("x1"));

        assert!(!is_valid_name(""));
        assert!(!is_valid_name(" foo"));
        assert!(!is_valid_name("foo bar"));
        assert!(!is_valid_name("foo\tbar"));
        assert!(!is_valid_name("foo\nbar"));
        assert!(!is_valid_name("123"));
        assert!(!is_valid_name("0"));
    }

    #[test]
    fn test_type_rules() {
        assert!(is_valid_type("application/json"));
        assert!(is_valid_type("application/vnd.php.serialized"));
        assert!(is_valid_type("zz-application/zz-winassoc-ini"));
        assert!(is_valid_type("text/x-json"));
        assert!(is_valid_type("Application/JSON"));

        assert!(!is_valid_type("*/*"));
        assert!(!is_valid_type("no-slash-at-all"));
        assert!(!is_valid_type("a/b/c"));
        assert!(!is_valid_type("/json"));
        assert!(!is_valid_type("application/"));
        assert!(!is_valid_type("1app/json"));
        assert!(!is_valid_type("app-/json"));
        assert!(!is_valid_type("app--x/json"));
        assert!(!is_valid_type(""));
    }

    #[test]
    fn test_normalize_type_lowercases() {
        assert_eq!(normalize_type("Text/JSON").unwrap(), "text/json");
        assert!(matches!(
            normalize_type("bogus").unwrap_err(),
            Error::InvalidType(_)
        ));
    }

    #[test]
    fn test_validate_reports_first_violation_with_path() {
        let data = record!({
            "ok": 1,
            "nested": { "bad key": true }
        })
        .into_map()
        .unwrap();

        let err = validate_data(&data).unwrap_err();
        match err {
            Error::InvalidKey { path, key } => {
                assert_eq!(path, "nested");
                assert_eq!(key, "bad key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_digit_keys_invalid_at_top_level() {
        let data = record!({ "0": "a", "1": "b" }).into_map().unwrap();
        assert!(!is_valid_data(&data));
        assert!(normalize_data(&data).is_err());
    }

    #[test]
    fn test_nested_digit_keyed_map_becomes_list() {
        let data = record!({ "items": { "0": "a", "1": "b" } })
            .into_map()
            .unwrap();
        let normalized = normalize_data(&data).unwrap();
        assert_eq!(
            normalized.get("items"),
            Some(&record!(["a", "b"]))
        );
    }

    #[test]
    fn test_reindexing_keeps_insertion_order() {
        let data = record!({ "items": { "5": "x", "2": "y" } })
            .into_map()
            .unwrap();
        let normalized = normalize_data(&data).unwrap();
        assert_eq!(
            normalized.get("items"),
            Some(&record!(["x", "y"]))
        );
    }

    #[test]
    fn test_empty_map_stays_map() {
        let data = record!({ "empty": {} }).into_map().unwrap();
        let normalized = normalize_data(&data).unwrap();
        assert!(normalized.get("empty").unwrap().is_map());
    }

    #[test]
    fn test_mixed_keys_are_a_map_with_invalid_digit_key() {
        // One non-digit key makes it a map, and then the digit key is
        // an invalid name.
        let data = record!({ "mixed": { "0": "a", "foo": "b" } })
            .into_map()
            .unwrap();
        assert!(validate_data(&data).is_err());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let data = record!({
            "scalars": [null, true, 1, 2.5, "s"],
            "nested": { "list": { "0": 1, "1": 2 } }
        })
        .into_map()
        .unwrap();

        let once = normalize_data(&data).unwrap();
        let twice = normalize_data(&once).unwrap();
        assert_eq!(once, twice);
        assert!(validate_data(&once).is_ok());
    }

    #[test]
    fn test_probe_consistency() {
        let samples = [
            record!({ "good": 1 }),
            record!({ "bad key": 1 }),
            record!({ "nested": { "123": true, "x": 0 } }),
            record!({ "list": [1, [2, { "deep": null }]] }),
        ];

        for sample in samples {
            let map = sample.into_map().unwrap();
            assert_eq!(is_valid_data(&map), validate_data(&map).is_ok());
        }
    }

    #[test]
    fn test_item_probe_recurses() {
        assert!(is_valid_item(&record!([1, { "ok": 2 }])));
        assert!(!is_valid_item(&record!([1, { "no good": 2 }])));
        assert!(is_valid_item(&Value::Null));
    }
}
