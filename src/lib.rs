//! # record_codec
//!
//! A pluggable (de)serialization toolkit for *records*: flat-or-nested
//! string-keyed maps exchanged between programs in formats like JSON,
//! YAML, INI or PHP's serialize format.
//!
//! ## Key Ideas
//!
//! - **One data model**: every codec reads and writes the same
//!   [`Value`]/[`RecordMap`] model, so records parsed from one format can
//!   be built into another without conversion glue
//! - **Guaranteed invariants**: record keys are non-empty, free of
//!   whitespace, and never purely numeric at the top level; nested maps
//!   whose keys are all decimal digits are reclassified as lists. Every
//!   codec enforces this on both sides, so a record you get out of the
//!   toolkit is always well-formed
//! - **Media-type dispatch**: codecs are registered under lowercase
//!   media types in a [`registry::RecordRegistry`]; registries chain
//!   through fallbacks, so plugins and application code can shadow or
//!   extend the builtin set without mutating it
//! - **Three error classes**: invalid-argument (the caller's data or
//!   media type is bad), not-supported (no codec for the type), runtime
//!   (a codec or the I/O layer misbehaved) — see [`ErrorKind`]
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! record-codec = "0.1"
//! ```
//!
//! ### Parsing and Building Records
//!
//! ```rust
//! use record_codec::{build_record, parse_record, record};
//!
//! let data = record!({
//!     "name": "Alice",
//!     "roles": ["admin", "user"],
//!     "limits": { "cpu": 2 }
//! })
//! .into_map()
//! .unwrap();
//!
//! let bytes = build_record(&data, "application/json").unwrap();
//! let parsed = parse_record(&bytes, "application/json").unwrap();
//! assert_eq!(parsed, data);
//! ```
//!
//! ### Custom Codecs
//!
//! ```rust
//! use std::sync::Arc;
//! use record_codec::codec::{FnParser, RecordParser};
//! use record_codec::registry::RecordRegistry;
//! use record_codec::record;
//!
//! let mut registry = RecordRegistry::with_fallback(
//!     Arc::new(RecordRegistry::builtin()),
//! );
//! registry
//!     .set_parser("text/x-fixed", FnParser::new(|_bytes: &[u8]| {
//!         Ok(record!({ "fixed": true }).into_map().unwrap())
//!     }))
//!     .unwrap();
//!
//! assert!(registry.has_parser("text/x-fixed"));
//! assert!(registry.has_handler("application/json"));
//! ```
//!
//! ### Record Files
//!
//! [`manager::RecordManager`] loads and saves record files, picking the
//! codec from the file extension.
//!
//! ## Builtin Codecs
//!
//! | Format        | Media types                                          | Roles          |
//! |---------------|------------------------------------------------------|----------------|
//! | JSON          | `application/json`, `text/json`, `text/x-json`       | parse + build  |
//! | PHP serialize | `application/vnd.php.serialized`                     | parse + build  |
//! | INI           | `application/textedit`, `zz-application/zz-winassoc-ini` | parse only |
//! | YAML (plugin) | `application/yaml`, `application/x-yaml`, `text/yaml`, `text/x-yaml` | parse + build |
//!
//! YAML ships as [`codec::YamlPlugin`] and is layered in through
//! [`plugin::load_plugins`] rather than registered by default.

pub mod codec;
pub mod error;
pub mod macros;
pub mod manager;
pub mod map;
pub mod normalize;
pub mod plugin;
pub mod registry;
pub mod value;

pub use error::{CodecRole, Error, ErrorKind, Result};
pub use map::RecordMap;
pub use value::Value;

use std::sync::{Arc, OnceLock};

use registry::RecordRegistry;

/// The shared registry backing [`parse_record`] and [`build_record`].
fn builtin_registry() -> &'static Arc<RecordRegistry> {
    static REGISTRY: OnceLock<Arc<RecordRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Arc::new(RecordRegistry::builtin()))
}

/// Parses a record from a byte sequence using the builtin codecs.
///
/// # Examples
///
/// ```rust
/// use record_codec::parse_record;
///
/// let data = parse_record(br#"{"name":"Alice"}"#, "application/json").unwrap();
/// assert_eq!(data.get("name").and_then(|v| v.as_str()), Some("Alice"));
/// ```
///
/// # Errors
///
/// A malformed or unsupported media type, or bytes the codec cannot
/// decode into a valid record.
pub fn parse_record(sequence: &[u8], media_type: &str) -> Result<RecordMap> {
    use codec::RecordParser as _;
    builtin_registry()
        .get_parser(media_type)?
        .parse_record(sequence)
}

/// Builds the serialized form of a record using the builtin codecs.
///
/// # Examples
///
/// ```rust
/// use record_codec::{build_record, record};
///
/// let data = record!({ "name": "Alice" }).into_map().unwrap();
/// let bytes = build_record(&data, "application/json").unwrap();
/// assert_eq!(bytes, br#"{"name":"Alice"}"#);
/// ```
///
/// # Errors
///
/// A malformed or unsupported media type, or record data that violates
/// the record invariants.
pub fn build_record(data: &RecordMap, media_type: &str) -> Result<Vec<u8>> {
    use codec::RecordBuilder as _;
    builtin_registry()
        .get_builder(media_type)?
        .build_record(data)
}
