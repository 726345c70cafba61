//! Codec contracts: parsers, builders and combined handlers.
//!
//! A codec converts between byte sequences and records for one media type:
//!
//! - [`RecordParser`]: bytes → record. Implementations decode with their
//!   format engine, require a map at the top level, and normalize the
//!   result before returning it — every record a parser hands back
//!   satisfies the record invariants, regardless of source format.
//! - [`RecordBuilder`]: record → bytes. Implementations normalize the
//!   input before serializing it.
//! - [`RecordHandler`]: both roles for one media type.
//!
//! The same normalization runs on both sides, but fault attribution
//! differs: a failure while normalizing *input* is the caller's error,
//! while a failure while normalizing a codec's own *output* is wrapped as
//! [`Error::InvalidOutput`] — the data came from the codec, so the codec
//! is at fault.
//!
//! [`FnParser`] and [`FnBuilder`] adapt plain closures into compliant
//! codecs, and [`PairHandler`] combines an independent parser and builder
//! into a handler.

use std::sync::Arc;

use crate::error::{CodecRole, Error, Result};
use crate::map::RecordMap;
use crate::normalize;

mod ini;
mod json;
mod php;
mod yaml;

pub use ini::IniParser;
pub use json::JsonHandler;
pub use php::PhpHandler;
pub use yaml::{YamlHandler, YamlPlugin};

/// Boxed error type accepted from user-supplied codec callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Deserializes byte sequences into normalized records.
pub trait RecordParser: Send + Sync {
    /// Parses the byte sequence into a record.
    ///
    /// # Errors
    ///
    /// Malformed bytes yield an invalid-argument error carrying the
    /// engine's complaint; engine-internal faults and invalid decoded
    /// data yield runtime errors.
    fn parse_record(&self, sequence: &[u8]) -> Result<RecordMap>;
}

/// Serializes normalized records into byte sequences.
pub trait RecordBuilder: Send + Sync {
    /// Builds the serialized form of the record.
    ///
    /// # Errors
    ///
    /// Invalid record data yields an invalid-argument error; failures of
    /// the underlying format engine yield runtime errors.
    fn build_record(&self, data: &RecordMap) -> Result<Vec<u8>>;
}

/// A codec providing both roles for one media type.
pub trait RecordHandler: RecordParser + RecordBuilder {}

impl std::fmt::Debug for dyn RecordParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn RecordParser")
    }
}

impl std::fmt::Debug for dyn RecordBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn RecordBuilder")
    }
}

impl std::fmt::Debug for dyn RecordHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn RecordHandler")
    }
}

impl<T: RecordParser + ?Sized> RecordParser for Arc<T> {
    fn parse_record(&self, sequence: &[u8]) -> Result<RecordMap> {
        (**self).parse_record(sequence)
    }
}

impl<T: RecordBuilder + ?Sized> RecordBuilder for Arc<T> {
    fn build_record(&self, data: &RecordMap) -> Result<Vec<u8>> {
        (**self).build_record(data)
    }
}

impl<T: RecordHandler + ?Sized> RecordHandler for Arc<T> {}

/// Normalizes record data supplied by a caller.
///
/// Failures are the caller's fault and surface unchanged.
pub(crate) fn normalize_input(data: &RecordMap) -> Result<RecordMap> {
    normalize::normalize_data(data)
}

/// Normalizes record data a codec itself produced.
///
/// The check is identical to [`normalize_input`], but a failure here
/// means the codec emitted invalid data, so it is re-wrapped as a
/// runtime-class [`Error::InvalidOutput`].
pub(crate) fn normalize_output(data: &RecordMap) -> Result<RecordMap> {
    normalize::normalize_data(data).map_err(|error| Error::InvalidOutput {
        source: Box::new(error),
    })
}

/// Combines an independent parser and builder into a handler.
///
/// Used by the registry to satisfy handler lookups for types that only
/// have single-role registrations.
pub struct PairHandler {
    parser: Arc<dyn RecordParser>,
    builder: Arc<dyn RecordBuilder>,
}

impl PairHandler {
    /// Creates a handler delegating to the given parser and builder.
    #[must_use]
    pub fn new(parser: Arc<dyn RecordParser>, builder: Arc<dyn RecordBuilder>) -> Self {
        PairHandler { parser, builder }
    }
}

impl RecordParser for PairHandler {
    fn parse_record(&self, sequence: &[u8]) -> Result<RecordMap> {
        self.parser.parse_record(sequence)
    }
}

impl RecordBuilder for PairHandler {
    fn build_record(&self, data: &RecordMap) -> Result<Vec<u8>> {
        self.builder.build_record(data)
    }
}

impl RecordHandler for PairHandler {}

/// Turns a callback error into a domain error.
///
/// A boxed [`Error`] passes through unchanged — the callback is allowed
/// to raise domain errors directly. Anything else is wrapped as a
/// runtime-class callback failure.
fn reraise(role: CodecRole, error: BoxError) -> Error {
    match error.downcast::<Error>() {
        Ok(domain) => *domain,
        Err(foreign) => Error::CallbackFailed {
            role,
            source: foreign,
        },
    }
}

/// A parser backed by a plain closure.
///
/// The wrapper makes a non-compliant callback behave like a compliant
/// codec: domain errors pass through, foreign errors become runtime
/// errors, and the callback's result is normalized like any parser's
/// output.
///
/// # Examples
///
/// ```rust
/// use record_codec::codec::{FnParser, RecordParser};
/// use record_codec::{record, RecordMap};
///
/// let parser = FnParser::new(|_bytes: &[u8]| {
///     Ok(record!({ "fixed": true }).into_map().unwrap())
/// });
/// let data = parser.parse_record(b"ignored").unwrap();
/// assert_eq!(data.get("fixed"), Some(&record_codec::Value::Bool(true)));
/// ```
pub struct FnParser<F> {
    callback: F,
}

impl<F> FnParser<F>
where
    F: Fn(&[u8]) -> std::result::Result<RecordMap, BoxError> + Send + Sync,
{
    /// Wraps the callback as a [`RecordParser`].
    pub fn new(callback: F) -> Self {
        FnParser { callback }
    }
}

impl<F> RecordParser for FnParser<F>
where
    F: Fn(&[u8]) -> std::result::Result<RecordMap, BoxError> + Send + Sync,
{
    fn parse_record(&self, sequence: &[u8]) -> Result<RecordMap> {
        let data =
            (self.callback)(sequence).map_err(|error| reraise(CodecRole::Parser, error))?;
        normalize_output(&data)
    }
}

/// A builder backed by a plain closure.
///
/// Input is normalized before the callback runs; callback errors follow
/// the same pass-through/wrap rules as [`FnParser`].
pub struct FnBuilder<F> {
    callback: F,
}

impl<F> FnBuilder<F>
where
    F: Fn(&RecordMap) -> std::result::Result<Vec<u8>, BoxError> + Send + Sync,
{
    /// Wraps the callback as a [`RecordBuilder`].
    pub fn new(callback: F) -> Self {
        FnBuilder { callback }
    }
}

impl<F> RecordBuilder for FnBuilder<F>
where
    F: Fn(&RecordMap) -> std::result::Result<Vec<u8>, BoxError> + Send + Sync,
{
    fn build_record(&self, data: &RecordMap) -> Result<Vec<u8>> {
        let record = normalize_input(data)?;
        (self.callback)(&record).map_err(|error| reraise(CodecRole::Builder, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::record;

    #[test]
    fn test_fn_parser_normalizes_output() {
        let parser = FnParser::new(|_: &[u8]| {
            Ok(record!({ "list": { "0": "a", "1": "b" } })
                .into_map()
                .unwrap())
        });

        let data = parser.parse_record(b"").unwrap();
        assert!(data.get("list").unwrap().is_list());
    }

    #[test]
    fn test_fn_parser_invalid_output_is_runtime() {
        let parser = FnParser::new(|_: &[u8]| {
            Ok(record!({ "bad key": 1 }).into_map().unwrap())
        });

        let err = parser.parse_record(b"").unwrap_err();
        assert!(matches!(err, Error::InvalidOutput { .. }));
        assert_eq!(err.kind(), ErrorKind::Runtime);
    }

    #[test]
    fn test_fn_parser_domain_error_passes_through() {
        let parser = FnParser::new(|_: &[u8]| {
            Err(Box::new(Error::Malformed {
                format: "test",
                detail: "broken".into(),
            }) as BoxError)
        });

        let err = parser.parse_record(b"").unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }

    #[test]
    fn test_fn_parser_foreign_error_is_wrapped() {
        let parser = FnParser::new(|_: &[u8]| {
            Err(Box::new(std::fmt::Error) as BoxError)
        });

        let err = parser.parse_record(b"").unwrap_err();
        assert!(matches!(
            err,
            Error::CallbackFailed {
                role: CodecRole::Parser,
                ..
            }
        ));
    }

    #[test]
    fn test_fn_builder_normalizes_input_first() {
        let builder = FnBuilder::new(|record: &RecordMap| {
            assert!(record.get("list").unwrap().is_list());
            Ok(b"ok".to_vec())
        });

        let data = record!({ "list": { "0": 1 } }).into_map().unwrap();
        assert_eq!(builder.build_record(&data).unwrap(), b"ok");

        let invalid = record!({ " bad": 1 }).into_map().unwrap();
        let err = builder.build_record(&invalid).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_pair_handler_delegates() {
        let parser = Arc::new(FnParser::new(|_: &[u8]| {
            Ok(record!({ "parsed": true }).into_map().unwrap())
        }));
        let builder = Arc::new(FnBuilder::new(|_: &RecordMap| Ok(b"built".to_vec())));
        let handler = PairHandler::new(parser, builder);

        assert!(handler.parse_record(b"").unwrap().contains_key("parsed"));
        let data = record!({ "x": 1 }).into_map().unwrap();
        assert_eq!(handler.build_record(&data).unwrap(), b"built");
    }
}
