//! JSON record handler, driven through `serde_json`.

use crate::codec::{normalize_input, normalize_output, RecordBuilder, RecordHandler, RecordParser};
use crate::error::{Error, Result};
use crate::map::RecordMap;
use crate::value::Value;

const FORMAT: &str = "JSON";

/// The builtin JSON codec.
///
/// Registered by default under `application/json`, `text/json` and
/// `text/x-json`.
///
/// # Examples
///
/// ```rust
/// use record_codec::codec::{JsonHandler, RecordBuilder, RecordParser};
/// use record_codec::record;
///
/// let data = record!({ "foo": "bar", "baz": {} }).into_map().unwrap();
/// let bytes = JsonHandler.build_record(&data).unwrap();
/// let parsed = JsonHandler.parse_record(&bytes).unwrap();
/// assert_eq!(parsed, data);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonHandler;

impl RecordBuilder for JsonHandler {
    fn build_record(&self, data: &RecordMap) -> Result<Vec<u8>> {
        let record = normalize_input(data)?;
        serde_json::to_vec(&Value::Map(record)).map_err(|error| Error::BuildFailed {
            format: FORMAT,
            detail: error.to_string(),
        })
    }
}

impl RecordParser for JsonHandler {
    fn parse_record(&self, sequence: &[u8]) -> Result<RecordMap> {
        let value: Value =
            serde_json::from_slice(sequence).map_err(|error| Error::Malformed {
                format: FORMAT,
                detail: error.to_string(),
            })?;

        let Value::Map(data) = value else {
            return Err(Error::Malformed {
                format: FORMAT,
                detail: format!("expected a map at the top level, got {}", value.type_name()),
            });
        };

        normalize_output(&data)
    }
}

impl RecordHandler for JsonHandler {}
