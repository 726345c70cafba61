//! INI record parser, driven through `rust-ini`.
//!
//! INI is a read-only format here: records are parsed from INI bytes but
//! never built. The builtin registry deliberately binds this codec as a
//! parser only, so `has_builder("application/textedit")` is `false`.

use ini::Ini;

use crate::codec::{normalize_output, RecordParser};
use crate::error::{Error, Result};
use crate::map::RecordMap;
use crate::value::Value;

const FORMAT: &str = "INI";

/// The builtin INI parser.
///
/// Section headers are ignored: properties from all sections are
/// flattened into one top-level record, in file order, with later
/// occurrences of a key overriding earlier ones. Every value is a
/// string — INI has no richer scalar types.
///
/// Registered by default under `application/textedit` and
/// `zz-application/zz-winassoc-ini`.
#[derive(Debug, Default, Clone, Copy)]
pub struct IniParser;

impl RecordParser for IniParser {
    fn parse_record(&self, sequence: &[u8]) -> Result<RecordMap> {
        let text = std::str::from_utf8(sequence).map_err(|error| Error::Malformed {
            format: FORMAT,
            detail: error.to_string(),
        })?;

        let ini = Ini::load_from_str(text).map_err(|error| Error::Malformed {
            format: FORMAT,
            detail: error.to_string(),
        })?;

        let mut data = RecordMap::new();
        for (_section, properties) in ini.iter() {
            for (key, value) in properties.iter() {
                data.insert(key.to_string(), Value::String(value.to_string()));
            }
        }

        normalize_output(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_sections_are_flattened() {
        let source = b"foo=bar\n[database]\nhost=localhost\nport=5432\n";
        let data = IniParser.parse_record(source).unwrap();

        assert_eq!(data.get("foo"), Some(&Value::String("bar".into())));
        assert_eq!(data.get("host"), Some(&Value::String("localhost".into())));
        // INI values stay strings; nothing guesses at numbers.
        assert_eq!(data.get("port"), Some(&Value::String("5432".into())));
    }

    #[test]
    fn test_later_keys_override_earlier_ones() {
        let source = b"key=first\n[other]\nkey=second\n";
        let data = IniParser.parse_record(source).unwrap();
        assert_eq!(data.get("key"), Some(&Value::String("second".into())));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_malformed_ini_is_invalid_argument() {
        let err = IniParser.parse_record(b"[unclosed\nkey=value").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("INI"));
    }

    #[test]
    fn test_non_utf8_is_rejected() {
        let err = IniParser.parse_record(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }
}
