//! YAML record handler, driven through `serde_yaml`.
//!
//! YAML support is not part of the builtin registry; it ships as
//! [`YamlPlugin`] and is layered in through the plugin loader.

use crate::codec::{normalize_input, normalize_output, RecordBuilder, RecordHandler, RecordParser};
use crate::error::{Error, Result};
use crate::map::RecordMap;
use crate::plugin::RecordPlugin;
use crate::registry::RecordRegistry;
use crate::value::Value;

const FORMAT: &str = "YAML";

/// Media types the YAML plugin registers its handler under.
pub(crate) const YAML_TYPES: [&str; 4] = [
    "application/yaml",
    "application/x-yaml",
    "text/yaml",
    "text/x-yaml",
];

/// The YAML codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlHandler;

impl RecordBuilder for YamlHandler {
    fn build_record(&self, data: &RecordMap) -> Result<Vec<u8>> {
        let record = normalize_input(data)?;
        let text = serde_yaml::to_string(&Value::Map(record)).map_err(|error| {
            Error::BuildFailed {
                format: FORMAT,
                detail: error.to_string(),
            }
        })?;
        Ok(text.into_bytes())
    }
}

impl RecordParser for YamlHandler {
    fn parse_record(&self, sequence: &[u8]) -> Result<RecordMap> {
        let value: Value =
            serde_yaml::from_slice(sequence).map_err(|error| Error::Malformed {
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

impl RecordHandler for YamlHandler {}

/// Plugin registering [`YamlHandler`] under the common YAML media types.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use record_codec::plugin::{load_plugins, RecordPlugin};
/// use record_codec::registry::RecordRegistry;
/// use record_codec::codec::YamlPlugin;
///
/// let root = Arc::new(RecordRegistry::builtin());
/// let plugins: Vec<Arc<dyn RecordPlugin>> = vec![Arc::new(YamlPlugin)];
/// let (registry, report) = load_plugins(root, &plugins);
///
/// assert!(report.skipped.is_empty());
/// assert!(registry.has_handler("text/yaml"));
/// assert!(registry.has_handler("application/json"));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlPlugin;

impl RecordPlugin for YamlPlugin {
    fn name(&self) -> &str {
        "yaml"
    }

    fn register(&self, registry: &mut RecordRegistry) -> Result<()> {
        for media_type in YAML_TYPES {
            registry.set_handler(media_type, YamlHandler)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::record;

    #[test]
    fn test_roundtrip() {
        let data = record!({
            "name": "Alice",
            "limits": { "cpu": 2, "ratio": 0.5 },
            "tags": ["a", "b"]
        })
        .into_map()
        .unwrap();

        let bytes = YamlHandler.build_record(&data).unwrap();
        let parsed = YamlHandler.parse_record(&bytes).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_scalar_document_is_not_a_record() {
        // Plain text parses as a YAML string scalar, which is not a map.
        let err = YamlHandler.parse_record(b"not valid bytes").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("YAML"));
    }

    #[test]
    fn test_ambiguous_strings_stay_strings() {
        let data = record!({ "version": "1.0", "switch": "on" })
            .into_map()
            .unwrap();
        let bytes = YamlHandler.build_record(&data).unwrap();
        let parsed = YamlHandler.parse_record(&bytes).unwrap();
        assert_eq!(parsed, data);
    }
}
