//! File-level record access on top of a registry.
//!
//! [`RecordManager`] reads and writes record files, picking the codec
//! from the file extension and falling back to a configurable default
//! media type for unknown extensions.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::map::RecordMap;
use crate::registry::RecordRegistry;

/// Media type assumed for files whose extension is not recognized.
const DEFAULT_TYPE: &str = "application/json";

/// Reads and writes record files through a registry.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use record_codec::manager::RecordManager;
/// use record_codec::registry::RecordRegistry;
///
/// let manager = RecordManager::new(Arc::new(RecordRegistry::builtin()));
/// let data = manager.load_record("config.json")?;
/// manager.save_record("copy.json", &data)?;
/// # Ok::<(), record_codec::Error>(())
/// ```
pub struct RecordManager {
    registry: Arc<RecordRegistry>,
    default_type: String,
}

impl RecordManager {
    /// Creates a manager over the given registry, defaulting unknown
    /// extensions to `application/json`.
    #[must_use]
    pub fn new(registry: Arc<RecordRegistry>) -> Self {
        RecordManager {
            registry,
            default_type: DEFAULT_TYPE.to_string(),
        }
    }

    /// Replaces the media type used for unrecognized extensions.
    #[must_use]
    pub fn with_default_type(mut self, media_type: impl Into<String>) -> Self {
        self.default_type = media_type.into();
        self
    }

    /// The registry this manager resolves codecs from.
    #[must_use]
    pub fn registry(&self) -> &Arc<RecordRegistry> {
        &self.registry
    }

    /// Loads a record from a file, detecting the media type from the
    /// file extension.
    ///
    /// # Errors
    ///
    /// I/O failures, an unsupported detected media type, or malformed
    /// file content.
    pub fn load_record(&self, path: impl AsRef<Path>) -> Result<RecordMap> {
        let path = path.as_ref();
        self.load_record_as(path, &self.detect_type(path))
    }

    /// Loads a record from a file using an explicit media type.
    ///
    /// # Errors
    ///
    /// I/O failures, a malformed or unsupported media type, or
    /// malformed file content.
    pub fn load_record_as(&self, path: impl AsRef<Path>, media_type: &str) -> Result<RecordMap> {
        let parser = self.registry.get_parser(media_type)?;
        let bytes = std::fs::read(path)?;
        parser.parse_record(&bytes)
    }

    /// Saves a record to a file, detecting the media type from the
    /// file extension.
    ///
    /// # Errors
    ///
    /// Invalid record data, an unsupported detected media type, or I/O
    /// failures.
    pub fn save_record(&self, path: impl AsRef<Path>, data: &RecordMap) -> Result<()> {
        let path = path.as_ref();
        self.save_record_as(path, &self.detect_type(path), data)
    }

    /// Saves a record to a file using an explicit media type.
    ///
    /// # Errors
    ///
    /// Invalid record data, a malformed or unsupported media type, or
    /// I/O failures.
    pub fn save_record_as(
        &self,
        path: impl AsRef<Path>,
        media_type: &str,
        data: &RecordMap,
    ) -> Result<()> {
        let builder = self.registry.get_builder(media_type)?;
        let bytes = builder.build_record(data)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Maps a file extension to a media type, case-insensitively.
    fn detect_type(&self, path: &Path) -> String {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => "application/json".to_string(),
            Some("ini") => "application/textedit".to_string(),
            Some("yaml" | "yml") => "application/yaml".to_string(),
            _ => self.default_type.clone(),
        }
    }
}
