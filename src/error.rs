//! Error types for record validation, codec resolution and (de)serialization.
//!
//! Every failure the crate can produce belongs to the single [`Error`] family,
//! so callers may catch broadly. Each error carries a human-readable message
//! and maps onto a machine-checkable [`ErrorKind`]:
//!
//! - [`ErrorKind::InvalidArgument`]: the caller supplied bad data — a
//!   malformed key, an invalid media type, or source bytes the format engine
//!   rejected.
//! - [`ErrorKind::NotSupported`]: no codec is registered for the requested
//!   media type and role, after the full fallback chain.
//! - [`ErrorKind::Runtime`]: a format engine or user-supplied callback
//!   misbehaved, a codec produced data that fails the record invariants, or
//!   the filesystem failed. These signal a codec or environment fault rather
//!   than a caller error.
//!
//! No operation ever returns a partial result: validation, parsing and
//! building either fully succeed or fail with one of these errors.

use std::fmt;
use thiserror::Error;

/// The role a codec plays for a media type.
///
/// Used in [`Error::NotSupported`] and when wrapping callback failures, so
/// error messages name exactly what was missing or misbehaving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecRole {
    Parser,
    Builder,
    Handler,
}

impl fmt::Display for CodecRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecRole::Parser => f.write_str("parser"),
            CodecRole::Builder => f.write_str("builder"),
            CodecRole::Handler => f.write_str("handler"),
        }
    }
}

/// Coarse error taxonomy, independent of the concrete [`Error`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input supplied by the caller.
    InvalidArgument,
    /// No codec available for the requested media type and role.
    NotSupported,
    /// An engine, callback or codec misbehaved internally.
    Runtime,
}

/// All errors raised by record validation, registries and codecs.
#[derive(Debug, Error)]
pub enum Error {
    /// A record key violates the key invariants (empty, whitespace, or
    /// purely numeric). The path locates the enclosing item.
    #[error("invalid record key at /{path}: \"{key}\"")]
    InvalidKey { path: String, key: String },

    /// A media type does not match the `token/token` grammar.
    #[error("invalid media type: \"{0}\"")]
    InvalidType(String),

    /// A byte sequence could not be decoded by the named format engine.
    /// The detail carries the engine's own complaint.
    #[error("could not parse {format} record: {detail}")]
    Malformed {
        format: &'static str,
        detail: String,
    },

    /// No codec is registered for the media type in the requested role.
    #[error("could not provide \"{media_type}\" {role}")]
    NotSupported {
        role: CodecRole,
        media_type: String,
    },

    /// A format engine failed while serializing an already-normalized
    /// record. Should not happen for well-formed records.
    #[error("failed to build {format} record: {detail}")]
    BuildFailed {
        format: &'static str,
        detail: String,
    },

    /// A user-supplied codec callback raised a foreign error.
    #[error("record {role} callback failed: {source}")]
    CallbackFailed {
        role: CodecRole,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A codec produced a record that fails the record invariants. The
    /// wrapped error is the validation failure that would have been an
    /// [`Error::InvalidKey`] had the caller supplied the data.
    #[error("record codec produced an invalid record: {source}")]
    InvalidOutput {
        #[source]
        source: Box<Error>,
    },

    /// Filesystem failure in the record manager layer.
    #[error("record I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the coarse [`ErrorKind`] this error belongs to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use record_codec::{Error, ErrorKind};
    ///
    /// let err = Error::InvalidType("nonsense".into());
    /// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidKey { .. }
            | Error::InvalidType(_)
            | Error::Malformed { .. } => ErrorKind::InvalidArgument,
            Error::NotSupported { .. } => ErrorKind::NotSupported,
            Error::BuildFailed { .. }
            | Error::CallbackFailed { .. }
            | Error::InvalidOutput { .. }
            | Error::Io(_) => ErrorKind::Runtime,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
