//! Media-type keyed codec registry with layered fallback.
//!
//! A [`RecordRegistry`] maps *normalized* media types to codec instances.
//! Lookups for a `(type, role)` pair resolve in a fixed order:
//!
//! 1. Normalize the type; a malformed type fails before any lookup.
//! 2. Return the exact role match from the local table, if any. Handler
//!    registrations backfill the parser/builder tables, so a handler
//!    satisfies single-role lookups through the same step.
//! 3. Delegate to the fallback registry, if one is configured.
//! 4. Fail with [`Error::NotSupported`], naming the missing role and type.
//!
//! Handler lookups additionally pair an independent parser and builder
//! when both roles resolve but no combined handler is bound.
//!
//! The registration table is ordinary mutable state behind `&mut self`;
//! callers sharing a registry across threads wrap it themselves.
//!
//! # Examples
//!
//! ```rust
//! use record_codec::registry::RecordRegistry;
//!
//! let registry = RecordRegistry::builtin();
//! assert!(registry.has_handler("application/json"));
//! // INI is parse-only by design.
//! assert!(registry.has_parser("application/textedit"));
//! assert!(!registry.has_builder("application/textedit"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::{
    IniParser, JsonHandler, PairHandler, PhpHandler, RecordBuilder, RecordHandler, RecordParser,
};
use crate::error::{CodecRole, Error, Result};
use crate::normalize;

/// Media types served by the builtin JSON handler.
const JSON_TYPES: [&str; 3] = ["application/json", "text/json", "text/x-json"];

/// Media types served by the builtin INI parser. No builder exists for
/// these types; the absence is intentional, not a gap.
const INI_TYPES: [&str; 2] = ["application/textedit", "zz-application/zz-winassoc-ini"];

/// Media type served by the builtin PHP-serialize handler.
const PHP_TYPE: &str = "application/vnd.php.serialized";

/// A registry resolving media types to parsers, builders and handlers.
#[derive(Default)]
pub struct RecordRegistry {
    parsers: HashMap<String, Arc<dyn RecordParser>>,
    builders: HashMap<String, Arc<dyn RecordBuilder>>,
    handlers: HashMap<String, Arc<dyn RecordHandler>>,
    fallback: Option<Arc<RecordRegistry>>,
}

impl RecordRegistry {
    /// Creates an empty registry with no fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that delegates missed lookups to
    /// `fallback`.
    #[must_use]
    pub fn with_fallback(fallback: Arc<RecordRegistry>) -> Self {
        RecordRegistry {
            fallback: Some(fallback),
            ..Self::default()
        }
    }

    /// Creates a registry with the builtin codecs pre-registered:
    /// JSON and PHP-serialize handlers plus the parse-only INI codec.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        let json = Arc::new(JsonHandler);
        for media_type in JSON_TYPES {
            registry.register_handler(media_type.to_string(), json.clone());
        }

        registry.register_handler(PHP_TYPE.to_string(), Arc::new(PhpHandler));

        let ini: Arc<dyn RecordParser> = Arc::new(IniParser);
        for media_type in INI_TYPES {
            registry.parsers.insert(media_type.to_string(), ini.clone());
        }

        registry
    }

    /// Configures the fallback registry consulted after local misses.
    pub fn set_fallback(&mut self, fallback: Arc<RecordRegistry>) {
        self.fallback = Some(fallback);
    }

    /// Returns the parser registered for the media type.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidType`] for a malformed type, or
    /// [`Error::NotSupported`] when neither this registry nor its
    /// fallback chain has a parser (or handler) for the type.
    pub fn get_parser(&self, media_type: &str) -> Result<Arc<dyn RecordParser>> {
        let normalized = normalize::normalize_type(media_type)?;
        self.lookup_parser(&normalized)
            .ok_or_else(|| Error::NotSupported {
                role: CodecRole::Parser,
                media_type: normalized,
            })
    }

    /// Returns the builder registered for the media type.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidType`] or [`Error::NotSupported`], as with
    /// [`RecordRegistry::get_parser`].
    pub fn get_builder(&self, media_type: &str) -> Result<Arc<dyn RecordBuilder>> {
        let normalized = normalize::normalize_type(media_type)?;
        self.lookup_builder(&normalized)
            .ok_or_else(|| Error::NotSupported {
                role: CodecRole::Builder,
                media_type: normalized,
            })
    }

    /// Returns the handler for the media type.
    ///
    /// If no combined handler is bound anywhere in the chain, a handler
    /// is synthesized from the type's parser and builder, provided both
    /// resolve.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidType`] for a malformed type, or
    /// [`Error::NotSupported`] naming whichever role is missing.
    pub fn get_handler(&self, media_type: &str) -> Result<Arc<dyn RecordHandler>> {
        let normalized = normalize::normalize_type(media_type)?;

        if let Some(handler) = self.lookup_handler(&normalized) {
            return Ok(handler);
        }

        let parser = self.get_parser(&normalized)?;
        let builder = self.get_builder(&normalized)?;
        Ok(Arc::new(PairHandler::new(parser, builder)))
    }

    /// Returns `true` if [`RecordRegistry::get_parser`] would succeed.
    /// Malformed types yield `false`.
    #[must_use]
    pub fn has_parser(&self, media_type: &str) -> bool {
        match normalize::normalize_type(media_type) {
            Ok(normalized) => self.lookup_parser(&normalized).is_some(),
            Err(_) => false,
        }
    }

    /// Returns `true` if [`RecordRegistry::get_builder`] would succeed.
    /// Malformed types yield `false`.
    #[must_use]
    pub fn has_builder(&self, media_type: &str) -> bool {
        match normalize::normalize_type(media_type) {
            Ok(normalized) => self.lookup_builder(&normalized).is_some(),
            Err(_) => false,
        }
    }

    /// Returns `true` if [`RecordRegistry::get_handler`] would succeed.
    /// Malformed types yield `false`.
    #[must_use]
    pub fn has_handler(&self, media_type: &str) -> bool {
        self.has_parser(media_type) && self.has_builder(media_type)
    }

    /// Registers a parser for the media type, replacing any previous
    /// parser binding (including one backfilled from a handler).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidType`] for a malformed type.
    pub fn set_parser<P>(&mut self, media_type: &str, parser: P) -> Result<()>
    where
        P: RecordParser + 'static,
    {
        let normalized = normalize::normalize_type(media_type)?;
        self.parsers.insert(normalized, Arc::new(parser));
        Ok(())
    }

    /// Registers a builder for the media type, replacing any previous
    /// builder binding (including one backfilled from a handler).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidType`] for a malformed type.
    pub fn set_builder<B>(&mut self, media_type: &str, builder: B) -> Result<()>
    where
        B: RecordBuilder + 'static,
    {
        let normalized = normalize::normalize_type(media_type)?;
        self.builders.insert(normalized, Arc::new(builder));
        Ok(())
    }

    /// Registers a handler for the media type.
    ///
    /// The handler also backfills the parser and builder slots for the
    /// type, but only where no explicit single-role registration exists:
    /// explicit registrations always win and are never overwritten.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidType`] for a malformed type.
    pub fn set_handler<H>(&mut self, media_type: &str, handler: H) -> Result<()>
    where
        H: RecordHandler + 'static,
    {
        let normalized = normalize::normalize_type(media_type)?;
        self.register_handler(normalized, Arc::new(handler));
        Ok(())
    }

    /// Inserts an already-shared handler under a normalized type,
    /// applying the backfill rules.
    fn register_handler(&mut self, normalized: String, handler: Arc<dyn RecordHandler>) {
        if !self.parsers.contains_key(&normalized) {
            self.parsers
                .insert(normalized.clone(), Arc::new(handler.clone()));
        }
        if !self.builders.contains_key(&normalized) {
            self.builders
                .insert(normalized.clone(), Arc::new(handler.clone()));
        }
        self.handlers.insert(normalized, handler);
    }

    fn lookup_parser(&self, normalized: &str) -> Option<Arc<dyn RecordParser>> {
        if let Some(parser) = self.parsers.get(normalized) {
            return Some(parser.clone());
        }
        self.fallback
            .as_ref()
            .and_then(|base| base.lookup_parser(normalized))
    }

    fn lookup_builder(&self, normalized: &str) -> Option<Arc<dyn RecordBuilder>> {
        if let Some(builder) = self.builders.get(normalized) {
            return Some(builder.clone());
        }
        self.fallback
            .as_ref()
            .and_then(|base| base.lookup_builder(normalized))
    }

    fn lookup_handler(&self, normalized: &str) -> Option<Arc<dyn RecordHandler>> {
        if let Some(handler) = self.handlers.get(normalized) {
            return Some(handler.clone());
        }
        self.fallback
            .as_ref()
            .and_then(|base| base.lookup_handler(normalized))
    }
}
