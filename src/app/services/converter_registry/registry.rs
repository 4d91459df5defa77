//! Memoizing converter registry
//!
//! Converters are looked up by the kind's tag. The first resolution of a kind
//! is cached behind a read-write lock; later lookups only take the read lock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use super::converters::{Converter, PrimitiveConverter};
use crate::app::models::{FieldDescriptor, FieldKind, Value};
use crate::{Error, Result};

/// Registry of converters keyed by field kind
#[derive(Debug, Default)]
pub struct ConverterRegistry {
    /// Resolved converters, filled lazily
    cache: RwLock<HashMap<FieldKind, Arc<dyn Converter>>>,

    /// Converters registered for custom kinds, keyed by tag
    custom: RwLock<HashMap<String, Arc<dyn Converter>>>,
}

impl ConverterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry ready to be shared between engines
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a converter for a custom kind tag
    ///
    /// Any cached resolution for that tag is dropped so the new converter wins.
    pub fn register(&self, tag: impl Into<String>, converter: Arc<dyn Converter>) {
        let tag = tag.into();
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&FieldKind::Custom(tag.clone()));
        debug!("Registered converter for custom kind '{}'", tag);
        self.custom
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tag, converter);
    }

    /// Resolve the converter for a kind, memoizing the result
    pub fn resolve(&self, kind: &FieldKind) -> Option<Arc<dyn Converter>> {
        if let Some(converter) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind)
        {
            return Some(Arc::clone(converter));
        }

        let resolved: Arc<dyn Converter> = match kind {
            FieldKind::Custom(tag) => Arc::clone(
                self.custom
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(tag)?,
            ),
            builtin => Arc::new(PrimitiveConverter::new(builtin.clone())?),
        };

        // Another session may have raced us here; keep whichever landed first
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let cached = cache
            .entry(kind.clone())
            .or_insert_with(|| Arc::clone(&resolved));
        debug!("Cached converter for kind {}", kind);
        Some(Arc::clone(cached))
    }

    /// Converter for a descriptor: its own override first, then the registry
    pub fn converter_for(&self, descriptor: &FieldDescriptor) -> Result<Arc<dyn Converter>> {
        if let Some(converter) = descriptor.converter() {
            return Ok(Arc::clone(converter));
        }
        self.resolve(descriptor.kind()).ok_or_else(|| {
            Error::unsupported_field_type(descriptor.field(), descriptor.kind().clone())
        })
    }

    /// Parse text as the given kind
    pub fn convert(&self, text: &str, kind: &FieldKind) -> Result<Value> {
        self.resolve(kind)
            .ok_or_else(|| Error::unsupported_field_type(kind.tag(), kind.clone()))?
            .convert(text)
    }

    /// Format a value as the given kind
    pub fn format(&self, value: &Value, kind: &FieldKind) -> Result<String> {
        self.resolve(kind)
            .ok_or_else(|| Error::unsupported_field_type(kind.tag(), kind.clone()))?
            .format(value)
    }

    /// Number of kinds resolved so far
    pub fn cached_kinds(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
