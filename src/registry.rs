//! The URI → validator registry built during compilation.
//!
//! Subschemas are grouped per document (one [`SchemaFile`] per absolute
//! base URI) and keyed by their decoded fragment. Three maps cooperate to
//! make forward and cyclic `$ref` work without remote fetching:
//!
//! * `schemas` — every registered node, by fragment;
//! * `unresolved` — reference back-edges waiting for their target;
//! * `unprocessed_keywords` — raw subschemas found under unknown
//!   keywords, buildable on demand when a pointer lands inside them.
use crate::error::SchemaError;
use crate::keywords::ref_::ReferenceValidator;
use crate::keywords::SchemaHandle;
use crate::uri::UriWrapper;
use ahash::AHashMap;
use serde_json::Value;
use std::sync::Arc;

#[derive(Default)]
struct SchemaFile {
    schemas: AHashMap<String, SchemaHandle>,
    unresolved: AHashMap<String, Arc<ReferenceValidator>>,
    unprocessed_keywords: AHashMap<String, Value>,
}

#[derive(Default)]
pub(crate) struct Registry {
    files: AHashMap<String, SchemaFile>,
}

impl Registry {
    /// Register `handle` under `uri`, patching any reference waiting for
    /// it. Registering the same URI twice is a `$id` collision.
    pub(crate) fn insert(
        &mut self,
        uri: &UriWrapper,
        handle: &SchemaHandle,
    ) -> Result<(), SchemaError> {
        let file = self.files.entry(uri.base()).or_default();
        let fragment = uri.identifier().to_string();
        if file.schemas.contains_key(&fragment) {
            return Err(SchemaError::DuplicateIdentifier(uri.as_str().to_string()));
        }
        if let Some(reference) = file.unresolved.remove(&fragment) {
            reference.set_target(handle);
        }
        file.unprocessed_keywords.remove(&fragment);
        file.schemas.insert(fragment, handle.clone());
        Ok(())
    }

    pub(crate) fn get(&self, uri: &UriWrapper) -> Option<SchemaHandle> {
        self.files
            .get(&uri.base())?
            .schemas
            .get(uri.identifier())
            .cloned()
    }

    /// Record a back-edge for a target that does not exist yet. Repeated
    /// references to one URI share a single node.
    pub(crate) fn defer_reference(&mut self, uri: &UriWrapper) -> SchemaHandle {
        let file = self.files.entry(uri.base()).or_default();
        file.unresolved
            .entry(uri.identifier().to_string())
            .or_insert_with(|| ReferenceValidator::new(uri))
            .clone()
    }

    /// Remember the subschema found under an unknown keyword. Returns true
    /// when a reference is already waiting on exactly this URI.
    pub(crate) fn record_unknown_keyword(&mut self, uri: &UriWrapper, value: &Value) -> bool {
        let file = self.files.entry(uri.base()).or_default();
        file.unprocessed_keywords
            .insert(uri.identifier().to_string(), value.clone());
        file.unresolved.contains_key(uri.identifier())
    }

    /// Resolve a pointer into the recorded unknown-keyword subschemas:
    /// longest recorded prefix, remainder walked with `Value::pointer`.
    pub(crate) fn unprocessed_subschema(&self, uri: &UriWrapper) -> Option<Value> {
        let file = self.files.get(&uri.base())?;
        let fragment = uri.identifier();
        let mut best: Option<(&str, &Value)> = None;
        for (stored, value) in &file.unprocessed_keywords {
            let is_prefix = fragment == stored.as_str()
                || (fragment.starts_with(stored.as_str())
                    && fragment.as_bytes().get(stored.len()) == Some(&b'/'));
            if is_prefix && best.map_or(true, |(previous, _)| previous.len() < stored.len()) {
                best = Some((stored, value));
            }
        }
        let (stored, value) = best?;
        if fragment == stored {
            Some(value.clone())
        } else {
            value.pointer(&fragment[stored.len()..]).cloned()
        }
    }

    /// URIs of references still waiting for a target.
    pub(crate) fn pending_references(&self) -> Vec<String> {
        self.files
            .values()
            .flat_map(|file| file.unresolved.values())
            .filter(|reference| !reference.is_resolved())
            .map(|reference| reference.uri().to_string())
            .collect()
    }
}
