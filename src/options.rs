//! Compilation configuration.
use crate::compiler::{Compiler, JsonSchema, DEFAULT_ROOT_URL};
use crate::error::SchemaError;
use crate::uri::UriWrapper;
use ahash::AHashMap;
use serde_json::Value;
use std::fmt;

/// Full configuration to guide schema compilation.
///
/// ```
/// use jsonschema7::CompilationOptions;
/// use serde_json::json;
///
/// fn is_even(value: &str) -> bool {
///     value.parse::<u64>().map_or(false, |n| n % 2 == 0)
/// }
///
/// let schema = CompilationOptions::new()
///     .with_format("even-number", is_even)
///     .compile(&json!({"type": "string", "format": "even-number"}))
///     .unwrap();
/// assert!(schema.is_valid(&json!("12")));
/// assert!(!schema.is_valid(&json!("13")));
/// ```
#[derive(Clone, Default)]
pub struct CompilationOptions {
    root_uri: Option<String>,
    formats: AHashMap<String, fn(&str) -> bool>,
}

impl CompilationOptions {
    #[must_use]
    pub fn new() -> CompilationOptions {
        CompilationOptions::default()
    }

    /// Override the base URI assigned to schemas without an `$id`.
    pub fn with_root_uri(&mut self, uri: impl Into<String>) -> &mut Self {
        self.root_uri = Some(uri.into());
        self
    }

    /// Register a custom `format` checker; it shadows the built-in one of
    /// the same name.
    pub fn with_format(&mut self, name: impl Into<String>, check: fn(&str) -> bool) -> &mut Self {
        self.formats.insert(name.into(), check);
        self
    }

    /// Compile `schema` using the current options.
    pub fn compile(&self, schema: &Value) -> Result<JsonSchema, SchemaError> {
        let root_uri = UriWrapper::parse(self.root_uri.as_deref().unwrap_or(DEFAULT_ROOT_URL))?;
        let mut compiler = Compiler::new(self);
        let root = compiler.build(schema, &[], &[root_uri])?;
        compiler.finish(root)
    }

    pub(crate) fn custom_format(&self, name: &str) -> Option<fn(&str) -> bool> {
        self.formats.get(name).copied()
    }
}

impl fmt::Debug for CompilationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilationOptions")
            .field("root_uri", &self.root_uri)
            .field("formats", &self.formats.keys().collect::<Vec<_>>())
            .finish()
    }
}
