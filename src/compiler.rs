//! Schema compilation.
//!
//! A schema document compiles once into a tree of keyword validators
//! linked by absolute URIs; instances are then validated by walking that
//! tree, which keeps all keyword parameters pre-parsed and all regular
//! expressions pre-compiled.
use crate::error::SchemaError;
use crate::keywords::boolean::{FalseValidator, TrueValidator};
use crate::keywords::type_::TypeValidator;
use crate::keywords::{SchemaHandle, Validate};
use crate::options::CompilationOptions;
use crate::output::{CollectingReporter, ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::primitive_type::InstanceKind;
use crate::registry::Registry;
use crate::uri::UriWrapper;
use ahash::AHashSet;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Arc;

/// Base for schemas that do not declare their own `$id`.
pub(crate) const DEFAULT_ROOT_URL: &str = "json-schema:///";

/// Keywords the builder understands; anything else is recorded so `$ref`s
/// into its subtree can still be resolved.
static KNOWN_KEYWORDS: Lazy<AHashSet<&'static str>> = Lazy::new(|| {
    [
        "$comment",
        "$id",
        "$ref",
        "$schema",
        "additionalItems",
        "additionalProperties",
        "allOf",
        "anyOf",
        "const",
        "contains",
        "contentEncoding",
        "contentMediaType",
        "default",
        "definitions",
        "dependencies",
        "description",
        "else",
        "enum",
        "examples",
        "exclusiveMaximum",
        "exclusiveMinimum",
        "format",
        "if",
        "items",
        "maxItems",
        "maxLength",
        "maxProperties",
        "maximum",
        "minItems",
        "minLength",
        "minProperties",
        "minimum",
        "multipleOf",
        "not",
        "oneOf",
        "pattern",
        "patternProperties",
        "properties",
        "propertyNames",
        "readOnly",
        "required",
        "then",
        "title",
        "type",
        "uniqueItems",
        "writeOnly",
    ]
    .into_iter()
    .collect()
});

/// Walks a schema document and produces registered validator nodes.
pub(crate) struct Compiler<'a> {
    options: &'a CompilationOptions,
    registry: Registry,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(options: &'a CompilationOptions) -> Compiler<'a> {
        Compiler {
            options,
            registry: Registry::default(),
        }
    }

    pub(crate) fn options(&self) -> &CompilationOptions {
        self.options
    }

    /// Build one subschema reached through `keys` from schemas located at
    /// `uris`, and register it under every URI it is addressable by.
    pub(crate) fn build(
        &mut self,
        schema: &Value,
        keys: &[&str],
        uris: &[UriWrapper],
    ) -> Result<SchemaHandle, SchemaError> {
        let new_uris = self.update_uris(schema, keys, uris)?;
        let handle: SchemaHandle = match schema {
            Value::Bool(true) => Arc::new(TrueValidator::new(&new_uris)),
            Value::Bool(false) => Arc::new(FalseValidator::new(&new_uris)),
            Value::Object(object) => {
                // Definitions build first so backward references resolve
                // on the spot.
                if let Some(Value::Object(definitions)) = object.get("definitions") {
                    for (name, subschema) in definitions {
                        self.build(subschema, &["definitions", name], &new_uris)?;
                    }
                }
                if let Some(reference) = object.get("$ref") {
                    let Some(reference) = reference.as_str() else {
                        return Err(SchemaError::Schema("\"$ref\" must be a string".to_string()));
                    };
                    let base = new_uris
                        .last()
                        .ok_or_else(|| SchemaError::Schema("schema has no location".to_string()))?;
                    let target = UriWrapper::resolve(base, reference)?;
                    self.reference(&target)?
                } else {
                    let handle = TypeValidator::compile(self, object, &new_uris)?;
                    for (key, value) in object {
                        if !KNOWN_KEYWORDS.contains(key.as_str()) {
                            self.record_unknown_keyword(key, value, &new_uris)?;
                        }
                    }
                    handle
                }
            }
            _ => {
                return Err(SchemaError::Schema(format!(
                    "expected a schema object or boolean, found {}",
                    InstanceKind::of(schema)
                )))
            }
        };
        for uri in &new_uris {
            self.registry.insert(uri, &handle)?;
        }
        Ok(handle)
    }

    /// Compute the URI list for a subschema: drop plain-name entries,
    /// append the path steps, and let an `$id` push a fresh base.
    fn update_uris(
        &self,
        schema: &Value,
        keys: &[&str],
        uris: &[UriWrapper],
    ) -> Result<Vec<UriWrapper>, SchemaError> {
        let mut new_uris: Vec<UriWrapper> = uris
            .iter()
            .filter(|uri| !uri.has_identifier())
            .cloned()
            .collect();
        for key in keys {
            for uri in &mut new_uris {
                *uri = uri.append(key);
            }
        }
        if let Value::Object(object) = schema {
            if let Some(id) = object.get("$id") {
                let Some(id) = id.as_str() else {
                    return Err(SchemaError::Schema("\"$id\" must be a string".to_string()));
                };
                let base = new_uris
                    .last()
                    .or_else(|| uris.last())
                    .ok_or_else(|| SchemaError::Schema("schema has no location".to_string()))?;
                new_uris.push(UriWrapper::resolve(base, id)?);
            }
        }
        Ok(new_uris)
    }

    /// `$ref` resolution: an existing node wins, a pointer into recorded
    /// unknown keywords builds on demand, anything else becomes a
    /// back-edge patched later.
    fn reference(&mut self, uri: &UriWrapper) -> Result<SchemaHandle, SchemaError> {
        if let Some(existing) = self.registry.get(uri) {
            return Ok(existing);
        }
        if uri.has_pointer() {
            if let Some(subschema) = self.registry.unprocessed_subschema(uri) {
                return self.build(&subschema, &[], &[uri.clone()]);
            }
        }
        Ok(self.registry.defer_reference(uri))
    }

    fn record_unknown_keyword(
        &mut self,
        key: &str,
        value: &Value,
        uris: &[UriWrapper],
    ) -> Result<(), SchemaError> {
        let Some(last) = uris.last() else {
            return Ok(());
        };
        let uri = last.append(key);
        if uri.has_identifier() {
            return Ok(());
        }
        let pending = self.registry.record_unknown_keyword(&uri, value);
        if pending && matches!(value, Value::Object(_) | Value::Bool(_)) {
            self.build(value, &[], &[uri])?;
        }
        Ok(())
    }

    /// Resolve what is still pending, then freeze. References that point
    /// into unknown-keyword subschemas build here; anything left after
    /// that fails the compilation.
    pub(crate) fn finish(mut self, root: SchemaHandle) -> Result<JsonSchema, SchemaError> {
        loop {
            let mut progressed = false;
            for pending in self.registry.pending_references() {
                let uri = UriWrapper::parse(&pending)?;
                if self.registry.get(&uri).is_some() {
                    continue;
                }
                if let Some(subschema) = self.registry.unprocessed_subschema(&uri) {
                    self.build(&subschema, &[], &[uri])?;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }
        if let Some(uri) = self.registry.pending_references().into_iter().next() {
            return Err(SchemaError::UnresolvedReference(uri));
        }
        Ok(JsonSchema {
            root,
            registry: self.registry,
        })
    }
}

/// A compiled schema, ready to validate any number of instances.
///
/// The validator graph is immutable, so concurrent `validate` calls are
/// fine as long as each supplies its own reporter and patch.
pub struct JsonSchema {
    root: SchemaHandle,
    // Owns every node, including the strong ends of `$ref` back-edges;
    // dropping it releases cyclic graphs.
    registry: Registry,
}

impl JsonSchema {
    /// Compile `schema` with default options.
    ///
    /// ```
    /// use jsonschema7::JsonSchema;
    /// use serde_json::json;
    ///
    /// let schema = JsonSchema::compile(&json!({"maxLength": 5})).unwrap();
    /// assert!(schema.is_valid(&json!("foo")));
    /// ```
    pub fn compile(schema: &Value) -> Result<JsonSchema, SchemaError> {
        CompilationOptions::default().compile(schema)
    }

    /// Validate `instance`, collecting every failure and the defaults
    /// patch.
    #[must_use]
    pub fn validate(&self, instance: &Value) -> ValidationResult {
        let mut reporter = CollectingReporter::new();
        let mut patch = Patch::new();
        self.apply(instance, &mut reporter, &mut patch);
        ValidationResult {
            errors: reporter.into_errors(),
            patch,
        }
    }

    /// Validate `instance` through a caller-supplied reporter; the
    /// validator does not care which variant it is.
    pub fn apply(&self, instance: &Value, reporter: &mut dyn ErrorReporter, patch: &mut Patch) {
        self.root
            .validate(instance, &JsonPointer::default(), reporter, patch);
    }

    /// Whether `instance` conforms; failures are discarded.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_valid()
    }

    /// Validate starting from any URI registered during compilation, e.g.
    /// a `definitions` entry or an `$id`-carrying subschema.
    pub fn validate_at(
        &self,
        schema_uri: &str,
        instance: &Value,
    ) -> Result<ValidationResult, SchemaError> {
        let uri = UriWrapper::parse(schema_uri)?;
        let Some(handle) = self.registry.get(&uri) else {
            return Err(SchemaError::UnresolvedReference(schema_uri.to_string()));
        };
        let mut reporter = CollectingReporter::new();
        let mut patch = Patch::new();
        handle.validate(instance, &JsonPointer::default(), &mut reporter, &mut patch);
        Ok(ValidationResult {
            errors: reporter.into_errors(),
            patch,
        })
    }
}

impl std::fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchema")
            .field("root", &self.root.absolute_keyword_location())
            .finish()
    }
}

/// Everything one `validate` call produced.
#[derive(Debug)]
pub struct ValidationResult {
    errors: Vec<ValidationOutput>,
    patch: Patch,
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationOutput] {
        &self.errors
    }

    /// Defaults discovered during validation; produced even when there
    /// are errors.
    #[must_use]
    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<ValidationOutput>, Patch) {
        (self.errors, self.patch)
    }
}
