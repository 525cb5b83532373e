//! # jsonschema7
//!
//! A JSON Schema draft-07 validator. Schemas compile once into a tree of
//! keyword validators linked by absolute URIs, which keeps runtime costs
//! for schema parameters out of the validation path; instances are then
//! validated by walking that tree.
//!
//! Beyond the pass/fail answer, validation produces structured failure
//! records ([`ValidationOutput`]) and a JSON-Patch of default values
//! ([`Patch`]) for properties the instance left out.
//!
//! ## Example:
//!
//! ```rust
//! use jsonschema7::JsonSchema;
//! use serde_json::json;
//!
//! fn main() -> Result<(), jsonschema7::SchemaError> {
//!     let schema = json!({
//!         "type": "object",
//!         "properties": {"x": {"type": "integer", "default": 7}},
//!         "required": ["name"]
//!     });
//!     let compiled = JsonSchema::compile(&schema)?;
//!     let result = compiled.validate(&json!({}));
//!     for error in result.errors() {
//!         println!("Validation error: {}", error);
//!     }
//!     assert_eq!(
//!         result.patch().to_value(),
//!         json!([{"op": "add", "path": "/x", "value": 7}])
//!     );
//!     Ok(())
//! }
//! ```
#![warn(
    clippy::doc_markdown,
    clippy::redundant_closure,
    clippy::explicit_iter_loop,
    clippy::match_same_arms,
    clippy::needless_borrow,
    clippy::print_stdout,
    clippy::trivially_copy_pass_by_ref,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]
mod compiler;
mod content;
mod error;
mod format;
mod keywords;
mod options;
mod output;
mod paths;
mod primitive_type;
mod registry;
pub mod source;
pub mod unicode;
mod uri;

pub use compiler::{JsonSchema, ValidationResult};
pub use error::SchemaError;
pub use options::CompilationOptions;
pub use output::{CollectingReporter, ErrorReporter, Patch, PatchOperation, ValidationOutput};
pub use paths::{JsonPointer, PathChunk};
pub use uri::UriWrapper;

use serde_json::Value;

/// A shortcut for validating `instance` against `schema`.
/// ```rust
/// use jsonschema7::is_valid;
/// use serde_json::json;
///
/// let schema = json!({"maxLength": 5});
/// let instance = json!("foo");
/// assert!(is_valid(&schema, &instance));
/// ```
///
/// This function panics if an invalid schema is passed.
#[must_use]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    let compiled = JsonSchema::compile(schema).expect("Invalid schema");
    compiled.is_valid(instance)
}
