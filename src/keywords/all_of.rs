//! Validator for the `allOf` keyword.
use super::{keyword_location, SchemaHandle, Validate};
use crate::compiler::Compiler;
use crate::error::SchemaError;
use crate::output::{CollectingReporter, ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::Value;
use std::sync::Arc;

pub(crate) struct AllOfValidator {
    location: String,
    subschemas: Vec<SchemaHandle>,
}

impl AllOfValidator {
    pub(crate) fn compile(
        compiler: &mut Compiler<'_>,
        schema: &Value,
        uris: &[UriWrapper],
    ) -> Result<SchemaHandle, SchemaError> {
        Ok(Arc::new(AllOfValidator {
            location: keyword_location(uris),
            subschemas: compile_subschemas(compiler, schema, "allOf", uris)?,
        }))
    }
}

impl Validate for AllOfValidator {
    fn absolute_keyword_location(&self) -> &str {
        &self.location
    }

    fn validate(
        &self,
        instance: &Value,
        location: &JsonPointer,
        reporter: &mut dyn ErrorReporter,
        patch: &mut Patch,
    ) {
        let mut local_reporter = CollectingReporter::new();
        for subschema in &self.subschemas {
            subschema.validate(instance, location, &mut local_reporter, patch);
            if !local_reporter.is_empty() {
                reporter.report(ValidationOutput::with_nested(
                    location,
                    "At least one subschema failed to match, but all are required to match",
                    "allOf",
                    &self.location,
                    local_reporter.into_errors(),
                ));
                return;
            }
        }
    }
}

/// Shared by the three quorum keywords: every array member becomes a
/// subschema built under `<keyword>/<index>`.
pub(crate) fn compile_subschemas(
    compiler: &mut Compiler<'_>,
    schema: &Value,
    keyword: &str,
    uris: &[UriWrapper],
) -> Result<Vec<SchemaHandle>, SchemaError> {
    let Value::Array(items) = schema else {
        return Err(SchemaError::Schema(format!(
            "\"{}\" must be an array of schemas",
            keyword
        )));
    };
    let mut subschemas = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let index = itoa::Buffer::new().format(index).to_string();
        subschemas.push(compiler.build(item, &[keyword, &index], uris)?);
    }
    Ok(subschemas)
}
