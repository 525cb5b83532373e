//! Validator for the `anyOf` keyword.
use super::all_of::compile_subschemas;
use super::{keyword_location, SchemaHandle, Validate};
use crate::compiler::Compiler;
use crate::error::SchemaError;
use crate::output::{CollectingReporter, ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::Value;
use std::sync::Arc;

pub(crate) struct AnyOfValidator {
    location: String,
    subschemas: Vec<SchemaHandle>,
}

impl AnyOfValidator {
    pub(crate) fn compile(
        compiler: &mut Compiler<'_>,
        schema: &Value,
        uris: &[UriWrapper],
    ) -> Result<SchemaHandle, SchemaError> {
        Ok(Arc::new(AnyOfValidator {
            location: keyword_location(uris),
            subschemas: compile_subschemas(compiler, schema, "anyOf", uris)?,
        }))
    }
}

impl Validate for AnyOfValidator {
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
        // Short-circuits at the first fully-passing subschema.
        let mut local_reporter = CollectingReporter::new();
        for subschema in &self.subschemas {
            let mark = local_reporter.len();
            subschema.validate(instance, location, &mut local_reporter, patch);
            if local_reporter.len() == mark {
                return;
            }
        }
        reporter.report(ValidationOutput::with_nested(
            location,
            "No subschema matched, but one of them is required to match",
            "anyOf",
            &self.location,
            local_reporter.into_errors(),
        ));
    }
}
