//! Validator for the `oneOf` keyword.
use super::all_of::compile_subschemas;
use super::{keyword_location, SchemaHandle, Validate};
use crate::compiler::Compiler;
use crate::error::SchemaError;
use crate::output::{CollectingReporter, ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::Value;
use std::sync::Arc;

pub(crate) struct OneOfValidator {
    location: String,
    subschemas: Vec<SchemaHandle>,
}

impl OneOfValidator {
    pub(crate) fn compile(
        compiler: &mut Compiler<'_>,
        schema: &Value,
        uris: &[UriWrapper],
    ) -> Result<SchemaHandle, SchemaError> {
        Ok(Arc::new(OneOfValidator {
            location: keyword_location(uris),
            subschemas: compile_subschemas(compiler, schema, "oneOf", uris)?,
        }))
    }
}

impl Validate for OneOfValidator {
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
        let mut count = 0;
        let mut local_reporter = CollectingReporter::new();
        for subschema in &self.subschemas {
            let mark = local_reporter.len();
            subschema.validate(instance, location, &mut local_reporter, patch);
            if local_reporter.len() == mark {
                count += 1;
            }
            // A second match is already a failure; no need to keep looking.
            if count > 1 {
                reporter.report(ValidationOutput::new(
                    location,
                    format!(
                        "{} subschemas matched, but exactly one is required to match",
                        count
                    ),
                    "oneOf",
                    &self.location,
                ));
                return;
            }
        }
        if count == 0 {
            reporter.report(ValidationOutput::with_nested(
                location,
                "No subschema matched, but one of them is required to match",
                "oneOf",
                &self.location,
                local_reporter.into_errors(),
            ));
        }
    }
}
