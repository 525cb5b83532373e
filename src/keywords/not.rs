//! Validator for the `not` keyword.
use super::{keyword_location, SchemaHandle, Validate};
use crate::compiler::Compiler;
use crate::error::SchemaError;
use crate::output::{CollectingReporter, ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::Value;
use std::sync::Arc;

pub(crate) struct NotValidator {
    location: String,
    rule: SchemaHandle,
}

impl NotValidator {
    pub(crate) fn compile(
        compiler: &mut Compiler<'_>,
        schema: &Value,
        uris: &[UriWrapper],
    ) -> Result<SchemaHandle, SchemaError> {
        Ok(Arc::new(NotValidator {
            location: keyword_location(uris),
            rule: compiler.build(schema, &["not"], uris)?,
        }))
    }
}

impl Validate for NotValidator {
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
        self.rule.validate(instance, location, &mut local_reporter, patch);

        if local_reporter.is_empty() {
            reporter.report(ValidationOutput::new(
                location,
                "Instance must not be valid against schema",
                "not",
                &self.location,
            ));
        }
    }

    fn default_value(
        &self,
        location: &JsonPointer,
        instance: &Value,
        reporter: &mut dyn ErrorReporter,
    ) -> Option<Value> {
        self.rule.default_value(location, instance, reporter)
    }
}
