//! Validator for the `const` keyword.
use super::{keyword_location, Validate};
use crate::output::{ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::Value;

pub(crate) struct ConstValidator {
    location: String,
    value: Value,
}

impl ConstValidator {
    pub(crate) fn compile(schema: &Value, uris: &[UriWrapper]) -> ConstValidator {
        ConstValidator {
            location: keyword_location(uris),
            value: schema.clone(),
        }
    }
}

impl Validate for ConstValidator {
    fn absolute_keyword_location(&self) -> &str {
        &self.location
    }

    fn validate(
        &self,
        instance: &Value,
        location: &JsonPointer,
        reporter: &mut dyn ErrorReporter,
        _: &mut Patch,
    ) {
        if &self.value != instance {
            reporter.report(ValidationOutput::new(
                location,
                "Instance is not const",
                "const",
                &self.location,
            ));
        }
    }
}
