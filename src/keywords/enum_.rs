//! Validator for the `enum` keyword.
use super::{keyword_location, Validate};
use crate::error::SchemaError;
use crate::output::{ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::Value;

pub(crate) struct EnumValidator {
    location: String,
    options: Vec<Value>,
}

impl EnumValidator {
    pub(crate) fn compile(schema: &Value, uris: &[UriWrapper]) -> Result<EnumValidator, SchemaError> {
        let Value::Array(options) = schema else {
            return Err(SchemaError::Schema("\"enum\" must be an array".to_string()));
        };
        Ok(EnumValidator {
            location: keyword_location(uris),
            options: options.clone(),
        })
    }
}

impl Validate for EnumValidator {
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
        if !self.options.iter().any(|option| option == instance) {
            reporter.report(ValidationOutput::new(
                location,
                format!("{} is not a valid enum value", instance),
                "enum",
                &self.location,
            ));
        }
    }
}
