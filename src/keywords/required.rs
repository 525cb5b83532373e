//! Validator for the `required` keyword.
use super::Validate;
use crate::error::SchemaError;
use crate::output::{ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::Value;

pub(crate) struct RequiredValidator {
    location: String,
    required: Vec<String>,
}

impl RequiredValidator {
    pub(crate) fn compile(schema: &Value, uri: &UriWrapper) -> Result<RequiredValidator, SchemaError> {
        let Value::Array(items) = schema else {
            return Err(SchemaError::Schema(
                "\"required\" must be an array of strings".to_string(),
            ));
        };
        let mut required = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str() {
                Some(name) => required.push(name.to_string()),
                None => {
                    return Err(SchemaError::Schema(
                        "\"required\" must be an array of strings".to_string(),
                    ))
                }
            }
        }
        Ok(RequiredValidator {
            location: uri.as_str().to_string(),
            required,
        })
    }
}

impl Validate for RequiredValidator {
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
        if let Value::Object(object) = instance {
            for key in &self.required {
                if !object.contains_key(key) {
                    reporter.report(ValidationOutput::new(
                        location,
                        format!("Required property \"{}\" not found", key),
                        "required",
                        &self.location,
                    ));
                }
            }
        }
    }
}
