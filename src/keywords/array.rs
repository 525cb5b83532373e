//! Validator for array instances.
use super::{keyword_location, SchemaHandle, Validate};
use crate::compiler::Compiler;
use crate::error::SchemaError;
use crate::output::{CollectingReporter, ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::{Map, Value};
use std::sync::Arc;

pub(crate) struct ArrayValidator {
    location: String,
    max_items: Option<usize>,
    min_items: Option<usize>,
    unique_items: bool,
    // `items` is either one schema for every element or a positional list.
    items_schema: Option<SchemaHandle>,
    items_list: Vec<SchemaHandle>,
    additional_items: Option<SchemaHandle>,
    contains: Option<SchemaHandle>,
}

impl ArrayValidator {
    pub(crate) fn compile(
        compiler: &mut Compiler<'_>,
        schema: &Map<String, Value>,
        uris: &[UriWrapper],
    ) -> Result<Arc<ArrayValidator>, SchemaError> {
        let mut validator = ArrayValidator {
            location: keyword_location(uris),
            max_items: None,
            min_items: None,
            unique_items: false,
            items_schema: None,
            items_list: Vec::new(),
            additional_items: None,
            contains: None,
        };

        if let Some(value) = schema.get("maxItems") {
            validator.max_items = Some(count_limit(value, "maxItems")?);
        }
        if let Some(value) = schema.get("minItems") {
            validator.min_items = Some(count_limit(value, "minItems")?);
        }
        if let Some(value) = schema.get("uniqueItems") {
            validator.unique_items = value.as_bool().unwrap_or(false);
        }

        match schema.get("items") {
            Some(Value::Array(items)) => {
                for (index, subschema) in items.iter().enumerate() {
                    let index = itoa::Buffer::new().format(index).to_string();
                    validator
                        .items_list
                        .push(compiler.build(subschema, &["items", &index], uris)?);
                }
                // Only meaningful next to a positional list.
                if let Some(additional) = schema.get("additionalItems") {
                    validator.additional_items =
                        Some(compiler.build(additional, &["additionalItems"], uris)?);
                }
            }
            Some(items @ (Value::Object(_) | Value::Bool(_))) => {
                validator.items_schema = Some(compiler.build(items, &["items"], uris)?);
            }
            Some(_) => {
                return Err(SchemaError::Schema(
                    "\"items\" must be a schema or an array of schemas".to_string(),
                ))
            }
            None => {}
        }

        if let Some(value) = schema.get("contains") {
            validator.contains = Some(compiler.build(value, &["contains"], uris)?);
        }

        Ok(Arc::new(validator))
    }
}

fn count_limit(value: &Value, keyword: &str) -> Result<usize, SchemaError> {
    value
        .as_u64()
        .map(|limit| limit as usize)
        .ok_or_else(|| SchemaError::Schema(format!("\"{}\" must be a non-negative integer", keyword)))
}

impl Validate for ArrayValidator {
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
        let Value::Array(items) = instance else {
            return;
        };

        if let Some(max_items) = self.max_items {
            if items.len() > max_items {
                reporter.report(ValidationOutput::new(
                    location,
                    format!(
                        "Expected maximum item count: {}, found: {}",
                        max_items,
                        items.len()
                    ),
                    "maxItems",
                    &self.location,
                ));
            }
        }

        if let Some(min_items) = self.min_items {
            if items.len() < min_items {
                reporter.report(ValidationOutput::new(
                    location,
                    format!("Expected at least {} items but found {}", min_items, items.len()),
                    "minItems",
                    &self.location,
                ));
            }
        }

        if self.unique_items {
            // One error for the first duplicate is enough.
            'outer: for (index, item) in items.iter().enumerate() {
                for other in &items[index + 1..] {
                    if item == other {
                        reporter.report(ValidationOutput::new(
                            location,
                            "Array items are not unique",
                            "uniqueItems",
                            &self.location,
                        ));
                        break 'outer;
                    }
                }
            }
        }

        if let Some(items_schema) = &self.items_schema {
            for (index, item) in items.iter().enumerate() {
                items_schema.validate(item, &location.clone_with(index), reporter, patch);
            }
        } else {
            let mut positional = self.items_list.iter();
            for (index, item) in items.iter().enumerate() {
                let item_validator = match positional.next() {
                    Some(validator) => validator,
                    None => match &self.additional_items {
                        Some(validator) => validator,
                        None => break,
                    },
                };
                item_validator.validate(item, &location.clone_with(index), reporter, patch);
            }
        }

        if let Some(contains) = &self.contains {
            let mut contained = false;
            let mut local_reporter = CollectingReporter::new();
            for item in items {
                let mark = local_reporter.len();
                contains.validate(item, location, &mut local_reporter, patch);
                if local_reporter.len() == mark {
                    contained = true;
                    break;
                }
            }
            if !contained {
                reporter.report(ValidationOutput::with_nested(
                    location,
                    "Expected at least one array item to match \"contains\" schema",
                    "contains",
                    &self.location,
                    local_reporter.into_errors(),
                ));
            }
        }
    }
}
