//! Validator for object instances.
use super::required::RequiredValidator;
use super::{keyword_location, SchemaHandle, Validate};
use crate::compiler::Compiler;
use crate::error::SchemaError;
use crate::output::{CollectingReporter, ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use ahash::AHashMap;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::Arc;

pub(crate) struct ObjectValidator {
    location: String,
    max_properties: Option<usize>,
    min_properties: Option<usize>,
    required: Option<RequiredValidator>,
    // Declared order drives the defaults patch; the index serves lookups.
    properties: Vec<(String, SchemaHandle)>,
    property_index: AHashMap<String, usize>,
    pattern_properties: Vec<(Regex, SchemaHandle)>,
    additional_properties: Option<SchemaHandle>,
    dependencies: Vec<(String, SchemaHandle)>,
    property_names: Option<SchemaHandle>,
}

impl ObjectValidator {
    pub(crate) fn compile(
        compiler: &mut Compiler<'_>,
        schema: &Map<String, Value>,
        uris: &[UriWrapper],
    ) -> Result<Arc<ObjectValidator>, SchemaError> {
        let mut validator = ObjectValidator {
            location: keyword_location(uris),
            max_properties: None,
            min_properties: None,
            required: None,
            properties: Vec::new(),
            property_index: AHashMap::new(),
            pattern_properties: Vec::new(),
            additional_properties: None,
            dependencies: Vec::new(),
            property_names: None,
        };

        if let Some(value) = schema.get("maxProperties") {
            validator.max_properties = Some(count_limit(value, "maxProperties")?);
        }
        if let Some(value) = schema.get("minProperties") {
            validator.min_properties = Some(count_limit(value, "minProperties")?);
        }
        if let Some(value) = schema.get("required") {
            let uri = uris
                .last()
                .map(|uri| uri.append("required"))
                .ok_or_else(|| SchemaError::Schema("schema has no location".to_string()))?;
            validator.required = Some(RequiredValidator::compile(value, &uri)?);
        }

        if let Some(value) = schema.get("properties") {
            let Value::Object(properties) = value else {
                return Err(SchemaError::Schema("\"properties\" must be an object".to_string()));
            };
            for (name, subschema) in properties {
                let handle = compiler.build(subschema, &["properties", name], uris)?;
                validator
                    .property_index
                    .insert(name.clone(), validator.properties.len());
                validator.properties.push((name.clone(), handle));
            }
        }

        if let Some(value) = schema.get("patternProperties") {
            let Value::Object(patterns) = value else {
                return Err(SchemaError::Schema(
                    "\"patternProperties\" must be an object".to_string(),
                ));
            };
            for (pattern, subschema) in patterns {
                validator.pattern_properties.push((
                    Regex::new(pattern)?,
                    compiler.build(subschema, &["patternProperties", pattern], uris)?,
                ));
            }
        }

        if let Some(value) = schema.get("additionalProperties") {
            validator.additional_properties =
                Some(compiler.build(value, &["additionalProperties"], uris)?);
        }

        if let Some(value) = schema.get("dependencies") {
            let Value::Object(dependencies) = value else {
                return Err(SchemaError::Schema("\"dependencies\" must be an object".to_string()));
            };
            for (name, dependency) in dependencies {
                let handle: SchemaHandle = match dependency {
                    // An array names further required properties.
                    Value::Array(_) => {
                        let uri = uris
                            .last()
                            .map(|uri| uri.append("dependencies").append(name))
                            .ok_or_else(|| {
                                SchemaError::Schema("schema has no location".to_string())
                            })?;
                        Arc::new(RequiredValidator::compile(dependency, &uri)?)
                    }
                    _ => compiler.build(dependency, &["dependencies", name], uris)?,
                };
                validator.dependencies.push((name.clone(), handle));
            }
        }

        if let Some(value) = schema.get("propertyNames") {
            validator.property_names = Some(compiler.build(value, &["propertyNames"], uris)?);
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

impl Validate for ObjectValidator {
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
        let Value::Object(object) = instance else {
            return;
        };

        if let Some(max_properties) = self.max_properties {
            if object.len() > max_properties {
                reporter.report(ValidationOutput::new(
                    location,
                    format!(
                        "Maximum properties: {}, found: {}",
                        max_properties,
                        object.len()
                    ),
                    "maxProperties",
                    &self.location,
                ));
            }
        }

        if let Some(min_properties) = self.min_properties {
            if object.len() < min_properties {
                reporter.report(ValidationOutput::new(
                    location,
                    format!(
                        "Minimum properties: {}, found: {}",
                        min_properties,
                        object.len()
                    ),
                    "minProperties",
                    &self.location,
                ));
            }
        }

        if let Some(required) = &self.required {
            required.validate(instance, location, reporter, patch);
        }

        for (key, value) in object {
            if let Some(property_names) = &self.property_names {
                let key_instance = Value::String(key.clone());
                property_names.validate(&key_instance, location, reporter, patch);
            }

            let mut matched = false;

            if let Some(&index) = self.property_index.get(key) {
                matched = true;
                let (_, subschema) = &self.properties[index];
                subschema.validate(value, &location.clone_with(key.as_str()), reporter, patch);
            }

            for (regex, subschema) in &self.pattern_properties {
                if regex.is_match(key) {
                    matched = true;
                    subschema.validate(value, &location.clone_with(key.as_str()), reporter, patch);
                }
            }

            if !matched {
                if let Some(additional_properties) = &self.additional_properties {
                    // Sub-errors stay internal; the summary is the error.
                    let mut local_reporter = CollectingReporter::new();
                    additional_properties.validate(
                        value,
                        &location.clone_with(key.as_str()),
                        &mut local_reporter,
                        patch,
                    );
                    if !local_reporter.is_empty() {
                        reporter.report(ValidationOutput::new(
                            location,
                            format!("Additional property \"{}\" found but was invalid.", key),
                            "additionalProperties",
                            additional_properties.absolute_keyword_location(),
                        ));
                    }
                }
            }
        }

        // Declared properties missing from the instance contribute their
        // defaults to the patch.
        for (name, subschema) in &self.properties {
            if !object.contains_key(name) {
                if let Some(default) = subschema.default_value(location, instance, reporter) {
                    patch.add(location.clone_with(name.as_str()).to_string(), default);
                }
            }
        }

        for (name, dependency) in &self.dependencies {
            if object.contains_key(name) {
                dependency.validate(instance, &location.clone_with(name.as_str()), reporter, patch);
            }
        }
    }
}
