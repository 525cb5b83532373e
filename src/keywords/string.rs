//! Validator for string instances: length, pattern, format and content
//! checks.
use super::{keyword_location, Validate};
use crate::content::{content_media_type_check, decode_base64};
use crate::error::SchemaError;
use crate::format::{self, report_format_error, FormatCheck};
use crate::options::CompilationOptions;
use crate::output::{ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::unicode::utf8;
use crate::uri::UriWrapper;
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::Arc;

enum StringFormat {
    Builtin(FormatCheck),
    Custom { name: String, check: fn(&str) -> bool },
}

pub(crate) struct StringValidator {
    location: String,
    max_length: Option<usize>,
    min_length: Option<usize>,
    pattern: Option<(Regex, String)>,
    format: Option<StringFormat>,
    content_encoding: Option<String>,
    content_media_type: Option<String>,
}

impl StringValidator {
    pub(crate) fn compile(
        schema: &Map<String, Value>,
        uris: &[UriWrapper],
        options: &CompilationOptions,
    ) -> Result<Arc<StringValidator>, SchemaError> {
        let mut validator = StringValidator {
            location: keyword_location(uris),
            max_length: None,
            min_length: None,
            pattern: None,
            format: None,
            content_encoding: None,
            content_media_type: None,
        };
        if let Some(value) = schema.get("maxLength") {
            validator.max_length = Some(length_limit(value, "maxLength")?);
        }
        if let Some(value) = schema.get("minLength") {
            validator.min_length = Some(length_limit(value, "minLength")?);
        }
        if let Some(value) = schema.get("contentEncoding") {
            let Some(encoding) = value.as_str() else {
                return Err(SchemaError::Schema(
                    "\"contentEncoding\" must be a string".to_string(),
                ));
            };
            validator.content_encoding = Some(encoding.to_string());
        }
        if let Some(value) = schema.get("contentMediaType") {
            let Some(media_type) = value.as_str() else {
                return Err(SchemaError::Schema(
                    "\"contentMediaType\" must be a string".to_string(),
                ));
            };
            validator.content_media_type = Some(media_type.to_string());
        }
        if let Some(value) = schema.get("pattern") {
            let Some(pattern) = value.as_str() else {
                return Err(SchemaError::Schema("\"pattern\" must be a string".to_string()));
            };
            validator.pattern = Some((Regex::new(pattern)?, pattern.to_string()));
        }
        if let Some(value) = schema.get("format") {
            let Some(name) = value.as_str() else {
                return Err(SchemaError::Schema("\"format\" must be a string".to_string()));
            };
            // Unknown format names are accepted without a checker.
            validator.format = match options.custom_format(name) {
                Some(check) => Some(StringFormat::Custom {
                    name: name.to_string(),
                    check,
                }),
                None => format::lookup(name).map(StringFormat::Builtin),
            };
        }
        Ok(Arc::new(validator))
    }
}

fn length_limit(value: &Value, keyword: &str) -> Result<usize, SchemaError> {
    value
        .as_u64()
        .map(|limit| limit as usize)
        .ok_or_else(|| SchemaError::Schema(format!("\"{}\" must be a non-negative integer", keyword)))
}

impl Validate for StringValidator {
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
        let Value::String(text) = instance else {
            return;
        };

        // Once decoded, every later check sees the decoded content.
        let content: Cow<'_, str> = match &self.content_encoding {
            Some(encoding) if encoding == "base64" => match decode_base64(text) {
                Ok(decoded) => Cow::Owned(String::from_utf8_lossy(&decoded).into_owned()),
                Err(_) => {
                    reporter.report(ValidationOutput::new(
                        location,
                        "Content is not a base64 string",
                        "contentEncoding",
                        &self.location,
                    ));
                    Cow::Borrowed("")
                }
            },
            Some(encoding) if !encoding.is_empty() => {
                reporter.report(ValidationOutput::new(
                    location,
                    format!("unable to check for contentEncoding '{}'", encoding),
                    "contentEncoding",
                    &self.location,
                ));
                Cow::Borrowed(text.as_str())
            }
            _ => Cow::Borrowed(text.as_str()),
        };

        if let Some(media_type) = &self.content_media_type {
            content_media_type_check(
                &self.location,
                location,
                media_type,
                content.as_bytes(),
                reporter,
            );
        }

        if let Some(min_length) = self.min_length {
            let length = utf8::codepoint_count(content.as_bytes());
            if length < min_length {
                reporter.report(ValidationOutput::new(
                    location,
                    format!("Expected minLength: {}, actual: {}", min_length, length),
                    "minLength",
                    &self.location,
                ));
            }
        }

        if let Some(max_length) = self.max_length {
            let length = utf8::codepoint_count(content.as_bytes());
            if length > max_length {
                reporter.report(ValidationOutput::new(
                    location,
                    format!("Expected maxLength: {}, actual: {}", max_length, length),
                    "maxLength",
                    &self.location,
                ));
            }
        }

        if let Some((regex, pattern)) = &self.pattern {
            // An unanchored search, matching ECMAScript `regex.test`.
            if !regex.is_match(&content) {
                reporter.report(ValidationOutput::new(
                    location,
                    format!("String \"{}\" does not match pattern \"{}\"", text, pattern),
                    "pattern",
                    &self.location,
                ));
            }
        }

        match &self.format {
            Some(StringFormat::Builtin(check)) => {
                check(&self.location, location, &content, reporter)
            }
            Some(StringFormat::Custom { name, check }) => {
                if !check(&content) {
                    report_format_error(reporter, &self.location, location, &content, name);
                }
            }
            None => {}
        }
    }
}
