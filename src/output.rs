//! Structured validation outputs, reporter sinks and the defaults patch.
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One validation failure, located both in the instance and in the schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutput {
    instance_location: String,
    message: String,
    keyword: &'static str,
    absolute_keyword_location: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    nested: Vec<ValidationOutput>,
}

impl ValidationOutput {
    pub(crate) fn new(
        instance_location: impl ToString,
        message: impl Into<String>,
        keyword: &'static str,
        absolute_keyword_location: impl Into<String>,
    ) -> ValidationOutput {
        ValidationOutput {
            instance_location: instance_location.to_string(),
            message: message.into(),
            keyword,
            absolute_keyword_location: absolute_keyword_location.into(),
            nested: Vec::new(),
        }
    }

    pub(crate) fn with_nested(
        instance_location: impl ToString,
        message: impl Into<String>,
        keyword: &'static str,
        absolute_keyword_location: impl Into<String>,
        nested: Vec<ValidationOutput>,
    ) -> ValidationOutput {
        ValidationOutput {
            nested,
            ..ValidationOutput::new(instance_location, message, keyword, absolute_keyword_location)
        }
    }

    /// JSON Pointer into the instance where the failure occurred.
    #[must_use]
    pub fn instance_location(&self) -> &str {
        &self.instance_location
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the schema keyword that produced the failure.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    /// URI of the schema location that defined the failing keyword.
    #[must_use]
    pub fn absolute_keyword_location(&self) -> &str {
        &self.absolute_keyword_location
    }

    /// Sub-errors collected by quorum keywords (`anyOf`, `oneOf`,
    /// `contains`, ...) as supporting context.
    #[must_use]
    pub fn nested(&self) -> &[ValidationOutput] {
        &self.nested
    }
}

impl fmt::Display for ValidationOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_location.is_empty() {
            write!(f, "{}: {}", self.keyword, self.message)
        } else {
            write!(f, "{}: {} [{}]", self.keyword, self.message, self.instance_location)
        }
    }
}

/// Sink for validation failures.
///
/// The validator reports every failure it encounters and keeps going; the
/// reporter decides what to do with them. Combinator keywords pass fresh
/// [`CollectingReporter`]s to their children so sub-errors can be counted
/// without reaching the caller.
pub trait ErrorReporter {
    /// Accept one validation failure.
    fn report(&mut self, output: ValidationOutput);
}

/// A reporter that buffers everything it receives.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: Vec<ValidationOutput>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> CollectingReporter {
        CollectingReporter::default()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationOutput] {
        &self.errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationOutput> {
        self.errors
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&mut self, output: ValidationOutput) {
        self.errors.push(output);
    }
}

/// A single `add` operation inserting a default value.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOperation {
    pub path: String,
    pub value: Value,
}

impl Serialize for PatchOperation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("op", "add")?;
        map.serialize_entry("path", &self.path)?;
        map.serialize_entry("value", &self.value)?;
        map.end()
    }
}

/// JSON-Patch of default values discovered during validation.
///
/// A sibling output, never a repair of the instance: entries are appended
/// in traversal order and survive any number of validation errors.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Patch {
    operations: Vec<PatchOperation>,
}

impl Patch {
    #[must_use]
    pub fn new() -> Patch {
        Patch::default()
    }

    pub(crate) fn add(&mut self, path: String, value: Value) {
        self.operations.push(PatchOperation { path, value });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    /// The patch as a `serde_json` array, ready to be serialized or applied.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("patch serialization is infallible")
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a PatchOperation;
    type IntoIter = std::slice::Iter<'a, PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{CollectingReporter, ErrorReporter, Patch, ValidationOutput};
    use serde_json::json;

    #[test]
    fn patch_serialization() {
        let mut patch = Patch::new();
        patch.add("/x".to_string(), json!(7));
        assert_eq!(
            patch.to_value(),
            json!([{"op": "add", "path": "/x", "value": 7}])
        );
    }

    #[test]
    fn collecting_reporter_buffers() {
        let mut reporter = CollectingReporter::new();
        reporter.report(ValidationOutput::new("/a", "boom", "type", "json-schema:///#"));
        assert_eq!(reporter.len(), 1);
        assert_eq!(reporter.errors()[0].keyword(), "type");
    }

    #[test]
    fn output_display() {
        let output = ValidationOutput::new("/a/0", "Array items are not unique", "uniqueItems", "");
        assert_eq!(
            output.to_string(),
            "uniqueItems: Array items are not unique [/a/0]"
        );
    }
}
