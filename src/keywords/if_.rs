//! Validator for `if`/`then`/`else`.
use super::{keyword_location, SchemaHandle, Validate};
use crate::compiler::Compiler;
use crate::error::SchemaError;
use crate::output::{CollectingReporter, ErrorReporter, Patch};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::{Map, Value};

pub(crate) struct IfThenElseValidator {
    location: String,
    if_: SchemaHandle,
    then_: Option<SchemaHandle>,
    else_: Option<SchemaHandle>,
}

impl IfThenElseValidator {
    /// Built only when `then` or `else` accompany `if`; a bare `if` has no
    /// observable effect.
    pub(crate) fn compile(
        compiler: &mut Compiler<'_>,
        condition: &Value,
        schema: &Map<String, Value>,
        uris: &[UriWrapper],
    ) -> Result<Option<IfThenElseValidator>, SchemaError> {
        let then_schema = schema.get("then");
        let else_schema = schema.get("else");
        if then_schema.is_none() && else_schema.is_none() {
            return Ok(None);
        }
        Ok(Some(IfThenElseValidator {
            location: keyword_location(uris),
            if_: compiler.build(condition, &["if"], uris)?,
            then_: then_schema
                .map(|subschema| compiler.build(subschema, &["then"], uris))
                .transpose()?,
            else_: else_schema
                .map(|subschema| compiler.build(subschema, &["else"], uris))
                .transpose()?,
        }))
    }
}

impl Validate for IfThenElseValidator {
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
        // The condition's own errors are only a verdict, never surfaced.
        let mut local_reporter = CollectingReporter::new();
        self.if_.validate(instance, location, &mut local_reporter, patch);
        let branch = if local_reporter.is_empty() {
            &self.then_
        } else {
            &self.else_
        };
        if let Some(subschema) = branch {
            subschema.validate(instance, location, reporter, patch);
        }
    }
}
