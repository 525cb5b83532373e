//! The two boolean schemas.
use super::{keyword_location, Validate};
use crate::output::{ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::Value;

/// `true` accepts everything.
pub(crate) struct TrueValidator {
    location: String,
}

impl TrueValidator {
    pub(crate) fn new(uris: &[UriWrapper]) -> TrueValidator {
        TrueValidator {
            location: keyword_location(uris),
        }
    }
}

impl Validate for TrueValidator {
    fn absolute_keyword_location(&self) -> &str {
        &self.location
    }

    fn validate(&self, _: &Value, _: &JsonPointer, _: &mut dyn ErrorReporter, _: &mut Patch) {}
}

/// `false` rejects everything.
pub(crate) struct FalseValidator {
    location: String,
}

impl FalseValidator {
    pub(crate) fn new(uris: &[UriWrapper]) -> FalseValidator {
        FalseValidator {
            location: keyword_location(uris),
        }
    }
}

impl Validate for FalseValidator {
    fn absolute_keyword_location(&self) -> &str {
        &self.location
    }

    fn validate(
        &self,
        _: &Value,
        location: &JsonPointer,
        reporter: &mut dyn ErrorReporter,
        _: &mut Patch,
    ) {
        reporter.report(ValidationOutput::new(
            location,
            "False schema always fails",
            "false",
            &self.location,
        ));
    }
}
