//! Deferred `$ref` back-edges.
use super::{SchemaHandle, Validate};
use crate::output::{ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::sync::{Arc, Weak};

/// A reference whose target may not exist yet while its document is being
/// built. The registry patches the target in once the referenced node is
/// registered; a build only succeeds with every reference patched.
///
/// The back-edge is weak so `$ref` cycles cannot keep the graph alive once
/// the registry is dropped; the registry's own map holds the strong
/// handles.
pub(crate) struct ReferenceValidator {
    location: String,
    target: OnceCell<Weak<dyn Validate + Send + Sync>>,
}

impl ReferenceValidator {
    pub(crate) fn new(uri: &UriWrapper) -> Arc<ReferenceValidator> {
        Arc::new(ReferenceValidator {
            location: uri.as_str().to_string(),
            target: OnceCell::new(),
        })
    }

    pub(crate) fn set_target(&self, handle: &SchemaHandle) {
        let _ = self.target.set(Arc::downgrade(handle));
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.target.get().is_some()
    }

    pub(crate) fn uri(&self) -> &str {
        &self.location
    }

    fn resolved(&self) -> Option<SchemaHandle> {
        self.target.get().and_then(Weak::upgrade)
    }
}

impl Validate for ReferenceValidator {
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
        match self.resolved() {
            Some(target) => target.validate(instance, location, reporter, patch),
            // Unreachable after a successful build; reported rather than
            // trusted.
            None => reporter.report(ValidationOutput::new(
                location,
                format!("Unresolved schema reference {}", self.location),
                "$ref",
                &self.location,
            )),
        }
    }

    fn default_value(
        &self,
        location: &JsonPointer,
        instance: &Value,
        reporter: &mut dyn ErrorReporter,
    ) -> Option<Value> {
        self.resolved()
            .and_then(|target| target.default_value(location, instance, reporter))
    }
}
