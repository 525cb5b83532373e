pub(crate) mod all_of;
pub(crate) mod any_of;
pub(crate) mod array;
pub(crate) mod boolean;
pub(crate) mod const_;
pub(crate) mod enum_;
pub(crate) mod if_;
pub(crate) mod not;
pub(crate) mod number;
pub(crate) mod object;
pub(crate) mod one_of;
pub(crate) mod ref_;
pub(crate) mod required;
pub(crate) mod string;
pub(crate) mod type_;

use crate::output::{ErrorReporter, Patch};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::Value;
use std::fmt::{Debug, Error, Formatter};
use std::sync::Arc;

/// The contract every compiled keyword node implements.
///
/// `validate` never fails: every violation is handed to the reporter and
/// traversal continues so callers see all failures in one pass. The graph
/// is immutable after compilation, so nodes are shared freely between
/// parents and the registry.
pub(crate) trait Validate: Send + Sync {
    /// URI of the schema location that defined this node.
    fn absolute_keyword_location(&self) -> &str;

    fn validate(
        &self,
        instance: &Value,
        location: &JsonPointer,
        reporter: &mut dyn ErrorReporter,
        patch: &mut Patch,
    );

    /// The node's configured `default`, if any. Only the type dispatcher
    /// carries one; references forward to their target.
    fn default_value(
        &self,
        _location: &JsonPointer,
        _instance: &Value,
        _reporter: &mut dyn ErrorReporter,
    ) -> Option<Value> {
        None
    }
}

impl Debug for dyn Validate + Send + Sync {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.write_str(self.absolute_keyword_location())
    }
}

pub(crate) type SchemaHandle = Arc<dyn Validate + Send + Sync>;

/// The last URI assigned to the enclosing schema, in string form; nodes
/// built outside any registered scope carry an empty location.
pub(crate) fn keyword_location(uris: &[UriWrapper]) -> String {
    uris.last()
        .map(|uri| uri.as_str().to_string())
        .unwrap_or_default()
}
