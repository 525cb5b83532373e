use std::{error, fmt};

/// An error that makes a schema unusable before any instance is seen.
///
/// Validation failures are not errors in this sense: they are delivered to
/// the caller's reporter and never abort the traversal.
#[derive(Debug)]
pub enum SchemaError {
    /// The schema document itself is malformed (wrong keyword type,
    /// invalid regular expression, non-string `$ref`, ...).
    Schema(String),
    /// A `$ref` target was still unknown after the whole document was built.
    UnresolvedReference(String),
    /// Two subschemas ended up registered under the same absolute URI.
    DuplicateIdentifier(String),
    /// A `$id` or `$ref` could not be parsed as a URI reference.
    Uri(url::ParseError),
}

impl error::Error for SchemaError {}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Schema(message) => write!(f, "Invalid schema: {}", message),
            SchemaError::UnresolvedReference(uri) => {
                write!(f, "Unresolved schema reference {}", uri)
            }
            SchemaError::DuplicateIdentifier(uri) => {
                write!(f, "Schema with {} already inserted", uri)
            }
            SchemaError::Uri(error) => write!(f, "Invalid URI: {}", error),
        }
    }
}

impl From<url::ParseError> for SchemaError {
    fn from(error: url::ParseError) -> Self {
        SchemaError::Uri(error)
    }
}

impl From<regex::Error> for SchemaError {
    fn from(error: regex::Error) -> Self {
        SchemaError::Schema(format!("invalid regular expression: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::SchemaError;

    #[test]
    fn display() {
        let error = SchemaError::UnresolvedReference("json-schema:///#/definitions/a".to_string());
        assert_eq!(
            error.to_string(),
            "Unresolved schema reference json-schema:///#/definitions/a"
        );
    }
}
