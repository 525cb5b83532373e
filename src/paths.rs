//! Locations within validated instances, kept as JSON Pointers.
use std::{fmt, fmt::Write, slice::Iter};

/// JSON Pointer as a wrapper around individual path components.
///
/// Built incrementally while walking an instance; the root pointer
/// serializes to the empty string, so appending property `x` yields `/x`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JsonPointer(Vec<PathChunk>);

/// A key within a JSON object or an index within a JSON array.
///
/// Indexes stay numeric until display time to avoid converting them to
/// strings during validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathChunk {
    /// Property name within a JSON object.
    Property(Box<str>),
    /// Index within a JSON array.
    Index(usize),
}

impl JsonPointer {
    /// Return an iterator over the underlying vector of path components.
    pub fn iter(&self) -> Iter<'_, PathChunk> {
        self.0.iter()
    }

    /// Take the last pointer chunk.
    #[must_use]
    pub fn last(&self) -> Option<&PathChunk> {
        self.0.last()
    }

    pub(crate) fn clone_with(&self, chunk: impl Into<PathChunk>) -> Self {
        let mut new = self.clone();
        new.0.push(chunk.into());
        new
    }

    /// Pointer components as strings.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
            .into_iter()
            .map(|chunk| match chunk {
                PathChunk::Property(value) => value.into_string(),
                PathChunk::Index(index) => index.to_string(),
            })
            .collect()
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in &self.0 {
            f.write_char('/')?;
            match chunk {
                PathChunk::Property(value) => {
                    for ch in value.chars() {
                        match ch {
                            '/' => f.write_str("~1")?,
                            '~' => f.write_str("~0")?,
                            _ => f.write_char(ch)?,
                        }
                    }
                }
                PathChunk::Index(index) => f.write_str(itoa::Buffer::new().format(*index))?,
            }
        }
        Ok(())
    }
}

impl serde::Serialize for JsonPointer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl From<String> for PathChunk {
    #[inline]
    fn from(value: String) -> Self {
        PathChunk::Property(value.into_boxed_str())
    }
}

impl From<&str> for PathChunk {
    #[inline]
    fn from(value: &str) -> Self {
        PathChunk::Property(value.into())
    }
}

impl From<usize> for PathChunk {
    #[inline]
    fn from(value: usize) -> Self {
        PathChunk::Index(value)
    }
}

impl From<&[&str]> for JsonPointer {
    fn from(path: &[&str]) -> Self {
        JsonPointer(path.iter().map(|item| PathChunk::from(*item)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::JsonPointer;
    use serde_json::json;

    #[test]
    fn root_is_empty() {
        assert_eq!(JsonPointer::default().to_string(), "");
    }

    #[test]
    fn json_pointer_to_string() {
        let chunks = ["/", "~"];
        let pointer = JsonPointer::from(&chunks[..]).to_string();
        assert_eq!(pointer, "/~1/~0");
        let data = json!({"/": {"~": 42}});
        assert_eq!(data.pointer(&pointer), Some(&json!(42)))
    }

    #[test]
    fn mixed_chunks() {
        let pointer = JsonPointer::default()
            .clone_with("items")
            .clone_with(3usize)
            .clone_with("name");
        assert_eq!(pointer.to_string(), "/items/3/name");
    }
}
