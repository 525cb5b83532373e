//! Schema locations: an absolute URI plus its fragment identifier.
use url::Url;

/// An absolute URI paired with its decoded fragment.
///
/// The fragment is either a JSON Pointer (starts with `/`) locating a
/// subschema, or a plain-name identifier naming an anchor. Plain-name
/// fragments are opaque: [`UriWrapper::append`] refuses to deepen them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UriWrapper {
    uri: Url,
    identifier: String,
}

impl UriWrapper {
    /// Parse an absolute URI, splitting off and percent-decoding the
    /// fragment.
    pub fn parse(input: &str) -> Result<UriWrapper, url::ParseError> {
        let uri = Url::parse(input)?;
        Ok(UriWrapper::from_url(uri))
    }

    /// Resolve `reference` against `base` per RFC 3986. The reference's own
    /// fragment survives resolution and becomes the new identifier.
    pub fn resolve(base: &UriWrapper, reference: &str) -> Result<UriWrapper, url::ParseError> {
        let uri = Url::options().base_url(Some(&base.uri)).parse(reference)?;
        Ok(UriWrapper::from_url(uri))
    }

    fn from_url(uri: Url) -> UriWrapper {
        let identifier = uri.fragment().map(unescape_percent).unwrap_or_default();
        UriWrapper { uri, identifier }
    }

    #[must_use]
    pub fn has_pointer(&self) -> bool {
        self.identifier.starts_with('/')
    }

    #[must_use]
    pub fn has_identifier(&self) -> bool {
        !self.identifier.is_empty() && !self.identifier.starts_with('/')
    }

    /// The decoded fragment, JSON Pointer or plain name.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Same as [`UriWrapper::identifier`]; reads better at call sites that
    /// expect a pointer.
    #[must_use]
    pub fn pointer(&self) -> &str {
        &self.identifier
    }

    /// The URI without its fragment, used to group subschemas per document.
    #[must_use]
    pub fn base(&self) -> String {
        let mut base = self.uri.clone();
        base.set_fragment(None);
        base.into()
    }

    /// Extend the pointer fragment with an object key.
    ///
    /// A no-op when the fragment is a plain-name identifier, so repeated
    /// appends cannot deepen into a named anchor.
    #[must_use]
    pub fn append(&self, token: &str) -> UriWrapper {
        if self.has_identifier() {
            return self.clone();
        }
        self.with_pointer_step(&escape_token(token))
    }

    /// Extend the pointer fragment with an array index.
    #[must_use]
    pub fn append_index(&self, index: usize) -> UriWrapper {
        if self.has_identifier() {
            return self.clone();
        }
        self.with_pointer_step(itoa::Buffer::new().format(index))
    }

    fn with_pointer_step(&self, step: &str) -> UriWrapper {
        let pointer = format!("{}/{}", self.identifier, step);
        let mut uri = self.uri.clone();
        uri.set_fragment(Some(&pointer));
        UriWrapper {
            uri,
            identifier: pointer,
        }
    }

    /// The serialized URI, fragment included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.uri.as_str()
    }
}

impl std::fmt::Display for UriWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.uri.as_str())
    }
}

fn escape_token(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len());
    for ch in token.chars() {
        match ch {
            '~' => escaped.push_str("~0"),
            '/' => escaped.push_str("~1"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// Right-to-left scan over three-character `%XX` windows; malformed escapes
// are left untouched.
fn unescape_percent(fragment: &str) -> String {
    let mut bytes = fragment.as_bytes().to_vec();
    if bytes.len() >= 3 {
        let mut pos = bytes.len() - 2;
        while pos > 0 {
            pos -= 1;
            if bytes[pos] == b'%' {
                let hex = &bytes[pos + 1..pos + 3];
                if let Some(byte) = decode_hex_pair(hex[0], hex[1]) {
                    bytes.splice(pos..pos + 3, std::iter::once(byte));
                }
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn decode_hex_pair(high: u8, low: u8) -> Option<u8> {
    let high = (high as char).to_digit(16)?;
    let low = (low as char).to_digit(16)?;
    Some((high * 16 + low) as u8)
}

#[cfg(test)]
mod tests {
    use super::UriWrapper;

    #[test]
    fn fragment_classification() {
        let pointer = UriWrapper::parse("http://example.com/schema.json#/definitions/a").unwrap();
        assert!(pointer.has_pointer());
        assert!(!pointer.has_identifier());

        let anchor = UriWrapper::parse("http://example.com/schema.json#top").unwrap();
        assert!(anchor.has_identifier());
        assert!(!anchor.has_pointer());
    }

    #[test]
    fn append_escapes_tokens() {
        let uri = UriWrapper::parse("json-schema:///#").unwrap();
        let appended = uri.append("a/b").append("c~d");
        assert_eq!(appended.pointer(), "/a~1b/c~0d");
        assert_eq!(appended.as_str(), "json-schema:///#/a~1b/c~0d");
    }

    #[test]
    fn append_index_extends_pointer() {
        let uri = UriWrapper::parse("json-schema:///#/items").unwrap();
        assert_eq!(uri.append_index(2).pointer(), "/items/2");
    }

    #[test]
    fn append_on_plain_name_is_idempotent() {
        let uri = UriWrapper::parse("http://example.com/s.json#anchor").unwrap();
        let appended = uri.append("properties").append_index(0);
        assert_eq!(appended, uri);
    }

    #[test]
    fn resolve_keeps_reference_fragment() {
        let base = UriWrapper::parse("http://example.com/root/schema.json").unwrap();
        let resolved = UriWrapper::resolve(&base, "other.json#/definitions/x").unwrap();
        assert_eq!(resolved.as_str(), "http://example.com/root/other.json#/definitions/x");
        assert_eq!(resolved.pointer(), "/definitions/x");
    }

    #[test]
    fn fragment_is_percent_decoded() {
        let uri = UriWrapper::parse("http://example.com/s.json#/a%25b").unwrap();
        assert_eq!(uri.pointer(), "/a%b");
    }

    #[test]
    fn base_strips_fragment() {
        let uri = UriWrapper::parse("http://example.com/s.json#/a").unwrap();
        assert_eq!(uri.base(), "http://example.com/s.json");
    }
}
