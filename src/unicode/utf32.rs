//! UTF-32 codec.
use super::{
    is_surrogate, utf8, ConversionError, ConversionFlags, MAX_LEGAL_UTF32, REPLACEMENT_CHAR,
};

/// Decode the code point at the cursor. Surrogate values are illegal in a
/// UTF-32 stream in strict mode and replaced in lenient mode.
pub fn next_codepoint(
    source: &[u32],
    flags: ConversionFlags,
) -> (Result<u32, ConversionError>, usize) {
    let Some(&ch) = source.first() else {
        return (Err(ConversionError::SourceExhausted), 0);
    };
    if is_surrogate(ch) || ch > MAX_LEGAL_UTF32 {
        return match flags {
            ConversionFlags::Strict => (Err(ConversionError::SourceIllegal), 0),
            ConversionFlags::Lenient => (Ok(REPLACEMENT_CHAR), 1),
        };
    }
    (Ok(ch), 1)
}

/// Always 1 on a non-empty source; every unit is a whole code point.
#[must_use]
pub fn codepoint_length(source: &[u32]) -> usize {
    usize::from(!source.is_empty())
}

/// Number of code points in `source`.
#[must_use]
pub fn codepoint_count(source: &[u32]) -> usize {
    source.len()
}

/// Transcode UTF-32 units into UTF-8 bytes.
pub fn to_utf8(
    source: &[u32],
    target: &mut Vec<u8>,
    flags: ConversionFlags,
) -> (Result<(), ConversionError>, usize) {
    let mut consumed = 0;
    while consumed < source.len() {
        let (decoded, advance) = next_codepoint(&source[consumed..], flags);
        match decoded {
            Ok(cp) => {
                utf8::append_codepoint(cp, target);
                consumed += advance;
            }
            Err(error) => return (Err(error), consumed),
        }
    }
    (Ok(()), consumed)
}

/// Transcode UTF-8 bytes into UTF-32 units.
pub fn from_utf8(
    source: &[u8],
    target: &mut Vec<u32>,
    flags: ConversionFlags,
) -> (Result<(), ConversionError>, usize) {
    let mut consumed = 0;
    while consumed < source.len() {
        let (decoded, advance) = utf8::next_codepoint(&source[consumed..], flags);
        match decoded {
            Ok(cp) => {
                target.push(cp);
                consumed += advance;
            }
            Err(error) => return (Err(error), consumed),
        }
    }
    (Ok(()), consumed)
}

/// Unit count of a byte-order mark at the start of `source`.
#[must_use]
pub fn detect_bom(source: &[u32]) -> usize {
    match source.first() {
        Some(&0x0000_FEFF) | Some(&0xFFFE_0000) => 1,
        _ => 0,
    }
}

/// Append `cp` as a single unit; code points above U+10FFFF are dropped.
pub fn append_codepoint(cp: u32, target: &mut Vec<u32>) {
    if cp <= MAX_LEGAL_UTF32 {
        target.push(cp);
    }
}
