//! UTF-16 codec with surrogate-pair assembly.
use super::{
    is_high_surrogate, is_low_surrogate, utf8, ConversionError, ConversionFlags, HALF_BASE,
    HALF_MASK, HALF_SHIFT, MAX_BMP, MAX_UTF16, REPLACEMENT_CHAR, SUR_HIGH_START, SUR_LOW_START,
};

/// Decode the code point at the start of `source`, assembling surrogate
/// pairs. Lenient mode passes unpaired surrogates through as-is, the way
/// the ConvertUTF reference code does.
pub fn next_codepoint(
    source: &[u16],
    flags: ConversionFlags,
) -> (Result<u32, ConversionError>, usize) {
    let Some(&lead) = source.first() else {
        return (Err(ConversionError::SourceExhausted), 0);
    };
    let ch = u32::from(lead);
    if is_high_surrogate(ch) {
        let Some(&trail) = source.get(1) else {
            return (Err(ConversionError::SourceExhausted), 0);
        };
        let ch2 = u32::from(trail);
        if is_low_surrogate(ch2) {
            let assembled =
                ((ch - SUR_HIGH_START) << HALF_SHIFT) + (ch2 - SUR_LOW_START) + HALF_BASE;
            return (Ok(assembled), 2);
        }
        return match flags {
            ConversionFlags::Strict => (Err(ConversionError::SourceIllegal), 0),
            ConversionFlags::Lenient => (Ok(ch), 1),
        };
    }
    if is_low_surrogate(ch) {
        return match flags {
            ConversionFlags::Strict => (Err(ConversionError::SourceIllegal), 0),
            ConversionFlags::Lenient => (Ok(ch), 1),
        };
    }
    (Ok(ch), 1)
}

/// 2 iff the lead is a high surrogate and a trailing unit is available.
#[must_use]
pub fn codepoint_length(source: &[u16]) -> usize {
    match source.first() {
        None => 0,
        Some(&lead) if is_high_surrogate(u32::from(lead)) && source.len() > 1 => 2,
        Some(_) => 1,
    }
}

/// Number of code points in `source`.
#[must_use]
pub fn codepoint_count(source: &[u16]) -> usize {
    let mut count = 0;
    let mut rest = source;
    while !rest.is_empty() {
        let length = codepoint_length(rest).max(1);
        rest = &rest[length..];
        count += 1;
    }
    count
}

/// Transcode UTF-16 units into UTF-8 bytes.
///
/// Returns the conversion outcome and the number of source units consumed;
/// strict mode stops in front of the offending unit.
pub fn to_utf8(
    source: &[u16],
    target: &mut Vec<u8>,
    flags: ConversionFlags,
) -> (Result<(), ConversionError>, usize) {
    let mut consumed = 0;
    while consumed < source.len() {
        let (decoded, advance) = next_codepoint(&source[consumed..], flags);
        match decoded {
            Ok(cp) => {
                let cp = if cp > MAX_UTF16 { REPLACEMENT_CHAR } else { cp };
                utf8::append_codepoint(cp, target);
                consumed += advance;
            }
            Err(error) => return (Err(error), consumed),
        }
    }
    (Ok(()), consumed)
}

/// Transcode UTF-8 bytes into UTF-16 units, splitting astral code points
/// into surrogate pairs.
pub fn from_utf8(
    source: &[u8],
    target: &mut Vec<u16>,
    flags: ConversionFlags,
) -> (Result<(), ConversionError>, usize) {
    let mut consumed = 0;
    while consumed < source.len() {
        let (decoded, advance) = utf8::next_codepoint(&source[consumed..], flags);
        match decoded {
            Ok(cp) => {
                append_codepoint(cp, target);
                consumed += advance;
            }
            Err(error) => return (Err(error), consumed),
        }
    }
    (Ok(()), consumed)
}

/// Unit count of a byte-order mark at the start of `source`; either
/// endianness counts.
#[must_use]
pub fn detect_bom(source: &[u16]) -> usize {
    match source.first() {
        Some(&0xFEFF) | Some(&0xFFFE) => 1,
        _ => 0,
    }
}

/// Append `cp` as one unit or a surrogate pair; code points above
/// U+10FFFF are dropped.
pub fn append_codepoint(cp: u32, target: &mut Vec<u16>) {
    if cp <= MAX_BMP {
        target.push(cp as u16);
    } else if cp <= MAX_UTF16 {
        let ch = cp - HALF_BASE;
        target.push(((ch >> HALF_SHIFT) + SUR_HIGH_START) as u16);
        target.push(((ch & HALF_MASK) + SUR_LOW_START) as u16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unicode::{ConversionError, ConversionFlags};

    #[test]
    fn assembles_surrogate_pairs() {
        let units = [0xD83D_u16, 0xDCA9]; // U+1F4A9
        let (result, advance) = next_codepoint(&units, ConversionFlags::Strict);
        assert_eq!(result, Ok(0x1F4A9));
        assert_eq!(advance, 2);
        assert_eq!(codepoint_length(&units), 2);
    }

    #[test]
    fn unpaired_high_surrogate() {
        let units = [0xD83D_u16, 0x0041];
        let (result, advance) = next_codepoint(&units, ConversionFlags::Strict);
        assert_eq!(result, Err(ConversionError::SourceIllegal));
        assert_eq!(advance, 0);
        let (result, advance) = next_codepoint(&units, ConversionFlags::Lenient);
        assert_eq!(result, Ok(0xD83D));
        assert_eq!(advance, 1);
    }

    #[test]
    fn truncated_pair_is_exhaustion() {
        let units = [0xD83D_u16];
        let (result, _) = next_codepoint(&units, ConversionFlags::Strict);
        assert_eq!(result, Err(ConversionError::SourceExhausted));
    }

    #[test]
    fn utf8_round_trip() {
        let text = "späße 💩 αβγ";
        let mut units = Vec::new();
        let (result, consumed) = from_utf8(text.as_bytes(), &mut units, ConversionFlags::Lenient);
        assert_eq!(result, Ok(()));
        assert_eq!(consumed, text.len());
        assert_eq!(units, text.encode_utf16().collect::<Vec<_>>());

        let mut bytes = Vec::new();
        let (result, consumed) = to_utf8(&units, &mut bytes, ConversionFlags::Lenient);
        assert_eq!(result, Ok(()));
        assert_eq!(consumed, units.len());
        assert_eq!(bytes, text.as_bytes());
    }

    #[test]
    fn strict_transcoding_stops_before_offender() {
        let units = [0x0041_u16, 0xDC00, 0x0042];
        let mut bytes = Vec::new();
        let (result, consumed) = to_utf8(&units, &mut bytes, ConversionFlags::Strict);
        assert_eq!(result, Err(ConversionError::SourceIllegal));
        assert_eq!(consumed, 1);
        assert_eq!(bytes, b"A");
    }

    #[test]
    fn bom() {
        assert_eq!(detect_bom(&[0xFEFF, 0x41]), 1);
        assert_eq!(detect_bom(&[0xFFFE]), 1);
        assert_eq!(detect_bom(&[0x41]), 0);
    }
}
