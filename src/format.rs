//! Format checkers, selected by name at build time.
//!
//! Each checker reports its own failure so the error carries the keyword
//! location of the `format` that requested it. Unknown format names are
//! silently accepted, as draft-07 requires.
use crate::output::{ErrorReporter, ValidationOutput};
use crate::paths::JsonPointer;
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;
use std::str::FromStr;

pub(crate) type FormatCheck =
    fn(keyword_location: &str, location: &JsonPointer, content: &str, reporter: &mut dyn ErrorReporter);

/// Resolve a draft-07 format name to its checker.
pub(crate) fn lookup(name: &str) -> Option<FormatCheck> {
    match name {
        "date-time" => Some(date_time_check),
        "date" => Some(date_check),
        "time" => Some(time_check),
        "email" => Some(email_check),
        "hostname" => Some(hostname_check),
        "ipv4" => Some(ipv4_check),
        "ipv6" => Some(ipv6_check),
        "regex" => Some(regex_check),
        _ => None,
    }
}

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([01][0-9]|2[0-3]):([0-5][0-9]):([0-5][0-9])(\.[0-9]+)?(([Zz])|([+\-]([01][0-9]|2[0-3]):[0-5][0-9]))\z",
    )
    .expect("is a valid regex")
});

macro_rules! format_checker {
    ($name:ident, $format:literal, $predicate:expr) => {
        fn $name(
            keyword_location: &str,
            location: &JsonPointer,
            content: &str,
            reporter: &mut dyn ErrorReporter,
        ) {
            let is_valid: fn(&str) -> bool = $predicate;
            if !is_valid(content) {
                report_format_error(reporter, keyword_location, location, content, $format);
            }
        }
    };
}

format_checker!(date_time_check, "date-time", |content| {
    DateTime::parse_from_rfc3339(content).is_ok()
});
format_checker!(date_check, "date", |content| {
    NaiveDate::parse_from_str(content, "%Y-%m-%d").is_ok()
});
format_checker!(time_check, "time", |content| TIME_RE.is_match(content));
format_checker!(email_check, "email", |content| content.contains('@'));
format_checker!(hostname_check, "hostname", is_valid_hostname);
format_checker!(ipv4_check, "ipv4", |content| {
    matches!(IpAddr::from_str(content), Ok(IpAddr::V4(_)))
});
format_checker!(ipv6_check, "ipv6", |content| {
    matches!(IpAddr::from_str(content), Ok(IpAddr::V6(_)))
});
format_checker!(regex_check, "regex", |content| Regex::new(content).is_ok());

fn is_valid_hostname(content: &str) -> bool {
    !(content.is_empty()
        || content.starts_with('-')
        || content.ends_with('-')
        || content.chars().count() > 255
        || content
            .chars()
            .any(|ch| !(ch.is_alphanumeric() || ch == '-' || ch == '.'))
        || content.split('.').any(|label| label.chars().count() > 63))
}

pub(crate) fn report_format_error(
    reporter: &mut dyn ErrorReporter,
    keyword_location: &str,
    location: &JsonPointer,
    content: &str,
    format: &str,
) {
    reporter.report(ValidationOutput::new(
        location,
        format!("\"{}\" is not a valid {}", content, format),
        "format",
        keyword_location,
    ));
}

#[cfg(test)]
mod tests {
    use super::lookup;
    use crate::output::CollectingReporter;
    use crate::paths::JsonPointer;
    use test_case::test_case;

    #[test_case("date-time", "2018-11-13T20:20:39+00:00", true)]
    #[test_case("date-time", "2018-11-13 20:20:39", false)]
    #[test_case("date", "1963-06-19", true)]
    #[test_case("date", "06/19/1963", false)]
    #[test_case("time", "08:30:06Z", true)]
    #[test_case("time", "08:30:06.283185Z", true)]
    #[test_case("time", "25:00:00Z", false)]
    #[test_case("email", "joe.bloggs@example.com", true)]
    #[test_case("email", "not-an-email", false)]
    #[test_case("hostname", "www.example.com", true)]
    #[test_case("hostname", "-leading.dash", false)]
    #[test_case("ipv4", "192.168.0.1", true)]
    #[test_case("ipv4", "::1", false)]
    #[test_case("ipv6", "::1", true)]
    #[test_case("ipv6", "127.0.0.1", false)]
    #[test_case("regex", "^a[bc]+$", true)]
    #[test_case("regex", "(unclosed", false)]
    fn checkers(format: &str, content: &str, expected: bool) {
        let check = lookup(format).expect("known format");
        let mut reporter = CollectingReporter::new();
        check("", &JsonPointer::default(), content, &mut reporter);
        assert_eq!(reporter.is_empty(), expected, "{}: {}", format, content);
    }

    #[test]
    fn unknown_formats_have_no_checker() {
        assert!(lookup("uuid").is_none());
    }
}
