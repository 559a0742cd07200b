use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

// CSI/OSC sequences and lone escapes
static ANSI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1b(\[[0-9;?]*[ -/]*[@-~]|\][^\x07\x1b]*(\x07|\x1b\\)|.)?").unwrap()
});

/// Strips terminal escape sequences and control characters from text that
/// came from the backend, keeping newlines and tabs.
pub fn sanitize(text: &str) -> String {
    let stripped = ANSI_REGEX.replace_all(text, "");
    stripped
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Prefixes `https://` when the operator typed a bare host.
pub fn normalize_url(input: &str) -> String {
    if input.starts_with("http") {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}

/// Parses backend timestamps. Values without an offset are local wall time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Short day.month, hour:minute form used in the history list.
pub fn format_short_datetime(dt: &DateTime<Local>) -> String {
    dt.format("%d.%m, %H:%M").to_string()
}

/// Formats a score the way it was sent: `7` stays `7`, `7.5` stays `7.5`.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{}", score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_sanitize_removes_escape_sequences() {
        let dirty = "\x1b[31mred\x1b[0m text\x07 with\ttab\nline";
        assert_eq!(sanitize(dirty), "red text with\ttab\nline");
        assert_eq!(sanitize("\x1b]0;title\x07visible"), "visible");
        assert_eq!(sanitize("<b>kept</b>"), "<b>kept</b>");
    }

    #[test]
    fn test_normalize_url_prepends_scheme() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com/a"), "https://example.com/a");
    }

    #[test]
    fn test_parse_naive_timestamp_as_local_time() {
        let dt = parse_timestamp("2024-03-05T14:07:09.123456").unwrap();
        assert_eq!((dt.day(), dt.month(), dt.hour(), dt.minute()), (5, 3, 14, 7));
        assert_eq!(format_short_datetime(&dt), "05.03, 14:07");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-03-05T14:07:09+00:00").is_some());
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(7.0), "7");
        assert_eq!(format_score(7.5), "7.5");
        assert_eq!(format_score(0.0), "0");
    }
}
