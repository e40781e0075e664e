//! Normalization of free-form event dates to ISO-8601 strings.

use chrono::{NaiveDate, NaiveTime};

use super::normalize::is_missing_str;

/// Length of `YYYY-MM-DDTHH:MM:SS`.
const TIMESTAMP_LEN: usize = 19;

/// Normalizes a date, date range or timestamp.
///
/// Ranges (`start/end`) keep their start, timestamps longer than
/// `YYYY-MM-DDTHH:MM:SS` are cut to that length. The result is returned only
/// if it parses as an ISO-8601 date or date-time.
pub fn normalize_date(raw: &str) -> Option<String> {
    if is_missing_str(raw) {
        return None;
    }

    let mut date = raw.split('/').next().unwrap_or_default();

    if date.contains('T') && date.chars().count() > TIMESTAMP_LEN {
        date = match date.char_indices().nth(TIMESTAMP_LEN) {
            Some((idx, _)) => &date[..idx],
            None => date,
        };
    }

    is_iso_8601(date).then(|| date.to_string())
}

/// Calendar date, optionally followed by one separator character and a time.
///
/// Dates are `YYYY-MM-DD` or `YYYYMMDD`. Times are `HH`, `HH:MM` or
/// `HH:MM:SS` (or `HHMM`, `HHMMSS`), seconds may carry a `.` or `,` fraction,
/// and an offset may follow as `Z`, `±HH`, `±HHMM` or `±HH:MM[:SS]`.
fn is_iso_8601(s: &str) -> bool {
    let date_len = if s.as_bytes().get(4) == Some(&b'-') { 10 } else { 8 };

    let Some(date) = s.get(..date_len) else {
        return false;
    };
    if parse_date(date).is_none() {
        return false;
    }

    let mut rest = s[date_len..].chars();
    match rest.next() {
        None => true,
        Some(_) => is_iso_time(rest.as_str()),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    let digits = match bytes.len() {
        10 if bytes[4] == b'-' && bytes[7] == b'-' => format!("{}{}{}", &s[..4], &s[5..7], &s[8..]),
        8 => s.to_string(),
        _ => return None,
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = digits[..4].parse().ok()?;
    let month = digits[4..6].parse().ok()?;
    let day = digits[6..].parse().ok()?;

    (year > 0).then(|| NaiveDate::from_ymd_opt(year, month, day)).flatten()
}

fn is_iso_time(s: &str) -> bool {
    let (clock, offset) = match s.find(|c: char| matches!(c, '+' | '-' | 'Z')) {
        Some(idx) => (&s[..idx], Some(&s[idx..])),
        None => (s, None),
    };

    parse_clock(clock).is_some() && offset.map_or(true, is_offset)
}

fn is_offset(s: &str) -> bool {
    s == "Z"
        || s
            .strip_prefix('+')
            .or_else(|| s.strip_prefix('-'))
            .is_some_and(|hours| parse_clock(hours).is_some())
}

// `HH[:MM[:SS[.f]]]` or `HH[MM[SS[.f]]]`, with `,` allowed for `.`
fn parse_clock(s: &str) -> Option<NaiveTime> {
    let s = s.replace(',', ".");
    let (hms, fraction) = match s.split_once('.') {
        Some((hms, fraction)) => (hms, Some(fraction)),
        None => (s.as_str(), None),
    };

    let parts: Vec<&str> = if hms.contains(':') {
        hms.split(':').collect()
    } else {
        (0..hms.len())
            .step_by(2)
            .map(|i| hms.get(i..i + 2))
            .collect::<Option<_>>()?
    };

    let well_formed = (1..=3).contains(&parts.len())
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        return None;
    }

    if let Some(fraction) = fraction {
        if parts.len() != 3 || fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    let field = |idx: usize| parts.get(idx).map_or(Some(0), |p| p.parse().ok());

    NaiveTime::from_hms_opt(field(0)?, field(1)?, field(2)?)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_return_none_for_missing() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("NaN"), None);
        assert_eq!(normalize_date("none"), None);
        assert_eq!(normalize_date("   "), None);
    }

    #[test]
    fn should_keep_normalized_timestamp() {
        assert_eq!(
            normalize_date("2024-06-01T12:00:00"),
            Some("2024-06-01T12:00:00".to_string())
        );
        assert_eq!(normalize_date("2024-06-01"), Some("2024-06-01".to_string()));
    }

    #[test]
    fn should_take_start_of_range() {
        assert_eq!(
            normalize_date("2024-06-01/2024-06-30"),
            Some("2024-06-01".to_string())
        );
        assert_eq!(
            normalize_date("2019-05-02T08:00:00/2019-05-02T10:30:00"),
            Some("2019-05-02T08:00:00".to_string())
        );
        assert_eq!(normalize_date("/2024-06-30"), None);
    }

    #[test]
    fn should_cut_long_timestamps() {
        assert_eq!(
            normalize_date("2024-06-01T12:00:00.123456Z"),
            Some("2024-06-01T12:00:00".to_string())
        );
        assert_eq!(
            normalize_date("2024-06-01T12:00:00+02:00"),
            Some("2024-06-01T12:00:00".to_string())
        );
    }

    #[test]
    fn should_accept_short_timestamps_with_zone() {
        assert_eq!(
            normalize_date("2024-06-01T12:00Z"),
            Some("2024-06-01T12:00Z".to_string())
        );
        assert_eq!(
            normalize_date("2024-06-01 12:30"),
            Some("2024-06-01 12:30".to_string())
        );
    }

    #[test]
    fn should_accept_basic_dates() {
        assert_eq!(normalize_date("20240601"), Some("20240601".to_string()));
        assert_eq!(normalize_date("20240601T1230"), Some("20240601T1230".to_string()));
        assert_eq!(normalize_date("20241301"), None);
    }

    #[test]
    fn should_accept_reduced_and_fractional_times() {
        for value in [
            "2024-06-01T12",
            "2024-06-01 12:00:00,5",
            "2024-06-01 08:15:30.25",
            "2024-06-01T12+02",
            "2024-06-01T12-0330",
        ] {
            assert_eq!(normalize_date(value), Some(value.to_string()), "{value}");
        }
        assert_eq!(
            normalize_date("2024-06-01T12:00:00,5"),
            Some("2024-06-01T12:00:00".to_string())
        );
    }

    #[test]
    fn should_reject_malformed_times() {
        assert_eq!(normalize_date("2024-06-01T"), None);
        assert_eq!(normalize_date("2024-06-01T1"), None);
        assert_eq!(normalize_date("2024-06-01T12:5"), None);
        assert_eq!(normalize_date("2024-06-01T12.5"), None);
        assert_eq!(normalize_date("2024-06-01T12:00+24"), None);
        assert_eq!(normalize_date("2024-06-01T12:00:60"), None);
    }

    #[test]
    fn should_reject_invalid_dates() {
        assert_eq!(normalize_date("2024-02-30"), None);
        assert_eq!(normalize_date("June 2024"), None);
        assert_eq!(normalize_date("2024-06-01T25:00:00"), None);
        assert_eq!(normalize_date("24-06-01"), None);
        assert_eq!(normalize_date("0000-01-01"), None);
    }
}
