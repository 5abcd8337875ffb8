//! Semantic validation of datetime scalars.
//!
//! The lexer only checks the shape of a datetime; impossible calendar or
//! clock combinations are rejected here. Calendar arithmetic (days per
//! month, leap years) comes from chrono.

use chrono::NaiveDate;
use tomlkv_parse::{Scalar, ScalarKind};

/// Whether a datetime scalar denotes a real point on the calendar/clock.
/// Non-datetime scalars pass.
pub(crate) fn is_valid_datetime(scalar: &Scalar) -> bool {
    match scalar.kind {
        ScalarKind::OffsetDatetime | ScalarKind::LocalDatetime | ScalarKind::LocalDate => {
            valid_date_and_time(&scalar.text)
        }
        ScalarKind::LocalTime => valid_time(&scalar.text),
        _ => true,
    }
}

fn valid_date_and_time(text: &str) -> bool {
    let bytes = text.as_bytes();
    let (Some(year), Some(month), Some(day)) = (
        number(bytes, 0, 4),
        number(bytes, 5, 2),
        number(bytes, 8, 2),
    ) else {
        return false;
    };
    if NaiveDate::from_ymd_opt(year as i32, month, day).is_none() {
        return false;
    }
    match text.get(11..) {
        Some(time) => valid_time(time),
        None => true,
    }
}

fn valid_time(text: &str) -> bool {
    let bytes = text.as_bytes();
    let (Some(hour), Some(minute), Some(second)) =
        (number(bytes, 0, 2), number(bytes, 3, 2), number(bytes, 6, 2))
    else {
        return false;
    };
    // TODO: accept a leap second (second == 60) at the end of a UTC minute.
    if hour > 23 || minute > 59 || second > 59 {
        return false;
    }

    // Skip over a fraction, then check the offset if one follows.
    let mut pos = 8;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
        }
    }
    match bytes.get(pos) {
        None | Some(b'Z' | b'z') => true,
        Some(b'+' | b'-') => {
            let (Some(off_hour), Some(off_minute)) =
                (number(bytes, pos + 1, 2), number(bytes, pos + 4, 2))
            else {
                return false;
            };
            off_hour <= 23 && off_minute <= 59
        }
        Some(_) => false,
    }
}

fn number(bytes: &[u8], start: usize, len: usize) -> Option<u32> {
    let slice = bytes.get(start..start + len)?;
    let mut value = 0u32;
    for &b in slice {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u32::from(b - b'0');
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tomlkv_parse::Location;

    fn scalar(kind: ScalarKind, text: &str) -> Scalar {
        Scalar {
            kind,
            text: text.to_string(),
            line: 1,
            loc: Location::default(),
        }
    }

    #[rstest]
    #[case(ScalarKind::LocalDate, "1979-05-27")]
    #[case(ScalarKind::LocalDate, "2000-02-29")] // leap year
    #[case(ScalarKind::LocalDate, "2024-02-29")]
    #[case(ScalarKind::LocalTime, "07:32:00")]
    #[case(ScalarKind::LocalTime, "23:59:59.999999")]
    #[case(ScalarKind::LocalDatetime, "1979-05-27T07:32:00")]
    #[case(ScalarKind::OffsetDatetime, "1979-05-27T07:32:00Z")]
    #[case(ScalarKind::OffsetDatetime, "1979-05-27T00:32:00.5-07:00")]
    #[case(ScalarKind::OffsetDatetime, "1979-05-27 07:32:00+23:59")]
    fn accepts(#[case] kind: ScalarKind, #[case] text: &str) {
        assert!(is_valid_datetime(&scalar(kind, text)), "{text}");
    }

    #[rstest]
    #[case(ScalarKind::LocalDate, "1979-13-01")] // month
    #[case(ScalarKind::LocalDate, "1979-00-01")]
    #[case(ScalarKind::LocalDate, "1979-04-31")] // day
    #[case(ScalarKind::LocalDate, "1900-02-29")] // not a leap year
    #[case(ScalarKind::LocalDate, "2023-02-29")]
    #[case(ScalarKind::LocalTime, "24:00:00")]
    #[case(ScalarKind::LocalTime, "12:60:00")]
    #[case(ScalarKind::LocalTime, "12:00:60")] // leap second rejected
    #[case(ScalarKind::OffsetDatetime, "1979-05-27T07:32:00+24:00")]
    #[case(ScalarKind::OffsetDatetime, "1979-05-27T07:32:00+05:60")]
    fn rejects(#[case] kind: ScalarKind, #[case] text: &str) {
        assert!(!is_valid_datetime(&scalar(kind, text)), "{text}");
    }

    #[test]
    fn test_non_datetimes_pass() {
        assert!(is_valid_datetime(&scalar(ScalarKind::IntDec, "42")));
    }
}
