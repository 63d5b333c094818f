use chrono::{Days, Local, NaiveDate, TimeZone};
use regex::Regex;
use std::sync::OnceLock;

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{2})\.(\d{2})\.(\d{4})").expect("static regex"))
}

/// Epoch milliseconds of the first `dd.mm.yyyy` date found in `text`,
/// taken at local midnight. Returns 0 when there is no date.
///
/// Out-of-range days and months roll over into the following ones, so
/// `31.02.2024` is 2 March 2024 and `00.01.2024` is 31 December 2023.
///
/// Watch-date cells hold free text like `"12.03.2024 - 20.03.2024"`; only
/// the first date matters for ordering.
#[must_use]
pub fn first_date_millis(text: &str) -> i64 {
    let Some(caps) = date_regex().captures(text) else {
        return 0;
    };

    let (Ok(day), Ok(month), Ok(year)) = (
        caps[1].parse::<u64>(),
        caps[2].parse::<i32>(),
        caps[3].parse::<i32>(),
    ) else {
        return 0;
    };

    normalized_date(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
        .map_or(0, |dt| dt.timestamp_millis())
}

/// Day `day` of month `month` counted from the first of that month, with
/// both allowed to overflow.
fn normalized_date(year: i32, month: i32, day: u64) -> Option<NaiveDate> {
    let month_index = month - 1;
    let first = NaiveDate::from_ymd_opt(
        year + month_index.div_euclid(12),
        u32::try_from(month_index.rem_euclid(12) + 1).ok()?,
        1,
    )?;

    match day {
        0 => first.checked_sub_days(Days::new(1)),
        _ => first.checked_add_days(Days::new(day - 1)),
    }
}

/// Four-digit year prefix of an ISO date such as `2023-10-05`.
#[must_use]
pub fn year_prefix(date: &str) -> Option<&str> {
    date.get(..4).filter(|y| y.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_date_millis() {
        let expected = Local
            .with_ymd_and_hms(2024, 3, 12, 0, 0, 0)
            .earliest()
            .unwrap()
            .timestamp_millis();
        assert_eq!(first_date_millis("12.03.2024"), expected);
        assert_eq!(first_date_millis("с 12.03.2024 по 20.03.2024"), expected);
    }

    #[test]
    fn test_first_date_millis_ordering() {
        assert!(first_date_millis("01.02.2023") < first_date_millis("01.01.2024"));
    }

    #[test]
    fn test_first_date_millis_invalid() {
        assert_eq!(first_date_millis(""), 0);
        assert_eq!(first_date_millis("2024-03-12"), 0);
        assert_eq!(first_date_millis("12.3.2024"), 0);
    }

    #[test]
    fn test_first_date_millis_rolls_over() {
        assert_eq!(first_date_millis("31.02.2024"), first_date_millis("02.03.2024"));
        assert_eq!(first_date_millis("00.01.2024"), first_date_millis("31.12.2023"));
        assert_eq!(first_date_millis("45.13.2024"), first_date_millis("14.02.2025"));
        assert_eq!(first_date_millis("01.00.2024"), first_date_millis("01.12.2023"));
        assert_ne!(first_date_millis("31.02.2024"), 0);
    }

    #[test]
    fn test_year_prefix() {
        assert_eq!(year_prefix("2023-10-05"), Some("2023"));
        assert_eq!(year_prefix("20"), None);
        assert_eq!(year_prefix(""), None);
    }
}
