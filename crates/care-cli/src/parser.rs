use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use chrono_english::{parse_date_string, Dialect};

/// Parses a calendar date, either `YYYY-MM-DD` or a phrase such as
/// `tomorrow` or `next friday` relative to `now`.
pub fn parse_date<Tz: TimeZone>(input: &str, now: DateTime<Tz>) -> Result<NaiveDate>
where
    Tz::Offset: Copy,
{
    if let Ok(date) = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_string(input, now, Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", input, e))
}

pub fn parse_date_local(input: &str) -> Result<NaiveDate> {
    parse_date(input, Local::now())
}

/// Parses a time of day: `14:30`, `14:30:00`, `2:30 PM` or `9am`.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let trimmed = input.trim();
    let normalized = trimmed.to_uppercase().replace(' ', "");
    for (value, format) in [
        (trimmed, "%H:%M"),
        (trimmed, "%H:%M:%S"),
        (normalized.as_str(), "%I:%M%p"),
    ] {
        if let Ok(time) = NaiveTime::parse_from_str(value, format) {
            return Ok(time);
        }
    }
    // "9AM" has no minutes, which chrono will not parse on its own
    if let Some(hour) = normalized
        .strip_suffix("AM")
        .or_else(|| normalized.strip_suffix("PM"))
    {
        let with_minutes = format!("{}:00{}", hour, &normalized[hour.len()..]);
        if let Ok(time) = NaiveTime::parse_from_str(&with_minutes, "%I:%M%p") {
            return Ok(time);
        }
    }
    Err(anyhow!("Failed to parse time '{}'", input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 10, 0, 0).unwrap()
    }

    #[rstest]
    #[case("2024-05-01", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())]
    #[case(" 2024-12-31 ", NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())]
    #[case("tomorrow", NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())]
    #[case("today", NaiveDate::from_ymd_opt(2024, 3, 14).unwrap())]
    fn parses_dates(#[case] input: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_date(input, fixed_now()).unwrap(), expected);
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_date("not a date at all", fixed_now()).is_err());
    }

    #[rstest]
    #[case("09:00", 9, 0)]
    #[case("14:30", 14, 30)]
    #[case("07:15:00", 7, 15)]
    #[case("2:30 PM", 14, 30)]
    #[case("9am", 9, 0)]
    #[case("12AM", 0, 0)]
    fn parses_times(#[case] input: &str, #[case] hour: u32, #[case] minute: u32) {
        assert_eq!(
            parse_time(input).unwrap(),
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
        );
    }

    #[rstest]
    #[case("25:00")]
    #[case("noonish")]
    #[case("")]
    fn rejects_bad_times(#[case] input: &str) {
        assert!(parse_time(input).is_err());
    }
}
