use chrono::{Days, Months, NaiveDate};

use crate::error::CoreError;
use crate::models::RecurrenceKind;

/// Returns the next calendar date in a series of the given kind.
///
/// # Arguments
/// * `current` - Date of the current occurrence
/// * `kind` - Step pattern of the series
///
/// # Returns
/// * `Option<NaiveDate>` - The next date, or `None` when the kind does not step
///
/// # Behavior
/// - Daily adds one day, weekly adds seven
/// - Monthly keeps the day of month and clamps to the last day of a shorter
///   target month (Jan 31 -> Feb 28/29)
/// - `None` for `RecurrenceKind::None` and at the end of the representable calendar
pub fn next_date(current: NaiveDate, kind: RecurrenceKind) -> Option<NaiveDate> {
    match kind {
        RecurrenceKind::Daily => current.checked_add_days(Days::new(1)),
        RecurrenceKind::Weekly => current.checked_add_days(Days::new(7)),
        // chrono clamps the day to the target month's length
        RecurrenceKind::Monthly => current.checked_add_months(Months::new(1)),
        RecurrenceKind::None => None,
    }
}

/// Returns the date `steps` steps after `start`.
///
/// Monthly series stay anchored on the start's day of month, so a series
/// starting on the 31st lands on every month end (Jan 31, Feb 29, Mar 31)
/// instead of drifting to the 29th after February. This deliberately differs
/// from chaining `next_date`, which carries a clamped day forward.
pub fn nth_date(start: NaiveDate, kind: RecurrenceKind, steps: u32) -> Option<NaiveDate> {
    match kind {
        RecurrenceKind::Daily => start.checked_add_days(Days::new(u64::from(steps))),
        RecurrenceKind::Weekly => start.checked_add_days(Days::new(7 * u64::from(steps))),
        RecurrenceKind::Monthly => start.checked_add_months(Months::new(steps)),
        RecurrenceKind::None => None,
    }
}

/// Iterator over the dates that follow `start` in a series, up to and
/// including `until`. The start date itself is not yielded.
#[derive(Debug, Clone)]
pub struct SeriesDates {
    start: NaiveDate,
    kind: RecurrenceKind,
    until: NaiveDate,
    steps: u32,
}

impl SeriesDates {
    pub fn new(start: NaiveDate, kind: RecurrenceKind, until: NaiveDate) -> Self {
        Self {
            start,
            kind,
            until,
            steps: 0,
        }
    }
}

impl Iterator for SeriesDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let steps = self.steps.checked_add(1)?;
        let next = nth_date(self.start, self.kind, steps)?;
        if next > self.until {
            return None;
        }
        self.steps = steps;
        Some(next)
    }
}

/// Every date of a series: the base date followed by each stepped date
/// not exceeding `until`. Empty when `until` is before `start`.
pub fn series_dates(start: NaiveDate, kind: RecurrenceKind, until: NaiveDate) -> Vec<NaiveDate> {
    if until < start {
        return Vec::new();
    }
    std::iter::once(start)
        .chain(SeriesDates::new(start, kind, until))
        .collect()
}

/// Checks a recurrence configuration at the input boundary.
///
/// A recurring kind needs an end date on or after the occurrence date;
/// a non-recurring occurrence must not carry one.
pub fn validate_recurrence(
    kind: RecurrenceKind,
    series_end_date: Option<NaiveDate>,
    date: NaiveDate,
) -> Result<(), CoreError> {
    match (kind.is_recurring(), series_end_date) {
        (true, None) => Err(CoreError::InvalidInput(format!(
            "A {} recurrence needs an end date",
            kind
        ))),
        (true, Some(end)) if end < date => Err(CoreError::InvalidInput(format!(
            "Recurrence end date {} is before the occurrence date {}",
            end, date
        ))),
        (false, Some(_)) => Err(CoreError::InvalidInput(
            "An end date was given for an occurrence that does not repeat".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod next_date_tests {
        use super::*;

        #[rstest]
        #[case(ymd(2024, 3, 1), RecurrenceKind::Daily, ymd(2024, 3, 2))]
        #[case(ymd(2024, 12, 31), RecurrenceKind::Daily, ymd(2025, 1, 1))]
        #[case(ymd(2024, 2, 28), RecurrenceKind::Daily, ymd(2024, 2, 29))]
        #[case(ymd(2024, 1, 1), RecurrenceKind::Weekly, ymd(2024, 1, 8))]
        #[case(ymd(2024, 12, 28), RecurrenceKind::Weekly, ymd(2025, 1, 4))]
        #[case(ymd(2024, 1, 15), RecurrenceKind::Monthly, ymd(2024, 2, 15))]
        #[case(ymd(2024, 12, 10), RecurrenceKind::Monthly, ymd(2025, 1, 10))]
        fn steps_by_kind(
            #[case] current: NaiveDate,
            #[case] kind: RecurrenceKind,
            #[case] expected: NaiveDate,
        ) {
            assert_eq!(next_date(current, kind), Some(expected));
        }

        #[rstest]
        #[case(ymd(2024, 1, 31), ymd(2024, 2, 29))]
        #[case(ymd(2023, 1, 31), ymd(2023, 2, 28))]
        #[case(ymd(2024, 3, 31), ymd(2024, 4, 30))]
        #[case(ymd(2024, 8, 31), ymd(2024, 9, 30))]
        fn monthly_clamps_to_month_end(#[case] current: NaiveDate, #[case] expected: NaiveDate) {
            assert_eq!(next_date(current, RecurrenceKind::Monthly), Some(expected));
        }

        #[test]
        fn none_does_not_step() {
            assert_eq!(next_date(ymd(2024, 1, 1), RecurrenceKind::None), None);
        }

        #[test]
        fn end_of_calendar_stops_instead_of_panicking() {
            assert_eq!(next_date(NaiveDate::MAX, RecurrenceKind::Daily), None);
            assert_eq!(next_date(NaiveDate::MAX, RecurrenceKind::Monthly), None);
        }
    }

    mod series_dates_tests {
        use super::*;

        #[test]
        fn daily_range_is_inclusive() {
            let dates = series_dates(ymd(2024, 3, 1), RecurrenceKind::Daily, ymd(2024, 3, 3));
            assert_eq!(dates, vec![ymd(2024, 3, 1), ymd(2024, 3, 2), ymd(2024, 3, 3)]);
        }

        #[test]
        fn monthly_from_the_31st_stays_on_month_ends() {
            let dates = series_dates(ymd(2024, 1, 31), RecurrenceKind::Monthly, ymd(2024, 4, 30));
            assert_eq!(
                dates,
                vec![ymd(2024, 1, 31), ymd(2024, 2, 29), ymd(2024, 3, 31), ymd(2024, 4, 30)]
            );
        }

        #[test]
        fn monthly_non_leap_february() {
            let dates = series_dates(ymd(2023, 1, 30), RecurrenceKind::Monthly, ymd(2023, 3, 30));
            assert_eq!(dates, vec![ymd(2023, 1, 30), ymd(2023, 2, 28), ymd(2023, 3, 30)]);
        }

        #[test]
        fn weekly_stops_before_end_date() {
            let dates = series_dates(ymd(2024, 1, 1), RecurrenceKind::Weekly, ymd(2024, 1, 21));
            assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 1, 8), ymd(2024, 1, 15)]);
        }

        #[test]
        fn end_before_start_is_empty() {
            assert!(series_dates(ymd(2024, 1, 2), RecurrenceKind::Daily, ymd(2024, 1, 1)).is_empty());
        }

        #[test]
        fn daily_and_weekly_match_repeated_stepping() {
            let start = ymd(2024, 2, 27);
            for kind in [RecurrenceKind::Daily, RecurrenceKind::Weekly] {
                let stepped = next_date(next_date(start, kind).unwrap(), kind);
                assert_eq!(nth_date(start, kind, 2), stepped);
            }
        }

        #[test]
        fn none_yields_only_the_start() {
            let dates = series_dates(ymd(2024, 1, 1), RecurrenceKind::None, ymd(2024, 2, 1));
            assert_eq!(dates, vec![ymd(2024, 1, 1)]);
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn recurring_requires_end_date() {
            let result = validate_recurrence(RecurrenceKind::Daily, None, ymd(2024, 1, 1));
            assert!(matches!(result, Err(CoreError::InvalidInput(_))));
        }

        #[test]
        fn end_before_date_is_rejected() {
            let result =
                validate_recurrence(RecurrenceKind::Weekly, Some(ymd(2023, 12, 31)), ymd(2024, 1, 1));
            assert!(matches!(result, Err(CoreError::InvalidInput(_))));
        }

        #[test]
        fn end_on_same_day_is_accepted() {
            assert!(
                validate_recurrence(RecurrenceKind::Monthly, Some(ymd(2024, 1, 1)), ymd(2024, 1, 1))
                    .is_ok()
            );
        }

        #[test]
        fn standalone_with_end_date_is_rejected() {
            let result = validate_recurrence(RecurrenceKind::None, Some(ymd(2024, 2, 1)), ymd(2024, 1, 1));
            assert!(result.is_err());
            assert!(validate_recurrence(RecurrenceKind::None, None, ymd(2024, 1, 1)).is_ok());
        }
    }

    fn recurring_kind() -> impl Strategy<Value = RecurrenceKind> {
        prop_oneof![
            Just(RecurrenceKind::Daily),
            Just(RecurrenceKind::Weekly),
            Just(RecurrenceKind::Monthly),
        ]
    }

    proptest! {
        #[test]
        fn stepping_always_moves_forward(
            days in 0i64..200_000,
            kind in recurring_kind(),
        ) {
            let current = ymd(1900, 1, 1) + chrono::Duration::days(days);
            let next = next_date(current, kind);
            prop_assert!(next.is_some());
            prop_assert!(next.unwrap() > current);
        }

        #[test]
        fn series_is_strictly_increasing_and_bounded(
            start_offset in 0i64..3_000,
            span in 0i64..400,
            kind in recurring_kind(),
        ) {
            let start = ymd(2020, 1, 1) + chrono::Duration::days(start_offset);
            let until = start + chrono::Duration::days(span);
            let dates = series_dates(start, kind, until);

            prop_assert_eq!(dates.first().copied(), Some(start));
            prop_assert!(dates.iter().all(|d| *d <= until));
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
            for (steps, date) in dates.iter().enumerate() {
                prop_assert_eq!(nth_date(start, kind, steps as u32), Some(*date));
            }
            // the step after the last date must overshoot the bound
            let overshoot = nth_date(start, kind, dates.len() as u32);
            prop_assert!(overshoot.map_or(true, |d| d > until));
        }
    }
}
