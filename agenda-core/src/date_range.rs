//! Half-open instant ranges used to query the backend.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// `[start, end)` range of absolute instants.
///
/// The end is exclusive so that a month range ends at the first instant of the
/// following month rather than at a rounded "last second" of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Range covering the local calendar days `[from, until)`.
    pub fn local_days(from: NaiveDate, until: NaiveDate, tz: &Tz) -> Self {
        DateRange {
            start: local_midnight(from, tz),
            end: local_midnight(until, tz),
        }
    }

    /// `start` as an ISO 8601 query value, e.g. `2024-03-01T03:00:00.000Z`.
    pub fn start_param(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// `end` as an ISO 8601 query value.
    pub fn end_param(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// First instant of `date` in the local zone.
///
/// When midnight falls in a DST gap the first valid local time after the gap
/// is used; when it is ambiguous the earlier instant wins.
pub fn local_midnight(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    let mut candidate = Some(midnight);
    // Gaps are at most a couple of hours; a whole day bounds the search.
    let limit = midnight.checked_add_signed(Duration::days(1)).unwrap_or(midnight);
    while let Some(naive) = candidate.filter(|c| *c < limit) {
        if let Some(local) = tz.from_local_datetime(&naive).earliest() {
            return local.with_timezone(&Utc);
        }
        candidate = naive.checked_add_signed(Duration::minutes(15));
    }
    // Unreachable for real zones
    midnight.and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            local_midnight(date, &Tz::UTC),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn negative_offset_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        // Santiago is UTC-3 in March 2024 (summer time)
        assert_eq!(
            local_midnight(date, &chrono_tz::America::Santiago),
            Utc.with_ymd_and_hms(2024, 3, 1, 3, 0, 0).unwrap()
        );
    }

    #[test]
    fn midnight_inside_dst_gap() {
        // Chile springs forward at 24:00 on 2024-09-07, so 2024-09-08 00:00 does not exist
        let date = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        let start = local_midnight(date, &chrono_tz::America::Santiago);
        let local = start.with_timezone(&chrono_tz::America::Santiago);
        assert_eq!(local.date_naive(), date);
        assert_eq!(local.format("%H:%M").to_string(), "01:00");
    }

    #[test]
    fn query_params_use_millis_and_z() {
        let range = DateRange {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 3, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 4, 1, 3, 0, 0).unwrap(),
        };
        assert_eq!(range.start_param(), "2024-03-01T03:00:00.000Z");
        assert_eq!(range.end_param(), "2024-04-01T03:00:00.000Z");
    }
}
