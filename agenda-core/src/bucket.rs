//! Grouping fetched events by local calendar day.
//!
//! Every comparison goes through a `YYYY-MM-DD` key derived in the local zone.
//! Comparing keys instead of instant ranges keeps DST days and events close to
//! midnight on the day the user actually sees them on.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::event::CalendarEvent;
use crate::month_window::MonthWindow;

/// Canonical day key of an instant in the local zone.
pub fn day_key(instant: &DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).format("%Y-%m-%d").to_string()
}

/// Canonical day key of a calendar date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Events starting on `date` (local time), ordered by time of day.
///
/// Events with identical start keep the order they were fetched in.
pub fn events_for_day<'a>(
    events: &'a [CalendarEvent],
    date: NaiveDate,
    tz: &Tz,
) -> Vec<&'a CalendarEvent> {
    let key = date_key(date);
    let mut day: Vec<&CalendarEvent> = events
        .iter()
        .filter(|e| day_key(&e.start, tz) == key)
        .collect();
    day.sort_by_key(|e| e.start);
    day
}

/// Whole-month bucketing, keyed by day of month (1-based).
///
/// Events outside the window are dropped. Days without events have no entry.
pub fn bucket_month<'a>(
    events: &'a [CalendarEvent],
    window: &MonthWindow,
    tz: &Tz,
) -> BTreeMap<u32, Vec<&'a CalendarEvent>> {
    let mut buckets: BTreeMap<u32, Vec<&CalendarEvent>> = BTreeMap::new();

    for event in events {
        let local = event.start.with_timezone(tz).date_naive();
        if window.contains(local) {
            buckets.entry(local.day()).or_default().push(event);
        }
    }

    for day in buckets.values_mut() {
        day.sort_by_key(|e| e.start);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(id: &str, start: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: format!("Patient {}", id),
            start,
            end: None,
            reason: "Control".to_string(),
            description: None,
            patient_id: "p1".to_string(),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn event_buckets_under_its_day() {
        let events = vec![event("a", Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap())];
        let window = MonthWindow::new(2024, 2).unwrap();

        let buckets = bucket_month(&events, &window, &Tz::UTC);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[&15].len(), 1);

        assert_eq!(events_for_day(&events, ymd(2024, 3, 15), &Tz::UTC).len(), 1);
        assert!(events_for_day(&events, ymd(2024, 3, 14), &Tz::UTC).is_empty());
    }

    #[test]
    fn negative_offset_uses_local_date() {
        let tz = chrono_tz::America::Santiago;
        let events = vec![event("a", Utc.with_ymd_and_hms(2024, 3, 1, 0, 30, 0).unwrap())];

        assert_eq!(day_key(&events[0].start, &tz), "2024-02-29");
        assert_eq!(events_for_day(&events, ymd(2024, 2, 29), &tz).len(), 1);
        assert!(events_for_day(&events, ymd(2024, 3, 1), &tz).is_empty());

        let march = bucket_month(&events, &MonthWindow::new(2024, 2).unwrap(), &tz);
        assert!(march.is_empty());
        let feb = bucket_month(&events, &MonthWindow::new(2024, 1).unwrap(), &tz);
        assert_eq!(feb[&29].len(), 1);
    }

    #[test]
    fn day_is_sorted_by_time() {
        let events = vec![
            event("late", Utc.with_ymd_and_hms(2024, 3, 15, 18, 0, 0).unwrap()),
            event("early", Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()),
            event("noon", Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()),
        ];
        let ids: Vec<_> = events_for_day(&events, ymd(2024, 3, 15), &Tz::UTC)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, ["early", "noon", "late"]);
    }

    #[test]
    fn bucketing_is_idempotent() {
        let tz = chrono_tz::America::Santiago;
        let events = vec![
            event("a", Utc.with_ymd_and_hms(2024, 3, 1, 2, 59, 0).unwrap()),
            event("b", Utc.with_ymd_and_hms(2024, 3, 1, 3, 0, 0).unwrap()),
            event("c", Utc.with_ymd_and_hms(2024, 3, 31, 23, 0, 0).unwrap()),
            event("d", Utc.with_ymd_and_hms(2024, 4, 1, 3, 30, 0).unwrap()),
        ];
        let window = MonthWindow::new(2024, 2).unwrap();

        let first = bucket_month(&events, &window, &tz);
        let second = bucket_month(&events, &window, &tz);
        assert_eq!(first, second);

        let day = ymd(2024, 3, 1);
        assert_eq!(events_for_day(&events, day, &tz), events_for_day(&events, day, &tz));
    }

    #[test]
    fn events_outside_window_are_dropped() {
        let events = vec![
            event("feb", Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap()),
            event("apr", Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()),
        ];
        let window = MonthWindow::new(2024, 2).unwrap();
        assert!(bucket_month(&events, &window, &Tz::UTC).is_empty());
    }
}
