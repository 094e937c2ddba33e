//! The month being viewed, which drives what gets fetched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::date_range::DateRange;
use crate::error::{AgendaError, AgendaResult};

/// A (year, month) pair. `month` is 0-based (January = 0).
///
/// Both the first day of the month and the first day of the following month
/// are always representable, so `range` never has to guess an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthWindow {
    first: NaiveDate,
    following: NaiveDate,
}

impl MonthWindow {
    pub fn new(year: i32, month: u32) -> AgendaResult<Self> {
        if month > 11 {
            return Err(AgendaError::Validation(format!(
                "Índice de mes {} fuera de rango (0-11)",
                month
            )));
        }
        let out_of_range =
            || AgendaError::Validation(format!("{:04}-{:02} está fuera del calendario", year, month + 1));

        let first = NaiveDate::from_ymd_opt(year, month + 1, 1).ok_or_else(out_of_range)?;
        // The day before the month must exist too, so local midnight on the 1st
        // stays representable in zones east of UTC.
        first.pred_opt().ok_or_else(out_of_range)?;

        let following = if month == 11 {
            year.checked_add(1)
                .and_then(|next_year| NaiveDate::from_ymd_opt(next_year, 1, 1))
        } else {
            NaiveDate::from_ymd_opt(year, month + 2, 1)
        };
        let following = following.ok_or_else(out_of_range)?;

        Ok(MonthWindow { first, following })
    }

    /// Window containing `date`.
    pub fn containing(date: NaiveDate) -> AgendaResult<Self> {
        Self::new(date.year(), date.month0())
    }

    /// Window containing `now` in the local zone.
    pub fn today(now: DateTime<Utc>, tz: &Tz) -> AgendaResult<Self> {
        Self::containing(now.with_timezone(tz).date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 0-based month.
    pub fn month(&self) -> u32 {
        self.first.month0()
    }

    pub fn next(&self) -> AgendaResult<Self> {
        Self::containing(self.following)
    }

    pub fn prev(&self) -> AgendaResult<Self> {
        let last_of_prev = self
            .first
            .pred_opt()
            .ok_or_else(|| AgendaError::Validation(format!("No hay mes anterior a {}", self)))?;
        Self::containing(last_of_prev)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days_in_month(&self) -> u32 {
        let days = self.following.signed_duration_since(self.first).num_days();
        u32::try_from(days).unwrap_or_default()
    }

    /// Number of blank cells before day 1 in a Sunday-first week grid.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Calendar date of `day` (1-based) in this window.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date < self.following
    }

    /// Query window: local midnight on the 1st through local midnight on the
    /// 1st of the following month, exclusive.
    pub fn range(&self, tz: &Tz) -> DateRange {
        DateRange::local_days(self.first, self.following, tz)
    }
}

impl fmt::Display for MonthWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month() + 1)
    }
}

impl FromStr for MonthWindow {
    type Err = AgendaError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AgendaError::Validation(format!("Mes inválido '{}'. Formato esperado AAAA-MM", s));
        let (year, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        MonthWindow::new(year, month - 1)
    }
}
