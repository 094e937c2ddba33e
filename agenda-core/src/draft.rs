//! Date/time drafts and their composition into a submission timestamp.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{AgendaError, AgendaResult};
use crate::event::CalendarEvent;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Editable date (`YYYY-MM-DD`) and time (`HH:MM`, 24h) pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RescheduleDraft {
    pub date: String,
    pub time: String,
}

impl RescheduleDraft {
    /// Snapshot of the event's own local date and time.
    pub fn from_event(event: &CalendarEvent, tz: &Tz) -> Self {
        let local = event.local_start(tz);
        RescheduleDraft {
            date: local.format(DATE_FORMAT).to_string(),
            time: local.format(TIME_FORMAT).to_string(),
        }
    }

    /// The instant this draft denotes in the local zone.
    pub fn compose(&self, tz: &Tz) -> AgendaResult<DateTime<Utc>> {
        compose_local(&self.date, &self.time, tz)
    }
}

/// Combines a local date and a local time into an absolute instant.
///
/// Both parts are required. Nothing is defaulted to midnight or to the
/// current time.
pub fn compose_local(date: &str, time: &str, tz: &Tz) -> AgendaResult<DateTime<Utc>> {
    let date = date.trim();
    let time = time.trim();

    if date.is_empty() {
        return Err(AgendaError::Validation("Falta la fecha".into()));
    }
    if time.is_empty() {
        return Err(AgendaError::Validation("Falta la hora".into()));
    }

    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| {
        AgendaError::Validation(format!("Fecha inválida '{}'. Formato esperado AAAA-MM-DD", date))
    })?;
    let time = parse_time(time)?;

    let naive = date.and_time(time);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| {
            AgendaError::Validation(format!("{} no existe en la zona horaria {}", naive, tz.name()))
        })
}

/// Parses a 24-hour `HH:MM` time.
pub fn parse_time(time: &str) -> AgendaResult<NaiveTime> {
    NaiveTime::parse_from_str(time.trim(), TIME_FORMAT).map_err(|_| {
        AgendaError::Validation(format!("Hora inválida '{}'. Formato esperado HH:MM (24h)", time))
    })
}
