//! Selection and reschedule state of the month view.
//!
//! A single tagged state replaces independent "selected date", "selected
//! event" and "is rescheduling" flags, so rescheduling without an open event
//! cannot be represented.

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::debug;

use crate::draft::RescheduleDraft;
use crate::error::{AgendaError, AgendaResult};
use crate::event::CalendarEvent;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    Idle,
    DateSelected {
        date: NaiveDate,
    },
    /// An event is under inspection. The draft is already a snapshot of the
    /// event's date and time, ready for rescheduling.
    EventOpen {
        date: NaiveDate,
        event: CalendarEvent,
        draft: RescheduleDraft,
    },
    /// The draft is being edited.
    Rescheduling {
        date: NaiveDate,
        event: CalendarEvent,
        draft: RescheduleDraft,
    },
}

impl Selection {
    pub fn name(&self) -> &'static str {
        match self {
            Selection::Idle => "sin selección",
            Selection::DateSelected { .. } => "con una fecha seleccionada",
            Selection::EventOpen { .. } => "con una cita abierta",
            Selection::Rescheduling { .. } => "reagendando",
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        match self {
            Selection::Idle => None,
            Selection::DateSelected { date }
            | Selection::EventOpen { date, .. }
            | Selection::Rescheduling { date, .. } => Some(*date),
        }
    }

    pub fn selected_event(&self) -> Option<&CalendarEvent> {
        match self {
            Selection::EventOpen { event, .. } | Selection::Rescheduling { event, .. } => {
                Some(event)
            }
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&RescheduleDraft> {
        match self {
            Selection::EventOpen { draft, .. } | Selection::Rescheduling { draft, .. } => {
                Some(draft)
            }
            _ => None,
        }
    }

    pub fn is_rescheduling(&self) -> bool {
        matches!(self, Selection::Rescheduling { .. })
    }

    /// Highlights `date`. Any open event and its draft are discarded.
    pub fn select_date(&mut self, date: NaiveDate) {
        debug!(%date, from = self.name(), "select date");
        *self = Selection::DateSelected { date };
    }

    /// Opens `event` for inspection and snapshots its local date/time into
    /// the draft.
    ///
    /// From `Idle` the event's own local date becomes the selected date.
    pub fn open_event(&mut self, event: &CalendarEvent, tz: &Tz) {
        let date = self
            .selected_date()
            .unwrap_or_else(|| event.local_start(tz).date_naive());
        debug!(event = %event.id, from = self.name(), "open event");
        *self = Selection::EventOpen {
            date,
            event: event.clone(),
            draft: RescheduleDraft::from_event(event, tz),
        };
    }

    pub fn begin_reschedule(&mut self) -> AgendaResult<()> {
        match std::mem::take(self) {
            Selection::EventOpen { date, event, draft } => {
                debug!(event = %event.id, "begin reschedule");
                *self = Selection::Rescheduling { date, event, draft };
                Ok(())
            }
            other => {
                let from = other.name();
                *self = other;
                Err(AgendaError::InvalidTransition {
                    from,
                    action: "reagendar",
                })
            }
        }
    }

    /// Replaces the given parts of the draft. Only valid while rescheduling.
    pub fn edit_draft(&mut self, date: Option<String>, time: Option<String>) -> AgendaResult<()> {
        match self {
            Selection::Rescheduling { draft, .. } => {
                if let Some(date) = date {
                    draft.date = date;
                }
                if let Some(time) = time {
                    draft.time = time;
                }
                Ok(())
            }
            other => Err(AgendaError::InvalidTransition {
                from: other.name(),
                action: "editar el borrador",
            }),
        }
    }

    /// Leaves rescheduling. Edits are dropped and the draft is re-derived
    /// from the event.
    pub fn cancel_reschedule(&mut self, tz: &Tz) -> AgendaResult<()> {
        match std::mem::take(self) {
            Selection::Rescheduling { date, event, .. } => {
                debug!(event = %event.id, "cancel reschedule");
                let draft = RescheduleDraft::from_event(&event, tz);
                *self = Selection::EventOpen { date, event, draft };
                Ok(())
            }
            other => {
                let from = other.name();
                *self = other;
                Err(AgendaError::InvalidTransition {
                    from,
                    action: "cancelar el reagendamiento",
                })
            }
        }
    }

    /// Returns to the selected-day view.
    pub fn close_event(&mut self) -> AgendaResult<()> {
        match self {
            Selection::EventOpen { date, .. } | Selection::Rescheduling { date, .. } => {
                let date = *date;
                *self = Selection::DateSelected { date };
                Ok(())
            }
            other => Err(AgendaError::InvalidTransition {
                from: other.name(),
                action: "cerrar la cita",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event() -> CalendarEvent {
        CalendarEvent {
            id: "e1".into(),
            title: "Luna (Perro)".into(),
            start: Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap(),
            end: None,
            reason: "Vacunación".into(),
            description: None,
            patient_id: "p1".into(),
        }
    }

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn open_event_snapshots_draft() {
        let mut selection = Selection::default();
        selection.select_date(march(15));
        selection.open_event(&event(), &Tz::UTC);

        assert_eq!(
            selection.draft(),
            Some(&RescheduleDraft {
                date: "2024-03-15".into(),
                time: "14:30".into(),
            })
        );
        assert!(!selection.is_rescheduling());
        assert_eq!(selection.selected_date(), Some(march(15)));
    }

    #[test]
    fn open_from_idle_selects_event_day() {
        let mut selection = Selection::Idle;
        selection.open_event(&event(), &chrono_tz::America::Santiago);
        assert_eq!(selection.selected_date(), Some(march(15)));
    }

    #[test]
    fn reschedule_requires_open_event() {
        let mut selection = Selection::default();
        assert!(matches!(
            selection.begin_reschedule(),
            Err(AgendaError::InvalidTransition { from: "sin selección", .. })
        ));

        selection.select_date(march(15));
        assert!(selection.begin_reschedule().is_err());
        assert_eq!(selection, Selection::DateSelected { date: march(15) });
    }

    #[test]
    fn edit_only_while_rescheduling() {
        let mut selection = Selection::default();
        selection.select_date(march(15));
        selection.open_event(&event(), &Tz::UTC);
        assert!(selection.edit_draft(None, Some("10:00".into())).is_err());

        selection.begin_reschedule().unwrap();
        selection
            .edit_draft(Some("2024-03-20".into()), Some("09:15".into()))
            .unwrap();
        assert_eq!(selection.draft().unwrap().date, "2024-03-20");
        assert_eq!(selection.draft().unwrap().time, "09:15");
    }

    #[test]
    fn cancel_rederives_draft() {
        let mut selection = Selection::default();
        selection.select_date(march(15));
        selection.open_event(&event(), &Tz::UTC);
        selection.begin_reschedule().unwrap();
        selection.edit_draft(None, Some("18:00".into())).unwrap();

        selection.cancel_reschedule(&Tz::UTC).unwrap();
        assert!(matches!(selection, Selection::EventOpen { .. }));
        assert_eq!(selection.draft().unwrap().time, "14:30");
        assert!(selection.cancel_reschedule(&Tz::UTC).is_err());
    }

    #[test]
    fn selecting_a_date_discards_event_and_draft() {
        let mut selection = Selection::default();
        selection.select_date(march(15));
        selection.open_event(&event(), &Tz::UTC);
        selection.begin_reschedule().unwrap();

        selection.select_date(march(16));
        assert_eq!(selection, Selection::DateSelected { date: march(16) });
        assert!(selection.selected_event().is_none());
        assert!(selection.draft().is_none());
    }

    #[test]
    fn close_returns_to_selected_day() {
        let mut selection = Selection::default();
        selection.select_date(march(15));
        selection.open_event(&event(), &Tz::UTC);
        selection.begin_reschedule().unwrap();

        selection.close_event().unwrap();
        assert_eq!(selection, Selection::DateSelected { date: march(15) });
        assert!(selection.close_event().is_err());
    }
}
