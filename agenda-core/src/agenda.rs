//! The month view controller.
//!
//! `Agenda` owns the month window, the fetched events and the selection
//! state. Every change that should refresh the event list issues an explicit
//! `load` against the backend; nothing is fetched implicitly.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::api::AgendaApi;
use crate::bucket::{bucket_month, date_key, events_for_day};
use crate::draft::compose_local;
use crate::error::{AgendaError, AgendaResult};
use crate::event::{CalendarEvent, ConsultationUpdate, NewConsultation};
use crate::month_window::MonthWindow;
use crate::selection::Selection;

pub const DEFAULT_TIME: &str = "10:00";
pub const DEFAULT_REASON: &str = "Consulta General";

/// Input for scheduling a consultation on the selected date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationForm {
    pub patient_id: String,
    pub time: String,
    pub reason: String,
    pub notes: String,
}

impl Default for ConsultationForm {
    fn default() -> Self {
        ConsultationForm {
            patient_id: String::new(),
            time: DEFAULT_TIME.to_string(),
            reason: DEFAULT_REASON.to_string(),
            notes: String::new(),
        }
    }
}

pub struct Agenda<A> {
    api: A,
    tz: Tz,
    window: MonthWindow,
    events: Vec<CalendarEvent>,
    selection: Selection,
}

impl<A: AgendaApi> Agenda<A> {
    /// Agenda opened on the current month with today selected.
    pub fn new(api: A, tz: Tz, now: DateTime<Utc>) -> AgendaResult<Self> {
        let today = now.with_timezone(&tz).date_naive();
        Ok(Agenda {
            api,
            tz,
            window: MonthWindow::containing(today)?,
            events: Vec::new(),
            selection: Selection::DateSelected { date: today },
        })
    }

    /// Agenda opened on `window` with nothing selected.
    pub fn with_window(api: A, tz: Tz, window: MonthWindow) -> Self {
        Agenda {
            api,
            tz,
            window,
            events: Vec::new(),
            selection: Selection::Idle,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn tz(&self) -> &Tz {
        &self.tz
    }

    pub fn window(&self) -> MonthWindow {
        self.window
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Fetches the current window and replaces the event list.
    pub async fn load(&mut self) -> AgendaResult<()> {
        self.events = self.fetch(self.window).await?;
        Ok(())
    }

    async fn fetch(&self, window: MonthWindow) -> AgendaResult<Vec<CalendarEvent>> {
        let range = window.range(&self.tz);
        debug!(%window, start = %range.start, end = %range.end, "loading events");
        match self.api.list_events(&range).await {
            Ok(events) => {
                debug!(%window, count = events.len(), "events loaded");
                Ok(events)
            }
            Err(e) => {
                warn!(%window, error = %e, "failed to load events");
                Err(e)
            }
        }
    }

    /// Moves to `window` and loads it. The window only changes if the fetch
    /// succeeds.
    pub async fn go_to(&mut self, window: MonthWindow) -> AgendaResult<()> {
        let events = self.fetch(window).await?;
        self.window = window;
        self.events = events;
        Ok(())
    }

    pub async fn next_month(&mut self) -> AgendaResult<()> {
        self.go_to(self.window.next()?).await
    }

    pub async fn prev_month(&mut self) -> AgendaResult<()> {
        self.go_to(self.window.prev()?).await
    }

    /// Jumps to the month containing `now` and selects today.
    pub async fn today(&mut self, now: DateTime<Utc>) -> AgendaResult<()> {
        self.go_to(MonthWindow::today(now, &self.tz)?).await?;
        self.selection
            .select_date(now.with_timezone(&self.tz).date_naive());
        Ok(())
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selection.select_date(date);
    }

    /// Opens a fetched event by id.
    pub fn open_event(&mut self, id: &str) -> AgendaResult<()> {
        let event = self
            .events
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| AgendaError::EventNotFound(id.to_string()))?;
        self.selection.open_event(event, &self.tz);
        Ok(())
    }

    pub fn begin_reschedule(&mut self) -> AgendaResult<()> {
        self.selection.begin_reschedule()
    }

    pub fn edit_draft(&mut self, date: Option<String>, time: Option<String>) -> AgendaResult<()> {
        self.selection.edit_draft(date, time)
    }

    pub fn cancel_reschedule(&mut self) -> AgendaResult<()> {
        self.selection.cancel_reschedule(&self.tz)
    }

    /// Closes the open event and refetches the month.
    pub async fn close_event(&mut self) -> AgendaResult<()> {
        self.selection.close_event()?;
        self.load().await
    }

    /// Events on the selected date, by time of day.
    pub fn day_events(&self) -> Vec<&CalendarEvent> {
        match self.selection.selected_date() {
            Some(date) => events_for_day(&self.events, date, &self.tz),
            None => Vec::new(),
        }
    }

    /// Events of the current window keyed by day of month.
    pub fn month_buckets(&self) -> BTreeMap<u32, Vec<&CalendarEvent>> {
        bucket_month(&self.events, &self.window, &self.tz)
    }

    /// Creates a consultation on the selected date, then reloads.
    pub async fn schedule(&mut self, form: &ConsultationForm) -> AgendaResult<()> {
        if form.patient_id.trim().is_empty() {
            return Err(AgendaError::Validation("Seleccione un paciente".into()));
        }
        if form.reason.trim().is_empty() {
            return Err(AgendaError::Validation("Falta el motivo".into()));
        }
        let date = self
            .selection
            .selected_date()
            .ok_or_else(|| AgendaError::Validation("No hay fecha seleccionada".into()))?;
        let start = compose_local(&date_key(date), &form.time, &self.tz)?;

        let consultation = NewConsultation {
            patient_id: form.patient_id.trim().to_string(),
            date: start,
            reason: form.reason.trim().to_string(),
            notes: form.notes.clone(),
        };
        debug!(patient = %consultation.patient_id, date = %start, "scheduling consultation");
        self.api
            .create_consultation(&consultation)
            .await
            .inspect_err(|e| warn!(error = %e, "failed to schedule consultation"))?;

        self.load().await
    }

    /// Submits the reschedule draft. On success returns to the selected day
    /// and reloads.
    pub async fn commit_reschedule(&mut self) -> AgendaResult<()> {
        let Selection::Rescheduling { event, draft, .. } = &self.selection else {
            return Err(AgendaError::InvalidTransition {
                from: self.selection.name(),
                action: "confirmar el reagendamiento",
            });
        };
        let date = draft.compose(&self.tz)?;
        let id = event.id.clone();

        debug!(event = %id, %date, "rescheduling consultation");
        self.api
            .update_consultation(&id, &ConsultationUpdate::reschedule(date))
            .await
            .inspect_err(|e| warn!(event = %id, error = %e, "failed to reschedule"))?;

        self.close_event().await
    }

    /// Sends `update` for the open event (reason, notes or status). On
    /// success returns to the selected day and reloads.
    pub async fn update_selected(&mut self, update: &ConsultationUpdate) -> AgendaResult<()> {
        let id = self
            .selection
            .selected_event()
            .map(|e| e.id.clone())
            .ok_or(AgendaError::InvalidTransition {
                from: self.selection.name(),
                action: "editar la cita",
            })?;
        if update.is_empty() {
            return Err(AgendaError::Validation("Nada que actualizar".into()));
        }
        if update.reason.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err(AgendaError::Validation("Falta el motivo".into()));
        }

        debug!(event = %id, status = ?update.status, "updating consultation");
        self.api
            .update_consultation(&id, update)
            .await
            .inspect_err(|e| warn!(event = %id, error = %e, "failed to update"))?;

        self.close_event().await
    }

    /// Deletes the open event. On success returns to the selected day and
    /// reloads.
    pub async fn delete_selected(&mut self) -> AgendaResult<()> {
        let id = self
            .selection
            .selected_event()
            .map(|e| e.id.clone())
            .ok_or(AgendaError::InvalidTransition {
                from: self.selection.name(),
                action: "eliminar la cita",
            })?;

        debug!(event = %id, "deleting consultation");
        self.api
            .delete_consultation(&id)
            .await
            .inspect_err(|e| warn!(event = %id, error = %e, "failed to delete"))?;

        self.close_event().await
    }
}
