//! The backend operations the agenda depends on.
//!
//! The HTTP implementation lives in the CLI; tests drive the agenda with an
//! in-memory implementation.

use std::future::Future;

use crate::date_range::DateRange;
use crate::error::AgendaResult;
use crate::event::{
    CalendarEvent, ConsultationUpdate, NewConsultation, PatientOption, UpcomingConsultation,
};

pub trait AgendaApi {
    /// `GET /dashboard/calendar?start=..&end=..`
    fn list_events(
        &self,
        range: &DateRange,
    ) -> impl Future<Output = AgendaResult<Vec<CalendarEvent>>> + Send;

    /// `POST /consultations`
    fn create_consultation(
        &self,
        consultation: &NewConsultation,
    ) -> impl Future<Output = AgendaResult<()>> + Send;

    /// `PUT /consultations/{id}`
    fn update_consultation(
        &self,
        id: &str,
        update: &ConsultationUpdate,
    ) -> impl Future<Output = AgendaResult<()>> + Send;

    /// `DELETE /consultations/{id}`
    fn delete_consultation(&self, id: &str) -> impl Future<Output = AgendaResult<()>> + Send;

    /// `GET /patients?limit=..`
    fn list_patients(
        &self,
        limit: usize,
    ) -> impl Future<Output = AgendaResult<Vec<PatientOption>>> + Send;

    /// `GET /dashboard/upcoming?limit=..`
    fn upcoming(
        &self,
        limit: usize,
    ) -> impl Future<Output = AgendaResult<Vec<UpcomingConsultation>>> + Send;

    /// `GET /dashboard/today`
    fn today(&self) -> impl Future<Output = AgendaResult<Vec<UpcomingConsultation>>> + Send;
}
