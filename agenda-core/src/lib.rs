//! Core of the clinic agenda.
//!
//! This crate holds the month view logic shared by the CLI:
//! - `month_window` / `date_range` compute the `[start, end)` fetch window
//! - `bucket` groups events by local calendar day
//! - `selection` / `draft` model the select, inspect and reschedule flow
//! - `agenda` ties them to an `AgendaApi` backend

pub mod agenda;
pub mod api;
pub mod bucket;
pub mod config;
pub mod date_range;
pub mod draft;
pub mod error;
pub mod event;
pub mod month_window;
pub mod selection;

pub use agenda::{Agenda, ConsultationForm};
pub use api::AgendaApi;
pub use error::{AgendaError, AgendaResult};
pub use event::*;
pub use month_window::MonthWindow;
pub use selection::Selection;
