//! Wire types exchanged with the clinic backend.
//!
//! Events are immutable once fetched. The agenda replaces its whole list on
//! every load instead of patching individual entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AgendaError;

/// A scheduled consultation as returned by `GET /dashboard/calendar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "deserialize_instant")]
    pub start: DateTime<Utc>,
    /// Backend-computed end (start + 30 minutes). Informational only.
    #[serde(default, deserialize_with = "deserialize_opt_instant")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub reason: String,
    #[serde(default)]
    pub description: Option<String>,
    pub patient_id: String,
}

impl CalendarEvent {
    /// Start expressed in the given local zone.
    pub fn local_start(&self, tz: &Tz) -> DateTime<Tz> {
        self.start.with_timezone(tz)
    }

    /// `HH:MM` in the given local zone, 24-hour clock.
    pub fn local_time_label(&self, tz: &Tz) -> String {
        self.local_start(tz).format("%H:%M").to_string()
    }
}

/// Patient record as returned by `GET /patients`. Only the fields needed
/// for the picker are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub species: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub breed: String,
}

/// A selectable entry in the patient picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientOption {
    pub id: String,
    pub label: String,
}

impl From<PatientRecord> for PatientOption {
    fn from(p: PatientRecord) -> Self {
        PatientOption {
            label: format!("{} ({}) - {}", p.name, p.species, p.breed),
            id: p.id,
        }
    }
}

/// Body of `POST /consultations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewConsultation {
    pub patient_id: String,
    pub date: DateTime<Utc>,
    pub reason: String,
    pub notes: String,
}

/// Body of `PUT /consultations/{id}`. Unset fields are left untouched by
/// the backend, so a reschedule only sends `date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsultationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ConsultationStatus>,
}

impl ConsultationUpdate {
    pub fn reschedule(date: DateTime<Utc>) -> Self {
        ConsultationUpdate {
            date: Some(date),
            ..Default::default()
        }
    }

    /// True when no field would be sent.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.reason.is_none() && self.notes.is_none() && self.status.is_none()
    }
}

/// Lifecycle of a consultation as the backend stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    Scheduled,
    Attended,
    NoShow,
}

impl ConsultationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationStatus::Scheduled => "scheduled",
            ConsultationStatus::Attended => "attended",
            ConsultationStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsultationStatus {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "scheduled" => Ok(ConsultationStatus::Scheduled),
            "attended" => Ok(ConsultationStatus::Attended),
            "no_show" => Ok(ConsultationStatus::NoShow),
            other => Err(AgendaError::Validation(format!(
                "Estado desconocido '{}'. Use scheduled, attended o no_show",
                other
            ))),
        }
    }
}

/// Entry of `GET /dashboard/upcoming` and `GET /dashboard/today`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpcomingConsultation {
    pub id: String,
    #[serde(deserialize_with = "deserialize_instant")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub reason: String,
    pub patient_name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub patient_species: String,
}

/// Accepts RFC 3339 timestamps, and naive timestamps which the backend
/// stores as UTC.
fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_opt_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_instant(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// Optional text fields may come back as `null`.
fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| format!("Fecha y hora inválida '{}'", raw))
}
