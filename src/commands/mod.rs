pub mod day;
pub mod delete;
pub mod edit;
pub mod month;
pub mod new;
pub mod patients;
pub mod reschedule;
pub mod show;
pub mod upcoming;

use agenda_core::{Agenda, MonthWindow};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::client::Client;
use crate::utils::tui::with_spinner;

/// Parse a YYYY-MM-DD argument.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Fecha inválida '{}'. Formato esperado AAAA-MM-DD", s))
}

/// Agenda loaded on `window`, or on the current month when unset.
pub async fn open_agenda(
    client: Client,
    tz: Tz,
    window: Option<MonthWindow>,
    now: DateTime<Utc>,
) -> Result<Agenda<Client>> {
    let window = match window {
        Some(window) => window,
        None => MonthWindow::today(now, &tz)?,
    };
    let mut agenda = Agenda::with_window(client, tz, window);
    with_spinner(&format!("Cargando {}", window), agenda.load()).await?;
    Ok(agenda)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("29/02/2024").is_err());
    }
}
