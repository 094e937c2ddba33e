use agenda_core::MonthWindow;
use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use owo_colors::OwoColorize;

use crate::client::Client;
use crate::commands::open_agenda;
use crate::render::RenderIn;
use crate::utils::tui::with_spinner;

pub async fn run(
    client: Client,
    tz: Tz,
    id: &str,
    date: Option<String>,
    time: Option<String>,
    window: Option<MonthWindow>,
    now: DateTime<Utc>,
) -> Result<()> {
    if date.is_none() && time.is_none() {
        anyhow::bail!("Nada que cambiar. Use --date y/o --time");
    }

    let mut agenda = open_agenda(client, tz, window, now).await?;
    agenda.open_event(id)?;
    println!("{}", agenda.selection().render_in(&tz));

    agenda.begin_reschedule()?;
    agenda.edit_draft(date, time)?;
    let draft = agenda
        .selection()
        .draft()
        .cloned()
        .unwrap_or_default();

    with_spinner("Reagendando", agenda.commit_reschedule()).await?;
    println!(
        "{}",
        format!("  Cita reagendada para el {} a las {}", draft.date, draft.time).green()
    );

    Ok(())
}
