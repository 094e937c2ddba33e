use agenda_core::{ConsultationStatus, ConsultationUpdate, MonthWindow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use owo_colors::OwoColorize;

use crate::client::Client;
use crate::commands::open_agenda;
use crate::render::RenderIn;
use crate::utils::tui::with_spinner;

pub struct EditArgs {
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub status: Option<ConsultationStatus>,
}

impl From<EditArgs> for ConsultationUpdate {
    fn from(args: EditArgs) -> Self {
        ConsultationUpdate {
            date: None,
            reason: args.reason,
            notes: args.notes,
            status: args.status,
        }
    }
}

pub async fn run(
    client: Client,
    tz: Tz,
    id: &str,
    args: EditArgs,
    window: Option<MonthWindow>,
    now: DateTime<Utc>,
) -> Result<()> {
    let update = ConsultationUpdate::from(args);
    if update.is_empty() {
        anyhow::bail!("Nada que cambiar. Use --reason, --notes o --status");
    }

    let mut agenda = open_agenda(client, tz, window, now).await?;
    agenda.open_event(id)?;

    with_spinner("Guardando", agenda.update_selected(&update)).await?;
    println!("{}", "  Cita actualizada".green());

    // Show the reloaded copy
    if agenda.open_event(id).is_ok() {
        println!("{}", agenda.selection().render_in(&tz));
    }

    Ok(())
}
