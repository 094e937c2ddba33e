use agenda_core::MonthWindow;
use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::client::Client;
use crate::commands::open_agenda;
use crate::render::RenderIn;
use crate::utils::tui::with_spinner;

pub async fn run(
    client: Client,
    tz: Tz,
    id: &str,
    window: Option<MonthWindow>,
    yes: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut agenda = open_agenda(client, tz, window, now).await?;
    agenda.open_event(id)?;
    println!("{}", agenda.selection().render_in(&tz));

    // Confirm unless --yes
    if !yes {
        println!();
        let confirmed = Confirm::new()
            .with_prompt("¿Eliminar esta cita? No se puede deshacer")
            .default(false)
            .interact()?;

        if !confirmed {
            with_spinner("Cargando", agenda.close_event()).await?;
            println!("{}", "Cancelado".dimmed());
            return Ok(());
        }
    }

    with_spinner("Eliminando", agenda.delete_selected()).await?;
    println!("{}", "  Cita eliminada".red());

    Ok(())
}
