use agenda_core::{AgendaApi, UpcomingConsultation};
use anyhow::Result;
use chrono_tz::Tz;
use owo_colors::OwoColorize;

use crate::client::Client;
use crate::render::RenderIn;
use crate::utils::tui::with_spinner;

/// Which dashboard list to show.
pub enum Listing {
    Upcoming(usize),
    Today,
}

pub async fn run(client: Client, tz: Tz, listing: Listing) -> Result<()> {
    let consultations: Vec<UpcomingConsultation> = match listing {
        Listing::Upcoming(limit) => {
            with_spinner("Cargando próximas citas", client.upcoming(limit)).await?
        }
        Listing::Today => with_spinner("Cargando citas de hoy", client.today()).await?,
    };

    if consultations.is_empty() {
        println!("{}", "No hay citas".dimmed());
        return Ok(());
    }

    for consultation in &consultations {
        println!("{}", consultation.render_in(&tz));
    }

    Ok(())
}
