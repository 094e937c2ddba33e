use agenda_core::AgendaApi;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::client::Client;
use crate::render::Render;
use crate::utils::tui::with_spinner;

pub async fn run(client: Client, limit: usize) -> Result<()> {
    let patients = with_spinner("Cargando pacientes", client.list_patients(limit)).await?;

    if patients.is_empty() {
        println!("{}", "No hay pacientes registrados".dimmed());
        return Ok(());
    }

    for patient in &patients {
        println!("{}", patient.render());
    }

    Ok(())
}
