use agenda_core::{AgendaApi, ConsultationForm, MonthWindow, PatientOption};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use dialoguer::Select;
use owo_colors::OwoColorize;

use crate::client::Client;
use crate::commands::open_agenda;
use crate::render::{DayPanel, RenderIn};
use crate::utils::tui::with_spinner;

pub struct NewArgs {
    pub patient: Option<String>,
    pub date: Option<NaiveDate>,
    pub form: ConsultationForm,
    pub patient_limit: usize,
}

pub async fn run(client: Client, tz: Tz, args: NewArgs, now: DateTime<Utc>) -> Result<()> {
    let NewArgs {
        patient,
        date,
        mut form,
        patient_limit,
    } = args;

    form.patient_id = match patient {
        Some(id) => id,
        None => {
            let patients =
                with_spinner("Cargando pacientes", client.list_patients(patient_limit)).await?;
            pick_patient(&patients)?
        }
    };

    let date = date.unwrap_or_else(|| now.with_timezone(&tz).date_naive());
    let mut agenda = open_agenda(client, tz, Some(MonthWindow::containing(date)?), now).await?;
    agenda.select_date(date);

    with_spinner("Agendando", agenda.schedule(&form)).await?;
    println!("{}", format!("  Cita agendada para el {} a las {}", date, form.time).green());
    println!();

    let events = agenda.day_events();
    let panel = DayPanel {
        date,
        events: &events,
    };
    println!("{}", panel.render_in(&tz));

    Ok(())
}

/// Interactive patient picker. Returns the chosen patient's id.
fn pick_patient(patients: &[PatientOption]) -> Result<String> {
    if patients.is_empty() {
        anyhow::bail!("No hay pacientes. Registre al paciente primero o use --patient <id>");
    }

    let labels: Vec<&str> = patients.iter().map(|p| p.label.as_str()).collect();
    let index = Select::new()
        .with_prompt("Paciente")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(patients[index].id.clone())
}
