mod client;
mod commands;
mod render;
mod utils;

use agenda_core::config::AgendaConfig;
use agenda_core::{ConsultationForm, ConsultationStatus, MonthWindow};
use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use client::Client;
use commands::edit::EditArgs;
use commands::new::NewArgs;
use commands::upcoming::Listing;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Browse and manage the clinic's consultation agenda")]
struct Cli {
    /// Clinic API base URL (overrides api_url in config)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// IANA time zone for calendar days (overrides timezone in config)
    #[arg(long, global = true)]
    timezone: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the month grid and the selected day's appointments
    Month {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<MonthWindow>,

        /// Show the month after --month (or the current one)
        #[arg(long, conflicts_with = "prev")]
        next: bool,

        /// Show the month before --month (or the current one)
        #[arg(long)]
        prev: bool,

        /// Day to select (YYYY-MM-DD)
        #[arg(short, long, value_parser = commands::parse_date)]
        select: Option<chrono::NaiveDate>,
    },
    /// List the appointments of one day
    Day {
        /// Day (YYYY-MM-DD)
        #[arg(value_parser = commands::parse_date)]
        date: chrono::NaiveDate,
    },
    /// Show one appointment
    Show {
        id: String,

        /// Month the appointment is in (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<MonthWindow>,
    },
    /// Schedule a consultation
    New {
        /// Patient id. Prompts with the patient list when omitted
        #[arg(short, long)]
        patient: Option<String>,

        /// Day (YYYY-MM-DD), defaults to today
        #[arg(short, long, value_parser = commands::parse_date)]
        date: Option<chrono::NaiveDate>,

        /// Time (HH:MM, 24h)
        #[arg(short, long, default_value = agenda_core::agenda::DEFAULT_TIME)]
        time: String,

        /// Reason for the visit
        #[arg(short, long, default_value = agenda_core::agenda::DEFAULT_REASON)]
        reason: String,

        /// Instructions for the tutor
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Move an appointment to a new date and/or time
    Reschedule {
        id: String,

        /// New day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// New time (HH:MM, 24h)
        #[arg(short, long)]
        time: Option<String>,

        /// Month the appointment is currently in (YYYY-MM)
        #[arg(short, long)]
        month: Option<MonthWindow>,
    },
    /// Change the reason, notes or status of an appointment
    Edit {
        id: String,

        /// New reason for the visit
        #[arg(short, long)]
        reason: Option<String>,

        /// New instructions for the tutor
        #[arg(short, long)]
        notes: Option<String>,

        /// New status: scheduled, attended or no_show
        #[arg(short, long)]
        status: Option<ConsultationStatus>,

        /// Month the appointment is in (YYYY-MM)
        #[arg(short, long)]
        month: Option<MonthWindow>,
    },
    /// Delete an appointment
    Delete {
        id: String,

        /// Month the appointment is in (YYYY-MM)
        #[arg(short, long)]
        month: Option<MonthWindow>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List patients available for scheduling
    Patients,
    /// List the next consultations
    Upcoming {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List today's consultations
    Today,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AgendaConfig::load()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if cli.timezone.is_some() {
        config.timezone = cli.timezone;
    }

    let detected = iana_time_zone::get_timezone().ok();
    let tz = config.time_zone(detected.as_deref())?;
    let client = Client::new(&config.api_url, config.token.clone())?;
    let now = Utc::now();

    match cli.command {
        Commands::Month {
            month,
            next,
            prev,
            select,
        } => {
            let base = || match month {
                Some(window) => Ok(window),
                None => MonthWindow::today(now, &tz),
            };
            let month = match (next, prev) {
                (true, _) => Some(base()?.next()?),
                (_, true) => Some(base()?.prev()?),
                _ => month,
            };
            commands::month::run(client, tz, month, select, now).await
        }
        Commands::Day { date } => commands::day::run(client, tz, date, now).await,
        Commands::Show { id, month } => commands::show::run(client, tz, &id, month, now).await,
        Commands::New {
            patient,
            date,
            time,
            reason,
            notes,
        } => {
            let args = NewArgs {
                patient,
                date,
                form: ConsultationForm {
                    patient_id: String::new(),
                    time,
                    reason,
                    notes,
                },
                patient_limit: config.patient_limit,
            };
            commands::new::run(client, tz, args, now).await
        }
        Commands::Reschedule {
            id,
            date,
            time,
            month,
        } => commands::reschedule::run(client, tz, &id, date, time, month, now).await,
        Commands::Edit {
            id,
            reason,
            notes,
            status,
            month,
        } => {
            let args = EditArgs {
                reason,
                notes,
                status,
            };
            commands::edit::run(client, tz, &id, args, month, now).await
        }
        Commands::Delete { id, month, yes } => {
            commands::delete::run(client, tz, &id, month, yes, now).await
        }
        Commands::Patients => commands::patients::run(client, config.patient_limit).await,
        Commands::Upcoming { limit } => {
            let limit = limit.unwrap_or(config.upcoming_limit);
            commands::upcoming::run(client, tz, Listing::Upcoming(limit)).await
        }
        Commands::Today => commands::upcoming::run(client, tz, Listing::Today).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_month_argument() {
        let cli = Cli::try_parse_from(["agenda", "month", "--month", "2024-03"]).unwrap();
        match cli.command {
            Commands::Month { month, .. } => {
                assert_eq!(month, Some(MonthWindow::new(2024, 2).unwrap()));
            }
            _ => panic!("expected month command"),
        }
        assert!(Cli::try_parse_from(["agenda", "month", "--month", "2024-3x"]).is_err());
    }

    #[test]
    fn parses_edit_status() {
        let cli = Cli::try_parse_from(["agenda", "edit", "c1", "--status", "no_show"]).unwrap();
        match cli.command {
            Commands::Edit { id, status, reason, .. } => {
                assert_eq!(id, "c1");
                assert_eq!(status, Some(ConsultationStatus::NoShow));
                assert_eq!(reason, None);
            }
            _ => panic!("expected edit command"),
        }
        assert!(Cli::try_parse_from(["agenda", "edit", "c1", "--status", "cancelled"]).is_err());
    }

    #[test]
    fn new_uses_form_defaults() {
        let cli = Cli::try_parse_from(["agenda", "new", "--patient", "p1"]).unwrap();
        match cli.command {
            Commands::New { time, reason, .. } => {
                assert_eq!(time, "10:00");
                assert_eq!(reason, "Consulta General");
            }
            _ => panic!("expected new command"),
        }
    }
}
