use agenda_core::MonthWindow;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::client::Client;
use crate::commands::open_agenda;
use crate::render::{DayPanel, RenderIn};

pub async fn run(client: Client, tz: Tz, date: NaiveDate, now: DateTime<Utc>) -> Result<()> {
    let mut agenda = open_agenda(client, tz, Some(MonthWindow::containing(date)?), now).await?;
    agenda.select_date(date);

    let events = agenda.day_events();
    let panel = DayPanel {
        date,
        events: &events,
    };
    println!("{}", panel.render_in(&tz));

    Ok(())
}
