use agenda_core::MonthWindow;
use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::client::Client;
use crate::commands::open_agenda;
use crate::render::RenderIn;

pub async fn run(
    client: Client,
    tz: Tz,
    id: &str,
    window: Option<MonthWindow>,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut agenda = open_agenda(client, tz, window, now).await?;
    agenda.open_event(id)?;
    println!("{}", agenda.selection().render_in(&tz));
    Ok(())
}
