use agenda_core::MonthWindow;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::client::Client;
use crate::commands::open_agenda;
use crate::render::{DayPanel, MonthGrid, Render, RenderIn};

pub async fn run(
    client: Client,
    tz: Tz,
    window: Option<MonthWindow>,
    select: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Result<()> {
    let window = match (window, select) {
        (Some(window), _) => Some(window),
        (None, Some(date)) => Some(MonthWindow::containing(date)?),
        (None, None) => None,
    };
    let mut agenda = open_agenda(client, tz, window, now).await?;

    let today = now.with_timezone(&tz).date_naive();
    let window = agenda.window();
    let selected = select.unwrap_or(if window.contains(today) {
        today
    } else {
        window.first_day()
    });
    agenda.select_date(selected);

    let buckets = agenda.month_buckets();
    let grid = MonthGrid {
        window,
        buckets: &buckets,
        selected: Some(selected),
        today,
    };
    println!("{}", grid.render());
    println!();

    let events = agenda.day_events();
    let panel = DayPanel {
        date: selected,
        events: &events,
    };
    println!("{}", panel.render_in(&tz));

    Ok(())
}
