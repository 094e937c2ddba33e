//! Terminal rendering for agenda views.
//!
//! Extension traits and small view structs that turn agenda-core types into
//! colored text using owo_colors.

use std::collections::BTreeMap;

use agenda_core::{CalendarEvent, MonthWindow, PatientOption, Selection, UpcomingConsultation};
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Rendering that depends on the local zone.
pub trait RenderIn {
    fn render_in(&self, tz: &Tz) -> String;
}

const WEEKDAYS: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];
const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];
const CELL_WIDTH: usize = 6;

/// `marzo 2024`
pub fn month_title(window: &MonthWindow) -> String {
    format!("{} {}", MONTHS[window.month() as usize], window.year())
}

/// `viernes 15 de marzo`
pub fn day_title(date: NaiveDate) -> String {
    const DAYS: [&str; 7] = [
        "domingo",
        "lunes",
        "martes",
        "miércoles",
        "jueves",
        "viernes",
        "sábado",
    ];
    format!(
        "{} {} de {}",
        DAYS[date.weekday().num_days_from_sunday() as usize],
        date.day(),
        MONTHS[date.month0() as usize]
    )
}

/// Sunday-first weeks of the window; `None` pads the first and last week.
pub fn grid_weeks(window: &MonthWindow) -> Vec<[Option<u32>; 7]> {
    let mut cells: Vec<Option<u32>> = vec![None; window.leading_blanks() as usize];
    cells.extend((1..=window.days_in_month()).map(Some));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    cells
        .chunks(7)
        .map(|week| {
            let mut row = [None; 7];
            row.copy_from_slice(week);
            row
        })
        .collect()
}

/// Month grid with per-day event counts.
pub struct MonthGrid<'a> {
    pub window: MonthWindow,
    pub buckets: &'a BTreeMap<u32, Vec<&'a CalendarEvent>>,
    pub selected: Option<NaiveDate>,
    pub today: NaiveDate,
}

impl MonthGrid<'_> {
    fn cell(&self, day: u32) -> String {
        let count = self.buckets.get(&day).map_or(0, Vec::len);
        let text = if count > 0 {
            format!("{:>2}·{:<2}", day, count)
        } else {
            format!("{:>2}   ", day)
        };
        let text = format!("{:<width$}", text, width = CELL_WIDTH);

        let date = self.window.day(day);
        if date == Some(self.today) {
            text.reversed().to_string()
        } else if date.is_some() && date == self.selected {
            text.cyan().underline().to_string()
        } else if count > 0 {
            text.yellow().to_string()
        } else {
            text
        }
    }
}

impl Render for MonthGrid<'_> {
    fn render(&self) -> String {
        let mut lines = Vec::new();
        let title = month_title(&self.window);
        lines.push(format!("{:^width$}", title, width = CELL_WIDTH * 7).bold().to_string());
        lines.push(
            WEEKDAYS
                .iter()
                .map(|d| format!("{:<width$}", d, width = CELL_WIDTH))
                .collect::<String>()
                .dimmed()
                .to_string(),
        );

        for week in grid_weeks(&self.window) {
            let row: String = week
                .iter()
                .map(|cell| match cell {
                    Some(day) => self.cell(*day),
                    None => " ".repeat(CELL_WIDTH),
                })
                .collect();
            lines.push(row.trim_end().to_string());
        }

        lines.join("\n")
    }
}

/// Side panel listing the events of one day.
pub struct DayPanel<'a> {
    pub date: NaiveDate,
    pub events: &'a [&'a CalendarEvent],
}

impl RenderIn for DayPanel<'_> {
    fn render_in(&self, tz: &Tz) -> String {
        let mut lines = vec![day_title(self.date).bold().to_string()];
        if self.events.is_empty() {
            lines.push(format!("  {}", "No hay citas para este día".dimmed()));
        }
        for event in self.events {
            lines.push(format!("  {}", event.render_in(tz)));
        }
        lines.join("\n")
    }
}

impl RenderIn for CalendarEvent {
    fn render_in(&self, tz: &Tz) -> String {
        format!(
            "{} {} {} {}",
            self.local_time_label(tz).bold(),
            self.title,
            self.reason.dimmed(),
            format!("[{}]", self.id).dimmed()
        )
    }
}

impl RenderIn for UpcomingConsultation {
    fn render_in(&self, tz: &Tz) -> String {
        let local = self.date.with_timezone(tz);
        format!(
            "{} {} ({}) {}",
            local.format("%d/%m/%Y %H:%M").to_string().bold(),
            self.patient_name,
            self.patient_species,
            self.reason.dimmed()
        )
    }
}

impl Render for PatientOption {
    fn render(&self) -> String {
        format!("{} {}", self.label, format!("[{}]", self.id).dimmed())
    }
}

/// Detail view of the open event, including the reschedule draft.
impl RenderIn for Selection {
    fn render_in(&self, tz: &Tz) -> String {
        let Some(event) = self.selected_event() else {
            return match self.selected_date() {
                Some(date) => day_title(date),
                None => String::new(),
            };
        };

        let local = event.local_start(tz);
        let mut lines = vec![
            event.title.bold().to_string(),
            format!("  Fecha:    {}", local.format("%d/%m/%Y %H:%M")),
            format!("  Motivo:   {}", event.reason),
        ];
        if let Some(description) = &event.description {
            lines.push(format!("  Notas:    {}", description));
        }
        lines.push(format!("  Paciente: {}", event.patient_id.dimmed()));

        if let Some(draft) = self.draft() {
            let label = if self.is_rescheduling() {
                "Reagendar:"
            } else {
                "Borrador: "
            };
            lines.push(format!("  {} {} {}", label, draft.date, draft.time).dimmed().to_string());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn march_2024_grid() {
        let window = MonthWindow::new(2024, 2).unwrap();
        let weeks = grid_weeks(&window);

        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0], [None, None, None, None, None, Some(1), Some(2)]);
        assert_eq!(weeks[5][0], Some(31));
        assert_eq!(weeks[5][1], None);
    }

    #[test]
    fn february_starting_on_sunday_fits_four_weeks() {
        // February 2015 started on a Sunday and had 28 days
        let window = MonthWindow::new(2015, 1).unwrap();
        let weeks = grid_weeks(&window);
        assert_eq!(weeks.len(), 4);
        assert!(weeks.iter().flatten().all(Option::is_some));
    }

    #[test]
    fn titles() {
        let window = MonthWindow::new(2024, 2).unwrap();
        assert_eq!(month_title(&window), "marzo 2024");
        assert_eq!(
            day_title(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
            "viernes 15 de marzo"
        );
    }
}
