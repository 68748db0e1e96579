use chrono::{DateTime, FixedOffset};
use std::io;

use super::Section;
use crate::core::agenda::{Agenda, DisplayPolicy};
use crate::print::{Printer, Style};

pub struct EventsSection {
    agenda: Agenda,
    now: DateTime<FixedOffset>,
    policy: DisplayPolicy,
}

impl EventsSection {
    pub fn new(agenda: Agenda, now: DateTime<FixedOffset>, policy: DisplayPolicy) -> Self {
        Self {
            agenda,
            now,
            policy,
        }
    }
}

impl Section for EventsSection {
    fn print(&self, p: &mut dyn Printer) -> io::Result<()> {
        p.set(Style::bold())?;
        p.text("Upcoming Events")?;
        p.set(Style::default())?;

        let events = self.agenda.display(self.now, &self.policy);
        if events.is_empty() {
            return p.text("No upcoming events");
        }

        for event in events {
            let line = if event.is_all_day() {
                format!("    {}: {}", event.format_date(), event.name())
            } else {
                format!(
                    "    {} {}: {}",
                    event.format_date(),
                    event.format_time(),
                    event.name()
                )
            };
            p.text(&line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::CalendarEvent;
    use crate::sections::testing::LinePrinter;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn prints_timed_and_all_day_lines() {
        let pdt = FixedOffset::west_opt(7 * 3600).unwrap();
        let now = pdt.with_ymd_and_hms(2026, 10, 19, 6, 0, 0).unwrap();
        let dentist = pdt.with_ymd_and_hms(2026, 10, 20, 15, 30, 0).unwrap();
        let birthday = NaiveDate::from_ymd_opt(2026, 10, 22).unwrap();
        let agenda = Agenda::merge([
            vec![CalendarEvent::timed("Dentist", dentist)],
            vec![CalendarEvent::all_day("Mom's birthday", birthday)],
        ]);

        let mut p = LinePrinter::default();
        EventsSection::new(agenda, now, DisplayPolicy::default())
            .print(&mut p)
            .unwrap();
        assert_eq!(
            p.lines,
            [
                "Upcoming Events",
                "    Tue 10/20 03:30 PM: Dentist",
                "    Thu 10/22: Mom's birthday",
            ]
        );
    }

    #[test]
    fn empty_agenda() {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 19, 6, 0, 0)
            .unwrap();
        let mut p = LinePrinter::default();
        EventsSection::new(Agenda::default(), now, DisplayPolicy::default())
            .print(&mut p)
            .unwrap();
        assert_eq!(p.lines, ["Upcoming Events", "No upcoming events"]);
    }
}
