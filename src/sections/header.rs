use chrono::{Datelike, NaiveDate};
use std::io;

use super::Section;
use crate::print::{Printer, Style};

/// `1st`, `2nd`, `3rd`, `4th` ... with `11th` to `13th` as exceptions.
pub fn day_with_suffix(day: u32) -> String {
    if (11..=13).contains(&day) {
        return format!("{}th", day);
    }
    let suffix = match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

/// Today's date in large type.
pub struct Header {
    date: NaiveDate,
}

impl Header {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn title(&self) -> String {
        format!(
            "{} {} {}",
            self.date.format("%B"),
            day_with_suffix(self.date.day()),
            self.date.year()
        )
    }
}

impl Section for Header {
    fn print(&self, p: &mut dyn Printer) -> io::Result<()> {
        p.set(Style::title())?;
        p.text(&self.title())?;
        p.set(Style::default())
    }
}
