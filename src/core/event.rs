use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use super::text::filter_emojis;

/// An upcoming calendar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    name: String,
    start_time: DateTime<FixedOffset>,
    is_all_day: bool,
}

impl CalendarEvent {
    pub fn timed(name: &str, start_time: DateTime<FixedOffset>) -> Self {
        Self {
            name: filter_emojis(name),
            start_time,
            is_all_day: false,
        }
    }

    /// An all-day entry. Its start is midnight UTC of `date` and is never shown.
    pub fn all_day(name: &str, date: NaiveDate) -> Self {
        let start_time = date
            .and_time(NaiveTime::MIN)
            .and_utc()
            .fixed_offset();
        Self {
            name: filter_emojis(name),
            start_time,
            is_all_day: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }

    pub fn is_all_day(&self) -> bool {
        self.is_all_day
    }

    pub fn format_time(&self) -> String {
        if self.is_all_day {
            return "All day".to_string();
        }
        self.start_time.format("%I:%M %p").to_string()
    }

    pub fn format_date(&self) -> String {
        self.start_time.format("%a %m/%d").to_string()
    }

    pub fn starts_before(&self, instant: DateTime<FixedOffset>) -> bool {
        self.start_time <= instant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timed_event_formats_in_own_offset() {
        let pdt = FixedOffset::west_opt(7 * 3600).unwrap();
        let start = pdt.with_ymd_and_hms(2026, 10, 21, 14, 5, 0).unwrap();
        let event = CalendarEvent::timed("Dentist", start);
        assert_eq!(event.format_time(), "02:05 PM");
        assert_eq!(event.format_date(), "Wed 10/21");
        assert!(!event.is_all_day());
    }

    #[test]
    fn all_day_event_hides_time() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 23).unwrap();
        let event = CalendarEvent::all_day("Holiday", date);
        assert_eq!(event.format_time(), "All day");
        assert_eq!(event.format_date(), "Fri 10/23");
        assert_eq!(event.start_time().offset().local_minus_utc(), 0);
    }
}
