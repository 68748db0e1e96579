use chrono::{DateTime, Duration, FixedOffset};

use super::event::CalendarEvent;

/// How many merged events reach the receipt.
///
/// Everything that starts inside the lookahead window is shown. If that is
/// fewer than `min_shown`, later events fill up to `min_shown` when they exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPolicy {
    pub min_shown: usize,
    pub lookahead: Duration,
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self {
            min_shown: 4,
            lookahead: Duration::days(7),
        }
    }
}

/// Events from every source, in start order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agenda {
    events: Vec<CalendarEvent>,
}

impl Agenda {
    /// Concatenate sources in the given order and sort by start time.
    /// Events with equal starts keep their concatenation order.
    pub fn merge<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Vec<CalendarEvent>>,
    {
        let mut events: Vec<CalendarEvent> = sources.into_iter().flatten().collect();
        events.sort_by_key(|e| e.start_time());
        Self { events }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn display(&self, now: DateTime<FixedOffset>, policy: &DisplayPolicy) -> &[CalendarEvent] {
        // Sorted, so the in-window events are a prefix. A horizon past the
        // end of time covers everything.
        let within = match now.checked_add_signed(policy.lookahead) {
            Some(horizon) => self.events.partition_point(|e| e.starts_before(horizon)),
            None => self.events.len(),
        };
        let count = within.max(policy.min_shown.min(self.events.len()));
        &self.events[..count]
    }
}
