use chrono::{DateTime, FixedOffset, NaiveDateTime};
use thiserror::Error;

/// A point in time as handed over by the fetch layer.
///
/// Remote APIs mostly return offset-qualified timestamps, but a record can
/// arrive without an offset. The two kinds are never compared with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl Timestamp {
    pub fn is_zoned(&self) -> bool {
        matches!(self, Self::Zoned(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemporalError {
    #[error("cannot compare a {due} due date against a {now} reference time")]
    MixedAwareness {
        due: &'static str,
        now: &'static str,
    },
}

fn awareness(ts: &Timestamp) -> &'static str {
    if ts.is_zoned() { "zoned" } else { "naive" }
}

/// Signed number of calendar days from `now` to `due`.
///
/// Only the dates matter: 00:01 and 23:59 on the same day are both 0. A zoned
/// due date is first moved into the offset of `now`.
pub fn delta_days(due: &Timestamp, now: &Timestamp) -> Result<i64, TemporalError> {
    let (due_date, now_date) = match (due, now) {
        (Timestamp::Naive(d), Timestamp::Naive(n)) => (d.date(), n.date()),
        (Timestamp::Zoned(d), Timestamp::Zoned(n)) => {
            (d.with_timezone(n.offset()).date_naive(), n.date_naive())
        }
        _ => {
            return Err(TemporalError::MixedAwareness {
                due: awareness(due),
                now: awareness(now),
            });
        }
    };
    Ok((due_date - now_date).num_days())
}

pub fn is_due_today(delta: i64) -> bool {
    delta == 0
}

/// `-window <= delta < 0`. A window of zero is an empty range.
pub fn is_late_within(delta: i64, window: i64) -> bool {
    -window <= delta && delta < 0
}

pub fn is_later_than(delta: i64, window: i64) -> bool {
    delta < -window
}
