use super::temporal::{self, TemporalError, Timestamp};
use super::text::filter_emojis;

/// A checklist item inside a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtask {
    pub name: String,
    pub complete: bool,
}

impl Subtask {
    pub fn new(name: impl Into<String>, complete: bool) -> Self {
        Self {
            name: name.into(),
            complete,
        }
    }
}

/// How many subtasks a task shows, and whether finished ones count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtaskPolicy {
    pub show_completed: bool,
    pub max_shown: usize,
}

impl Default for SubtaskPolicy {
    fn default() -> Self {
        Self {
            show_completed: false,
            max_shown: 5,
        }
    }
}

/// Order subtasks incomplete-first and cap them.
///
/// Returns the visible list and the number of visible-policy items cut off.
/// Completed items hidden by `show_completed == false` are not counted.
pub fn reduce_subtasks(raw: Vec<Subtask>, policy: &SubtaskPolicy) -> (Vec<Subtask>, usize) {
    let (mut shown, complete): (Vec<_>, Vec<_>) = raw.into_iter().partition(|s| !s.complete);
    if policy.show_completed {
        shown.extend(complete);
    }

    let overrun = shown.len().saturating_sub(policy.max_shown);
    shown.truncate(policy.max_shown);
    (shown, overrun)
}

/// A dated task. Its day delta is fixed against the `now` it was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    name: String,
    due_date: Timestamp,
    delta_days: i64,
    subtasks: Vec<Subtask>,
    subtask_overrun: usize,
}

impl Task {
    pub fn new(
        name: &str,
        due_date: Timestamp,
        now: &Timestamp,
        subtasks: Vec<Subtask>,
        policy: &SubtaskPolicy,
    ) -> Result<Self, TemporalError> {
        let delta_days = temporal::delta_days(&due_date, now)?;
        let (subtasks, subtask_overrun) = reduce_subtasks(subtasks, policy);
        Ok(Self {
            name: filter_emojis(name),
            due_date,
            delta_days,
            subtasks,
            subtask_overrun,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn due_date(&self) -> &Timestamp {
        &self.due_date
    }

    pub fn delta_days(&self) -> i64 {
        self.delta_days
    }

    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    pub fn subtask_overrun(&self) -> usize {
        self.subtask_overrun
    }

    pub fn due_today(&self) -> bool {
        temporal::is_due_today(self.delta_days)
    }

    pub fn late_within(&self, window: i64) -> bool {
        temporal::is_late_within(self.delta_days, window)
    }

    pub fn later_than(&self, window: i64) -> bool {
        temporal::is_later_than(self.delta_days, window)
    }
}
