use super::task::Task;

/// A record the fetch layer could not turn into a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub title: String,
    pub reason: String,
}

/// A remote task list and the dated tasks pulled from it, in fetch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    tasks: Vec<Task>,
    skipped: Vec<SkippedRecord>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tasks: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn skip(&mut self, title: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedRecord {
            title: title.into(),
            reason: reason.into(),
        });
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks_today(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.due_today()).collect()
    }

    pub fn tasks_due_within(&self, window: i64) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.late_within(window)).collect()
    }

    /// Tasks overdue by more than `window` days.
    pub fn tasks_late(&self, window: i64) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.later_than(window)).collect()
    }
}

/// What happened to one configured project name during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOutcome {
    Loaded(Project),
    NotFound { name: String },
    Failed { name: String, reason: String },
}

impl ProjectOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Loaded(p) => &p.name,
            Self::NotFound { name } | Self::Failed { name, .. } => name,
        }
    }
}

/// All projects of one rendering pass, in configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectBoard {
    outcomes: Vec<ProjectOutcome>,
}

impl ProjectBoard {
    pub fn new(outcomes: Vec<ProjectOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[ProjectOutcome] {
        &self.outcomes
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.outcomes.iter().filter_map(|o| match o {
            ProjectOutcome::Loaded(p) => Some(p),
            _ => None,
        })
    }

    /// Names that were configured but do not exist remotely. Projects that
    /// exist with no dated tasks are not listed.
    pub fn not_found(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ProjectOutcome::NotFound { .. }))
            .map(|o| o.name())
            .collect()
    }

    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ProjectOutcome::Failed { name, reason } => Some((name.as_str(), reason.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Every task overdue beyond the window, across projects.
    pub fn reschedule(&self, window: i64) -> Vec<&Task> {
        self.projects().flat_map(|p| p.tasks_late(window)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::SubtaskPolicy;
    use crate::core::temporal::Timestamp;
    use chrono::{Duration, NaiveDate};

    fn now() -> Timestamp {
        Timestamp::Naive(
            NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(7, 30, 0)
                .unwrap(),
        )
    }

    fn task(name: &str, delta: i64) -> Task {
        let Timestamp::Naive(n) = now() else {
            unreachable!()
        };
        Task::new(
            name,
            Timestamp::Naive(n + Duration::days(delta)),
            &now(),
            Vec::new(),
            &SubtaskPolicy::default(),
        )
        .unwrap()
    }

    fn names(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.name().to_string()).collect()
    }

    fn house() -> Project {
        let mut p = Project::new("p1", "House");
        p.push(task("today", 0));
        p.push(task("yesterday", -1));
        p.push(task("four ago", -4));
        p.push(task("future", 2));
        p
    }

    #[test]
    fn buckets_end_to_end() {
        let p = house();
        assert_eq!(names(&p.tasks_today()), ["today"]);
        assert_eq!(names(&p.tasks_due_within(3)), ["yesterday"]);
        assert_eq!(names(&p.tasks_late(3)), ["four ago"]);

        let all: Vec<String> = [p.tasks_today(), p.tasks_due_within(3), p.tasks_late(3)]
            .concat()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert!(!all.contains(&"future".to_string()));
    }

    #[test]
    fn queries_keep_insertion_order() {
        let mut p = Project::new("p1", "House");
        p.push(task("b", 0));
        p.push(task("a", 0));
        p.push(task("c", 0));
        assert_eq!(names(&p.tasks_today()), ["b", "a", "c"]);
    }

    #[test]
    fn tasks_today_is_idempotent() {
        let p = house();
        assert_eq!(p.tasks_today(), p.tasks_today());
    }

    #[test]
    fn reschedule_flattens_in_project_order() {
        let mut computer = Project::new("p2", "Computer");
        computer.push(task("backup", -10));
        computer.push(task("update", -5));

        let board = ProjectBoard::new(vec![
            ProjectOutcome::Loaded(house()),
            ProjectOutcome::NotFound {
                name: "Garden".into(),
            },
            ProjectOutcome::Loaded(computer),
        ]);
        assert_eq!(names(&board.reschedule(3)), ["four ago", "backup", "update"]);
    }

    #[test]
    fn empty_project_is_kept_but_not_reported_missing() {
        let board = ProjectBoard::new(vec![
            ProjectOutcome::Loaded(Project::new("p3", "Errands")),
            ProjectOutcome::NotFound {
                name: "Garden".into(),
            },
            ProjectOutcome::Failed {
                name: "Work".into(),
                reason: "503".into(),
            },
        ]);
        assert_eq!(board.projects().count(), 1);
        assert!(board.projects().all(|p| p.is_empty()));
        assert_eq!(board.not_found(), ["Garden"]);
        assert_eq!(board.failures(), [("Work", "503")]);
        assert!(board.reschedule(3).is_empty());
    }
}
