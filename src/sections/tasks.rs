use std::io;

use super::Section;
use crate::core::project::ProjectBoard;
use crate::core::task::Task;
use crate::print::{Printer, Style};

const UNFILED_LINE: &str = "    [ ] _________________________";

fn days_label(delta: i64) -> String {
    let unit = if delta.abs() == 1 { "day" } else { "days" };
    format!("{} {}", delta, unit)
}

/// Today's and recently overdue tasks per project, blank lines for
/// hand-written tasks, and everything that needs a new date.
pub struct TasksSection {
    board: Result<ProjectBoard, String>,
    window: i64,
    unfiled_slots: usize,
}

impl TasksSection {
    pub fn new(board: Result<ProjectBoard, String>, window: i64, unfiled_slots: usize) -> Self {
        Self {
            board,
            window,
            unfiled_slots,
        }
    }

    fn print_task(p: &mut dyn Printer, task: &Task, label: &str) -> io::Result<()> {
        p.text(&format!("    [ ] {}{}", label, task.name()))?;
        for subtask in task.subtasks() {
            let mark = if subtask.complete { 'X' } else { ' ' };
            p.text(&format!("        [{}] {}", mark, subtask.name))?;
        }
        if task.subtask_overrun() > 0 {
            p.text(&format!("        {} more items...", task.subtask_overrun()))?;
        }
        Ok(())
    }
}

impl Section for TasksSection {
    fn print(&self, p: &mut dyn Printer) -> io::Result<()> {
        p.set(Style::bold())?;
        p.text("Today's Tasks")?;
        p.set(Style::default())?;

        let board = match &self.board {
            Ok(board) => board,
            Err(e) => return p.text(&format!("Tasks unavailable: {}", e)),
        };

        for project in board.projects() {
            let today = project.tasks_today();
            let due = project.tasks_due_within(self.window);
            if today.is_empty() && due.is_empty() {
                continue;
            }

            p.text(&format!("{}:", project.name))?;
            for task in today {
                Self::print_task(p, task, "")?;
            }
            for task in due {
                Self::print_task(p, task, &format!("({}) ", days_label(task.delta_days())))?;
            }
        }

        p.text("")?;
        for _ in 0..self.unfiled_slots {
            p.text(UNFILED_LINE)?;
        }
        p.text("")?;

        let reschedule = board.reschedule(self.window);
        if !reschedule.is_empty() {
            p.text("Reschedule tasks:")?;
            for task in reschedule {
                p.text(&format!("    - ({}) {}", days_label(task.delta_days()), task.name()))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project::{Project, ProjectOutcome};
    use crate::core::task::{Subtask, SubtaskPolicy};
    use crate::core::temporal::Timestamp;
    use crate::sections::testing::LinePrinter;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    fn task(name: &str, delta: i64, subtasks: Vec<Subtask>) -> Task {
        let policy = SubtaskPolicy {
            show_completed: true,
            max_shown: 2,
        };
        Task::new(
            name,
            Timestamp::Naive(now() + Duration::days(delta)),
            &Timestamp::Naive(now()),
            subtasks,
            &policy,
        )
        .unwrap()
    }

    fn render(section: TasksSection) -> Vec<String> {
        let mut p = LinePrinter::default();
        section.print(&mut p).unwrap();
        p.lines
    }

    #[test]
    fn prints_buckets_per_project() {
        let mut house = Project::new("p1", "House");
        house.push(task(
            "Laundry",
            0,
            vec![
                Subtask::new("Fold", true),
                Subtask::new("Wash", false),
                Subtask::new("Dry", false),
            ],
        ));
        house.push(task("Dishes", -1, Vec::new()));
        house.push(task("Gutters", -9, Vec::new()));
        house.push(task("Paint", 4, Vec::new()));

        let mut computer = Project::new("p2", "Computer");
        computer.push(task("Taxes", -3, Vec::new()));

        let board = ProjectBoard::new(vec![
            ProjectOutcome::Loaded(house),
            ProjectOutcome::Loaded(Project::new("p3", "Errands")),
            ProjectOutcome::NotFound {
                name: "Garden".into(),
            },
            ProjectOutcome::Loaded(computer),
        ]);

        let lines = render(TasksSection::new(Ok(board), 3, 2));
        assert_eq!(
            lines,
            [
                "Today's Tasks",
                "House:",
                "    [ ] Laundry",
                "        [ ] Wash",
                "        [ ] Dry",
                "        1 more items...",
                "    [ ] (-1 day) Dishes",
                "Computer:",
                "    [ ] (-3 days) Taxes",
                "",
                UNFILED_LINE,
                UNFILED_LINE,
                "",
                "Reschedule tasks:",
                "    - (-9 days) Gutters",
            ]
        );
    }

    #[test]
    fn failure_replaces_body() {
        let missing = Err("TickTick config missing bearer_token".into());
        let lines = render(TasksSection::new(missing, 3, 3));
        assert_eq!(
            lines,
            ["Today's Tasks", "Tasks unavailable: TickTick config missing bearer_token"]
        );
    }

    #[test]
    fn empty_board_prints_only_placeholders() {
        let lines = render(TasksSection::new(Ok(ProjectBoard::default()), 3, 1));
        assert_eq!(lines, ["Today's Tasks", "", UNFILED_LINE, ""]);
    }
}
