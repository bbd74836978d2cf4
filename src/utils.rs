//! Some utility functions

use chrono::Utc;

use crate::calendar::MonthGrid;
use crate::task::{DueStatus, Task};
use crate::trashed_task::TrashedTask;

/// A debug utility that pretty-prints a task
pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    let due = match task.due_status(Utc::now()) {
        DueStatus::NoDueDate => " ",
        DueStatus::Later => ".",
        DueStatus::DueTomorrow => "~",
        DueStatus::DueToday => "!",
        DueStatus::Overdue => "x",
    };
    println!("    {}{} [{}] {}\t({}, {})", completion, due, task.priority(), task.title(), task.category(), task.id());
}

/// A debug utility that pretty-prints a list of tasks
pub fn print_task_list(title: &str, tasks: &[Task]) {
    println!("{} ({} tasks)", title, tasks.len());
    for task in tasks {
        print_task(task);
    }
}

/// A debug utility that pretty-prints the content of the trash
pub fn print_trash(trash: &[TrashedTask]) {
    println!("Trash ({} tasks)", trash.len());
    for trashed in trash {
        println!("    {}\tdeleted {}\t(was {})", trashed.title(), trashed.deleted_at().format("%Y-%m-%d %H:%M"), trashed.original_task_id());
    }
}

/// A debug utility that pretty-prints a month grid.
///
/// Padding days are shown in parentheses, holidays with a `*`, today with a `>`
pub fn print_month_grid(grid: &MonthGrid) {
    println!("{:04}-{:02}", grid.year(), grid.month());
    println!("  Sun  Mon  Tue  Wed  Thu  Fri  Sat");
    for week in grid.weeks() {
        let mut line = String::new();
        for day in week {
            let marker = if day.is_today() { ">" } else if day.is_holiday() { "*" } else { " " };
            if day.is_in_displayed_month() {
                line.push_str(&format!(" {}{:>2} ", marker, day.day()));
            } else {
                line.push_str(&format!(" ({:>2})", day.day()));
            }
        }
        println!("{}", line);
    }
    for day in grid.days() {
        if let Some(holiday) = day.holiday() {
            println!("    * {}: {} ({})", holiday.id(), holiday.name(), holiday.kind());
        }
    }
}
