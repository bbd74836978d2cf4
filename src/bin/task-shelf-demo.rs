//! This shows how the task board, the trash and the holiday calendar can be used together

use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Duration, Utc};

use task_shelf::cache::Cache;
use task_shelf::utils::{print_month_grid, print_task_list, print_trash};
use task_shelf::{HolidayCalendar, NewTask, Priority, SortOrder, TaskBoard, TaskFilter};

const CACHE_FILE: &str = "test_cache/demo.json";


#[tokio::main]
async fn main() {
    env_logger::init();

    println!("This demo creates a few tasks, moves some of them to the trash, and shows the current month with its holidays.");
    println!("You can set the RUST_LOG environment variable to display more info.");
    println!();

    let cache_path = Path::new(CACHE_FILE);
    let cache = match Cache::from_file(cache_path) {
        Ok(cache) => cache,
        Err(err) => {
            log::warn!("Invalid cache file: {}. Using a default cache", err);
            Cache::new(cache_path)
        }
    };
    let store = Arc::new(cache);

    if let Err(err) = run(store.clone()).await {
        log::error!("Demo failed: {}", err);
        return;
    }

    if let Err(err) = store.save_to_file() {
        log::warn!("Unable to save the cache: {}", err);
    }
}

async fn run(store: Arc<Cache>) -> task_shelf::Result<()> {
    let board = TaskBoard::new(store.clone());
    let now = Utc::now();

    board.create_task(NewTask::new("Buy some milk").with_category("Groceries")).await?;
    board.create_task(NewTask::new("Write the quarterly report")
        .with_priority(Priority::High)
        .with_category("Work")
        .with_due_at(now + Duration::days(1))).await?;
    let call_id = board.create_task(NewTask::new("Call the plumber")
        .with_priority(Priority::Low)
        .with_due_at(now - Duration::hours(3))).await?;
    board.toggle_completion(&call_id).await?;

    print_task_list("All tasks", &board.view());

    board.set_sort_order(SortOrder::PriorityDesc);
    print_task_list("By priority", &board.view());

    board.set_filter(TaskFilter::Pending);
    board.set_search_query("report");
    print_task_list("Pending tasks about \"report\"", &board.view());
    board.set_filter(TaskFilter::All);
    board.set_search_query("");

    let n_trashed = board.trash_completed_tasks().await?;
    println!("{} completed tasks moved to the trash", n_trashed);
    let trashed = board.trash().list().await?;
    print_trash(&trashed);

    if let Some(first) = trashed.first() {
        board.restore_task(first).await?;
        print_task_list("After restoring a task", &board.view());
    }
    board.trash().purge_expired(now).await?;

    let calendar = HolidayCalendar::new(store);
    let today = now.date_naive();
    calendar.initialize_year(today.year()).await?;
    let grid = calendar.month_view(today.year(), today.month(), today).await?;
    print_month_grid(&grid);

    Ok(())
}
