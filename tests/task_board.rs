//! Commands and live views of a task board

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use task_shelf::cache::Cache;
use task_shelf::error::ValidationError;
use task_shelf::traits::{TaskStore, TrashStore};
use task_shelf::{Error, NewTask, Priority, SortOrder, Task, TaskBoard, TaskFilter};


fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn titles(board: &TaskBoard<Cache>) -> Vec<String> {
    board.view().iter().map(|t| t.title().to_string()).collect()
}

#[tokio::test]
async fn test_empty_titles_are_refused() {
    init_logs();
    let store = Arc::new(Cache::in_memory());
    let board = TaskBoard::new(store.clone());

    let result = board.create_task(NewTask::new("   ")).await;
    assert!(matches!(result, Err(Error::Validation(ValidationError::EmptyTitle))));
    assert!(store.get_tasks().await.unwrap().is_empty());

    let id = board.create_task(NewTask::new("Pay rent")).await.unwrap();
    let mut task = board.get_task(&id).await.unwrap().unwrap();
    task.set_title("");
    assert!(matches!(board.update_task(&task).await, Err(Error::Validation(_))));
    assert_eq!(board.get_task(&id).await.unwrap().unwrap().title(), "Pay rent");

    task.set_title("Pay rent and bills");
    task.set_priority(Priority::High);
    board.update_task(&task).await.unwrap();
    let updated = board.get_task(&id).await.unwrap().unwrap();
    assert_eq!(updated.title(), "Pay rent and bills");
    assert_eq!(updated.priority(), &Priority::High);
    assert_eq!(updated.category(), "General");
}

#[tokio::test]
async fn test_view_follows_commands() {
    init_logs();
    let board = TaskBoard::new(Arc::new(Cache::in_memory()));
    let now = Utc::now();
    assert!(board.view().is_empty());

    board.create_task(NewTask::new("Dentist").with_created_at(now - Duration::hours(2))).await.unwrap();
    let gym = board.create_task(NewTask::new("Gym").with_priority(Priority::High).with_created_at(now - Duration::hours(1))).await.unwrap();
    board.create_task(NewTask::new("Groceries").with_priority(Priority::Low).with_created_at(now)).await.unwrap();
    assert_eq!(titles(&board), vec!["Groceries", "Gym", "Dentist"]);

    board.set_sort_order(SortOrder::PriorityDesc);
    assert_eq!(titles(&board), vec!["Gym", "Dentist", "Groceries"]);

    board.set_search_query("G");
    assert_eq!(titles(&board), vec!["Gym", "Groceries"]);

    assert_eq!(board.toggle_completion(&gym).await.unwrap(), true);
    board.set_filter(TaskFilter::Pending);
    assert_eq!(titles(&board), vec!["Groceries"]);
    assert_eq!(board.inputs().filter, TaskFilter::Pending);
    assert_eq!(board.inputs().search_query, "G");

    assert_eq!(board.toggle_completion(&gym).await.unwrap(), false);
    assert_eq!(titles(&board), vec!["Gym", "Groceries"]);

    let groceries = board.view()[1].clone();
    let trashed = board.delete_task(&groceries).await.unwrap();
    assert_eq!(titles(&board), vec!["Gym"]);

    board.restore_task(&trashed).await.unwrap();
    assert_eq!(titles(&board), vec!["Gym", "Groceries"]);
}

#[tokio::test]
async fn test_subscribers_see_new_views() {
    init_logs();
    let board = TaskBoard::new(Arc::new(Cache::in_memory()));
    let mut views = board.subscribe_view();
    assert!(views.borrow_and_update().is_empty());

    board.create_task(NewTask::new("Call the bank")).await.unwrap();
    assert!(views.has_changed().unwrap());
    assert_eq!(views.borrow_and_update()[0].title(), "Call the bank");
}

#[tokio::test]
async fn test_toggle_unknown_task() {
    init_logs();
    let board = TaskBoard::new(Arc::new(Cache::in_memory()));
    let id = board.create_task(NewTask::new("Temporary")).await.unwrap();
    let task = board.get_task(&id).await.unwrap().unwrap();
    board.delete_task(&task).await.unwrap();

    assert!(matches!(board.toggle_completion(&id).await, Err(Error::TaskNotFound(_))));
}

#[tokio::test]
async fn test_trash_completed_tasks() {
    init_logs();
    let store = Arc::new(Cache::in_memory());
    let board = TaskBoard::new(store.clone());

    for title in &["Laundry", "Taxes", "Vacuum", "Oil change"] {
        let id = board.create_task(NewTask::new(*title)).await.unwrap();
        if title.len() > 6 {
            board.toggle_completion(&id).await.unwrap();
        }
    }

    assert_eq!(board.trash_completed_tasks().await.unwrap(), 2);
    let mut remaining = titles(&board);
    remaining.sort();
    assert_eq!(remaining, vec!["Taxes", "Vacuum"]);
    assert_eq!(store.count_trashed().await.unwrap(), 2);
    assert_eq!(board.trash().count().await.unwrap(), 2);

    assert_eq!(board.trash_completed_tasks().await.unwrap(), 0);
}

#[tokio::test]
async fn test_categories() {
    init_logs();
    let board = TaskBoard::new(Arc::new(Cache::in_memory()));
    board.create_task(NewTask::new("Report").with_category("Work")).await.unwrap();
    board.create_task(NewTask::new("Flowers").with_category("Home")).await.unwrap();
    board.create_task(NewTask::new("Meeting").with_category("Work")).await.unwrap();
    board.create_task(NewTask::new("Misc")).await.unwrap();

    assert_eq!(board.categories().await.unwrap(), vec!["General", "Home", "Work"]);
}

#[tokio::test]
async fn test_updates_never_move_the_creation_date() {
    init_logs();
    let board = TaskBoard::new(Arc::new(Cache::in_memory()));
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    board.create_task(NewTask::new("Older").with_created_at(created_at - Duration::days(1))).await.unwrap();
    let id = board.create_task(NewTask::new("Yearly review").with_created_at(created_at)).await.unwrap();
    let stored = board.get_task(&id).await.unwrap().unwrap();

    let moved = stored.content().clone().with_created_at(created_at + Duration::days(400));
    board.update_task(&Task::from_new(*stored.id(), moved)).await.unwrap();

    assert_eq!(board.get_task(&id).await.unwrap().unwrap().created_at(), &created_at);
    assert_eq!(titles(&board), vec!["Yearly review", "Older"]);
}

#[tokio::test]
async fn test_subscribers_see_changes_made_elsewhere() {
    init_logs();
    let store = Arc::new(Cache::in_memory());
    let board = TaskBoard::new(store.clone());
    let mut views = board.subscribe_view();
    assert!(views.borrow_and_update().is_empty());

    store.insert_task(NewTask::new("Inserted directly")).await.unwrap();
    let other_board = TaskBoard::new(store.clone());
    other_board.create_task(NewTask::new("Created by another board")).await.unwrap();

    let wait = async {
        loop {
            views.changed().await.unwrap();
            if views.borrow_and_update().len() == 2 {
                break;
            }
        }
    };
    tokio::time::timeout(std::time::Duration::from_secs(5), wait).await
        .expect("the view never caught up with the store");
    assert_eq!(board.view().len(), 2);
}

#[tokio::test]
async fn test_deletion_trashes_the_latest_content() {
    init_logs();
    let board = TaskBoard::new(Arc::new(Cache::in_memory()));
    let id = board.create_task(NewTask::new("Pick up parcel")).await.unwrap();
    let outdated = board.get_task(&id).await.unwrap().unwrap();
    board.toggle_completion(&id).await.unwrap();

    let trashed = board.delete_task(&outdated).await.unwrap();
    assert!(trashed.snapshot().completed);
    assert!(board.view().is_empty());

    assert!(matches!(board.delete_task(&outdated).await, Err(Error::TaskNotFound(_))));
    assert_eq!(board.trash().count().await.unwrap(), 1);
}
