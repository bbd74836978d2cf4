//! Moving tasks to the trash, restoring and purging them, including when the store fails half-way

use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};

use task_shelf::cache::Cache;
use task_shelf::mock_behaviour::MockBehaviour;
use task_shelf::traits::{TaskStore, TrashStore};
use task_shelf::{Error, NewTask, Priority, Task, TrashBin};


fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

async fn populated_store(mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) -> (Arc<Cache>, Vec<Task>) {
    let mut cache = Cache::in_memory();
    if let Some(mb) = mock_behaviour {
        cache = cache.with_mock_behaviour(mb);
    }
    let store = Arc::new(cache);

    let created_at = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
    let contents = vec![
        NewTask::new("Renew passport").with_priority(Priority::High).with_category("Admin").with_description("Bring two photos"),
        NewTask::new("Water the plants").with_priority(Priority::Low),
        NewTask::new("Book flights").with_category("Travel").with_due_at(created_at + Duration::days(30)),
    ];
    for (i, content) in contents.into_iter().enumerate() {
        store.insert_task(content.with_created_at(created_at + Duration::minutes(i as i64))).await.unwrap();
    }
    let tasks = store.get_tasks().await.unwrap();
    (store, tasks)
}

#[tokio::test]
async fn test_restore_brings_the_same_content_back() {
    init_logs();
    let (store, tasks) = populated_store(None).await;
    let bin = TrashBin::new(store.clone());

    let original = tasks.iter().find(|t| t.title() == "Renew passport").unwrap();
    let trashed = bin.move_to_trash(original).await.unwrap();

    assert_eq!(trashed.original_task_id(), original.id());
    assert_eq!(trashed.title(), "Renew passport");
    assert!(store.get_task(original.id()).await.unwrap().is_none());
    assert_eq!(store.get_tasks().await.unwrap().len(), 2);
    assert_eq!(bin.count().await.unwrap(), 1);

    let new_id = bin.restore(&trashed).await.unwrap();
    assert_ne!(&new_id, original.id());
    assert_eq!(bin.count().await.unwrap(), 0);

    let restored = store.get_task(&new_id).await.unwrap().unwrap();
    assert_eq!(restored.content(), original.content());
    assert_eq!(restored.created_at(), original.created_at());
    assert_eq!(store.get_tasks().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_trash_listing() {
    init_logs();
    let (store, tasks) = populated_store(None).await;
    let bin = TrashBin::new(store.clone());
    let base = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();

    for (i, task) in tasks.iter().enumerate() {
        bin.move_to_trash_at(task, base + Duration::hours(i as i64)).await.unwrap();
    }
    assert!(store.get_tasks().await.unwrap().is_empty());

    let listed = bin.list().await.unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.windows(2).all(|w| w[0].deleted_at() >= w[1].deleted_at()));
    assert_eq!(listed[0].deleted_at(), &(base + Duration::hours(2)));

    let fetched = bin.get(listed[1].id()).await.unwrap();
    assert_eq!(fetched, listed[1]);

    bin.purge_one(&listed[1]).await.unwrap();
    assert!(matches!(bin.get(listed[1].id()).await, Err(Error::TrashEntryNotFound(_))));
    assert_eq!(bin.count().await.unwrap(), 2);

    assert_eq!(bin.purge_all().await.unwrap(), 2);
    assert_eq!(bin.count().await.unwrap(), 0);
    assert_eq!(bin.purge_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_purge_older_than_is_strict() {
    init_logs();
    let (store, tasks) = populated_store(None).await;
    let bin = TrashBin::new(store.clone());
    let t = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    bin.move_to_trash_at(&tasks[0], t - Duration::seconds(1)).await.unwrap();
    bin.move_to_trash_at(&tasks[1], t).await.unwrap();
    bin.move_to_trash_at(&tasks[2], t + Duration::seconds(1)).await.unwrap();

    assert_eq!(bin.purge_older_than(t).await.unwrap(), 1);
    let remaining: Vec<_> = bin.list().await.unwrap().iter().map(|tt| *tt.deleted_at()).collect();
    assert_eq!(remaining, vec![t + Duration::seconds(1), t]);

    assert_eq!(bin.purge_older_than(t).await.unwrap(), 0);
    assert_eq!(bin.purge_older_than(t + Duration::seconds(2)).await.unwrap(), 2);
    assert_eq!(bin.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_purge_expired_uses_the_retention() {
    init_logs();
    let (store, tasks) = populated_store(None).await;
    let bin = TrashBin::new(store.clone());
    let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();

    bin.move_to_trash_at(&tasks[0], now - Duration::days(31)).await.unwrap();
    bin.move_to_trash_at(&tasks[1], now - Duration::days(29)).await.unwrap();

    assert_eq!(bin.purge_expired(now).await.unwrap(), 1);
    let remaining = bin.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].original_task_id(), tasks[1].id());
}

#[tokio::test]
async fn test_failed_move_leaves_the_task_active() {
    init_logs();
    let mock = Arc::new(Mutex::new(MockBehaviour::new()));
    let (store, tasks) = populated_store(Some(mock.clone())).await;
    let bin = TrashBin::new(store.clone());

    // Inserting into the trash fails: nothing happens
    mock.lock().unwrap().insert_trashed_behaviour = (0, 1);
    let result = bin.move_to_trash(&tasks[0]).await;
    assert!(matches!(result, Err(Error::Store { .. })));
    assert_eq!(store.get_tasks().await.unwrap().len(), 3);
    assert_eq!(bin.count().await.unwrap(), 0);

    // Removing from the active tasks fails: the trash entry is taken back
    mock.lock().unwrap().delete_task_behaviour = (0, 1);
    let result = bin.move_to_trash(&tasks[0]).await;
    assert!(matches!(result, Err(Error::Store { .. })));
    assert!(store.get_task(tasks[0].id()).await.unwrap().is_some());
    assert_eq!(bin.count().await.unwrap(), 0);

    // Nothing fails anymore
    bin.move_to_trash(&tasks[0]).await.unwrap();
    assert!(store.get_task(tasks[0].id()).await.unwrap().is_none());
    assert_eq!(bin.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_failed_restore_leaves_the_task_trashed() {
    init_logs();
    let mock = Arc::new(Mutex::new(MockBehaviour::new()));
    let (store, tasks) = populated_store(Some(mock.clone())).await;
    let bin = TrashBin::new(store.clone());
    let trashed = bin.move_to_trash(&tasks[1]).await.unwrap();

    mock.lock().unwrap().insert_task_behaviour = (0, 1);
    assert!(matches!(bin.restore(&trashed).await, Err(Error::Store { .. })));
    assert_eq!(store.get_tasks().await.unwrap().len(), 2);
    assert_eq!(bin.count().await.unwrap(), 1);

    mock.lock().unwrap().delete_trashed_behaviour = (0, 1);
    assert!(matches!(bin.restore(&trashed).await, Err(Error::Store { .. })));
    assert_eq!(store.get_tasks().await.unwrap().len(), 2);
    assert_eq!(bin.count().await.unwrap(), 1);

    let new_id = bin.restore(&trashed).await.unwrap();
    assert_eq!(store.get_task(&new_id).await.unwrap().unwrap().title(), "Water the plants");
    assert_eq!(bin.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_compensation_is_reported() {
    init_logs();
    let mock = Arc::new(Mutex::new(MockBehaviour::new()));
    let (store, tasks) = populated_store(Some(mock.clone())).await;
    let bin = TrashBin::new(store.clone());

    {
        let mut mock = mock.lock().unwrap();
        mock.delete_task_behaviour = (0, 1);
        mock.delete_trashed_behaviour = (0, 1);
    }
    let result = bin.move_to_trash(&tasks[2]).await;
    assert!(matches!(result, Err(Error::Inconsistent { .. })));
}

#[tokio::test]
async fn test_failed_restore_compensation_is_reported() {
    init_logs();
    let mock = Arc::new(Mutex::new(MockBehaviour::new()));
    let (store, tasks) = populated_store(Some(mock.clone())).await;
    let bin = TrashBin::new(store.clone());
    let trashed = bin.move_to_trash(&tasks[0]).await.unwrap();

    {
        let mut mock = mock.lock().unwrap();
        mock.delete_trashed_behaviour = (0, 1);
        mock.delete_task_behaviour = (0, 1);
    }
    let result = bin.restore(&trashed).await;
    assert!(matches!(result, Err(Error::Inconsistent { .. })));

    // The task has been duplicated rather than lost
    assert_eq!(bin.count().await.unwrap(), 1);
    assert_eq!(bin.get(trashed.id()).await.unwrap(), trashed);
    let active = store.get_tasks().await.unwrap();
    assert_eq!(active.len(), 3);
    assert_eq!(active.iter().filter(|t| t.title() == tasks[0].title()).count(), 1);
}

#[tokio::test]
async fn test_trash_snapshots_are_published() {
    init_logs();
    let (store, tasks) = populated_store(None).await;
    let bin = TrashBin::new(store.clone());
    let mut trash_rx = store.watch_trash();
    assert!(trash_rx.borrow_and_update().is_empty());

    bin.move_to_trash(&tasks[0]).await.unwrap();
    assert!(trash_rx.has_changed().unwrap());
    assert_eq!(trash_rx.borrow_and_update().len(), 1);

    bin.purge_all().await.unwrap();
    assert!(trash_rx.borrow_and_update().is_empty());
}
