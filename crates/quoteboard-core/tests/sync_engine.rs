use std::sync::Arc;
use std::time::Duration;

use quoteboard_core::mock_remote::{endpoint_for, spawn_local, MockRemote};
use quoteboard_core::notifications::{NotificationLevel, SharedNotifications};
use quoteboard_core::store::{LocalStore, MemoryStore, QuoteStore};
use quoteboard_core::sync::{SyncEngine, TickOutcome, TickReport};
use quoteboard_core::{CoreConfig, Quote, QuoteBoard, SyncConfig};
use tempfile::tempdir;

async fn board_against(remote: MockRemote, dir: &std::path::Path) -> QuoteBoard {
    let addr = spawn_local(remote).await.unwrap();
    let config = CoreConfig::new(dir).with_sync(SyncConfig::new(endpoint_for(addr)));
    QuoteBoard::open(config).unwrap()
}

fn messages(board: &QuoteBoard) -> Vec<String> {
    board
        .notifications()
        .history()
        .into_iter()
        .map(|n| n.message)
        .collect()
}

#[tokio::test]
async fn tick_pushes_then_merges_new_server_quotes() {
    let dir = tempdir().unwrap();
    let remote = MockRemote::new();
    let board = board_against(remote.clone(), dir.path()).await;
    let engine = board.sync_engine().unwrap();

    let outcome = engine.tick().await;
    assert_eq!(
        outcome,
        TickOutcome::Completed(TickReport {
            pushed: true,
            fetched: 5,
            merged: 5,
        })
    );

    // The push carried the collection as it was before the merge
    assert_eq!(remote.pushed(), vec![Quote::defaults()]);

    let quotes = board.quotes();
    assert_eq!(quotes.len(), 8);
    assert!(quotes[3..].iter().all(|q| q.category == "Server"));
    assert!(board.categories().contains(&"Server".to_string()));

    let msgs = messages(&board);
    assert!(msgs.contains(&"Quotes synced to server".to_string()));
    assert!(msgs.contains(&"5 new quotes merged from server".to_string()));
}

#[tokio::test]
async fn second_tick_merges_nothing_and_stays_quiet() {
    let dir = tempdir().unwrap();
    let remote = MockRemote::new();
    let board = board_against(remote.clone(), dir.path()).await;
    let engine = board.sync_engine().unwrap();

    engine.tick().await;
    board.notifications().take_history();

    let outcome = engine.tick().await;
    assert_eq!(
        outcome,
        TickOutcome::Completed(TickReport {
            pushed: true,
            fetched: 5,
            merged: 0,
        })
    );
    assert_eq!(board.quotes().len(), 8);
    assert!(!messages(&board).iter().any(|m| m.contains("merged")));

    // Second push carried the merged collection
    assert_eq!(remote.pushed()[1].len(), 8);
}

#[tokio::test]
async fn single_new_record_is_merged_and_announced() {
    let remote = MockRemote::with_titles(["B"]);
    let addr = spawn_local(remote).await.unwrap();

    let store = QuoteStore::load(LocalStore::new(Arc::new(MemoryStore::new())))
        .unwrap()
        .into_shared();
    let notifications = SharedNotifications::new();
    let engine = SyncEngine::new(
        &SyncConfig::new(endpoint_for(addr)),
        store.clone(),
        notifications.clone(),
    )
    .unwrap();

    let fetched = engine.client().fetch_remote().await;
    assert_eq!(fetched, vec![Quote::new("B", "Server").unwrap()]);

    assert_eq!(engine.merge_remote(&fetched), 1);
    assert_eq!(store.lock().len(), 4);
    assert_eq!(store.lock().quotes()[3].text, "B");

    let history = notifications.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].message, "1 new quote merged from server");
}

#[tokio::test]
async fn merge_checks_collection_at_append_time() {
    let dir = tempdir().unwrap();
    let remote = MockRemote::with_titles(["B", "C"]);
    let board = board_against(remote, dir.path()).await;
    let engine = board.sync_engine().unwrap();

    let fetched = engine.client().fetch_remote().await;
    // A local add of the same record lands after the fetch
    board.add_quote("B", "Server").unwrap();

    assert_eq!(engine.merge_remote(&fetched), 1);
    let quotes = board.quotes();
    assert_eq!(quotes.iter().filter(|q| q.text == "B").count(), 1);
    assert_eq!(quotes.last().unwrap().text, "C");
}

#[tokio::test]
async fn push_failure_leaves_collection_untouched() {
    let dir = tempdir().unwrap();
    let remote = MockRemote::with_titles(Vec::<String>::new()).failing_writes();
    let board = board_against(remote.clone(), dir.path()).await;
    let engine = board.sync_engine().unwrap();

    assert!(!engine.push_local().await);
    assert_eq!(board.quotes(), Quote::defaults());
    assert!(remote.pushed().is_empty());

    let last = board.notifications().history().pop().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
    assert_eq!(last.message, "Failed to sync quotes to server");
}

#[tokio::test]
async fn unreachable_remote_still_completes_tick() {
    let dir = tempdir().unwrap();
    let config = CoreConfig::new(dir.path()).with_sync(SyncConfig::new("http://127.0.0.1:9/posts"));
    let board = QuoteBoard::open(config).unwrap();
    let engine = board.sync_engine().unwrap();

    let outcome = engine.tick().await;
    assert_eq!(
        outcome,
        TickOutcome::Completed(TickReport {
            pushed: false,
            fetched: 0,
            merged: 0,
        })
    );
    assert_eq!(board.quotes(), Quote::defaults());
    assert!(!engine.is_in_flight());
}

#[tokio::test]
async fn failing_reads_fail_open() {
    let dir = tempdir().unwrap();
    let remote = MockRemote::new().failing_reads();
    let board = board_against(remote, dir.path()).await;
    let engine = board.sync_engine().unwrap();

    assert!(engine.client().fetch_remote().await.is_empty());
    assert!(engine.client().try_fetch_remote().await.is_err());
}

#[tokio::test]
async fn overlapping_tick_is_skipped() {
    let dir = tempdir().unwrap();
    let remote = MockRemote::new().read_delay(Duration::from_millis(200));
    let board = board_against(remote, dir.path()).await;
    let engine = board.sync_engine().unwrap();

    let (first, second) = tokio::join!(engine.tick(), engine.tick());
    assert!(matches!(first, TickOutcome::Completed(_)));
    assert_eq!(second, TickOutcome::Skipped);

    // Guard released once the first tick finished
    assert!(matches!(engine.tick().await, TickOutcome::Completed(_)));
}

#[tokio::test]
async fn run_loop_ticks_until_shutdown() {
    let dir = tempdir().unwrap();
    let remote = MockRemote::new();
    let addr = spawn_local(remote.clone()).await.unwrap();
    let sync = SyncConfig::new(endpoint_for(addr)).with_interval(Duration::from_millis(50));
    let board = QuoteBoard::open(CoreConfig::new(dir.path()).with_sync(sync)).unwrap();
    let engine = Arc::new(board.sync_engine().unwrap());

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let runner = tokio::spawn(Arc::clone(&engine).run(shutdown_rx));

    tokio::time::sleep(Duration::from_millis(400)).await;
    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(2), runner)
        .await
        .expect("run loop did not stop")
        .unwrap();

    assert!(remote.pushed().len() >= 2);
    assert_eq!(board.quotes().len(), 8);
}
