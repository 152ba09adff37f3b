//! End-to-end chat cycles against a real SQLite session store

mod common;

use common::{chat_service, create_temp_store, CountingSummaryProvider};
use std::sync::Arc;
use wayfarer::storage::{SessionStore, SqliteSessionStore};
use wayfarer::WayfarerError;

#[tokio::test]
async fn test_long_conversation_keeps_window_bounded() {
    let (store, _tmp) = create_temp_store().await;
    let store = Arc::new(store);
    let summaries = Arc::new(CountingSummaryProvider::default());
    let service = chat_service(store.clone(), summaries.clone(), 6);

    let mut id = None;
    for i in 0..12 {
        let reply = service
            .handle(id.clone(), format!("message {}", i))
            .await
            .unwrap();
        id = Some(reply.session_id);

        let stored = store.get(id.as_deref().unwrap()).await.unwrap().unwrap();
        assert!(stored.recent_messages.len() <= 6, "cycle {}", i);
        assert_eq!(stored.summary, reply.summary);
    }

    // window sizes cycle 5, 4, 6 from the fourth turn on; every third turn fits
    assert_eq!(summaries.prompts().len(), 6);
    let last_prompt = summaries.prompts().pop().unwrap();
    assert!(last_prompt.contains("summary #5"));
}

#[tokio::test]
async fn test_session_resumes_after_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("sessions.db");
    let summaries = Arc::new(CountingSummaryProvider::default());

    let store = Arc::new(SqliteSessionStore::connect(&db_path).await.unwrap());
    let service = chat_service(store.clone(), summaries.clone(), 6);
    let first = service
        .handle(Some("trip-7".to_string()), "Lisbon in June".to_string())
        .await
        .unwrap();
    store.close().unwrap();

    let store = Arc::new(SqliteSessionStore::connect(&db_path).await.unwrap());
    let service = chat_service(store.clone(), summaries, 6);
    let second = service
        .handle(Some(first.session_id.clone()), "And Porto?".to_string())
        .await
        .unwrap();

    assert_eq!(second.session_id, "trip-7");
    let stored = store.get("trip-7").await.unwrap().unwrap();
    let contents: Vec<_> = stored
        .recent_messages
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(
        contents,
        vec!["Lisbon in June", "ok: Lisbon in June", "And Porto?", "ok: And Porto?"]
    );
}

#[tokio::test]
async fn test_failed_turn_leaves_stored_session_untouched() {
    let (store, _tmp) = create_temp_store().await;
    let store = Arc::new(store);
    let service = chat_service(store.clone(), Arc::new(CountingSummaryProvider::default()), 6);

    service
        .handle(Some("s".to_string()), "hello".to_string())
        .await
        .unwrap();
    let before = store.get("s").await.unwrap().unwrap();

    let err = service
        .handle(Some("s".to_string()), "fail please".to_string())
        .await
        .unwrap_err();

    assert!(matches!(
        WayfarerError::classify(&err),
        Some(WayfarerError::Orchestrator(_))
    ));
    assert_eq!(store.get("s").await.unwrap().unwrap(), before);
}

#[tokio::test]
async fn test_parallel_sessions_do_not_interfere() {
    let (store, _tmp) = create_temp_store().await;
    let store = Arc::new(store);
    let service = chat_service(store.clone(), Arc::new(CountingSummaryProvider::default()), 6);

    let mut handles = Vec::new();
    for n in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let id = format!("session-{}", n);
            for turn in 0..3 {
                service
                    .handle(Some(id.clone()), format!("{} turn {}", id, turn))
                    .await
                    .unwrap();
            }
            id
        }));
    }

    for handle in handles {
        let id = handle.await.unwrap();
        let stored = store.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.recent_messages.len(), 6);
        assert!(stored
            .recent_messages
            .iter()
            .all(|m| m.content.contains(id.as_str())));
    }
}
