use serde_json::json;
use session_service::{
    ExistenceAware, SaveHandler, SessionBuilder, SqlSaveHandler, collect_garbage,
};

use crate::common::{Browser, sqlite_handler};

#[tokio::test]
async fn test_sqlite_request_cycles() {
    let store: SqlSaveHandler = sqlite_handler("sessions").await;
    let mut browser = Browser::new();

    // Request 1 creates the row
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.set("profile.name", "alice");
    session.flash("notice", "Hello");
    session.save().await.unwrap();
    browser.accept(&session);

    // Request 2 updates it
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    assert_eq!(session.get("notice"), Some(json!("Hello")));
    session.set("profile.theme", "dark");
    session.save().await.unwrap();

    // Request 3 sees the accumulated data without the expired flash
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    assert_eq!(
        session.get("profile"),
        Some(json!({"name": "alice", "theme": "dark"}))
    );
    assert!(!session.has("notice"));
}

#[tokio::test]
async fn test_sqlite_regenerate_inserts_new_row() {
    let store = sqlite_handler("sessions").await;
    let mut browser = Browser::new();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.set("user", "alice");
    session.save().await.unwrap();
    browser.accept(&session);
    let old_id = browser.cookie.clone().unwrap();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.regenerate_id(false).await.unwrap();
    session.save().await.unwrap();
    browser.accept(&session);
    let new_id = browser.cookie.clone().unwrap();

    // Both rows exist: the new one was inserted rather than updating the old one
    let mut raw = store.clone();
    assert!(raw.read(&old_id).await.unwrap().contains("alice"));
    assert!(raw.read(&new_id).await.unwrap().contains("alice"));
    assert!(raw.exists());
}

#[tokio::test]
async fn test_sqlite_garbage_collection_keeps_fresh_sessions() {
    let store = sqlite_handler("sessions").await;
    let browser = Browser::new();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.save().await.unwrap();

    let mut maintenance = store.clone();
    assert_eq!(collect_garbage(&mut maintenance, 3600).await, Some(0));
    assert_eq!(collect_garbage(&mut maintenance, 0).await, Some(1));
}

#[tokio::test]
async fn test_invalid_session_name_is_start_error() {
    let store = sqlite_handler("sessions").await;
    let mut session = SessionBuilder::new("sess_1").save_handler(store).build();

    let result = session.start().await;

    assert!(matches!(result, Err(session_service::SessionError::Start(_))));
    assert_eq!(session.id(), None);
}
