use chrono::Utc;
use serde_json::json;
use session_service::{
    EXPIRES_KEY, ExpiredPolicy, MemorySaveHandler, SaveHandler, SessionError, SessionState,
    StartOutcome, begin_request, end_request,
};

use crate::common::Browser;

#[tokio::test]
async fn test_cookie_carries_session_between_requests() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    // Request 1: no cookie yet
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.set("cart.items", json!(["book"]));
    session.save().await.unwrap();
    browser.accept(&session);
    let first_id = browser.cookie.clone().expect("cookie issued");

    // Request 2: same id, same data
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    assert_eq!(session.id(), Some(first_id.as_str()));
    assert_eq!(session.get("cart.items"), Some(json!(["book"])));
    session.save().await.unwrap();
    browser.accept(&session);

    assert_eq!(browser.cookie.as_deref(), Some(first_id.as_str()));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_flash_lives_for_exactly_one_more_request() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    // Given a value flashed during a request
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.flash("notice", "Saved");
    assert!(session.has("notice"));
    session.save().await.unwrap();
    browser.accept(&session);

    // Then the next request sees it
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    assert_eq!(session.get("notice"), Some(json!("Saved")));
    session.save().await.unwrap();

    // And the request after that does not
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    assert!(!session.has("notice"));
    session.save().await.unwrap();
}

#[tokio::test]
async fn test_reflash_extends_lifetime() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.flash("step", 1);
    session.save().await.unwrap();
    browser.accept(&session);

    // Flashed again while in its second request
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.flash("step", 2);
    session.save().await.unwrap();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    assert_eq!(session.get("step"), Some(json!(2)));
    session.save().await.unwrap();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    assert!(!session.has("step"));
}

#[tokio::test]
async fn test_now_value_never_reaches_next_request() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.now("banner", "maintenance tonight");
    assert_eq!(session.get("banner"), Some(json!("maintenance tonight")));
    session.save().await.unwrap();
    browser.accept(&session);

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    assert!(!session.has("banner"));
}

#[tokio::test]
async fn test_once_value_survives_start_until_read() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    // Given a once value set in one request
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.once("token", "abc");
    session.save().await.unwrap();
    browser.accept(&session);

    // When a later request reads it
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    assert!(session.has("token"));
    assert_eq!(session.get("token"), Some(json!("abc")));

    // Then it is gone immediately and stays gone
    assert!(!session.has("token"));
    assert_eq!(session.get_or("token", "none"), json!("none"));
    session.save().await.unwrap();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    assert!(!session.has("token"));
}

#[tokio::test]
async fn test_unread_once_value_waits_across_requests() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.once("token", "abc");
    session.save().await.unwrap();
    browser.accept(&session);

    // Two requests that never read it
    for _ in 0..2 {
        let mut session = browser.session(store.clone());
        session.start().await.unwrap();
        assert!(session.has("token"));
        session.save().await.unwrap();
    }

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    assert_eq!(session.get("token"), Some(json!("abc")));
    assert!(!session.has("token"));
}

#[tokio::test]
async fn test_regenerate_moves_data_to_new_record() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.set("user", "alice");
    session.save().await.unwrap();
    browser.accept(&session);
    let old_id = browser.cookie.clone().unwrap();

    // Given a returning session whose record exists
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();

    // When rotating its id and deleting the old record
    session.regenerate_id(true).await.unwrap();
    session.save().await.unwrap();
    browser.accept(&session);

    // Then the data lives under the new id only, written by insert
    let new_id = browser.cookie.clone().unwrap();
    assert_ne!(new_id, old_id);
    assert_eq!(store.peek(&old_id).await, None);
    assert!(store.peek(&new_id).await.unwrap().contains("alice"));
    let stats = store.stats().await;
    assert_eq!(stats.inserts, 2);
    assert_eq!(stats.updates, 0);
}

#[tokio::test]
async fn test_regenerate_without_active_session_fails() {
    let store = MemorySaveHandler::new();
    let mut session = Browser::new().session(store);

    let result = session.regenerate_id(false).await;

    assert!(matches!(result, Err(SessionError::Regenerate(_))));
}

#[tokio::test]
async fn test_destroy_forgets_client() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.set("user", "alice");
    session.save().await.unwrap();
    browser.accept(&session);

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.destroy().await.unwrap();
    session.save().await.unwrap();
    browser.accept(&session);

    assert_eq!(browser.cookie, None);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_expired_session_is_destroyed_by_default_policy() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    // Given a stored session whose expiry mark is one second in the past
    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.set("user", "alice");
    session.set(EXPIRES_KEY, Utc::now().timestamp() - 1);
    session.save().await.unwrap();
    browser.accept(&session);
    let stale_id = browser.cookie.clone().unwrap();

    // When the next request begins with the default policy
    let mut session = browser.session(store.clone());
    let outcome = begin_request(&mut session, ExpiredPolicy::default())
        .await
        .unwrap();
    end_request(&mut session).await.unwrap();
    browser.accept(&session);

    // Then the session is destroyed and the client loses its cookie
    assert_eq!(outcome, StartOutcome::Destroyed);
    assert_eq!(session.state(), SessionState::Destroyed);
    assert_eq!(browser.cookie, None);
    assert_eq!(store.peek(&stale_id).await, None);
}

#[tokio::test]
async fn test_active_session_slides_expiry_mark() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.set(EXPIRES_KEY, Utc::now().timestamp() + 5);
    session.save().await.unwrap();
    browser.accept(&session);

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();

    let mark = session.get_as::<i64>(EXPIRES_KEY).unwrap();
    assert!(mark >= Utc::now().timestamp() + 1800 - 5);
}

#[tokio::test]
async fn test_delete_all_keeps_expiry_mark_across_requests() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    let mut session = browser.session(store.clone());
    session.start().await.unwrap();
    session.set("a", 1).set("b.c", 2);
    session.delete_all();
    assert_eq!(session.all().len(), 1);
    assert!(session.has(EXPIRES_KEY));
    session.save().await.unwrap();
    browser.accept(&session);

    let mut raw = store.clone();
    let id = browser.cookie.clone().unwrap();
    let payload: serde_json::Value = serde_json::from_str(&raw.read(&id).await.unwrap()).unwrap();
    assert!(payload.get(EXPIRES_KEY).is_some());
    assert!(payload.get("a").is_none());
}
