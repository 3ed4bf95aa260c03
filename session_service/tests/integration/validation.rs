use session_service::{
    ExpiredPolicy, MemorySaveHandler, REMOTE_ADDR_KEY, SessionError, USER_AGENT_KEY,
    begin_request,
};

use crate::common::Browser;

#[tokio::test]
async fn test_first_request_records_client_fingerprint() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    let mut session = browser.validated_session(store.clone());
    session.start().await.unwrap();
    session.save().await.unwrap();
    browser.accept(&session);

    let mut session = browser.validated_session(store.clone());
    session.start().await.unwrap();
    assert_eq!(session.get_or(REMOTE_ADDR_KEY, ""), "203.0.113.10");
    assert_eq!(
        session.get_or(USER_AGENT_KEY, ""),
        "Mozilla/5.0 (X11; Linux x86_64)"
    );
}

#[tokio::test]
async fn test_stolen_cookie_from_other_address_is_rejected() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    let mut session = browser.validated_session(store.clone());
    session.start().await.unwrap();
    session.set("user", "alice");
    session.save().await.unwrap();
    browser.accept(&session);

    // Given the cookie replayed from another address
    let mut attacker = browser.clone();
    attacker.addr = "198.51.100.7".to_string();

    // When the session starts
    let mut session = attacker.validated_session(store.clone());
    let result = begin_request(&mut session, ExpiredPolicy::default()).await;

    // Then the remote address validator rejects it and the data stays loaded
    match result {
        Err(SessionError::Validation(e)) => {
            assert_eq!(e.validator(), "RemoteAddrValidator");
            assert_eq!(e.message(), "Session remote address validation failed");
        }
        other => panic!("Expected validation failure, got: {other:?}"),
    }
    assert!(session.is_active());
    assert!(session.has("user"));

    // And the caller can recover by destroying and starting over
    session.destroy().await.unwrap();
    session.start().await.unwrap();
    assert!(!session.has("user"));
    session.save().await.unwrap();
    attacker.accept(&session);
    assert_ne!(attacker.cookie, browser.cookie);
}

#[tokio::test]
async fn test_changed_user_agent_is_rejected_after_address_check() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();

    let mut session = browser.validated_session(store.clone());
    session.start().await.unwrap();
    session.save().await.unwrap();
    browser.accept(&session);

    let mut other = browser.clone();
    other.user_agent = "curl/8.5.0".to_string();

    let mut session = other.validated_session(store.clone());
    let result = session.start().await;

    match result {
        Err(SessionError::Validation(e)) => assert_eq!(e.validator(), "UserAgentValidator"),
        other => panic!("Expected validation failure, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_address_is_rejected_on_first_request() {
    let store = MemorySaveHandler::new();
    let mut browser = Browser::new();
    browser.addr = "unknown".to_string();

    let mut session = browser.validated_session(store);
    let result = session.start().await;

    assert!(matches!(
        result,
        Err(SessionError::Validation(e)) if e.message() == "Invalid remote address"
    ));
}
