mod common;

use common::{server_unavailable, FakeGateway};
use lexis_client::{ErrorCategory, GatewayError};
use lexis_session::{Session, SendOutcome, SendRejection, SessionOptions};
use std::time::Duration;

#[test]
fn test_build_requires_gateway() {
    let err = Session::builder().build().err().unwrap();
    assert!(err.to_string().contains("gateway"));
}

#[test]
fn test_build_rejects_zero_poll_interval() {
    let result = Session::builder()
        .gateway(FakeGateway::new())
        .poll_interval(Duration::ZERO)
        .build();
    assert!(result.is_err());
}

#[test]
fn test_builder_applies_options() {
    let session = Session::builder()
        .gateway(FakeGateway::new())
        .options(SessionOptions::default().poll_interval(Duration::from_secs(5)))
        .greeting("Hi from the test")
        .build()
        .unwrap();

    assert_eq!(session.options().poll_interval, Duration::from_secs(5));
    assert_eq!(
        session.conversation().messages()[0].text(),
        "Hi from the test"
    );
}

#[tokio::test(start_paused = true)]
async fn test_send_waits_for_first_successful_check() {
    let gateway = FakeGateway::new();
    let session = Session::builder().gateway(gateway.clone()).build().unwrap();

    assert_eq!(
        session.send("Hello").await,
        SendOutcome::Rejected(SendRejection::Disconnected)
    );

    session.start();
    let mut connectivity = session.monitor().subscribe();
    connectivity.wait_for(|state| state.connected).await.unwrap();

    assert_eq!(session.send("Hello").await, SendOutcome::Replied);
    assert_eq!(session.conversation().len(), 3);

    session.stop();
}

#[tokio::test(start_paused = true)]
async fn test_health_outage_blocks_sends() {
    let gateway = FakeGateway::new();
    let session = Session::builder()
        .gateway(gateway.clone())
        .poll_interval(Duration::from_secs(10))
        .build()
        .unwrap();
    let mut connectivity = session.monitor().subscribe();

    session.start();
    connectivity.wait_for(|state| state.connected).await.unwrap();

    gateway.push_health_failure(GatewayError::Timeout("timed out".to_string()));
    connectivity.wait_for(|state| !state.connected).await.unwrap();

    assert_eq!(
        session.send("anyone there?").await,
        SendOutcome::Rejected(SendRejection::Disconnected)
    );
    // Health failures never reach the chat log
    assert_eq!(session.conversation().len(), 1);
    assert!(session.conversation().last_error().is_none());

    session.stop();
}

#[tokio::test]
async fn test_retry_connection_dismisses_error_and_rechecks() {
    let gateway = FakeGateway::new();
    let session = Session::builder().gateway(gateway.clone()).build().unwrap();
    gateway.push_health_failure(GatewayError::Connect("refused".to_string()));

    assert!(!session.retry_connection().await.connected);

    let state = session.retry_connection().await;
    assert!(state.connected);
    assert!(session.connectivity().connected);

    gateway.push_chat_failure(server_unavailable());
    assert_eq!(
        session.send("Hello").await,
        SendOutcome::Failed(ErrorCategory::ServerError)
    );
    assert!(session.conversation().last_error().is_some());

    session.retry_connection().await;
    assert!(session.conversation().last_error().is_none());
    assert_eq!(session.conversation().len(), 3);
    assert_eq!(gateway.health_calls(), 3);
}

#[tokio::test]
async fn test_retry_after_stop_sends_new_request() {
    let gateway = FakeGateway::new();
    gateway.hold_health();
    let session = Session::builder().gateway(gateway.clone()).build().unwrap();

    drop(session.monitor().check_now());
    gateway.wait_for_health_calls(1).await;
    session.stop();

    let (state, _) = tokio::join!(session.retry_connection(), async {
        gateway.wait_for_health_calls(2).await;
        gateway.release_health();
    });

    assert!(state.connected);
    assert_eq!(gateway.health_calls(), 2);
}

#[tokio::test]
async fn test_clear_through_session() {
    let gateway = FakeGateway::new();
    let session = Session::builder().gateway(gateway.clone()).build().unwrap();
    session.retry_connection().await;

    session.send("one").await;
    session.send("two").await;
    session.clear().await;

    assert_eq!(session.conversation().len(), 1);
    assert_eq!(gateway.clear_calls(), 1);
}
