use std::{net::SocketAddr, sync::Arc, time::Duration};

use athome_demo::contact::{ASHA, RAVI};
use athome_submit_contracts::{SubmissionTransport, TransportError};
use athome_submit_impl::{http::HttpClient, RelayTransport};
use athome_testing::relay::{RelayEndpoint, RelayState};
use athome_utils::assert_matches;
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;
use url::Url;

const TOKEN: &str = "983cfc4a";

#[tokio::test]
async fn ajax() {
    // Arrange
    let state = RelayState::new(TOKEN, true);
    let sut = make_sut(serve(Arc::clone(&state)).await, TOKEN);

    // Act
    let result = sut.deliver(&ASHA).await;

    // Assert
    result.unwrap();
    let submissions = state.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].endpoint, RelayEndpoint::Ajax);

    let form = &submissions[0].form;
    assert_eq!(form["name"], "Asha Menon");
    assert_eq!(form["email"], "asha@example.com");
    assert_eq!(form["phone"], "+91 9876543210");
    assert_eq!(form["message"], ASHA.message);
    assert_eq!(form["honeypot"], "");
    assert_eq!(form["_replyto"], "asha@example.com");
    assert_eq!(form["_subject"], "Website Contact - Asha Menon");
    assert_eq!(form["_captcha"], "false");
}

#[tokio::test]
async fn fallback_to_form_post() {
    // Arrange
    let state = RelayState::new(TOKEN, false);
    let sut = make_sut(serve(Arc::clone(&state)).await, TOKEN);

    // Act
    let result = sut.deliver(&RAVI).await;

    // Assert
    result.unwrap();
    let submissions = state.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].endpoint, RelayEndpoint::Form);
    assert_eq!(submissions[0].form["phone"], "Not provided");
}

#[tokio::test]
async fn unknown_token() {
    // Arrange
    let state = RelayState::new(TOKEN, true);
    let sut = make_sut(serve(Arc::clone(&state)).await, "wrong");

    // Act
    let result = sut.deliver(&ASHA).await;

    // Assert
    assert_matches!(result, Err(TransportError::Rejected { status: 404, .. }));
    assert!(state.submissions().await.is_empty());
}

#[tokio::test]
async fn unreachable() {
    // Arrange
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let sut = make_sut(addr, TOKEN);

    // Act
    let result = sut.deliver(&ASHA).await;

    // Assert
    assert_matches!(result, Err(TransportError::Network(_)));
}

fn make_sut(addr: SocketAddr, token: &str) -> RelayTransport {
    let timeout = Duration::from_secs(5);
    let url = Url::parse(&format!("http://{addr}/")).unwrap();
    RelayTransport::new(
        HttpClient::new(timeout).unwrap(),
        HttpClient::without_redirects(timeout).unwrap(),
        &url,
        token,
    )
    .unwrap()
}

async fn serve(state: Arc<RelayState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = athome_testing::relay::router(state);
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    addr
}
