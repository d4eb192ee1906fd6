//! Token proxy integration tests.
//!
//! Spawns the real router and a wiremock token server, then drives
//! `POST /api/v1/voicemode/token` end to end.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use std::time::Duration;
use vm_test_utils::{
    TestTokenBuilder, TestVoiceModeServer, VoiceModeClient, TEST_JWT_SECRET, TEST_LIVEKIT_URL,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn enabled_server(token_server: &MockServer) -> Result<TestVoiceModeServer> {
    TestVoiceModeServer::builder()
        .enabled(true)
        .token_server_url(format!("{}/token", token_server.uri()))
        .spawn()
        .await
}

fn session_token() -> String {
    TestTokenBuilder::new().sign(TEST_JWT_SECRET)
}

#[tokio::test]
async fn test_relays_token_and_url_verbatim() -> Result<()> {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_json(serde_json::json!({"identity": "alice", "room": "standup"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"token": "T", "url": "U"})),
        )
        .expect(1)
        .mount(&token_server)
        .await;

    let server = enabled_server(&token_server).await?;
    let client = VoiceModeClient::new(server.url());

    let response = client
        .get_livekit_token(&session_token(), "alice", "standup")
        .await?;

    assert_eq!(response.token, "T");
    assert_eq!(response.url, "U");

    Ok(())
}

#[tokio::test]
async fn test_missing_url_uses_configured_default() -> Result<()> {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "T"})))
        .mount(&token_server)
        .await;

    let server = enabled_server(&token_server).await?;
    let client = VoiceModeClient::new(server.url());

    let response = client
        .get_livekit_token(&session_token(), "alice", "standup")
        .await?;

    assert_eq!(response.token, "T");
    assert_eq!(response.url, TEST_LIVEKIT_URL);

    Ok(())
}

#[tokio::test]
async fn test_response_body_has_exactly_token_and_url() -> Result<()> {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"token": "T", "url": "U", "expires_in": 600, "extra": true}),
        ))
        .mount(&token_server)
        .await;

    let server = enabled_server(&token_server).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/voicemode/token", server.url()))
        .bearer_auth(session_token())
        .json(&serde_json::json!({"identity": "alice", "room": "standup"}))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body, serde_json::json!({"token": "T", "url": "U"}));

    Ok(())
}

#[tokio::test]
async fn test_disabled_feature_returns_503_without_upstream_call() -> Result<()> {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "T"})))
        .expect(0)
        .mount(&token_server)
        .await;

    let server = TestVoiceModeServer::builder()
        .enabled(false)
        .token_server_url(format!("{}/token", token_server.uri()))
        .spawn()
        .await?;
    let client = VoiceModeClient::new(server.url());

    let err = client
        .get_livekit_token(&session_token(), "alice", "standup")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.code(), Some("FEATURE_DISABLED"));

    Ok(())
}

#[tokio::test]
async fn test_missing_token_field_returns_502() -> Result<()> {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"url": "U"})),
        )
        .expect(1)
        .mount(&token_server)
        .await;

    let server = enabled_server(&token_server).await?;
    let client = VoiceModeClient::new(server.url());

    let err = client
        .get_livekit_token(&session_token(), "alice", "standup")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(err.code(), Some("UPSTREAM_PROTOCOL_ERROR"));

    Ok(())
}

#[tokio::test]
async fn test_upstream_server_error_returns_503_with_cause() -> Result<()> {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&token_server)
        .await;

    let server = enabled_server(&token_server).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/voicemode/token", server.url()))
        .bearer_auth(session_token())
        .json(&serde_json::json!({"identity": "alice", "room": "standup"}))
        .send()
        .await?;

    assert_eq!(response.status(), 503);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "UPSTREAM_UNAVAILABLE");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to connect to voicemode token server: "));
    assert!(message.contains("500"), "message was {message:?}");

    Ok(())
}

#[tokio::test]
async fn test_upstream_timeout_returns_503() -> Result<()> {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"token": "T"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&token_server)
        .await;

    let server = TestVoiceModeServer::builder()
        .enabled(true)
        .token_server_url(format!("{}/token", token_server.uri()))
        .token_timeout_seconds(1)
        .spawn()
        .await?;
    let client = VoiceModeClient::new(server.url());

    let err = client
        .get_livekit_token(&session_token(), "alice", "standup")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.code(), Some("UPSTREAM_UNAVAILABLE"));

    Ok(())
}

#[tokio::test]
async fn test_unreachable_upstream_returns_503() -> Result<()> {
    // Default harness points at a port with nothing listening
    let server = TestVoiceModeServer::builder().enabled(true).spawn().await?;
    let client = VoiceModeClient::new(server.url());

    let err = client
        .get_livekit_token(&session_token(), "alice", "standup")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.code(), Some("UPSTREAM_UNAVAILABLE"));

    Ok(())
}

#[tokio::test]
async fn test_invalid_body_returns_400_without_upstream_call() -> Result<()> {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "T"})))
        .expect(0)
        .mount(&token_server)
        .await;

    let server = enabled_server(&token_server).await?;
    let http = reqwest::Client::new();

    for body in [
        serde_json::json!({"identity": "alice"}),
        serde_json::json!({"room": "standup"}),
        serde_json::json!({"identity": "", "room": "standup"}),
        serde_json::json!({"identity": "alice", "room": ""}),
        serde_json::json!({"identity": 7, "room": "standup"}),
    ] {
        let response = http
            .post(format!("{}/api/v1/voicemode/token", server.url()))
            .bearer_auth(session_token())
            .json(&body)
            .send()
            .await?;

        assert_eq!(response.status(), 400, "body {body}");
    }

    Ok(())
}

#[tokio::test]
async fn test_each_request_makes_one_upstream_call() -> Result<()> {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "T"})))
        .expect(3)
        .mount(&token_server)
        .await;

    let server = enabled_server(&token_server).await?;
    let client = VoiceModeClient::new(server.url());
    let token = session_token();

    let results = futures::future::join_all(
        (0..3).map(|_| client.get_livekit_token(&token, "alice", "standup")),
    )
    .await;

    assert!(results.iter().all(Result::is_ok));

    Ok(())
}

#[tokio::test]
async fn test_long_upstream_timeout_still_returns_503() -> Result<()> {
    // Upstream timeout above the router's 30s floor
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"token": "T"}))
                .set_delay(Duration::from_secs(40)),
        )
        .mount(&token_server)
        .await;

    let server = TestVoiceModeServer::builder()
        .enabled(true)
        .token_server_url(format!("{}/token", token_server.uri()))
        .token_timeout_seconds(35)
        .spawn()
        .await?;
    assert!(server.config().request_timeout() > Duration::from_secs(35));

    let client = VoiceModeClient::new(server.url());

    let err = client
        .get_livekit_token(&session_token(), "alice", "standup")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.code(), Some("UPSTREAM_UNAVAILABLE"));

    Ok(())
}
