//! Authentication integration tests.
//!
//! Tests token issuance, single-use consumption, rotation, expiry and
//! refresh through the HTTP surface.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use status_test_utils::TestStatusServer;
use std::time::Duration;

/// Decode a token's payload without verifying it.
fn decode_payload(token: &str) -> serde_json::Value {
    let payload = token.split('.').nth(1).expect("token has a payload segment");
    let bytes = URL_SAFE_NO_PAD.decode(payload).expect("payload is base64url");
    serde_json::from_slice(&bytes).expect("payload is JSON")
}

/// Replace a token's payload, keeping its header and signature.
fn with_payload(token: &str, payload: &serde_json::Value) -> String {
    let mut parts = token.split('.');
    let header = parts.next().unwrap();
    let _ = parts.next();
    let signature = parts.next().unwrap();

    format!(
        "{}.{}.{}",
        header,
        URL_SAFE_NO_PAD.encode(payload.to_string()),
        signature
    )
}

async fn send(
    server: &TestStatusServer,
    method: reqwest::Method,
    path: &str,
    token: Option<&str>,
) -> Result<reqwest::Response> {
    let mut request = reqwest::Client::new().request(method, format!("{}{}", server.url(), path));
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    Ok(request.send().await?)
}

async fn error_message(response: reqwest::Response) -> Result<String> {
    let body: serde_json::Value = response.json().await?;
    Ok(body["error"].as_str().unwrap_or_default().to_string())
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_issues_token_for_placeholder_identity() -> Result<()> {
    let server = TestStatusServer::spawn().await?;

    let token = server.login().await?;
    let claims = decode_payload(&token);

    assert_eq!(claims["id"], 1);
    assert_eq!(claims["username"], "exampleuser");
    assert_eq!(
        claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(),
        3600
    );

    Ok(())
}

#[tokio::test]
async fn test_login_header_is_hs256() -> Result<()> {
    let server = TestStatusServer::spawn().await?;

    let token = server.login().await?;
    let header = token.split('.').next().unwrap();
    let header: serde_json::Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header)?)?;

    assert_eq!(header["alg"], "HS256");

    Ok(())
}

#[tokio::test]
async fn test_second_login_invalidates_first_token() -> Result<()> {
    let server = TestStatusServer::spawn().await?;

    let first = server.login().await?;
    let second = server.login().await?;

    let response = send(&server, reqwest::Method::GET, "/protected", Some(&first)).await?;
    assert_eq!(response.status(), 403);
    assert_eq!(error_message(response).await?, "Forbidden: Invalid token");

    let response = send(&server, reqwest::Method::GET, "/protected", Some(&second)).await?;
    assert_eq!(response.status(), 200);

    Ok(())
}

// ============================================================================
// Protected (exempt) route
// ============================================================================

#[tokio::test]
async fn test_protected_twice_with_same_token() -> Result<()> {
    let server = TestStatusServer::spawn().await?;
    let token = server.login().await?;

    for _ in 0..2 {
        let response = send(&server, reqwest::Method::GET, "/protected", Some(&token)).await?;
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["message"], "Access granted to protected resource");
        assert_eq!(body["user"]["id"], 1);
        assert_eq!(body["user"]["username"], "exampleuser");
        assert!(body["user"]["exp"].is_i64());
        assert!(body["user"]["iat"].is_i64());
    }

    assert_eq!(server.token_service().blacklist_len().await, 0);

    Ok(())
}

#[tokio::test]
async fn test_protected_without_token_is_401() -> Result<()> {
    let server = TestStatusServer::spawn().await?;

    let response = send(&server, reqwest::Method::GET, "/protected", None).await?;

    assert_eq!(response.status(), 401);
    assert_eq!(error_message(response).await?, "Unauthorized: Missing token");

    Ok(())
}

#[tokio::test]
async fn test_token_consumed_by_status_rejected_on_protected() -> Result<()> {
    let server = TestStatusServer::spawn().await?;
    let token = server.login().await?;

    let response = send(&server, reqwest::Method::GET, "/status", Some(&token)).await?;
    assert_eq!(response.status(), 200);

    let response = send(&server, reqwest::Method::GET, "/protected", Some(&token)).await?;
    assert_eq!(response.status(), 403);
    assert_eq!(
        error_message(response).await?,
        "Forbidden: Token has already been used"
    );

    Ok(())
}

#[tokio::test]
async fn test_consumed_token_no_longer_last_issued() -> Result<()> {
    let server = TestStatusServer::spawn().await?;
    let token = server.login().await?;

    send(&server, reqwest::Method::GET, "/protected", Some(&token)).await?;
    assert_eq!(
        server.token_service().last_issued().await.as_deref(),
        Some(token.as_str())
    );

    send(&server, reqwest::Method::GET, "/status", Some(&token)).await?;
    assert!(server.token_service().last_issued().await.is_none());

    Ok(())
}

// ============================================================================
// Expiry
// ============================================================================

#[tokio::test]
async fn test_expired_token_is_401() -> Result<()> {
    let server = TestStatusServer::spawn().await?;
    let token = server.login().await?;

    server.clock().advance(Duration::from_secs(3601));

    let response = send(&server, reqwest::Method::GET, "/protected", Some(&token)).await?;
    assert_eq!(response.status(), 401);
    assert!(response.headers().contains_key("www-authenticate"));
    assert_eq!(error_message(response).await?, "Unauthorized: Token expired");

    Ok(())
}

#[tokio::test]
async fn test_token_lifetime_is_configurable() -> Result<()> {
    let server = TestStatusServer::builder()
        .var("TOKEN_LIFETIME_SECONDS", "60")
        .spawn()
        .await?;
    let token = server.login().await?;

    server.clock().advance(Duration::from_secs(59));
    let response = send(&server, reqwest::Method::GET, "/protected", Some(&token)).await?;
    assert_eq!(response.status(), 200);

    server.clock().advance(Duration::from_secs(1));
    let response = send(&server, reqwest::Method::GET, "/protected", Some(&token)).await?;
    assert_eq!(response.status(), 401);

    Ok(())
}

// ============================================================================
// Forged and malformed tokens
// ============================================================================

#[tokio::test]
async fn test_garbage_token_is_403() -> Result<()> {
    let server = TestStatusServer::spawn().await?;

    let response = send(
        &server,
        reqwest::Method::GET,
        "/protected",
        Some("not.a.token"),
    )
    .await?;

    assert_eq!(response.status(), 403);
    assert_eq!(error_message(response).await?, "Forbidden: Invalid token");

    Ok(())
}

#[tokio::test]
async fn test_tampered_payload_is_403() -> Result<()> {
    let server = TestStatusServer::spawn().await?;
    let token = server.login().await?;

    let mut claims = decode_payload(&token);
    claims["id"] = serde_json::json!(2);
    claims["username"] = serde_json::json!("admin");
    let forged = with_payload(&token, &claims);

    let response = send(&server, reqwest::Method::GET, "/protected", Some(&forged)).await?;
    assert_eq!(response.status(), 403);

    // The genuine token is unaffected
    let response = send(&server, reqwest::Method::GET, "/protected", Some(&token)).await?;
    assert_eq!(response.status(), 200);

    Ok(())
}

#[tokio::test]
async fn test_unsigned_token_is_403() -> Result<()> {
    let server = TestStatusServer::spawn().await?;
    let token = server.login().await?;

    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(decode_payload(&token).to_string());
    let unsigned = format!("{header}.{payload}.");

    let response = send(&server, reqwest::Method::GET, "/protected", Some(&unsigned)).await?;
    assert_eq!(response.status(), 403);

    Ok(())
}

#[tokio::test]
async fn test_oversized_token_is_403() -> Result<()> {
    let server = TestStatusServer::spawn().await?;
    let oversized = "a".repeat(9000);

    let response = send(&server, reqwest::Method::GET, "/protected", Some(&oversized)).await?;
    assert_eq!(response.status(), 403);

    Ok(())
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_valid_token_is_400() -> Result<()> {
    let server = TestStatusServer::spawn().await?;
    let token = server.login().await?;

    let response = send(&server, reqwest::Method::POST, "/refresh", Some(&token)).await?;

    assert_eq!(response.status(), 400);
    assert_eq!(
        error_message(response).await?,
        "Token is still valid, no need for refresh"
    );

    Ok(())
}

#[tokio::test]
async fn test_refresh_expired_token_issues_replacement() -> Result<()> {
    let server = TestStatusServer::spawn().await?;
    let token = server.login().await?;

    server.clock().advance(Duration::from_secs(4000));

    let response = send(&server, reqwest::Method::POST, "/refresh", Some(&token)).await?;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await?;
    let refreshed = body["token"].as_str().unwrap().to_string();

    let claims = decode_payload(&refreshed);
    assert_eq!(claims["id"], 1);
    assert_eq!(claims["username"], "exampleuser");

    let response = send(&server, reqwest::Method::GET, "/status", Some(&refreshed)).await?;
    assert_eq!(response.status(), 200);

    Ok(())
}

#[tokio::test]
async fn test_refresh_without_token_is_401() -> Result<()> {
    let server = TestStatusServer::spawn().await?;

    let response = send(&server, reqwest::Method::POST, "/refresh", None).await?;

    assert_eq!(response.status(), 401);
    assert_eq!(error_message(response).await?, "Unauthorized: Missing token");

    Ok(())
}

#[tokio::test]
async fn test_refresh_rotated_out_token_is_403() -> Result<()> {
    let server = TestStatusServer::spawn().await?;
    let old = server.login().await?;
    server.login().await?;

    server.clock().advance(Duration::from_secs(4000));

    let response = send(&server, reqwest::Method::POST, "/refresh", Some(&old)).await?;
    assert_eq!(response.status(), 403);
    assert_eq!(error_message(response).await?, "Forbidden: Invalid token");

    Ok(())
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_status_requests_consume_once() -> Result<()> {
    let server = TestStatusServer::spawn().await?;
    let token = server.login().await?;
    let url = format!("{}/status", server.url());

    let requests: Vec<_> = (0..8)
        .map(|_| {
            let url = url.clone();
            let token = token.clone();
            tokio::spawn(async move {
                reqwest::Client::new()
                    .get(url)
                    .bearer_auth(token)
                    .send()
                    .await
                    .map(|r| r.status().as_u16())
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for request in requests {
        statuses.push(request.await??);
    }

    assert_eq!(statuses.iter().filter(|s| **s == 200).count(), 1);
    assert!(statuses.iter().all(|s| *s == 200 || *s == 403));

    Ok(())
}
