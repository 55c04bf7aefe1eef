//! Auth operation tests.

use mockito::Matcher;
use serde_json::json;
use supabase_client::{AuthResponse, Error};

use crate::client_for;

fn user_body() -> serde_json::Value {
    json!({
        "id": "8f7e6a3c-9b2d-4c1e-8a5f-123456789abc",
        "aud": "authenticated",
        "email": "a@b.com",
        "user_metadata": {},
        "app_metadata": { "provider": "email" },
        "created_at": "2024-01-01T00:00:00Z"
    })
}

fn session_body() -> serde_json::Value {
    json!({
        "access_token": "jwt-a",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "rt-1",
        "user": user_body()
    })
}

#[tokio::test]
async fn sign_in_sends_password_grant_with_exact_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded(
            "grant_type".into(),
            "password".into(),
        ))
        .match_header("apikey", "k")
        .match_body(Matcher::Json(json!({
            "email": "a@b.com",
            "password": "pw"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(session_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    let session = client.sign_in("a@b.com", "pw").await.expect("sign in");

    assert_eq!(session.access_token, "jwt-a");
    assert_eq!(session.refresh_token, "rt-1");
    assert_eq!(session.expires_in, 3600);
    assert_eq!(session.user.email.as_deref(), Some("a@b.com"));
    mock.assert_async().await;
}

#[tokio::test]
async fn sign_up_carries_metadata_inside_the_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/v1/signup")
        .match_body(Matcher::Json(json!({
            "email": "a@b.com",
            "password": "pw",
            "data": { "display_name": "Ada" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    let response = client
        .sign_up("a@b.com", "pw", Some(json!({ "display_name": "Ada" })))
        .await
        .expect("sign up");

    // Confirmation pending: bare user, no session.
    assert!(matches!(response, AuthResponse::User(_)));
    assert!(response.session().is_none());
    assert_eq!(response.user().email.as_deref(), Some("a@b.com"));
    mock.assert_async().await;
}

#[tokio::test]
async fn sign_up_without_metadata_omits_the_data_field() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/v1/signup")
        .match_body(Matcher::Json(json!({
            "email": "a@b.com",
            "password": "pw"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(session_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    let response = client.sign_up("a@b.com", "pw", None).await.expect("sign up");

    assert!(response.session().is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn sign_out_applies_the_supplied_token_to_the_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/v1/logout")
        .match_header("authorization", "Bearer user-jwt")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    client.sign_out("user-jwt").await.expect("sign out");
    mock.assert_async().await;
}

#[tokio::test]
async fn get_user_authenticates_with_the_supplied_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/auth/v1/user")
        .match_header("authorization", "Bearer user-jwt")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    let user = client.get_user("user-jwt").await.expect("get user");

    assert_eq!(user.email.as_deref(), Some("a@b.com"));
    assert_eq!(user.aud.as_deref(), Some("authenticated"));
    mock.assert_async().await;
}

#[tokio::test]
async fn refresh_token_posts_the_refresh_grant() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded(
            "grant_type".into(),
            "refresh_token".into(),
        ))
        .match_body(Matcher::Json(json!({ "refresh_token": "rt-1" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(session_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    let session = client.refresh_token("rt-1").await.expect("refresh");

    assert_eq!(session.access_token, "jwt-a");
    mock.assert_async().await;
}

#[tokio::test]
async fn auth_failures_propagate_status_and_backend_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/auth/v1/token")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":400,"msg":"Invalid login credentials"}"#)
        .create_async()
        .await;

    let client = client_for(&server, "k");
    let error = client
        .sign_in("a@b.com", "wrong")
        .await
        .expect_err("sign in should fail");

    match error {
        Error::Api { status, message } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(message, "Invalid login credentials");
        }
        other => panic!("expected Error::Api, got {other:?}"),
    }
}
