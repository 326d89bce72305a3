//! Integration tests driving the client against a mock HTTP server.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use backoffice_client::{
    BackofficeClient, Error, LoginCredentials, PageParams, UserRegister, GENERIC_ERROR_MESSAGE,
};
use backoffice_session::{MemoryTokenStore, TokenStore};

async fn client_with_store(server: &MockServer) -> (BackofficeClient, Arc<MemoryTokenStore>) {
    let tokens = Arc::new(MemoryTokenStore::new());
    let client = BackofficeClient::builder()
        .base_url(server.uri())
        .token_store(tokens.clone())
        .build()
        .unwrap();
    (client, tokens)
}

fn user_body(email: &str) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "email": email,
        "is_active": true,
        "is_superuser": false,
        "full_name": "Test User"
    })
}

#[tokio::test]
async fn login_posts_form_encoded_credentials() {
    let server = MockServer::start().await;
    let (client, _tokens) = client_with_store(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login/access-token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=admin%40example.com"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = client
        .auth()
        .login(&LoginCredentials {
            username: "admin@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(token.access_token, "tok-123");
    assert_eq!(token.token_type, "bearer");
}

#[tokio::test]
async fn bearer_token_is_read_from_store_per_request() {
    let server = MockServer::start().await;
    let (client, tokens) = client_with_store(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("admin@example.com")))
        .expect(1)
        .mount(&server)
        .await;

    // Token lands in the store after the client was built.
    tokens.set("tok-abc").unwrap();

    let user = client.users().me().await.unwrap();
    assert_eq!(user.email, "admin@example.com");
}

#[tokio::test]
async fn list_items_sends_resolved_pagination_query() {
    let server = MockServer::start().await;
    let (client, tokens) = client_with_store(&server).await;
    tokens.set("tok").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/items"))
        .and(query_param("skip", "10"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "count": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client
        .items()
        .list(PageParams::page(3, 5).resolve())
        .await
        .unwrap();
    assert_eq!(items.count, 0);
}

#[tokio::test]
async fn string_detail_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    let (client, _tokens) = client_with_store(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/signup"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "The user with this email already exists in the system"
        })))
        .mount(&server)
        .await;

    let err = client
        .users()
        .signup(&UserRegister {
            email: "dup@example.com".to_string(),
            password: "secret".to_string(),
            full_name: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_message(),
        "The user with this email already exists in the system"
    );
}

#[tokio::test]
async fn array_detail_collapses_to_generic_message() {
    let server = MockServer::start().await;
    let (client, _tokens) = client_with_store(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/signup"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                {"msg": "value is not a valid email address", "loc": ["body", "email"], "type": "value_error"}
            ]
        })))
        .mount(&server)
        .await;

    let err = client
        .users()
        .signup(&UserRegister {
            email: "nope".to_string(),
            password: "secret".to_string(),
            full_name: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn unexpected_error_body_degrades_to_status_message() {
    let server = MockServer::start().await;
    let (client, tokens) = client_with_store(&server).await;
    tokens.set("tok").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.users().me().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message(), "HTTP 500");
}

#[tokio::test]
async fn unauthorized_response_is_an_auth_error() {
    let server = MockServer::start().await;
    let (client, tokens) = client_with_store(&server).await;
    tokens.set("stale-tok").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Could not validate credentials"
        })))
        .mount(&server)
        .await;

    let err = client.users().me().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 401, .. }));
    assert!(err.is_auth_error());
    assert_eq!(err.user_message(), "Could not validate credentials");
}

#[tokio::test]
async fn recover_password_encodes_email_as_one_path_segment() {
    let server = MockServer::start().await;
    let (client, _tokens) = client_with_store(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/password-recovery/a%2Fb@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Password recovery email sent"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = client
        .auth()
        .recover_password("a/b@example.com")
        .await
        .unwrap();
    assert_eq!(message.message, "Password recovery email sent");
}

#[tokio::test]
async fn item_update_uses_put_and_delete_returns_message() {
    let server = MockServer::start().await;
    let (client, tokens) = client_with_store(&server).await;
    tokens.set("tok").unwrap();

    let id = Uuid::new_v4();
    let owner = Uuid::new_v4();

    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/items/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "title": "renamed",
            "description": null,
            "owner_id": owner
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/items/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Item deleted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client
        .items()
        .update(
            id,
            &backoffice_client::ItemUpdate {
                title: "renamed".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "renamed");

    let message = client.items().delete(id).await.unwrap();
    assert_eq!(message.message, "Item deleted successfully");
}
