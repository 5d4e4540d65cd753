use super::*;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};

const TOKEN: &str = "7|secret-token";
const CATEGORY_ID: &str = "0b7e4f3a-1111-4222-8333-944455556666";

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String) -> HttpCatalogApi {
    HttpCatalogApi::new(&ClientConfig::new(base_url, "unused.json".into())).unwrap()
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn fake_api() -> Router {
    Router::new()
        .route(
            "/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "right" {
                    Json(json!({ "token": TOKEN }))
                } else {
                    Json(json!({ "message": "Provided email or password is incorrect" }))
                }
            }),
        )
        .route(
            "/register",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "message": "invalid",
                        "errors": { "email": ["The email has already been taken."] }
                    })),
                )
            }),
        )
        .route(
            "/me",
            get(|headers: HeaderMap| async move {
                if bearer_ok(&headers) {
                    (
                        StatusCode::OK,
                        Json(json!({ "id": 1, "name": "Ada", "email": "ada@example.com", "is_admin": 1 })),
                    )
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthenticated." })))
                }
            }),
        )
        .route(
            "/logout",
            post(|headers: HeaderMap| async move {
                if bearer_ok(&headers) { StatusCode::NO_CONTENT } else { StatusCode::UNAUTHORIZED }
            }),
        )
        .route(
            "/categories/{id}",
            get(|Path(id): Path<String>| async move {
                Json(json!({ "data": { "id": id, "name": "Kitchen", "products": [] } }))
            }),
        )
        .route(
            "/products",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "Fetch products failed" }))) }),
        )
}

// =============================================================================
// auth endpoints
// =============================================================================

#[tokio::test]
async fn login_returns_token() {
    let api = client(spawn(fake_api()).await);
    let creds = Credentials { email: "ada@example.com".into(), password: "right".into() };
    assert_eq!(api.login(&creds).await.unwrap(), TOKEN);
}

#[tokio::test]
async fn login_reply_without_token_is_authentication_failure() {
    let api = client(spawn(fake_api()).await);
    let creds = Credentials { email: "ada@example.com".into(), password: "wrong".into() };
    let err = api.login(&creds).await.unwrap_err();
    assert_eq!(err, ApiError::Authentication(vec!["Provided email or password is incorrect".into()]));
}

#[tokio::test]
async fn register_validation_errors_are_surfaced() {
    let api = client(spawn(fake_api()).await);
    let reg = Registration {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        password: "pw".into(),
        password_confirmation: "pw".into(),
    };
    let err = api.register(&reg).await.unwrap_err();
    assert_eq!(err.display_messages(), vec!["The email has already been taken.".to_owned()]);
}

#[tokio::test]
async fn me_sends_bearer_token() {
    let api = client(spawn(fake_api()).await);
    let user = api.me(TOKEN).await.unwrap();
    assert_eq!(user.name, "Ada");
    assert!(user.is_admin);

    let err = api.me("stale").await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn logout_accepts_no_content() {
    let api = client(spawn(fake_api()).await);
    api.logout(TOKEN).await.unwrap();
}

// =============================================================================
// catalog endpoints
// =============================================================================

#[tokio::test]
async fn get_category_unwraps_data_envelope() {
    let api = client(spawn(fake_api()).await);
    let id = Uuid::parse_str(CATEGORY_ID).unwrap();
    let category = api.get_category(Some(TOKEN), id).await.unwrap();
    assert_eq!(category.id, id);
    assert_eq!(category.name, "Kitchen");
}

#[tokio::test]
async fn server_error_keeps_message() {
    let api = client(spawn(fake_api()).await);
    let err = api.list_products(None).await.unwrap_err();
    assert_eq!(err, ApiError::Server { status: 500, messages: vec!["Fetch products failed".into()] });
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(format!("http://{addr}"));
    let err = api.list_categories(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
