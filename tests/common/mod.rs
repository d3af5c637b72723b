//! In-process mock of the blogging backend. Each test boots its own
//! instance on a random loopback port and points the client at it.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use inkpot::api::auth::AuthContext;
use inkpot::client::ApiClient;
use inkpot::config::ApiConfig;
use inkpot::session::SessionStore;
use tempfile::TempDir;

pub const TOKEN: &str = "tok";

/// One recorded request: method, path+query, bearer token if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub uri: String,
    pub bearer: Option<String>,
}

#[derive(Clone)]
pub struct Backend {
    requests: Arc<Mutex<Vec<Recorded>>>,
    pub fail_like: bool,
}

impl Backend {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_like: false,
        }
    }

    pub fn failing_likes() -> Self {
        Self {
            fail_like: true,
            ..Self::new()
        }
    }

    fn record(&self, method: &str, uri: &Uri, headers: &HeaderMap) {
        self.requests.lock().unwrap().push(Recorded {
            method: method.to_string(),
            uri: uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_default(),
            bearer: bearer(headers),
        });
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests that hit `path` (query included in the match string).
    pub fn hits(&self, needle: &str) -> Vec<Recorded> {
        self.recorded()
            .into_iter()
            .filter(|r| r.uri.contains(needle))
            .collect()
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn user_json() -> Value {
    json!({
        "id": 1,
        "username": "john",
        "email": "john@example.com",
        "role": "user",
    })
}

pub fn blog_json(id: u64) -> Value {
    json!({
        "id": id,
        "title": "CSS Grid in anger",
        "description": "A tour of grid layout",
        "content": "# Layout\nSome markdown",
        "tags": ["CSS", "Layout"],
        "cover_image": null,
        "status": "published",
        "scheduled_at": null,
        "author": { "id": 1, "username": "john" },
        "likes_count": 3,
        "is_liked": false,
        "comments_count": 1,
        "comments": [{
            "id": 5,
            "content": "first",
            "author": { "id": 2, "username": "meg" },
            "createdAt": "2026-01-05T10:00:00Z"
        }],
        "created_at": "2026-01-02T09:00:00Z",
        "updated_at": "2026-01-02T09:00:00Z"
    })
}

fn expired(headers: &HeaderMap) -> bool {
    bearer(headers).as_deref() == Some("expired")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Token expired"})),
    )
        .into_response()
}

async fn login(
    State(b): State<Backend>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    b.record("POST", &uri, &headers);
    if body["email"] == "john@example.com" && body["password"] == "password123" {
        Json(json!({ "user": user_json(), "access_token": TOKEN })).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn register(
    State(b): State<Backend>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    b.record("POST", &uri, &headers);
    assert_eq!(body["role"], "user", "registration must pin role to user");
    if body["username"] == "taken" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Username already taken", "message": "Bad request"})),
        )
            .into_response();
    }
    let mut user = user_json();
    user["username"] = body["username"].clone();
    Json(json!({ "user": user, "access_token": TOKEN })).into_response()
}

async fn update_me(
    State(b): State<Backend>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    b.record("PUT", &uri, &headers);
    if bearer(&headers).as_deref() != Some(TOKEN) {
        return unauthorized();
    }
    let mut user = user_json();
    if let Some(username) = body.get("username") {
        user["username"] = username.clone();
    }
    Json(user).into_response()
}

async fn list_blogs(State(b): State<Backend>, uri: Uri, headers: HeaderMap) -> Response {
    b.record("GET", &uri, &headers);
    if expired(&headers) {
        return unauthorized();
    }
    Json(json!({
        "blogs": [blog_json(3)],
        "page": 1,
        "limit": 10,
        "total": 31
    }))
    .into_response()
}

async fn get_blog(
    State(b): State<Backend>,
    Path(id): Path<u64>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    b.record("GET", &uri, &headers);
    if expired(&headers) {
        return unauthorized();
    }
    Json(blog_json(id)).into_response()
}

async fn like_blog(State(b): State<Backend>, uri: Uri, headers: HeaderMap) -> Response {
    b.record("POST", &uri, &headers);
    if expired(&headers) {
        return unauthorized();
    }
    if b.fail_like {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "like service down"})),
        )
            .into_response();
    }
    Json(json!({})).into_response()
}

async fn unlike_blog(State(b): State<Backend>, uri: Uri, headers: HeaderMap) -> Response {
    b.record("DELETE", &uri, &headers);
    if b.fail_like {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "like service down"})),
        )
            .into_response();
    }
    Json(json!({})).into_response()
}

async fn create_comment(
    State(b): State<Backend>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    b.record("POST", &uri, &headers);
    if bearer(&headers).as_deref() != Some(TOKEN) {
        return unauthorized();
    }
    Json(json!({
        "id": 99,
        "content": body["content"],
        "author": { "id": 1, "username": "john" },
        "createdAt": "2026-01-06T08:00:00Z"
    }))
    .into_response()
}

async fn delete_comment(State(b): State<Backend>, uri: Uri, headers: HeaderMap) -> Response {
    b.record("DELETE", &uri, &headers);
    Json(json!({})).into_response()
}

async fn delete_blog(State(b): State<Backend>, uri: Uri, headers: HeaderMap) -> Response {
    b.record("DELETE", &uri, &headers);
    Json(json!({})).into_response()
}

async fn update_blog(
    State(b): State<Backend>,
    Path(id): Path<u64>,
    uri: Uri,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> Response {
    b.record("PUT", &uri, &headers);
    Json(blog_json(id)).into_response()
}

async fn create_blog(
    State(b): State<Backend>,
    uri: Uri,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> Response {
    b.record("POST", &uri, &headers);
    Json(blog_json(42)).into_response()
}

async fn analytics(State(b): State<Backend>, uri: Uri, headers: HeaderMap) -> Response {
    b.record("GET", &uri, &headers);
    Json(json!({"total_blogs": 12, "total_likes": 47})).into_response()
}

pub const CSV_FIXTURE: &[u8] = b"id,title,likes\n3,CSS Grid in anger,3\n";

async fn export_csv(State(b): State<Backend>, uri: Uri, headers: HeaderMap) -> Response {
    b.record("GET", &uri, &headers);
    CSV_FIXTURE.to_vec().into_response()
}

/// Boot the mock backend and return its base API URL.
pub async fn spawn(backend: Backend) -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/users/me", put(update_me))
        .route("/api/blogs", get(list_blogs).post(create_blog))
        .route("/api/blogs/{id}", get(get_blog).put(update_blog).delete(delete_blog))
        .route("/api/blogs/{id}/like", post(like_blog).delete(unlike_blog))
        .route("/api/blogs/{id}/comments", post(create_comment))
        .route("/api/comments/{id}", delete(delete_comment))
        .route("/api/admin/analytics", get(analytics))
        .route("/api/admin/export/csv", get(export_csv))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

/// A fresh client + store pair in an isolated data dir.
pub fn client_for(base_url: &str) -> (TempDir, Arc<SessionStore>, Arc<ApiClient>, AuthContext) {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(SessionStore::open(tmp.path()));
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 10,
    };
    let client = Arc::new(ApiClient::new(&config, store.clone()).unwrap());
    let auth = AuthContext::new(client.clone(), store.clone());
    (tmp, store, client, auth)
}
