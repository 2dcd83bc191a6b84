use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use penseoffline_client_core::transport::ReqwestTransport;
use penseoffline_client_core::{ApiBase, ApiClient, ApiError, MemoryStorage};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Backend {
    level: Arc<Mutex<u64>>,
    hits: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    fn record(&self, hit: impl Into<String>) {
        self.hits
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(hit.into());
    }

    fn hits(&self) -> Vec<String> {
        self.hits
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn level(&self) -> u64 {
        *self
            .level
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some("Bearer token-123")
}

async fn login(State(backend): State<Backend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    backend.record("login");
    if body["username"] == "ana" && body["password"] == "segredo" {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": "token-123",
                "token_type": "bearer",
                "user": { "id": 1, "username": "ana", "name": "Ana", "nivel": backend.level() }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Usuário ou senha incorretos" })),
        )
    }
}

async fn me(State(backend): State<Backend>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    backend.record("me");
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Token inválido" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "id": 1, "username": "ana", "name": "Ana", "nivel": backend.level() })),
    )
}

async fn attend(
    State(backend): State<Backend>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    backend.record(format!("attend:{event_id}"));
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Token inválido" })),
        );
    }
    *backend
        .level
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
    (StatusCode::OK, Json(json!({ "xp_ganho": 50 })))
}

async fn spawn_backend() -> anyhow::Result<(String, Backend)> {
    let backend = Backend::default();
    *backend
        .level
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = 1;

    let app = Router::new()
        .route("/users/login", post(login))
        .route("/users/me", get(me))
        .route("/events/{event_id}/attend", post(attend))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{address}"), backend))
}

#[tokio::test]
async fn login_then_attend_refreshes_level_over_http() -> anyhow::Result<()> {
    let (base_url, backend) = spawn_backend().await?;
    let client = ApiClient::new(
        &ApiBase::new(base_url, "override"),
        ReqwestTransport::new(),
        MemoryStorage::new(),
    )?;

    let response = client.login("ana", "segredo").await?;
    assert_eq!(response.access_token, "token-123");
    assert_eq!(client.cached_profile().and_then(|user| user.level()), Some(1));

    let result = client.attend_event("42").await?;
    assert_eq!(result, json!({ "xp_ganho": 50 }));
    assert_eq!(client.cached_profile().and_then(|user| user.level()), Some(2));

    assert_eq!(backend.hits(), vec!["login", "attend:42", "me"]);
    Ok(())
}

#[tokio::test]
async fn rejected_login_carries_server_detail() -> anyhow::Result<()> {
    let (base_url, _) = spawn_backend().await?;
    let client = ApiClient::new(
        &ApiBase::new(base_url, "override"),
        ReqwestTransport::new(),
        MemoryStorage::new(),
    )?;

    let Err(error) = client.login("ana", "errada").await else {
        return Err(anyhow::anyhow!("expected login to fail"));
    };
    assert_eq!(
        error,
        ApiError::RequestFailed {
            status: 401,
            message: "Usuário ou senha incorretos".to_string(),
            server_detail: true,
        }
    );
    assert!(!client.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_network_failure() -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    drop(listener);

    let client = ApiClient::new(
        &ApiBase::new(format!("http://{address}"), "override"),
        ReqwestTransport::new(),
        MemoryStorage::new(),
    )?;

    let Err(error) = client.login("ana", "segredo").await else {
        return Err(anyhow::anyhow!("expected transport failure"));
    };
    assert!(matches!(error, ApiError::NetworkFailure { .. }));
    Ok(())
}
