use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use core_types::{Killer, KillerFields, KillerPayload};
use database::{DbError, InMemoryRepository, KillerStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use web_server::{build_router, AppState};

fn test_killer() -> Value {
    json!({
        "name": "Test Killer",
        "alias": "The Tester",
        "power": "Unit Testing",
        "speed": 4.6,
        "terror_radius": 32,
        "height": "Mediano",
        "difficulty": "Media",
        "release_date": "2025-02-17",
        "dlc": false
    })
}

fn updated_killer() -> Value {
    json!({
        "name": "Updated Killer",
        "alias": "The Updater",
        "power": "Editing Tests",
        "speed": 4.4,
        "terror_radius": 28,
        "height": "Alto",
        "difficulty": "Dificil",
        "release_date": "2025-02-18",
        "dlc": true
    })
}

fn fields(body: Value) -> KillerFields {
    serde_json::from_value::<KillerPayload>(body)
        .unwrap()
        .validate()
        .unwrap()
}

fn app(repo: Arc<dyn KillerStore>) -> Router {
    build_router(AppState::new(repo), "does-not-exist")
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// A store whose every call fails as if the database were unreachable.
struct UnreachableStore;

#[async_trait]
impl KillerStore for UnreachableStore {
    async fn list_all(&self) -> Result<Vec<Killer>, DbError> {
        Err(sqlx_timeout())
    }
    async fn get_by_id(&self, _id: i32) -> Result<Killer, DbError> {
        Err(sqlx_timeout())
    }
    async fn create(&self, _fields: &KillerFields) -> Result<i32, DbError> {
        Err(sqlx_timeout())
    }
    async fn update(&self, _id: i32, _fields: &KillerFields) -> Result<(), DbError> {
        Err(sqlx_timeout())
    }
    async fn delete_by_id(&self, _id: i32) -> Result<(), DbError> {
        Err(sqlx_timeout())
    }
}

fn sqlx_timeout() -> DbError {
    DbError::ConnectionError(sqlx::Error::PoolTimedOut)
}

#[tokio::test]
async fn list_returns_an_array() {
    let app = app(Arc::new(InMemoryRepository::new()));

    let (status, body) = send(&app, "GET", "/killers", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn post_creates_a_killer() {
    let repo = Arc::new(InMemoryRepository::new());
    let app = app(repo.clone());

    let (status, body) = send(&app, "POST", "/killers", Some(test_killer())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Killer agregado correctamente");
    assert_eq!(body["id"], 1);

    let (status, list) = send(&app, "GET", "/killers", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut expected = test_killer();
    expected["id"] = json!(1);
    assert_eq!(list, json!([expected]));
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn get_by_id_returns_the_created_fields() {
    let app = app(Arc::new(InMemoryRepository::new()));
    let (_, created) = send(&app, "POST", "/killers", Some(test_killer())).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/killers/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Test Killer");
    assert_eq!(body["release_date"], "2025-02-17");
    assert_eq!(body["terror_radius"], 32);
}

#[tokio::test]
async fn get_missing_killer_is_404() {
    let app = app(Arc::new(InMemoryRepository::new()));

    let (status, body) = send(&app, "GET", "/killers/42", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Killer no encontrado");
}

#[tokio::test]
async fn put_replaces_every_field() {
    let repo = Arc::new(InMemoryRepository::with_rows([fields(test_killer())]));
    let app = app(repo.clone());

    let (status, body) = send(&app, "PUT", "/killers/1", Some(updated_killer())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Killer actualizado correctamente");
    assert_eq!(repo.get_by_id(1).await.unwrap().fields(), fields(updated_killer()));
}

#[tokio::test]
async fn last_put_wins() {
    let repo = Arc::new(InMemoryRepository::with_rows([fields(test_killer())]));
    let app = app(repo.clone());

    send(&app, "PUT", "/killers/1", Some(updated_killer())).await;
    send(&app, "PUT", "/killers/1", Some(test_killer())).await;

    let (_, body) = send(&app, "GET", "/killers/1", None).await;
    let mut expected = test_killer();
    expected["id"] = json!(1);
    assert_eq!(body, expected);
}

#[tokio::test]
async fn put_without_release_date_is_400_and_writes_nothing() {
    let repo = Arc::new(InMemoryRepository::with_rows([fields(test_killer())]));
    let app = app(repo.clone());
    let mut body = updated_killer();
    body.as_object_mut().unwrap().remove("release_date");

    let (status, response) = send(&app, "PUT", "/killers/1", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "La fecha de lanzamiento es inválida.");
    assert_eq!(repo.get_by_id(1).await.unwrap().fields(), fields(test_killer()));
}

#[tokio::test]
async fn put_with_non_string_release_date_is_400() {
    let repo = Arc::new(InMemoryRepository::with_rows([fields(test_killer())]));
    let app = app(repo);
    let mut body = updated_killer();
    body["release_date"] = json!(20250218);

    let (status, response) = send(&app, "PUT", "/killers/1", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn put_missing_killer_is_404_and_storage_unchanged() {
    let repo = Arc::new(InMemoryRepository::with_rows([fields(test_killer())]));
    let app = app(repo.clone());
    let before = repo.list_all().await.unwrap();

    let (status, body) = send(&app, "PUT", "/killers/999", Some(updated_killer())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Killer no encontrado");
    assert_eq!(repo.list_all().await.unwrap(), before);
}

#[tokio::test]
async fn post_with_missing_field_is_400() {
    let repo = Arc::new(InMemoryRepository::new());
    let app = app(repo.clone());
    let mut body = test_killer();
    body.as_object_mut().unwrap().remove("power");

    let (status, response) = send(&app, "POST", "/killers", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Falta el campo obligatorio: power");
    assert!(repo.is_empty());
}

#[tokio::test]
async fn post_without_dlc_defaults_to_false() {
    let app = app(Arc::new(InMemoryRepository::new()));
    let mut body = test_killer();
    body.as_object_mut().unwrap().remove("dlc");

    let (status, _) = send(&app, "POST", "/killers", Some(body)).await;
    let (_, killer) = send(&app, "GET", "/killers/1", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(killer["dlc"], false);
}

#[tokio::test]
async fn delete_removes_the_killer() {
    let repo = Arc::new(InMemoryRepository::with_rows([fields(test_killer())]));
    let app = app(repo.clone());

    let (status, body) = send(&app, "DELETE", "/killers/1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Killer eliminado correctamente");
    let (status, _) = send(&app, "GET", "/killers/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(repo.is_empty());
}

#[tokio::test]
async fn delete_missing_killer_is_404() {
    let repo = Arc::new(InMemoryRepository::with_rows([fields(test_killer())]));
    let app = app(repo.clone());

    let (status, body) = send(&app, "DELETE", "/killers/999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Killer no encontrado");
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let app = app(Arc::new(InMemoryRepository::new()));

    let (status, body) = send(&app, "DELETE", "/killers/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn storage_failures_are_500_with_a_generic_message() {
    let app = app(Arc::new(UnreachableStore));

    let cases = [
        ("GET", "/killers", None, "Error al obtener los datos"),
        ("GET", "/killers/1", None, "Error al obtener el killer"),
        ("POST", "/killers", Some(test_killer()), "Error al agregar el killer"),
        ("PUT", "/killers/1", Some(updated_killer()), "Error al actualizar el killer"),
        ("DELETE", "/killers/1", None, "Error al eliminar el killer"),
    ];

    for (method, uri, body, message) in cases {
        let (status, response) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(response["error"], message, "{method} {uri}");
    }
}

#[tokio::test]
async fn health_probe_answers_ok() {
    let app = app(Arc::new(InMemoryRepository::new()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}
