//! End-to-end tests against a local axum stand-in for the captioning endpoint.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use narrate_client::{narrate_file, HttpTransport, HttpTransportOptions};
use narrate_core::{NarrationController, NarrationResult, RecordingView, Transmission};
use serde_json::json;
use tokio::net::TcpListener;

type Seen = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn controller(base_url: &str, transmission: Transmission) -> NarrationController<HttpTransport, RecordingView> {
    let transport = HttpTransport::new(HttpTransportOptions {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap();
    NarrationController::new(transport, RecordingView::new()).with_transmission(transmission)
}

fn recording_router(seen: Seen, status: StatusCode, reply: serde_json::Value) -> Router {
    Router::new().route(
        "/api/narrate",
        post(move |headers: HeaderMap, body: Bytes| {
            let seen = seen.clone();
            let reply = reply.clone();
            async move {
                let content_type = headers
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                seen.lock().unwrap().push((content_type, body.to_vec()));
                (status, Json(reply))
            }
        }),
    )
}

async fn write_photo(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    tokio::fs::write(&path, bytes).await.unwrap();
    path
}

#[tokio::test]
async fn raw_body_caption_round_trip() {
    let seen: Seen = Arc::default();
    let base = spawn(recording_router(
        seen.clone(),
        StatusCode::OK,
        json!({ "caption": "a dog running in a field" }),
    ))
    .await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_photo(dir.path(), "photo.jpg", &[0xFF, 0xD8, 0xFF, 0xD9]).await;
    let controller = controller(&base, Transmission::RawBody);

    let result = narrate_file(&controller, &path).await;

    assert_eq!(result, Some(NarrationResult::Caption("A dog running in a field".into())));
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "image/jpeg");
    assert_eq!(seen[0].1, vec![0xFF, 0xD8, 0xFF, 0xD9]);
}

#[tokio::test]
async fn data_uri_json_body_is_sent() {
    let seen: Seen = Arc::default();
    let base = spawn(recording_router(seen.clone(), StatusCode::OK, json!({ "caption": "two cats" }))).await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_photo(dir.path(), "cats.png", b"\x89PNG").await;
    let controller = controller(&base, Transmission::DataUriJson);

    let result = narrate_file(&controller, &path).await.unwrap();
    assert_eq!(result.text(), "Two cats");

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].0, "application/json");
    let body: serde_json::Value = serde_json::from_slice(&seen[0].1).unwrap();
    assert_eq!(body["image"], "data:image/png;base64,iVBORw==");
}

#[tokio::test]
async fn json_error_field_is_displayed() {
    let seen: Seen = Arc::default();
    let base = spawn(recording_router(
        seen,
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "model unavailable" }),
    ))
    .await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_photo(dir.path(), "photo.jpg", b"jpeg").await;
    let controller = controller(&base, Transmission::RawBody);

    let result = narrate_file(&controller, &path).await.unwrap();
    assert!(!result.is_caption());
    assert!(result.text().contains("model unavailable"));
}

#[tokio::test]
async fn plain_text_and_empty_error_bodies_are_never_blank() {
    let app = Router::new()
        .route(
            "/text/api/narrate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
        )
        .route(
            "/empty/api/narrate",
            post(|| async { StatusCode::SERVICE_UNAVAILABLE.into_response() }),
        );
    let base = spawn(app).await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_photo(dir.path(), "photo.jpg", b"jpeg").await;

    let text = narrate_file(&controller(&format!("{base}/text"), Transmission::RawBody), &path)
        .await
        .unwrap();
    assert_eq!(text, NarrationResult::Failure("Internal Server Error".into()));

    let empty = narrate_file(&controller(&format!("{base}/empty"), Transmission::RawBody), &path)
        .await
        .unwrap();
    assert_eq!(empty, NarrationResult::Failure("Server error: 503 Service Unavailable".into()));
}

#[tokio::test]
async fn empty_json_object_is_invalid_response() {
    let seen: Seen = Arc::default();
    let base = spawn(recording_router(seen, StatusCode::OK, json!({}))).await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_photo(dir.path(), "photo.jpg", b"jpeg").await;
    let result = narrate_file(&controller(&base, Transmission::RawBody), &path)
        .await
        .unwrap();

    assert_eq!(result, NarrationResult::Failure("Invalid response from server.".into()));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let path = write_photo(dir.path(), "photo.jpg", b"jpeg").await;
    let result = narrate_file(&controller(&format!("http://{addr}"), Transmission::RawBody), &path)
        .await
        .unwrap();

    assert!(!result.is_caption());
    assert!(!result.text().trim().is_empty());
}

#[tokio::test]
async fn only_newest_selection_is_displayed() {
    let app = Router::new().route(
        "/api/narrate",
        post(|body: Bytes| async move {
            if body.as_ref() == b"slow" {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Json(json!({ "caption": "the first file" }))
            } else {
                Json(json!({ "caption": "the second file" }))
            }
        }),
    );
    let base = spawn(app).await;

    let dir = tempfile::tempdir().unwrap();
    let first = write_photo(dir.path(), "first.jpg", b"slow").await;
    let second = write_photo(dir.path(), "second.jpg", b"fast").await;
    let controller = Arc::new(controller(&base, Transmission::RawBody));

    let pending = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { narrate_file(&controller, &first).await })
    };
    // Let the first request reach the server before the second selection.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let newest = narrate_file(&controller, &second).await;

    assert_eq!(newest, Some(NarrationResult::Caption("The second file".into())));
    assert_eq!(pending.await.unwrap(), None);
    assert_eq!(controller.view().displayed().as_deref(), Some("The second file"));
    assert_eq!(
        controller.view().results(),
        vec![NarrationResult::Caption("The second file".into())]
    );
}
