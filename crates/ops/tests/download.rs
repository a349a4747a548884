//! Saving downloaded attachments to disk against an in-process fake backend.

use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use evently_ops::evently_client::{AttachmentMetadata, Error, Identifier};
use evently_ops::{OpsClient, OpsConfig, OpsError};
use serde::Deserialize;

// -- Fake backend ---------------------------------------------------------

const BLOCK_SIZE: usize = 8;

struct Backend {
    meta: AttachmentMetadata,
    data: Vec<u8>,
    fail_block: Option<u64>,
    downloads: Vec<u64>,
}

type Shared = Arc<Mutex<Backend>>;

#[derive(Deserialize)]
struct IdQuery {
    id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockQuery {
    id: i64,
    block_id: u64,
}

async fn info(State(state): State<Shared>, Query(q): Query<IdQuery>) -> Response {
    let backend = state.lock().unwrap();
    if backend.meta.id == Identifier::Int(q.id) {
        Json(backend.meta.clone()).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn download(State(state): State<Shared>, Query(q): Query<BlockQuery>) -> Response {
    let mut backend = state.lock().unwrap();
    backend.downloads.push(q.block_id);
    if backend.meta.id != Identifier::Int(q.id) || backend.fail_block == Some(q.block_id) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let start = usize::try_from(q.block_id).unwrap() * BLOCK_SIZE;
    let end = (start + BLOCK_SIZE).min(backend.data.len());
    Bytes::copy_from_slice(&backend.data[start..end]).into_response()
}

async fn spawn(file_name: &str, data: Vec<u8>, fail_block: Option<u64>) -> (OpsClient, Shared) {
    let meta = AttachmentMetadata {
        id: Identifier::Int(1),
        file_name: file_name.to_owned(),
        event_id: Identifier::Int(5),
        file_size: data.len() as u64,
        file_type: "text/plain".into(),
        block_size: BLOCK_SIZE as u64,
        first_block_id: 0,
        last_block_id: (data.len().div_ceil(BLOCK_SIZE) - 1) as u64,
    };
    let state: Shared = Arc::new(Mutex::new(Backend {
        meta,
        data,
        fail_block,
        downloads: Vec::new(),
    }));
    let app = Router::new()
        .route("/attachment/", get(info))
        .route("/attachment/download", get(download))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let ops = OpsClient::from_config(&OpsConfig::new(format!("http://{addr}"))).unwrap();
    (ops, state)
}

fn agenda() -> Vec<u8> {
    b"19:00 doors\n19:30 keynote\n21:00 close\n".to_vec()
}

fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

// -- Tests ----------------------------------------------------------------

#[tokio::test]
async fn download_to_dir_saves_under_server_name() {
    let (ops, state) = spawn("agenda.txt", agenda(), None).await;
    let dir = tempfile::tempdir().unwrap();

    let (path, file) = ops
        .download_to_dir(&Identifier::Int(1), dir.path())
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("agenda.txt"));
    assert_eq!(std::fs::read(&path).unwrap(), agenda());
    assert_eq!(file.file_name, "agenda.txt");
    assert_eq!(file.file_size, agenda().len() as u64);
    assert_eq!(state.lock().unwrap().downloads, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn download_to_dir_keeps_hostile_names_inside_dir() {
    let (ops, _state) = spawn("../../escape.txt", agenda(), None).await;
    let dir = tempfile::tempdir().unwrap();

    let (path, _file) = ops
        .download_to_dir(&Identifier::Int(1), dir.path())
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("escape.txt"));
    assert_eq!(std::fs::read(&path).unwrap(), agenda());
}

#[tokio::test]
async fn download_to_path_writes_exact_bytes() {
    let (ops, _state) = spawn("agenda.txt", agenda(), None).await;
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("renamed.txt");

    let file = ops
        .download_to_path(&Identifier::Int(1), &target)
        .await
        .unwrap();

    assert_eq!(file.file_name, "agenda.txt");
    assert_eq!(std::fs::read(&target).unwrap(), agenda());
}

#[tokio::test]
async fn failed_block_leaves_nothing_on_disk() {
    let (ops, state) = spawn("agenda.txt", agenda(), Some(1)).await;
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("agenda.txt");

    let err = ops
        .download_to_dir(&Identifier::Int(1), dir.path())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OpsError::Client(Error::BlockDownloadFailed { block_id: 1, .. })
    ));
    assert!(!target.exists());
    assert!(is_empty_dir(dir.path()));

    let err = ops
        .download_to_path(&Identifier::Int(1), &target)
        .await
        .unwrap_err();
    assert!(matches!(err, OpsError::Client(_)));
    assert!(!target.exists());

    assert_eq!(state.lock().unwrap().downloads, vec![0, 1, 0, 1]);
}

#[tokio::test]
async fn unknown_attachment_writes_nothing() {
    let (ops, state) = spawn("agenda.txt", agenda(), None).await;
    let dir = tempfile::tempdir().unwrap();

    let err = ops
        .download_to_dir(&Identifier::Int(99), dir.path())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OpsError::Client(Error::AttachmentNotFound { .. })
    ));
    assert!(is_empty_dir(dir.path()));
    assert!(state.lock().unwrap().downloads.is_empty());
}
