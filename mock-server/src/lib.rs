use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub const MASHERY_ERROR_HEADER: &str = "X-Mashery-Error-Code";
pub const INVALID_TOKEN_CODE: &str = "ERR_403_DEVELOPER_INACTIVE";

/// Top-level folders nothing may be uploaded into directly.
const PROTECTED_FOLDERS: &[&str] = &["/", "/Shared", "/Private"];

#[derive(Clone, Debug)]
struct Node {
    id: Uuid,
    is_folder: bool,
    contents: Vec<u8>,
}

impl Node {
    fn folder() -> Self {
        Self { id: Uuid::new_v4(), is_folder: true, contents: Vec::new() }
    }

    fn file(contents: Vec<u8>) -> Self {
        Self { id: Uuid::new_v4(), is_folder: false, contents }
    }
}

pub struct Store {
    token: String,
    nodes: RwLock<BTreeMap<String, Node>>,
}

impl Store {
    fn new(token: &str) -> Self {
        let nodes = PROTECTED_FOLDERS
            .iter()
            .map(|path| (path.to_string(), Node::folder()))
            .collect();
        Self { token: token.to_string(), nodes: RwLock::new(nodes) }
    }
}

pub type Db = Arc<Store>;

/// Metadata of a file or folder as returned by `GET /fs/{path}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub is_folder: bool,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FsAction {
    AddFolder,
    Move {
        destination: String,
        #[serde(default)]
        permissions: Option<String>,
    },
}

type Reply = (StatusCode, Json<Value>);

fn failure(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "errorMessage": message })))
}

/// `"Shared/a b"` and `"/Shared/a b/"` both become `"/Shared/a b"`.
pub fn normalize(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

pub fn parent(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((parent, _)) => parent,
    }
}

fn is_within(path: &str, ancestor: &str) -> bool {
    path == ancestor || path.starts_with(&format!("{ancestor}/"))
}

pub fn app(token: &str) -> Router {
    let db: Db = Arc::new(Store::new(token));
    Router::new()
        .route("/pubapi/v1/fs/", get(get_root))
        .route(
            "/pubapi/v1/fs/{*path}",
            get(get_entry).post(post_entry).delete(delete_entry),
        )
        .route("/pubapi/v1/fs-content/{*path}", post(upload_file))
        .layer(middleware::from_fn_with_state(db.clone(), require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_bearer(State(db): State<Db>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", db.token);
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if presented != Some(expected.as_str()) {
        let (status, body) = failure(StatusCode::UNAUTHORIZED, "Invalid or inactive token");
        return (status, [(MASHERY_ERROR_HEADER, INVALID_TOKEN_CODE)], body).into_response();
    }
    next.run(request).await
}

async fn get_root(State(db): State<Db>) -> Result<Json<Metadata>, Reply> {
    describe(&db, "/").await
}

async fn get_entry(State(db): State<Db>, Path(path): Path<String>) -> Result<Json<Metadata>, Reply> {
    describe(&db, &normalize(&path)).await
}

async fn describe(db: &Db, path: &str) -> Result<Json<Metadata>, Reply> {
    let nodes = db.nodes.read().await;
    let node = nodes
        .get(path)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Item not found"))?;

    let name = path.rsplit('/').next().unwrap_or_default().to_string();
    if !node.is_folder {
        return Ok(Json(Metadata {
            is_folder: false,
            name,
            path: path.to_string(),
            entry_id: Some(node.id),
            size: Some(node.contents.len() as u64),
            ..Default::default()
        }));
    }

    let mut folders = Vec::new();
    let mut files = Vec::new();
    for (child_path, child) in nodes.iter() {
        if child_path == path || parent(child_path) != path {
            continue;
        }
        let child_name = child_path.rsplit('/').next().unwrap_or_default().to_string();
        if child.is_folder {
            folders.push(child_name);
        } else {
            files.push(child_name);
        }
    }

    Ok(Json(Metadata {
        is_folder: true,
        name,
        path: path.to_string(),
        folder_id: Some(node.id),
        folders,
        files,
        ..Default::default()
    }))
}

async fn post_entry(
    State(db): State<Db>,
    Path(path): Path<String>,
    Json(action): Json<FsAction>,
) -> Result<Reply, Reply> {
    let path = normalize(&path);
    match action {
        FsAction::AddFolder => add_folder(&db, &path).await,
        FsAction::Move { destination, .. } => move_entry(&db, &path, &normalize(&destination)).await,
    }
}

async fn add_folder(db: &Db, path: &str) -> Result<Reply, Reply> {
    let mut nodes = db.nodes.write().await;
    if nodes.contains_key(path) {
        return Err(failure(StatusCode::METHOD_NOT_ALLOWED, "Folder already exists"));
    }
    if !nodes.get(parent(path)).is_some_and(|node| node.is_folder) {
        return Err(failure(StatusCode::NOT_FOUND, "Parent folder not found"));
    }

    let node = Node::folder();
    let folder_id = node.id;
    nodes.insert(path.to_string(), node);
    debug!(path = %path, "created folder");
    Ok((StatusCode::CREATED, Json(json!({ "path": path, "folder_id": folder_id }))))
}

async fn move_entry(db: &Db, source: &str, destination: &str) -> Result<Reply, Reply> {
    let mut nodes = db.nodes.write().await;
    if !nodes.contains_key(source) {
        return Err(failure(StatusCode::NOT_FOUND, "Source not found"));
    }
    if PROTECTED_FOLDERS.contains(&source) {
        return Err(failure(StatusCode::FORBIDDEN, "Top-level folders cannot be moved"));
    }
    if is_within(destination, source) {
        return Err(failure(StatusCode::BAD_REQUEST, "Cannot move a folder into itself"));
    }
    if nodes.contains_key(destination) {
        return Err(failure(StatusCode::CONFLICT, "Destination already exists"));
    }
    if !nodes.get(parent(destination)).is_some_and(|node| node.is_folder) {
        return Err(failure(StatusCode::NOT_FOUND, "Destination folder not found"));
    }

    let moved: Vec<String> = nodes
        .keys()
        .filter(|key| is_within(key, source))
        .cloned()
        .collect();
    for old_path in moved {
        if let Some(node) = nodes.remove(&old_path) {
            let new_path = format!("{destination}{}", &old_path[source.len()..]);
            nodes.insert(new_path, node);
        }
    }
    debug!(source = %source, destination = %destination, "moved entry");
    Ok((StatusCode::OK, Json(json!({ "path": destination }))))
}

async fn delete_entry(State(db): State<Db>, Path(path): Path<String>) -> Result<StatusCode, Reply> {
    let path = normalize(&path);
    if PROTECTED_FOLDERS.contains(&path.as_str()) {
        return Err(failure(StatusCode::FORBIDDEN, "Top-level folders cannot be deleted"));
    }

    let mut nodes = db.nodes.write().await;
    if !nodes.contains_key(&path) {
        return Err(failure(StatusCode::NOT_FOUND, "Item not found"));
    }
    nodes.retain(|key, _| !is_within(key, &path));
    debug!(path = %path, "deleted entry");
    Ok(StatusCode::OK)
}

async fn upload_file(
    State(db): State<Db>,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<Reply, Reply> {
    let path = normalize(&path);
    let folder = parent(&path);
    if PROTECTED_FOLDERS.contains(&folder) {
        return Err(failure(StatusCode::FORBIDDEN, "Uploads are not allowed in this folder"));
    }

    let mut nodes = db.nodes.write().await;
    if !nodes.get(folder).is_some_and(|node| node.is_folder) {
        return Err(failure(StatusCode::NOT_FOUND, "Upload folder not found"));
    }
    if nodes.get(&path).is_some_and(|node| node.is_folder) {
        return Err(failure(StatusCode::BAD_REQUEST, "A folder exists at this path"));
    }

    let node = Node::file(body.to_vec());
    let entry_id = node.id;
    let size = node.contents.len();
    nodes.insert(path.clone(), node);
    debug!(path = %path, size, "stored upload");
    Ok((StatusCode::OK, Json(json!({ "path": path, "entry_id": entry_id, "size": size }))))
}
