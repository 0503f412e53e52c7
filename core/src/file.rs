//! File and folder operations on the `/fs` and `/fs-content` endpoints.
//!
//! Each operation only picks a path, a payload and, for some, reason texts
//! specific to that endpoint; the request wrapper does the rest.

use tracing::instrument;

use crate::client::Client;
use crate::error::Result;
use crate::request::{Body, Request, CONTENT_TYPE_OCTET_STREAM};
use crate::response::Response;
use crate::types::{AddFolderAction, MoveAction, Permissions};

const FS: &str = "/fs";
const FS_CONTENT: &str = "/fs-content";

const UPLOAD_ERRORS: &[(u16, &str)] = &[
    (400, "Missing parameters, file filtered out, e.g. .tmp file or file is too large (>100 MB)"),
    (401, "User not authorized"),
    (403, "Not enough permissions/forbidden file upload location, e.g. /, /Shared, /Private etc."),
];

const CREATE_DIRECTORY_ERRORS: &[(u16, &str)] = &[
    (403, "User does not have permission to create directory"),
    (405, "A directory with the same name already exists"),
];

#[derive(Debug, Clone, Copy)]
pub struct File<'c> {
    request: Request<'c>,
}

impl<'c> File<'c> {
    pub fn new(client: &'c Client) -> Self {
        Self {
            request: client.request(),
        }
    }

    /// Metadata of the file or folder at `path`.
    #[instrument(skip(self))]
    pub fn metadata(&self, path: &str) -> Result<Response> {
        self.request.get(&fs_path(path), &[])
    }

    /// Move a file or folder to the absolute path `destination`.
    #[instrument(skip(self))]
    pub fn move_to(&self, path: &str, destination: &str, permissions: Option<Permissions>) -> Result<Response> {
        self.request
            .post_json(&fs_path(path), &MoveAction::new(destination, permissions), &[])
    }

    /// Delete a file or folder.
    #[instrument(skip(self))]
    pub fn delete(&self, path: &str) -> Result<Response> {
        self.request.delete(&fs_path(path), &[])
    }

    /// Upload `contents` as `file_name` inside the folder `remote_path`.
    #[instrument(skip(self, contents))]
    pub fn upload(&self, remote_path: &str, file_name: &str, contents: impl Into<Vec<u8>>) -> Result<Response> {
        let path = format!("{FS_CONTENT}{}", Request::path_encode(&join(remote_path, file_name)));
        self.request
            .post(&path, Body::raw(contents, CONTENT_TYPE_OCTET_STREAM), UPLOAD_ERRORS)
    }

    /// Create the folder `directory_name` inside `parent_directory`.
    #[instrument(skip(self))]
    pub fn create_directory(&self, parent_directory: &str, directory_name: &str) -> Result<Response> {
        self.request.post_json(
            &fs_path(&join(parent_directory, directory_name)),
            &AddFolderAction::default(),
            CREATE_DIRECTORY_ERRORS,
        )
    }

    /// Alias of [`File::move_to`].
    pub fn mv(&self, path: &str, destination: &str, permissions: Option<Permissions>) -> Result<Response> {
        self.move_to(path, destination, permissions)
    }

    /// Alias of [`File::delete`].
    pub fn rm(&self, path: &str) -> Result<Response> {
        self.delete(path)
    }

    /// Alias of [`File::create_directory`].
    pub fn mkdir(&self, parent_directory: &str, directory_name: &str) -> Result<Response> {
        self.create_directory(parent_directory, directory_name)
    }
}

fn fs_path(path: &str) -> String {
    format!("{FS}{}", Request::path_encode(path))
}

fn join(parent: &str, name: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), name)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::http::HttpMethod;
    use crate::request::CONTENT_TYPE_JSON;
    use crate::transport::testing::RecordingTransport;

    const BASE: &str = "https://acme.egnyte.com/pubapi/v1";

    fn client() -> (Client, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let client = Client::with_transport(Config::new("acme", "tok"), transport.clone()).unwrap();
        (client, transport)
    }

    fn body_json(body: Option<Vec<u8>>) -> serde_json::Value {
        serde_json::from_slice(&body.expect("request has no body")).unwrap()
    }

    #[test]
    fn metadata_issues_get_on_encoded_path() {
        let (client, transport) = client();
        client.file().metadata("/Shared/My Docs").unwrap();

        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, format!("{BASE}/fs/Shared/My%20Docs"));
        assert!(req.body.is_none());
    }

    #[test]
    fn move_posts_json_action() {
        let (client, transport) = client();
        client
            .file()
            .move_to("/Folder/a.txt", "/Folder2/a.txt", Some(Permissions::KeepOriginal))
            .unwrap();

        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE}/fs/Folder/a.txt"));
        assert_eq!(req.header("Content-Type"), Some(CONTENT_TYPE_JSON));
        assert_eq!(
            body_json(req.body),
            serde_json::json!({
                "action": "move",
                "destination": "/Folder2/a.txt",
                "permissions": "keep_original"
            })
        );
    }

    #[test]
    fn delete_issues_delete() {
        let (client, transport) = client();
        client.file().delete("/Shared/old file.txt").unwrap();

        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, format!("{BASE}/fs/Shared/old%20file.txt"));
    }

    #[test]
    fn upload_posts_octet_stream_to_fs_content() {
        let (client, transport) = client();
        client.file().upload("/Uploads", "report.pdf", b"%PDF-1.4".to_vec()).unwrap();

        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE}/fs-content/Uploads/report.pdf"));
        assert_eq!(req.header("Content-Type"), Some(CONTENT_TYPE_OCTET_STREAM));
        assert_eq!(req.body.as_deref(), Some(b"%PDF-1.4".as_slice()));
    }

    #[test]
    fn upload_joins_folder_with_trailing_slash() {
        let (client, transport) = client();
        client.file().upload("/Uploads/", "a b.txt", "x").unwrap();
        assert_eq!(transport.last().url, format!("{BASE}/fs-content/Uploads/a%20b.txt"));
    }

    #[test]
    fn upload_reasons_do_not_leak_into_next_call() {
        let (client, transport) = client();
        transport.respond_with(403, "");
        transport.respond_with(403, "");
        let file = client.file();

        let upload = file.upload("/", "a.txt", "x").unwrap();
        let metadata = file.metadata("/a.txt").unwrap();

        assert_eq!(
            upload.error_details().unwrap().status.text,
            "Not enough permissions/forbidden file upload location, e.g. /, /Shared, /Private etc."
        );
        assert_eq!(metadata.error_details().unwrap().status.text, "Forbidden");

        let sent = transport.requests.lock().unwrap();
        assert_eq!(sent[0].header("Content-Type"), Some(CONTENT_TYPE_OCTET_STREAM));
        assert_eq!(sent[1].header("Content-Type"), None);
    }

    #[test]
    fn create_directory_posts_add_folder() {
        let (client, transport) = client();
        transport.respond_with(405, "");
        let response = client.file().create_directory("/Shared", "Q1 Reports").unwrap();

        let req = transport.last();
        assert_eq!(req.url, format!("{BASE}/fs/Shared/Q1%20Reports"));
        assert_eq!(body_json(req.body), serde_json::json!({ "action": "add_folder" }));
        assert_eq!(
            response.error_details().unwrap().status.text,
            "A directory with the same name already exists"
        );
    }

    #[test]
    fn aliases_issue_the_same_requests() {
        let (client, transport) = client();
        let file = client.file();

        file.move_to("/a", "/b", None).unwrap();
        file.mv("/a", "/b", None).unwrap();
        file.delete("/a").unwrap();
        file.rm("/a").unwrap();
        file.create_directory("/", "d").unwrap();
        file.mkdir("/", "d").unwrap();

        let sent = transport.requests.lock().unwrap();
        assert_eq!(sent.len(), 6);
        for pair in sent.chunks(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }
}
