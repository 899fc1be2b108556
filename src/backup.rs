//! Upload local files to remote storage
//!
//! `backup` reports success as a bool; failures are logged, never raised.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{error, info};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::{secret_from_env, BackupConfig};
use crate::error::{AdapterResult, DashboardError};

pub trait RemoteStorage {
    fn upload(&self, path: &Path) -> AdapterResult<()>;

    fn describe(&self) -> String;
}

const BOUNDARY: &str = "social_seller_backup";

/// Uploads a file with its name and parent folder (Drive `uploadType=multipart` shape)
pub struct HttpStorage {
    client: Client,
    upload_url: String,
    token: Option<String>,
    mime_type: String,
    parent: String,
}

impl HttpStorage {
    pub fn new(
        upload_url: String,
        token: Option<String>,
        mime_type: String,
        parent: String,
    ) -> AdapterResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DashboardError::Connectivity(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            upload_url,
            token,
            mime_type,
            parent,
        })
    }
}

/// `multipart/related` body: JSON metadata part, then the media part
fn multipart_related_body(file_name: &str, parent: &str, mime_type: &str, media: &[u8]) -> Vec<u8> {
    let metadata = serde_json::json!({ "name": file_name, "parents": [parent] });

    let mut body = Vec::with_capacity(media.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(format!("\r\n--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(media);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

impl RemoteStorage for HttpStorage {
    fn upload(&self, path: &Path) -> AdapterResult<()> {
        let media = fs::read(path)
            .map_err(|e| DashboardError::Connectivity(format!("cannot read {:?}: {}", path, e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let body = multipart_related_body(&file_name, &self.parent, &self.mime_type, &media);

        let mut request = self
            .client
            .post(&self.upload_url)
            .header(CONTENT_TYPE, format!("multipart/related; boundary={}", BOUNDARY))
            .body(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| {
            DashboardError::Connectivity(format!("upload to {} failed: {}", self.upload_url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Connectivity(format!(
                "HTTP {} from {}",
                status.as_u16(),
                self.upload_url
            )));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.upload_url.clone()
    }
}

pub fn storage_from_config(config: &BackupConfig) -> AdapterResult<Box<dyn RemoteStorage>> {
    Ok(Box::new(HttpStorage::new(
        config.upload_url.clone(),
        secret_from_env(config.token_env.as_deref()),
        config.mime_type.clone(),
        config.parent.clone(),
    )?))
}

/// Upload `path`; `false` when the file is missing or the upload fails
pub fn backup(storage: &dyn RemoteStorage, path: &Path) -> bool {
    if !path.is_file() {
        error!("Backup failed: {:?} is not a file", path);
        return false;
    }

    match storage.upload(path) {
        Ok(()) => {
            info!("Backed up {:?} to {}", path, storage.describe());
            true
        }
        Err(e) => {
            error!("Backup of {:?} to {} failed: {}", path, storage.describe(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CannedServer;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct RecordingStorage {
        fail: bool,
        uploaded: RefCell<Vec<PathBuf>>,
    }

    impl RemoteStorage for RecordingStorage {
        fn upload(&self, path: &Path) -> AdapterResult<()> {
            if self.fail {
                return Err(DashboardError::Connectivity("quota exceeded".to_string()));
            }
            self.uploaded.borrow_mut().push(path.to_path_buf());
            Ok(())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    fn storage(fail: bool) -> RecordingStorage {
        RecordingStorage {
            fail,
            uploaded: RefCell::new(vec![]),
        }
    }

    #[test]
    fn test_backup_success() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leads.csv");
        fs::write(&path, "Name\nAna\n").unwrap();

        let storage = storage(false);
        assert!(backup(&storage, &path));
        assert_eq!(storage.uploaded.borrow().as_slice(), &[path]);
    }

    #[test]
    fn test_backup_failure_returns_false() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leads.csv");
        fs::write(&path, "Name\nAna\n").unwrap();
        assert!(!backup(&storage(true), &path));
    }

    #[test]
    fn test_backup_missing_file_skips_upload() {
        let dir = TempDir::new().unwrap();
        let storage = storage(false);
        assert!(!backup(&storage, &dir.path().join("missing.csv")));
        assert!(storage.uploaded.borrow().is_empty());
    }

    #[test]
    fn test_http_storage_unreachable_endpoint() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leads.csv");
        fs::write(&path, "Name\nAna\n").unwrap();

        let storage = HttpStorage::new(
            "http://127.0.0.1:9/upload".to_string(),
            None,
            "text/csv".to_string(),
            "root".to_string(),
        )
        .unwrap();
        assert!(!backup(&storage, &path));
    }

    #[test]
    fn test_multipart_body_carries_metadata_then_media() {
        let body = multipart_related_body("leads.csv", "root", "text/csv", b"Name\nAna\n");
        let text = String::from_utf8(body).unwrap();

        let metadata = text.find(r#"{"name":"leads.csv","parents":["root"]}"#).unwrap();
        let media = text.find("Content-Type: text/csv\r\n\r\nName\nAna\n").unwrap();
        assert!(metadata < media);
        assert!(text.starts_with("--social_seller_backup\r\n"));
        assert!(text.ends_with("\r\n--social_seller_backup--\r\n"));
    }

    #[test]
    fn test_http_storage_sends_file_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leads_backup_2024.csv");
        fs::write(&path, "Name\nAna\n").unwrap();

        let server = CannedServer::start("200 OK", "application/json", r#"{"id":"file-1"}"#);
        let storage = HttpStorage::new(
            format!("{}/upload?uploadType=multipart", server.url),
            Some("gdrive".to_string()),
            "text/csv".to_string(),
            "root".to_string(),
        )
        .unwrap();
        assert!(backup(&storage, &path));

        let request = server.request();
        assert!(request.starts_with("POST /upload?uploadType=multipart "));
        assert!(request
            .to_lowercase()
            .contains("content-type: multipart/related; boundary=social_seller_backup"));
        assert!(request.to_lowercase().contains("authorization: bearer gdrive"));
        assert!(request.contains(r#""name":"leads_backup_2024.csv""#));
        assert!(request.contains(r#""parents":["root"]"#));
        assert!(request.contains("Name\nAna\n"));
    }

    #[test]
    fn test_http_storage_rejection_is_connectivity_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leads.csv");
        fs::write(&path, "Name\nAna\n").unwrap();

        let server = CannedServer::start("500 Internal Server Error", "application/json", "{}");
        let storage = HttpStorage::new(
            server.url.clone(),
            None,
            "text/csv".to_string(),
            "root".to_string(),
        )
        .unwrap();
        match storage.upload(&path) {
            Err(DashboardError::Connectivity(msg)) => assert!(msg.contains("HTTP 500")),
            other => panic!("expected connectivity error, got {:?}", other),
        }
        server.request();
    }

    #[test]
    fn test_backup_rejected_upload_returns_false() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leads.csv");
        fs::write(&path, "Name\nAna\n").unwrap();

        let server = CannedServer::start("403 Forbidden", "application/json", "{}");
        let storage = HttpStorage::new(
            server.url.clone(),
            None,
            "text/csv".to_string(),
            "root".to_string(),
        )
        .unwrap();
        assert!(!backup(&storage, &path));
        server.request();
    }
}
