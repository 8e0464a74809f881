//! HTTP client for the BookSmart service

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::models::{Bookmark, Document, DocumentId};
use crate::remote::request::ApiError;

/// Base URL compiled in as the default; override with `--api-url`.
pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The four calls the client makes against the service. Workers share an
/// implementation of this trait; tests swap in [`mock::MockRemoteService`].
pub trait RemoteService: Send + Sync {
    /// `POST /upload`, multipart field `file`. Returns the fresh document
    /// descriptor; its bookmarks carry no meaning yet.
    fn upload(&self, path: &Path) -> Result<Document, ApiError>;

    /// `POST /process/{documentId}`. Returns the detected bookmarks.
    fn process(&self, document_id: DocumentId) -> Result<Vec<Bookmark>, ApiError>;

    /// `GET /documents`. Full listing, used once at startup.
    fn list_documents(&self) -> Result<Vec<Document>, ApiError>;

    /// `GET /download/{documentId}`. Returns the URL of the processed file.
    fn download_url(&self, document_id: DocumentId) -> Result<String, ApiError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    document: Document,
}

#[derive(Debug, Deserialize)]
struct ProcessResponse {
    bookmarks: Vec<Bookmark>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadResponse {
    download_url: String,
}

/// Blocking HTTP implementation over reqwest. Lives on the worker thread,
/// never on the UI thread.
pub struct BooksmartClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl BooksmartClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                detail: response.text().unwrap_or_default(),
            })
        }
    }
}

impl RemoteService for BooksmartClient {
    fn upload(&self, path: &Path) -> Result<Document, ApiError> {
        let form = reqwest::blocking::multipart::Form::new()
            .file("file", path)
            .map_err(|e| {
                ApiError::generic(format!("cannot read {}: {e}", path.display()))
            })?;
        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()?;
        let body: UploadResponse = Self::check_status(response)?.json()?;
        Ok(body.document)
    }

    fn process(&self, document_id: DocumentId) -> Result<Vec<Bookmark>, ApiError> {
        let response = self
            .http
            .post(self.endpoint(&format!("process/{document_id}")))
            .send()?;
        let body: ProcessResponse = Self::check_status(response)?.json()?;
        Ok(body.bookmarks)
    }

    fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        let response = self.http.get(self.endpoint("documents")).send()?;
        let documents: Vec<Document> = Self::check_status(response)?.json()?;
        Ok(documents)
    }

    fn download_url(&self, document_id: DocumentId) -> Result<String, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&format!("download/{document_id}")))
            .send()?;
        let body: DownloadResponse = Self::check_status(response)?.json()?;
        Ok(body.download_url)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Scripted stand-in for [`BooksmartClient`]. Results are queued per
    /// endpoint and handed out in call order; every call is recorded so
    /// tests can assert what went over the wire.
    ///
    /// An unscripted `list_documents` answers with an empty listing (the
    /// common startup case); the other endpoints fail loudly when called
    /// without a queued result.
    #[derive(Clone, Default)]
    pub struct MockRemoteService {
        state: Arc<Mutex<MockState>>,
    }

    #[derive(Default)]
    struct MockState {
        upload_results: VecDeque<Result<Document, ApiError>>,
        process_results: VecDeque<Result<Vec<Bookmark>, ApiError>>,
        listing_results: VecDeque<Result<Vec<Document>, ApiError>>,
        download_results: VecDeque<Result<String, ApiError>>,
        uploaded_paths: Vec<PathBuf>,
        processed_ids: Vec<DocumentId>,
        listing_calls: usize,
        download_ids: Vec<DocumentId>,
    }

    impl MockRemoteService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn queue_upload(&self, result: Result<Document, ApiError>) {
            self.state.lock().unwrap().upload_results.push_back(result);
        }

        pub fn queue_process(&self, result: Result<Vec<Bookmark>, ApiError>) {
            self.state.lock().unwrap().process_results.push_back(result);
        }

        pub fn queue_listing(&self, result: Result<Vec<Document>, ApiError>) {
            self.state.lock().unwrap().listing_results.push_back(result);
        }

        pub fn queue_download(&self, result: Result<String, ApiError>) {
            self.state.lock().unwrap().download_results.push_back(result);
        }

        pub fn uploaded_paths(&self) -> Vec<PathBuf> {
            self.state.lock().unwrap().uploaded_paths.clone()
        }

        pub fn processed_ids(&self) -> Vec<DocumentId> {
            self.state.lock().unwrap().processed_ids.clone()
        }

        pub fn listing_calls(&self) -> usize {
            self.state.lock().unwrap().listing_calls
        }

        pub fn download_ids(&self) -> Vec<DocumentId> {
            self.state.lock().unwrap().download_ids.clone()
        }
    }

    impl RemoteService for MockRemoteService {
        fn upload(&self, path: &Path) -> Result<Document, ApiError> {
            let mut state = self.state.lock().unwrap();
            state.uploaded_paths.push(path.to_path_buf());
            state
                .upload_results
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::generic("unscripted upload call")))
        }

        fn process(&self, document_id: DocumentId) -> Result<Vec<Bookmark>, ApiError> {
            let mut state = self.state.lock().unwrap();
            state.processed_ids.push(document_id);
            state
                .process_results
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::generic("unscripted process call")))
        }

        fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
            let mut state = self.state.lock().unwrap();
            state.listing_calls += 1;
            state.listing_results.pop_front().unwrap_or(Ok(Vec::new()))
        }

        fn download_url(&self, document_id: DocumentId) -> Result<String, ApiError> {
            let mut state = self.state.lock().unwrap();
            state.download_ids.push(document_id);
            state
                .download_results
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::generic("unscripted download call")))
        }
    }
}
