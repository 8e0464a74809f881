//! Requests and responses crossing the API worker channel

use std::path::PathBuf;

use crate::models::{Bookmark, Document, DocumentId};

/// Unique identifier for in-flight API requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Request sent to the API worker
#[derive(Debug)]
pub enum ApiRequest {
    /// Upload a PDF file
    Upload { id: RequestId, path: PathBuf },

    /// Trigger bookmark processing for an uploaded document
    Process {
        id: RequestId,
        document_id: DocumentId,
    },

    /// Fetch the full document listing
    ListDocuments { id: RequestId },

    /// Fetch the download URL for a processed document
    DownloadUrl {
        id: RequestId,
        document_id: DocumentId,
    },

    /// Shutdown the worker
    Shutdown,
}

/// Errors from remote calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("cannot reach the service: {detail}")]
    Connect { detail: String },

    #[error("the service did not answer in time")]
    Timeout,

    #[error("service answered HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("unexpected response body: {detail}")]
    Decode { detail: String },

    #[error("{detail}")]
    Generic { detail: String },
}

impl ApiError {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connect {
                detail: err.to_string(),
            }
        } else if err.is_decode() {
            ApiError::Decode {
                detail: err.to_string(),
            }
        } else {
            ApiError::Generic {
                detail: err.to_string(),
            }
        }
    }
}

/// Response from the API worker
#[derive(Debug)]
pub enum ApiResponse {
    /// Upload call resolved
    Uploaded {
        id: RequestId,
        result: Result<Document, ApiError>,
    },

    /// Processing call resolved
    Processed {
        id: RequestId,
        document_id: DocumentId,
        result: Result<Vec<Bookmark>, ApiError>,
    },

    /// Listing call resolved
    Listing {
        id: RequestId,
        result: Result<Vec<Document>, ApiError>,
    },

    /// Download URL call resolved
    Download {
        id: RequestId,
        result: Result<String, ApiError>,
    },
}
