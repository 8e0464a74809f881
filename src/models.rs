use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the remote service when a document is uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Processing state of a document as tracked by this client.
///
/// `Failed` is client-side only: the service reports `processing` or
/// `completed`, and a document lands in `Failed` when the processing call
/// errors. A manual retry moves it back to `Processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Processing,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "Processing",
            DocumentStatus::Completed => "Completed",
            DocumentStatus::Failed => "Failed",
        }
    }
}

/// Category attached to a detected bookmark. The wire enumeration is closed;
/// anything the service sends outside it decodes to `Other` so display never
/// fails on an unknown value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum BookmarkCategory {
    MedicalRadiology,
    Photos,
    Estimate,
    Other,
}

impl From<String> for BookmarkCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "medical_radiology" => BookmarkCategory::MedicalRadiology,
            "photos" => BookmarkCategory::Photos,
            "estimate" => BookmarkCategory::Estimate,
            _ => BookmarkCategory::Other,
        }
    }
}

impl BookmarkCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            BookmarkCategory::MedicalRadiology => "Medical Radiology",
            BookmarkCategory::Photos => "Photos",
            BookmarkCategory::Estimate => "Estimate",
            BookmarkCategory::Other => "Other",
        }
    }
}

/// One detected point of interest inside a processed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub page: u32,
    pub label: String,
    pub category: BookmarkCategory,
}

/// Client-side record of one uploaded file and its processing outcome.
///
/// Created the moment the upload call returns, with `status = Processing`
/// and no bookmarks; updated in place when the deferred processing call
/// resolves. Never replaced by identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub date: DateTime<Utc>,
    pub status: DocumentStatus,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

impl Document {
    pub fn is_completed(&self) -> bool {
        self.status == DocumentStatus::Completed
    }
}
