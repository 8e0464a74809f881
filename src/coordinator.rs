//! View and document lifecycle state

use std::path::PathBuf;
use std::time::Instant;

use log::{debug, error, info};

use crate::document_store::DocumentStore;
use crate::models::{Bookmark, Document, DocumentId, DocumentStatus};
use crate::remote::request::ApiError;
use crate::scheduler::ProcessScheduler;

/// Which of the three screens is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Documents,
    Upload,
    Detail,
}

/// The state container driving the whole client: active view, current
/// document, uploading flag, the document store, and the deferred
/// processing schedule.
///
/// Every external stimulus enters through [`Coordinator::apply`] as a
/// [`Command`]; every side effect the runtime must perform comes back as an
/// [`Effect`]. The coordinator itself performs no I/O, so the entire
/// lifecycle is testable without a terminal or a network.
#[derive(Debug)]
pub struct Coordinator {
    view: View,
    current_document_id: Option<DocumentId>,
    uploading: bool,
    store: DocumentStore,
    scheduler: ProcessScheduler,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            view: View::Documents,
            current_document_id: None,
            uploading: false,
            store: DocumentStore::new(),
            scheduler: ProcessScheduler::new(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn current_document_id(&self) -> Option<DocumentId> {
        self.current_document_id
    }

    /// The document the detail view shows, if it still exists in the store.
    pub fn current_document(&self) -> Option<&Document> {
        self.current_document_id.and_then(|id| self.store.get(id))
    }

    /// Apply a command and return the effects the runtime must execute.
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::ShowDocuments => {
                self.view = View::Documents;
                vec![]
            }

            Command::ShowUpload => {
                self.view = View::Upload;
                vec![]
            }

            Command::ShowDetail(id) => {
                // Detail is only offered for completed documents; anything
                // else leaves the view unchanged.
                if self.store.get(id).is_some_and(Document::is_completed) {
                    self.current_document_id = Some(id);
                    self.view = View::Detail;
                } else {
                    debug!("Ignoring detail request for document {id}: not completed");
                }
                vec![]
            }

            Command::StartUpload { path } => {
                if self.uploading {
                    debug!("Upload already in flight, ignoring {}", path.display());
                    return vec![];
                }
                self.uploading = true;
                info!("Uploading {}", path.display());
                vec![Effect::SendUpload(path)]
            }

            Command::UploadFinished { result, now } => {
                self.uploading = false;
                match result {
                    Ok(document) => {
                        let id = document.id;
                        // The service's descriptor is trusted for identity
                        // and metadata only; the local record always starts
                        // processing with no bookmarks.
                        self.store.append(Document {
                            status: DocumentStatus::Processing,
                            bookmarks: Vec::new(),
                            ..document
                        });
                        self.view = View::Documents;
                        self.scheduler.schedule(id, now);
                        info!("Upload finished, document {id} queued for processing");
                        vec![]
                    }
                    Err(err) => {
                        error!("Upload failed: {err}");
                        vec![Effect::ShowAlert(format!("Upload failed: {err}"))]
                    }
                }
            }

            Command::ProcessingFinished { id, result } => {
                match result {
                    Ok(bookmarks) => {
                        info!(
                            "Processing finished for document {id}: {} bookmarks",
                            bookmarks.len()
                        );
                        self.store
                            .update_status(id, DocumentStatus::Completed, bookmarks);
                    }
                    Err(err) => {
                        // No alert: the failed badge on the list row is the
                        // visible surface, the log line is the diagnostic.
                        error!("Processing failed for document {id}: {err}");
                        self.store
                            .update_status(id, DocumentStatus::Failed, Vec::new());
                    }
                }
                vec![]
            }

            Command::RetryProcessing(id) => {
                let failed = self
                    .store
                    .get(id)
                    .is_some_and(|d| d.status == DocumentStatus::Failed);
                if !failed {
                    debug!("Ignoring retry for document {id}: not in failed state");
                    return vec![];
                }
                info!("Retrying processing for document {id}");
                self.store
                    .update_status(id, DocumentStatus::Processing, Vec::new());
                vec![Effect::SendProcess(id)]
            }

            Command::ListingLoaded { result } => {
                match result {
                    Ok(documents) => {
                        info!("Loaded {} documents from the service", documents.len());
                        self.store.load_all(documents);
                    }
                    Err(err) => {
                        error!("Failed to load the document listing: {err}");
                    }
                }
                vec![]
            }

            Command::RequestDownload(id) => {
                if self.store.get(id).is_some_and(Document::is_completed) {
                    vec![Effect::SendDownloadUrl(id)]
                } else {
                    debug!("Ignoring download request for document {id}: not completed");
                    vec![]
                }
            }

            Command::DownloadUrlReady { result } => match result {
                Ok(url) => vec![Effect::OpenUrl(url)],
                Err(err) => {
                    error!("Download link retrieval failed: {err}");
                    vec![Effect::ShowAlert(format!("Download failed: {err}"))]
                }
            },

            Command::Tick { now } => self
                .scheduler
                .poll_due(now)
                .into_iter()
                .map(|id| {
                    info!("Deferred processing trigger fired for document {id}");
                    Effect::SendProcess(id)
                })
                .collect(),
        }
    }

    /// Cancels every pending deferred processing trigger. Called once on
    /// teardown so nothing fires into a dead runtime.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
    }
}

/// External stimuli: key presses, remote responses, and the tick. Commands
/// that depend on the clock carry the current instant so tests can drive a
/// virtual clock.
#[derive(Debug)]
pub enum Command {
    /// Switch to the document list.
    ShowDocuments,
    /// Switch to the upload screen.
    ShowUpload,
    /// Open the detail screen for a completed document.
    ShowDetail(DocumentId),
    /// Begin uploading the selected file.
    StartUpload { path: PathBuf },
    /// The upload call resolved.
    UploadFinished {
        result: Result<Document, ApiError>,
        now: Instant,
    },
    /// The processing call for a document resolved.
    ProcessingFinished {
        id: DocumentId,
        result: Result<Vec<Bookmark>, ApiError>,
    },
    /// Manually retry processing for a failed document.
    RetryProcessing(DocumentId),
    /// The startup listing call resolved.
    ListingLoaded {
        result: Result<Vec<Document>, ApiError>,
    },
    /// Fetch the download URL for a completed document.
    RequestDownload(DocumentId),
    /// The download URL call resolved.
    DownloadUrlReady { result: Result<String, ApiError> },
    /// Periodic clock tick driving the deferred schedule.
    Tick { now: Instant },
}

/// Side effects the runtime executes after a command is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand the file to the remote service's upload endpoint.
    SendUpload(PathBuf),
    /// Invoke the processing endpoint for a document.
    SendProcess(DocumentId),
    /// Fetch the download URL for a document.
    SendDownloadUrl(DocumentId),
    /// Open a URL with the system opener.
    OpenUrl(String),
    /// Raise the blocking alert popup with this message.
    ShowAlert(String),
}
