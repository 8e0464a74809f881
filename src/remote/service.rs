//! API service - worker threads performing the blocking remote calls

use std::path::PathBuf;
use std::sync::Arc;

use flume::{Receiver, Sender};
use log::debug;

use crate::models::DocumentId;
use crate::remote::client::RemoteService;
use crate::remote::request::{ApiRequest, ApiResponse, RequestId};

const DEFAULT_WORKERS: usize = 2;

/// Owns the worker threads that execute remote calls off the UI thread.
///
/// Requests go out over a flume channel shared by the workers; completed
/// responses are drained with [`poll_responses`] from the UI tick, so state
/// is only ever mutated on the main thread. Two workers keep a slow upload
/// from delaying an already due processing trigger.
///
/// [`poll_responses`]: RemoteApiService::poll_responses
pub struct RemoteApiService {
    request_tx: Sender<ApiRequest>,
    response_rx: Receiver<ApiResponse>,
    next_request_id: u64,
    num_workers: usize,
}

impl RemoteApiService {
    #[must_use]
    pub fn new(service: Arc<dyn RemoteService>) -> Self {
        Self::with_workers(service, DEFAULT_WORKERS)
    }

    #[must_use]
    pub fn with_workers(service: Arc<dyn RemoteService>, num_workers: usize) -> Self {
        // Flume because the request queue is shared by several workers:
        // its Receiver clones, std::sync::mpsc's does not.
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        let num_workers = num_workers.max(1);
        for _ in 0..num_workers {
            let service = service.clone();
            let rx = request_rx.clone();
            let tx = response_tx.clone();

            std::thread::spawn(move || {
                api_worker(service, rx, tx);
            });
        }

        Self {
            request_tx,
            response_rx,
            next_request_id: 1,
            num_workers,
        }
    }

    pub fn request_upload(&mut self, path: PathBuf) -> RequestId {
        let id = self.next_id();
        debug!("Dispatching upload request {id:?} for {}", path.display());
        let _ = self.request_tx.send(ApiRequest::Upload { id, path });
        id
    }

    pub fn request_process(&mut self, document_id: DocumentId) -> RequestId {
        let id = self.next_id();
        debug!("Dispatching process request {id:?} for document {document_id}");
        let _ = self
            .request_tx
            .send(ApiRequest::Process { id, document_id });
        id
    }

    pub fn request_listing(&mut self) -> RequestId {
        let id = self.next_id();
        debug!("Dispatching listing request {id:?}");
        let _ = self.request_tx.send(ApiRequest::ListDocuments { id });
        id
    }

    pub fn request_download_url(&mut self, document_id: DocumentId) -> RequestId {
        let id = self.next_id();
        debug!("Dispatching download URL request {id:?} for document {document_id}");
        let _ = self
            .request_tx
            .send(ApiRequest::DownloadUrl { id, document_id });
        id
    }

    /// Drains every completed response without blocking. Called from the UI
    /// tick; this is the only place responses cross back to the main thread.
    pub fn poll_responses(&mut self) -> Vec<ApiResponse> {
        let mut responses = vec![];
        while let Ok(response) = self.response_rx.try_recv() {
            responses.push(response);
        }
        responses
    }

    /// Ask every worker to exit. In-flight calls finish on their own; their
    /// responses are dropped unread.
    pub fn shutdown(&self) {
        for _ in 0..self.num_workers {
            let _ = self.request_tx.send(ApiRequest::Shutdown);
        }
    }

    fn next_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        id
    }
}

impl Drop for RemoteApiService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn api_worker(
    service: Arc<dyn RemoteService>,
    request_rx: Receiver<ApiRequest>,
    response_tx: Sender<ApiResponse>,
) {
    while let Ok(request) = request_rx.recv() {
        let response = match request {
            ApiRequest::Upload { id, path } => ApiResponse::Uploaded {
                id,
                result: service.upload(&path),
            },
            ApiRequest::Process { id, document_id } => ApiResponse::Processed {
                id,
                document_id,
                result: service.process(document_id),
            },
            ApiRequest::ListDocuments { id } => ApiResponse::Listing {
                id,
                result: service.list_documents(),
            },
            ApiRequest::DownloadUrl { id, document_id } => ApiResponse::Download {
                id,
                result: service.download_url(document_id),
            },
            ApiRequest::Shutdown => break,
        };

        if response_tx.send(response).is_err() {
            break;
        }
    }
    debug!("API worker exiting");
}
