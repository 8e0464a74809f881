use crate::models::{Bookmark, Document, DocumentId, DocumentStatus};

/// In-memory ordered collection of document records. Single source of truth
/// for the view layer: populated by the startup listing, appended to on
/// upload, updated in place when processing resolves.
///
/// The store is append-only plus in-place status/bookmark updates. There is
/// no deletion operation. All mutation happens on the UI thread.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
        }
    }

    /// Replaces the entire collection with the remote listing. Called once,
    /// when the startup listing response arrives.
    pub fn load_all(&mut self, documents: Vec<Document>) {
        self.documents = documents;
    }

    /// Appends a freshly uploaded document. No duplicate-id check: the
    /// remote service is trusted to hand back a fresh id.
    pub fn append(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Replaces the status and bookmarks of the document with the given id,
    /// leaving every other document and the ordering untouched. Silent no-op
    /// when the id is unknown.
    pub fn update_status(
        &mut self,
        id: DocumentId,
        status: DocumentStatus,
        bookmarks: Vec<Bookmark>,
    ) {
        if let Some(document) = self.documents.iter_mut().find(|d| d.id == id) {
            document.status = status;
            document.bookmarks = bookmarks;
        }
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
