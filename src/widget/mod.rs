//! View widgets for the three screens and the blocking alert dialog.

pub mod alert_popup;
pub mod detail_view;
pub mod document_table;
pub mod upload_panel;

pub use alert_popup::AlertPopup;
pub use detail_view::DetailView;
pub use document_table::DocumentTable;
pub use upload_panel::UploadPanel;
