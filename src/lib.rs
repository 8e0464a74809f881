// Export modules for use in tests
pub mod coordinator;
pub mod document_store;
pub mod event_source;
pub mod main_app;
pub mod models;
pub mod notification;
pub mod opener;
pub mod panic_handler;
pub mod paths;
pub mod picker;
pub mod remote;
pub mod scheduler;
pub mod theme;
pub mod widget;

pub mod test_utils;

// Re-export main app components
pub use main_app::{App, AppAction, run_app_with_event_source};
