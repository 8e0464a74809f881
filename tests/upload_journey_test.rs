use booksmart::main_app::run_app_with_event_source;
use booksmart::App;
use booksmart::opener::MockUrlOpener;
use booksmart::remote::{ApiError, MockRemoteService};
use booksmart::test_utils::test_helpers::TestScenarioBuilder;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Polls until the condition holds or two seconds pass. The worker threads
/// deliver results asynchronously, so assertions on recorded calls need a
/// little patience.
fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn upload_keys_reach_the_service_with_the_selected_file() {
    // Scan directory with two PDFs; selection starts on the first.
    let scan_dir = TempDir::new().unwrap();
    fs::write(scan_dir.path().join("estimate.pdf"), b"pdf").unwrap();
    fs::write(scan_dir.path().join("photos.pdf"), b"pdf").unwrap();

    let mock = MockRemoteService::new();
    mock.queue_upload(Err(ApiError::generic("not relevant here")));
    let mut app = App::new_with_mock_opener(
        Arc::new(mock.clone()),
        scan_dir.path(),
        MockUrlOpener::new(),
    );

    // Open the upload view, pick the second file, upload it, then quit.
    let mut event_source = TestScenarioBuilder::new()
        .press_char('u')
        .navigate_down(1)
        .press_enter()
        .quit()
        .build();

    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();

    run_app_with_event_source(&mut terminal, &mut app, &mut event_source).unwrap();

    // The request went out before quit; the worker records it shortly after.
    wait_until(|| !mock.uploaded_paths().is_empty());
    assert_eq!(
        mock.uploaded_paths(),
        vec![scan_dir.path().join("photos.pdf")]
    );
    app.shutdown();
}

#[test]
fn quitting_from_every_view_returns_cleanly() {
    let scan_dir = TempDir::new().unwrap();

    let mock = MockRemoteService::new();
    let mut app = App::new_with_mock_opener(
        Arc::new(mock),
        scan_dir.path(),
        MockUrlOpener::new(),
    );

    // Wander into the upload view and back before quitting.
    let mut event_source = TestScenarioBuilder::new()
        .press_char('u')
        .press_esc()
        .navigate_down(2)
        .navigate_up(1)
        .quit()
        .build();

    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();

    run_app_with_event_source(&mut terminal, &mut app, &mut event_source).unwrap();
    app.shutdown();
}
