use crate::coordinator::{Command, Coordinator, Effect, View};
use crate::event_source::EventSource;
use crate::models::DocumentId;
use crate::notification::AlertManager;
use crate::opener::{SystemUrlOpener, UrlOpener};
use crate::picker::PdfPicker;
use crate::remote::{ApiResponse, RemoteApiService, RemoteService};
use crate::theme::current_theme;
use crate::widget::{AlertPopup, DetailView, DocumentTable, UploadPanel};
use anyhow::Result;
use log::{debug, error};
use ratatui::{
    Terminal,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders, Paragraph},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum AppAction {
    Quit,
}

/// Top-level application state: the view coordinator plus everything the
/// coordinator deliberately knows nothing about (terminal widgets, the
/// background API service, the file picker, the system opener).
///
/// All mutation happens on this thread. Worker results only enter through
/// [`App::tick`], so a response arriving mid-upload can never interleave
/// with a key press.
pub struct App {
    pub coordinator: Coordinator,
    api: RemoteApiService,
    pub picker: PdfPicker,
    pub alerts: AlertManager,
    pub document_table: DocumentTable,
    pub upload_panel: UploadPanel,
    pub detail_view: DetailView,
    url_opener: Box<dyn UrlOpener>,
}

impl App {
    pub fn new(service: Arc<dyn RemoteService>, scan_directory: impl Into<PathBuf>) -> Self {
        Self::new_with_opener(service, scan_directory, Box::new(SystemUrlOpener))
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_with_mock_opener(
        service: Arc<dyn RemoteService>,
        scan_directory: impl Into<PathBuf>,
        opener: crate::opener::MockUrlOpener,
    ) -> Self {
        Self::new_with_opener(service, scan_directory, Box::new(opener))
    }

    fn new_with_opener(
        service: Arc<dyn RemoteService>,
        scan_directory: impl Into<PathBuf>,
        url_opener: Box<dyn UrlOpener>,
    ) -> Self {
        let mut app = Self {
            coordinator: Coordinator::new(),
            api: RemoteApiService::new(service),
            picker: PdfPicker::new(scan_directory),
            alerts: AlertManager::new(),
            document_table: DocumentTable::new(),
            upload_panel: UploadPanel::new(),
            detail_view: DetailView::new(),
            url_opener,
        };
        app.request_initial_listing();
        app
    }

    /// Kicks off the startup fetch of the server's document list. The
    /// result lands in a later [`App::tick`]; until then the table just
    /// shows its empty state.
    fn request_initial_listing(&mut self) {
        let request_id = self.api.request_listing();
        debug!("Requested startup document listing ({request_id:?})");
    }

    pub fn handle_key_event(&mut self, key: crossterm::event::KeyEvent) -> Option<AppAction> {
        use crossterm::event::{KeyCode, KeyModifiers};

        // Ctrl-C always quits, even under the modal alert.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppAction::Quit);
        }

        // A raised alert is modal: everything except dismissal is swallowed.
        if self.alerts.is_active() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alerts.dismiss();
            }
            return None;
        }

        if key.code == KeyCode::Char('q') {
            return Some(AppAction::Quit);
        }

        match self.coordinator.view() {
            View::Documents => self.handle_documents_key(key),
            View::Upload => self.handle_upload_key(key),
            View::Detail => self.handle_detail_key(key),
        }
        None
    }

    fn handle_documents_key(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.coordinator.store().len();
                self.document_table.move_selection_down(len);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.document_table.move_selection_up();
            }
            KeyCode::Char('u') => {
                let effects = self.coordinator.apply(Command::ShowUpload);
                self.execute_effects(effects);
                if self.coordinator.view() == View::Upload {
                    self.picker.refresh();
                    self.upload_panel.clamp_selection(self.picker.len());
                }
            }
            KeyCode::Char('r') => {
                if let Some(id) = self.selected_document_id() {
                    let effects = self.coordinator.apply(Command::RetryProcessing(id));
                    self.execute_effects(effects);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_document_id() {
                    let effects = self.coordinator.apply(Command::ShowDetail(id));
                    self.execute_effects(effects);
                    if self.coordinator.view() == View::Detail {
                        self.detail_view.reset();
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_upload_key(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        // The busy view swallows everything while an upload is in flight.
        if self.coordinator.is_uploading() {
            return;
        }

        match key.code {
            KeyCode::Esc => {
                let effects = self.coordinator.apply(Command::ShowDocuments);
                self.execute_effects(effects);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.picker.len();
                self.upload_panel.move_selection_down(len);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.upload_panel.move_selection_up();
            }
            KeyCode::Char('r') => {
                self.picker.refresh();
                self.upload_panel.clamp_selection(self.picker.len());
            }
            KeyCode::Enter => {
                let path = self
                    .picker
                    .get(self.upload_panel.selected())
                    .map(|file| file.path.clone());
                if let Some(path) = path {
                    let effects = self.coordinator.apply(Command::StartUpload { path });
                    self.execute_effects(effects);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        match key.code {
            KeyCode::Esc | KeyCode::Char('b') => {
                let effects = self.coordinator.apply(Command::ShowDocuments);
                self.execute_effects(effects);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self
                    .coordinator
                    .current_document()
                    .map(|doc| doc.bookmarks.len())
                    .unwrap_or(0);
                self.detail_view.move_selection_down(len);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.detail_view.move_selection_up();
            }
            KeyCode::Char('o') => {
                if let Some(id) = self.coordinator.current_document_id() {
                    let effects = self.coordinator.apply(Command::RequestDownload(id));
                    self.execute_effects(effects);
                }
            }
            _ => {}
        }
    }

    fn selected_document_id(&self) -> Option<DocumentId> {
        self.coordinator
            .store()
            .get_by_index(self.document_table.selected())
            .map(|doc| doc.id)
    }

    /// Drains finished API calls into coordinator commands and advances the
    /// deferred processing schedule. Returns true when anything changed, so
    /// the run loop knows a redraw is due.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        for response in self.api.poll_responses() {
            changed = true;
            let uploaded_ok = matches!(&response, ApiResponse::Uploaded { result: Ok(_), .. });

            let effects = match response {
                ApiResponse::Uploaded { result, .. } => {
                    self.coordinator.apply(Command::UploadFinished { result, now })
                }
                ApiResponse::Processed {
                    document_id,
                    result,
                    ..
                } => self.coordinator.apply(Command::ProcessingFinished {
                    id: document_id,
                    result,
                }),
                ApiResponse::Listing { result, .. } => {
                    self.coordinator.apply(Command::ListingLoaded { result })
                }
                ApiResponse::Download { result, .. } => {
                    self.coordinator.apply(Command::DownloadUrlReady { result })
                }
            };
            self.execute_effects(effects);

            if uploaded_ok {
                // Land the cursor on the document that just appeared.
                self.document_table.selected = self.coordinator.store().len().saturating_sub(1);
            }
            self.document_table
                .clamp_selection(self.coordinator.store().len());
        }

        let effects = self.coordinator.apply(Command::Tick { now });
        if !effects.is_empty() {
            changed = true;
            self.execute_effects(effects);
        }

        changed
    }

    fn execute_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SendUpload(path) => {
                    self.api.request_upload(path);
                }
                Effect::SendProcess(id) => {
                    self.api.request_process(id);
                }
                Effect::SendDownloadUrl(id) => {
                    self.api.request_download_url(id);
                }
                Effect::OpenUrl(url) => {
                    if let Err(e) = self.url_opener.open_url(&url) {
                        error!("Failed to open download link {url}: {e}");
                        self.alerts.raise(format!("Download failed: {e}"));
                    }
                }
                Effect::ShowAlert(message) => {
                    self.alerts.raise(message);
                }
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.coordinator.shutdown();
        self.api.shutdown();
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame) {
        let palette = current_theme();

        let background = Block::default().style(Style::default().bg(palette.base_00));
        f.render_widget(background, f.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(f.area());

        match self.coordinator.view() {
            View::Documents => {
                self.document_table
                    .render(f, chunks[0], self.coordinator.store().documents(), palette);
            }
            View::Upload => {
                self.upload_panel.render(
                    f,
                    chunks[0],
                    self.picker.files(),
                    self.coordinator.is_uploading(),
                    palette,
                );
            }
            View::Detail => {
                if let Some(doc) = self.coordinator.current_document() {
                    self.detail_view.render(f, chunks[0], doc, palette);
                } else {
                    self.document_table
                        .render(f, chunks[0], self.coordinator.store().documents(), palette);
                }
            }
        }

        let help_text = if self.alerts.is_active() {
            "Enter: Dismiss"
        } else {
            match self.coordinator.view() {
                View::Documents => "j/k: Navigate | Enter: Details | u: Upload | r: Retry | q: Quit",
                View::Upload => "j/k: Navigate | Enter: Upload | r: Rescan | Esc: Back | q: Quit",
                View::Detail => "j/k: Scroll | o: Open PDF | Esc/b: Back | q: Quit",
            }
        };
        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.base_03)),
            )
            .style(Style::default().fg(palette.base_03).bg(palette.base_00));
        f.render_widget(help, chunks[1]);

        if let Some(alert) = self.alerts.current() {
            AlertPopup::render(f, f.area(), alert, palette);
        }
    }
}

pub fn run_app_with_event_source<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();
    let mut first_render = true;

    loop {
        let mut events_processed = 0;
        let mut should_quit = false;

        while event_source.poll(Duration::from_millis(0))? && events_processed < 50 {
            let event = event_source.read()?;
            events_processed += 1;

            if let crossterm::event::Event::Key(key) = event {
                if app.handle_key_event(key) == Some(AppAction::Quit) {
                    should_quit = true;
                }
            }

            if should_quit {
                break;
            }
        }

        let mut needs_redraw = events_processed > 0;

        if first_render {
            needs_redraw = true;
            first_render = false;
        }

        if last_tick.elapsed() >= tick_rate {
            if app.tick(Instant::now()) {
                needs_redraw = true;
            }
            last_tick = Instant::now();
        }

        if needs_redraw {
            terminal.draw(|f| app.draw(f))?;
        }

        // Nothing pending: park on the event source instead of spinning.
        if events_processed == 0 {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));
            let _ = event_source.poll(timeout);
        }

        if should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bookmark, BookmarkCategory, Document, DocumentId, DocumentStatus};
    use crate::opener::MockUrlOpener;
    use crate::remote::{ApiError, MockRemoteService};
    use crate::scheduler::PROCESS_START_DELAY;
    use chrono::Utc;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::fs;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn completed_document(id: u64, filename: &str) -> Document {
        Document {
            id: DocumentId(id),
            filename: filename.to_string(),
            date: Utc::now(),
            status: DocumentStatus::Completed,
            bookmarks: vec![Bookmark {
                page: 4,
                label: "Chest X-Ray".to_string(),
                category: BookmarkCategory::MedicalRadiology,
            }],
        }
    }

    fn fresh_document(id: u64, filename: &str) -> Document {
        Document {
            id: DocumentId(id),
            filename: filename.to_string(),
            date: Utc::now(),
            status: DocumentStatus::Processing,
            bookmarks: vec![],
        }
    }

    struct Harness {
        app: App,
        mock: MockRemoteService,
        opener: MockUrlOpener,
        _scan_dir: TempDir,
    }

    fn harness_with(mock: MockRemoteService) -> Harness {
        let scan_dir = TempDir::new().unwrap();
        fs::write(scan_dir.path().join("claim.pdf"), b"pdf").unwrap();

        let opener = MockUrlOpener::new();
        let app = App::new_with_mock_opener(
            Arc::new(mock.clone()),
            scan_dir.path(),
            opener.clone(),
        );
        Harness {
            app,
            mock,
            opener,
            _scan_dir: scan_dir,
        }
    }

    /// Pumps responses from the worker threads until the condition holds.
    /// `now` is the virtual clock handed to the coordinator; the deadline
    /// guarding against a hang runs on the real one.
    fn tick_until(app: &mut App, now: Instant, pred: impl Fn(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            app.tick(now);
            if pred(app) {
                return;
            }
            assert!(Instant::now() < deadline, "condition not reached in time");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn startup_listing_fills_the_store() {
        let mock = MockRemoteService::new();
        mock.queue_listing(Ok(vec![
            completed_document(1, "a.pdf"),
            fresh_document(2, "b.pdf"),
        ]));
        let mut h = harness_with(mock);

        let now = Instant::now();
        tick_until(&mut h.app, now, |app| app.coordinator.store().len() == 2);

        assert_eq!(h.app.coordinator.view(), View::Documents);
        assert_eq!(h.mock.listing_calls(), 1);
    }

    #[test]
    fn upload_flow_appends_processing_document_and_returns_to_list() {
        let mock = MockRemoteService::new();
        mock.queue_listing(Ok(vec![completed_document(1, "archive.pdf")]));
        mock.queue_upload(Ok(fresh_document(7, "claim.pdf")));
        let mut h = harness_with(mock);

        let now = Instant::now();
        tick_until(&mut h.app, now, |app| app.coordinator.store().len() == 1);

        h.app.handle_key_event(key(KeyCode::Char('u')));
        assert_eq!(h.app.coordinator.view(), View::Upload);
        assert_eq!(h.app.picker.len(), 1);

        h.app.handle_key_event(key(KeyCode::Enter));
        assert!(h.app.coordinator.is_uploading());

        tick_until(&mut h.app, now, |app| app.coordinator.store().len() == 2);

        assert_eq!(h.app.coordinator.view(), View::Documents);
        assert!(!h.app.coordinator.is_uploading());
        let doc = h.app.coordinator.store().get_by_index(1).unwrap();
        assert_eq!(doc.status, DocumentStatus::Processing);
        assert_eq!(h.mock.uploaded_paths().len(), 1);
        // The cursor lands on the freshly uploaded row.
        assert_eq!(h.app.document_table.selected(), 1);

        // The processing call only goes out once the delay has elapsed.
        assert!(h.mock.processed_ids().is_empty());
        h.mock.queue_process(Ok(vec![Bookmark {
            page: 1,
            label: "Estimate Total".to_string(),
            category: BookmarkCategory::Estimate,
        }]));
        tick_until(&mut h.app, now + PROCESS_START_DELAY, |app| {
            app.coordinator
                .store()
                .get(DocumentId(7))
                .is_some_and(|d| d.status == DocumentStatus::Completed)
        });
        assert_eq!(h.mock.processed_ids(), vec![DocumentId(7)]);
    }

    #[test]
    fn upload_failure_raises_a_blocking_alert() {
        let mock = MockRemoteService::new();
        mock.queue_upload(Err(ApiError::Timeout));
        let mut h = harness_with(mock);

        h.app.handle_key_event(key(KeyCode::Char('u')));
        h.app.handle_key_event(key(KeyCode::Enter));

        let now = Instant::now();
        tick_until(&mut h.app, now, |app| app.alerts.is_active());

        assert!(h.app.coordinator.store().is_empty());
        assert_eq!(h.app.coordinator.view(), View::Upload);

        // Every key except dismissal is swallowed while the alert is up.
        h.app.handle_key_event(key(KeyCode::Char('j')));
        h.app.handle_key_event(key(KeyCode::Char('u')));
        assert!(h.app.alerts.is_active());

        h.app.handle_key_event(key(KeyCode::Enter));
        assert!(!h.app.alerts.is_active());
    }

    #[test]
    fn quit_is_swallowed_while_alert_is_modal() {
        let mock = MockRemoteService::new();
        mock.queue_upload(Err(ApiError::Timeout));
        let mut h = harness_with(mock);

        h.app.handle_key_event(key(KeyCode::Char('u')));
        h.app.handle_key_event(key(KeyCode::Enter));
        tick_until(&mut h.app, Instant::now(), |app| app.alerts.is_active());

        assert_eq!(h.app.handle_key_event(key(KeyCode::Char('q'))), None);
        assert!(h.app.alerts.is_active());

        // Ctrl-C still gets out.
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(h.app.handle_key_event(ctrl_c), Some(AppAction::Quit));
    }

    #[test]
    fn upload_view_ignores_keys_while_an_upload_is_in_flight() {
        let mock = MockRemoteService::new();
        mock.queue_upload(Err(ApiError::Timeout));
        let mut h = harness_with(mock);

        h.app.handle_key_event(key(KeyCode::Char('u')));
        h.app.handle_key_event(key(KeyCode::Enter));
        assert!(h.app.coordinator.is_uploading());

        // Esc cannot leave the busy view; Enter cannot double-send.
        h.app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(h.app.coordinator.view(), View::Upload);
        h.app.handle_key_event(key(KeyCode::Enter));

        tick_until(&mut h.app, Instant::now(), |app| app.alerts.is_active());
        assert_eq!(h.mock.uploaded_paths().len(), 1);
    }

    #[test]
    fn detail_view_opens_for_completed_documents_only() {
        let mock = MockRemoteService::new();
        mock.queue_listing(Ok(vec![
            fresh_document(1, "pending.pdf"),
            completed_document(2, "done.pdf"),
        ]));
        let mut h = harness_with(mock);
        tick_until(&mut h.app, Instant::now(), |app| {
            app.coordinator.store().len() == 2
        });

        // Processing document: Enter is refused.
        h.app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(h.app.coordinator.view(), View::Documents);

        h.app.handle_key_event(key(KeyCode::Char('j')));
        h.app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(h.app.coordinator.view(), View::Detail);
        assert_eq!(
            h.app.coordinator.current_document_id(),
            Some(DocumentId(2))
        );

        h.app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(h.app.coordinator.view(), View::Documents);
    }

    #[test]
    fn download_opens_the_url_through_the_system_opener() {
        let mock = MockRemoteService::new();
        mock.queue_listing(Ok(vec![completed_document(3, "scan.pdf")]));
        mock.queue_download(Ok("https://files.example.com/scan.pdf".to_string()));
        let mut h = harness_with(mock);
        tick_until(&mut h.app, Instant::now(), |app| {
            !app.coordinator.store().is_empty()
        });

        h.app.handle_key_event(key(KeyCode::Enter));
        h.app.handle_key_event(key(KeyCode::Char('o')));
        let opener = h.opener.clone();
        tick_until(&mut h.app, Instant::now(), move |_| {
            !opener.opened_urls().is_empty()
        });

        assert_eq!(
            h.opener.opened_urls(),
            vec!["https://files.example.com/scan.pdf"]
        );
        assert_eq!(h.mock.download_ids(), vec![DocumentId(3)]);
    }

    #[test]
    fn download_failure_raises_an_alert() {
        let mock = MockRemoteService::new();
        mock.queue_listing(Ok(vec![completed_document(3, "scan.pdf")]));
        mock.queue_download(Err(ApiError::generic("boom")));
        let mut h = harness_with(mock);
        tick_until(&mut h.app, Instant::now(), |app| {
            !app.coordinator.store().is_empty()
        });

        h.app.handle_key_event(key(KeyCode::Enter));
        h.app.handle_key_event(key(KeyCode::Char('o')));
        tick_until(&mut h.app, Instant::now(), |app| app.alerts.is_active());

        assert!(h.opener.opened_urls().is_empty());
        assert!(
            h.app
                .alerts
                .current()
                .unwrap()
                .message
                .starts_with("Download failed")
        );
    }

    #[test]
    fn retry_requeues_processing_for_a_failed_document() {
        let mock = MockRemoteService::new();
        mock.queue_listing(Ok(vec![completed_document(1, "archive.pdf")]));
        mock.queue_upload(Ok(fresh_document(9, "claim.pdf")));
        mock.queue_process(Err(ApiError::generic("analysis crashed")));
        let mut h = harness_with(mock);

        let now = Instant::now();
        tick_until(&mut h.app, now, |app| app.coordinator.store().len() == 1);
        h.app.handle_key_event(key(KeyCode::Char('u')));
        h.app.handle_key_event(key(KeyCode::Enter));
        tick_until(&mut h.app, now, |app| app.coordinator.store().len() == 2);
        tick_until(&mut h.app, now + PROCESS_START_DELAY, |app| {
            app.coordinator
                .store()
                .get(DocumentId(9))
                .is_some_and(|d| d.status == DocumentStatus::Failed)
        });
        // Silent failure: badge flips, no popup.
        assert!(!h.app.alerts.is_active());

        // The upload left the cursor on the failed row, so retry hits it.
        h.mock.queue_process(Ok(vec![]));
        h.app.handle_key_event(key(KeyCode::Char('r')));
        tick_until(&mut h.app, now, |app| {
            app.coordinator
                .store()
                .get(DocumentId(9))
                .is_some_and(|d| d.status == DocumentStatus::Completed)
        });
        assert_eq!(h.mock.processed_ids().len(), 2);
    }

    #[test]
    fn run_loop_quits_on_q_with_simulated_events() {
        use crate::event_source::SimulatedEventSource;
        use ratatui::backend::TestBackend;

        let mock = MockRemoteService::new();
        let mut h = harness_with(mock);

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut events = SimulatedEventSource::new(vec![
            SimulatedEventSource::char_key('u'),
            SimulatedEventSource::esc_key(),
            SimulatedEventSource::char_key('q'),
        ]);

        run_app_with_event_source(&mut terminal, &mut h.app, &mut events).unwrap();
        assert_eq!(h.app.coordinator.view(), View::Documents);
    }
}
