use anyhow::Result;

/// Hands a URL to the desktop environment. Behind a trait so flows that
/// end in a browser launch stay assertable in tests.
pub trait UrlOpener: Send {
    fn open_url(&mut self, url: &str) -> Result<()>;
}

/// Opens the URL with the platform's default handler.
pub struct SystemUrlOpener;

impl UrlOpener for SystemUrlOpener {
    fn open_url(&mut self, url: &str) -> Result<()> {
        open::that(url)?;
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use super::UrlOpener;
    use anyhow::Result;
    use std::sync::{Arc, Mutex};

    /// Records opened URLs instead of launching anything. Clone a handle
    /// before boxing it so the test can inspect the log afterwards.
    #[derive(Clone, Default)]
    pub struct MockUrlOpener {
        opened: Arc<Mutex<Vec<String>>>,
    }

    impl MockUrlOpener {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn opened_urls(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    impl UrlOpener for MockUrlOpener {
        fn open_url(&mut self, url: &str) -> Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockUrlOpener;
