//! Background page loading.
//!
//! Fetching a page goes through a worker thread so the interface stays
//! responsive while a request is outstanding. The main loop polls for
//! completion on every tick.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::api::{PageResponse, UserClient};

/// Manages the single in-flight page request.
pub struct PageLoader {
    rx: Option<Receiver<Option<PageResponse>>>,
    loading: bool,
    page: Option<u32>,
}

impl Default for PageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PageLoader {
    pub fn new() -> Self {
        Self {
            rx: None,
            loading: false,
            page: None,
        }
    }

    /// Check if a page request is currently outstanding
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Spawn a background thread to fetch `page`. Dropped (not queued) while
    /// another request is outstanding.
    pub fn load_page(&mut self, client: UserClient, page: u32) {
        if self.loading {
            return;
        }

        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);
        self.loading = true;
        self.page = Some(page);

        thread::spawn(move || match client.fetch_page(page) {
            Ok(response) => {
                let _ = tx.send(Some(response));
            }
            Err(e) => {
                log::warn!("Failed to fetch page {}: {}", page, e);
                let _ = tx.send(None);
            }
        });
    }

    /// Poll for a completed page request.
    /// Returns `(page, Some(response))` on success, `(page, None)` on failure.
    pub fn poll_page(&mut self) -> Option<(u32, Option<PageResponse>)> {
        let rx = self.rx.as_ref()?;
        let page = self.page?;

        match rx.try_recv() {
            Ok(response) => {
                self.finish();
                Some((page, response))
            }
            Err(TryRecvError::Disconnected) => {
                // Worker died without reporting; surface it as a failed
                // fetch so the in-flight flag never stays stuck.
                log::debug!("Page loader disconnected for page {}", page);
                self.finish();
                Some((page, None))
            }
            Err(TryRecvError::Empty) => None,
        }
    }

    fn finish(&mut self) {
        self.loading = false;
        self.rx = None;
        self.page = None;
    }
}
