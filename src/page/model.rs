//! Page model: asynchronous paged reads with request supersession
//!
//! The model owns the current selection and the current page. Reads run
//! on a worker thread and their outcomes are marshalled back over a
//! channel; the owner thread applies them in [`PageModel::pump`] or
//! [`PageModel::wait_ready`], so no model field is ever mutated off the
//! owner thread.
//!
//! At most one read is outstanding per model. A selection made while a
//! read is in flight supersedes it: the stale outcome is discarded at
//! publish time (selection generations are compared) and a fresh read is
//! issued for the latest selection. Only the newest selection's outcome
//! is ever surfaced.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use tracing::{debug, trace, warn};

use crate::error::{ViewError, ViewResult};
use crate::fpath;
use crate::page::reader::{ByteRangeReader, RangeRead};
use crate::page::types::Page;
use crate::settings::DEFAULT_PAGE_SIZE;

/// Lifecycle of the model's current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    /// No selection has been made yet
    Idle,
    /// A read is in flight for the current selection
    Loading,
    /// The current selection's page is available
    Ready,
    /// The current selection's read failed; terminal until the next
    /// selection (no automatic retry)
    Error,
}

/// Change notification delivered to observers on the owner thread
#[derive(Debug)]
pub enum PageEvent {
    /// A selection was accepted and a read is (or remains) in flight
    Loading {
        /// The raw selected path
        path: String,
    },
    /// The latest selection's page is available via `current_page()`
    Ready {
        /// Page-aligned path of the published page
        path: String,
    },
    /// The latest selection's read failed. `SourceUnavailable` means the
    /// source could not be opened or read; `EmptyRead` means the path
    /// produced no data (informational, not a hard failure)
    Failed {
        /// What went wrong
        error: ViewError,
    },
}

type Observer = Box<dyn FnMut(&PageEvent)>;

/// One completed read, tagged with the selection generation it serves
struct ReadOutcome {
    generation: u64,
    aligned_path: String,
    padding_prefix: usize,
    result: ViewResult<RangeRead>,
}

/// Orchestrates paged reads over a [`ByteRangeReader`]
pub struct PageModel {
    reader: Arc<dyn ByteRangeReader>,
    page_size: usize,
    state: ModelState,
    page: Page,
    /// Latest selected path (raw, not yet aligned)
    selection: String,
    /// Monotonically increasing selection generation; outcomes tagged
    /// with an older generation are discarded at publish time
    generation: u64,
    /// Generation of the outstanding read, if any
    in_flight: Option<u64>,
    tx: mpsc::Sender<ReadOutcome>,
    rx: mpsc::Receiver<ReadOutcome>,
    observers: Vec<Observer>,
}

impl PageModel {
    /// Model with the default page size
    pub fn new(reader: Arc<dyn ByteRangeReader>) -> Self {
        Self::with_page_size(reader, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(reader: Arc<dyn ByteRangeReader>, page_size: usize) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            reader,
            page_size,
            state: ModelState::Idle,
            page: Page::empty(""),
            selection: String::new(),
            generation: 0,
            in_flight: None,
            tx,
            rx,
            observers: Vec::new(),
        }
    }

    /// Register a change observer, called on the owner thread whenever
    /// the model publishes a state change
    pub fn subscribe(&mut self, observer: impl FnMut(&PageEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Select a forensic path; the page containing it is fetched
    /// asynchronously. If a read is already in flight the new selection
    /// supersedes it rather than spawning a second concurrent read.
    pub fn select(&mut self, path: &str) {
        self.generation += 1;
        self.selection = path.to_string();
        self.state = ModelState::Loading;

        if self.in_flight.is_some() {
            trace!(
                generation = self.generation,
                "Selection supersedes in-flight read"
            );
        } else {
            self.issue_read();
        }

        let event = PageEvent::Loading {
            path: path.to_string(),
        };
        self.notify(&event);
    }

    /// Select the image location named by a feature record's first
    /// field, stripping any embedded filename ahead of the path
    pub fn select_feature(&mut self, first_field: &[u8]) {
        let path_bytes = fpath::path_without_filename(first_field);
        let path = String::from_utf8_lossy(path_bytes).into_owned();
        self.select(&path);
    }

    /// True while a read is in flight for the current selection
    pub fn is_busy(&self) -> bool {
        self.state == ModelState::Loading
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    /// Page size used for alignment and window arithmetic
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The current page. While Loading this is an empty page for the
    /// pending selection, never a half-updated one.
    pub fn current_page(&self) -> Page {
        if self.state == ModelState::Loading {
            Page::empty(&fpath::align_to_page(
                &self.selection,
                self.page_size as u64,
            ))
        } else {
            self.page.clone()
        }
    }

    /// Apply any completed reads without blocking. Call from the owner
    /// thread's event loop.
    pub fn pump(&mut self) {
        while let Ok(outcome) = self.rx.try_recv() {
            self.apply(outcome);
        }
    }

    /// Block until no read is outstanding, applying outcomes as they
    /// arrive. Lets a closing view drain its worker before releasing
    /// the backing source.
    pub fn wait_ready(&mut self) {
        while self.in_flight.is_some() {
            match self.rx.recv() {
                Ok(outcome) => self.apply(outcome),
                Err(_) => break,
            }
        }
    }

    /// Issue the single outstanding read for the current selection:
    /// align to the page start, extend the window one page backwards
    /// for leading context, and request prefix + two pages of bytes.
    fn issue_read(&mut self) {
        let aligned = fpath::align_to_page(&self.selection, self.page_size as u64);
        let aligned_offset = fpath::offset_of(&aligned);
        let padded_start = aligned_offset.saturating_sub(self.page_size as u64);
        let padding_prefix = (aligned_offset - padded_start) as usize;
        let padded_path = fpath::adjust(&self.selection, padded_start);
        let num_bytes = padding_prefix + 2 * self.page_size;

        let generation = self.generation;
        self.in_flight = Some(generation);

        debug!(
            path = %padded_path,
            num_bytes,
            generation,
            "Issuing page read"
        );

        let reader = Arc::clone(&self.reader);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = reader.read(&padded_path, num_bytes);
            // Send failure means the model is gone; the read just drains
            let _ = tx.send(ReadOutcome {
                generation,
                aligned_path: aligned,
                padding_prefix,
                result,
            });
        });
    }

    /// Owner-thread publish step: compare the outcome's generation with
    /// the current selection and either publish or discard-and-reissue.
    fn apply(&mut self, outcome: ReadOutcome) {
        self.in_flight = None;

        if outcome.generation != self.generation {
            trace!(
                stale = outcome.generation,
                current = self.generation,
                "Discarding superseded read, re-issuing for latest selection"
            );
            self.issue_read();
            return;
        }

        match outcome.result {
            Ok(read) if read.bytes.is_empty() => {
                self.page = Page::empty(&outcome.aligned_path);
                self.state = ModelState::Error;
                let event = PageEvent::Failed {
                    error: ViewError::EmptyRead {
                        path: outcome.aligned_path,
                    },
                };
                self.notify(&event);
            }
            Ok(read) => {
                let usable = outcome.padding_prefix.min(read.bytes.len());
                let end = (usable + self.page_size).min(read.bytes.len());
                self.page = Page {
                    forensic_path: outcome.aligned_path.clone(),
                    page_bytes: read.bytes[usable..end].to_vec(),
                    padded_bytes: read.bytes,
                    padding_prefix: outcome.padding_prefix,
                    image_size: read.total_size,
                };
                self.state = ModelState::Ready;
                let event = PageEvent::Ready {
                    path: outcome.aligned_path,
                };
                self.notify(&event);
            }
            Err(error) => {
                warn!(%error, "Page read failed");
                self.page = Page::empty(&outcome.aligned_path);
                self.state = ModelState::Error;
                let event = PageEvent::Failed { error };
                self.notify(&event);
            }
        }
    }

    fn notify(&mut self, event: &PageEvent) {
        for observer in &mut self.observers {
            observer(event);
        }
    }
}
