//! View state that is filled by asynchronous loads.
//!
//! Every load takes a token from a [`RequestSeq`]. Only the settle carrying
//! the latest token may touch the view; anything older is a stale response
//! from a navigation the user has already moved past.

use std::ops::RangeInclusive;

use tracing::debug;

use crate::error::{ReelError, Result};
use crate::pagination::{page_window, MAX_VISIBLE_PAGES};
use crate::reporter::ErrorReporter;
use crate::types::Paged;

/// Monotonic request tokens for one view.
#[derive(Debug, Default)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, id: u64) -> bool {
        id == self.latest
    }
}

/// What a settle did to the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    Failed,
    Stale,
    /// The requested page lies past the end; nothing was shown. The view
    /// should load `last_page` instead.
    OutOfRange { last_page: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub loading: bool,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 1,
            total_count: 0,
            loading: false,
        }
    }
}

impl<T> PageState<T> {
    pub fn window(&self) -> RangeInclusive<u32> {
        page_window(self.current_page, self.total_pages, MAX_VISIBLE_PAGES)
    }

    /// "Go to page N" is only allowed inside `[1, total_pages]`.
    pub fn can_go_to(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }
}

/// Paginated view state plus the token sequence guarding it.
#[derive(Debug)]
pub struct PageSync<T> {
    state: PageState<T>,
    seq: RequestSeq,
}

impl<T> Default for PageSync<T> {
    fn default() -> Self {
        Self {
            state: PageState::default(),
            seq: RequestSeq::default(),
        }
    }
}

impl<T> PageSync<T> {
    pub fn state(&self) -> &PageState<T> {
        &self.state
    }

    /// Start a load: raises `loading` and returns the token the settle must
    /// carry.
    pub fn begin(&mut self) -> u64 {
        self.state.loading = true;
        self.seq.issue()
    }

    /// Drop everything shown, e.g. before loading a different movie's ratings.
    /// In-flight loads are invalidated too.
    pub fn clear(&mut self) {
        self.state = PageState::default();
        self.seq.issue();
    }

    pub fn settle(
        &mut self,
        id: u64,
        result: Result<Paged<T>>,
        reporter: &dyn ErrorReporter,
        context: &str,
    ) -> Settled {
        if !self.seq.is_latest(id) {
            debug!(context, id, "discarding stale page");
            return Settled::Stale;
        }

        match result {
            Ok(page) => {
                let total_pages = page.total_pages.max(1);
                if page.page > total_pages {
                    self.state.total_pages = total_pages;
                    self.state.total_count = page.total;
                    self.state.loading = false;
                    return Settled::OutOfRange {
                        last_page: total_pages,
                    };
                }
                self.state = PageState {
                    items: page.items,
                    current_page: page.page.max(1),
                    total_pages,
                    total_count: page.total,
                    loading: false,
                };
                Settled::Applied
            }
            Err(err) => {
                self.state.loading = false;
                reporter.report(context, &err);
                Settled::Failed
            }
        }
    }
}

/// A single loaded value (movie detail, search results). A failed load
/// empties it.
#[derive(Debug)]
pub struct Slot<T> {
    value: Option<T>,
    loading: bool,
    seq: RequestSeq,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            loading: false,
            seq: RequestSeq::default(),
        }
    }
}

impl<T> Slot<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a load. The previous value is dropped so a different item never
    /// shows under the new heading.
    pub fn begin(&mut self) -> u64 {
        self.value = None;
        self.loading = true;
        self.seq.issue()
    }

    pub fn settle(
        &mut self,
        id: u64,
        result: Result<T>,
        reporter: &dyn ErrorReporter,
        context: &str,
    ) -> Settled {
        if !self.seq.is_latest(id) {
            debug!(context, id, "discarding stale result");
            return Settled::Stale;
        }

        self.loading = false;
        match result {
            Ok(value) => {
                self.value = Some(value);
                Settled::Applied
            }
            Err(err) => {
                self.value = None;
                reporter.report(context, &err);
                Settled::Failed
            }
        }
    }
}

type Deliver<T> = Box<dyn FnOnce(u64, Result<T>) + Send>;

/// Delivers the outcome of a load exactly once, when dropped.
///
/// The spawned fetch owns the guard. If the task finishes, the real result
/// is delivered; if it is aborted or panics first, an error is delivered
/// instead, so the view's `loading` flag is always cleared.
pub struct SettleGuard<T> {
    id: u64,
    result: Option<Result<T>>,
    deliver: Option<Deliver<T>>,
}

impl<T> SettleGuard<T> {
    pub fn new(id: u64, deliver: impl FnOnce(u64, Result<T>) + Send + 'static) -> Self {
        Self {
            id,
            result: None,
            deliver: Some(Box::new(deliver)),
        }
    }

    pub fn complete(mut self, result: Result<T>) {
        self.result = Some(result);
    }
}

impl<T> Drop for SettleGuard<T> {
    fn drop(&mut self) {
        if let Some(deliver) = self.deliver.take() {
            let result = self
                .result
                .take()
                .unwrap_or_else(|| Err(ReelError::Fetch("load abandoned".to_string())));
            deliver(self.id, result);
        }
    }
}
