//! Cancellable debounce timer.
//!
//! An explicit timer abstraction: `schedule` returns a [`CancelToken`], and
//! scheduling again cancels the previous token deterministically. Nothing is
//! captured by closure lifetime tricks - cancellation is always an explicit
//! abort of the pending task.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::filter::{FilterCriteria, sanitize_search_query};

/// Handle to one scheduled call.
#[derive(Debug, Clone)]
pub struct CancelToken {
    handle: AbortHandle,
}

impl CancelToken {
    /// Cancel the pending call. A no-op if it already ran.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

/// Debounces calls: only the most recently scheduled function runs, after
/// the configured delay of quiet time.
///
/// Requires a tokio runtime; the pending call is cancelled when the
/// debouncer is dropped.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancelToken>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet-time delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `f` to run after the delay, cancelling any previously
    /// scheduled call.
    pub fn schedule<F>(&self, f: F) -> CancelToken
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
        let token = CancelToken {
            handle: handle.abort_handle(),
        };

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancel the pending call, if any.
    pub fn cancel_pending(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = pending.take() {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Debounced search input bound to shared filter criteria.
///
/// Each raw keystroke reschedules a sanitized `set_search`; only the last
/// value within the quiet window is applied, and applying it resets the page
/// per the criteria's own invariant.
pub struct SearchDebouncer {
    criteria: Arc<Mutex<FilterCriteria>>,
    debouncer: Debouncer,
}

impl SearchDebouncer {
    /// Bind a debouncer to shared criteria.
    #[must_use]
    pub const fn new(criteria: Arc<Mutex<FilterCriteria>>, delay: Duration) -> Self {
        Self {
            criteria,
            debouncer: Debouncer::new(delay),
        }
    }

    /// Feed one raw keystroke's worth of input.
    pub fn input(&self, raw: &str) -> CancelToken {
        let query = sanitize_search_query(raw);
        let criteria = Arc::clone(&self.criteria);
        self.debouncer.schedule(move || {
            let mut criteria = criteria.lock().unwrap_or_else(PoisonError::into_inner);
            criteria.set_search(query);
        })
    }

    /// Cancel a pending search application (e.g., the input was disposed).
    pub fn cancel(&self) {
        self.debouncer.cancel_pending();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    async fn settle() {
        // Paused-clock runtimes auto-advance: sleeping past the delay lets
        // any pending debounced call fire first
        tokio::time::sleep(DELAY * 2).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_call_runs_once_after_delay() {
        let debouncer = Debouncer::new(DELAY);
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        debouncer.schedule(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_cancels_previous() {
        let debouncer = Debouncer::new(DELAY);
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let f = Arc::clone(&first);
        debouncer.schedule(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        let s = Arc::clone(&second);
        debouncer.schedule(move || {
            s.fetch_add(1, Ordering::SeqCst);
        });

        settle().await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_token_prevents_delivery() {
        let debouncer = Debouncer::new(DELAY);
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let token = debouncer.schedule(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        token.cancel();

        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_debouncer_applies_last_sanitized_value() {
        let criteria = Arc::new(Mutex::new(FilterCriteria::new()));
        let search = SearchDebouncer::new(Arc::clone(&criteria), DELAY);

        search.input("ip");
        search.input("ipho");
        search.input("  iphone<x>  ");

        settle().await;
        let criteria = criteria.lock().unwrap();
        assert_eq!(criteria.search_query(), "iphonex");
        assert_eq!(criteria.page(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_debouncer_cancel() {
        let criteria = Arc::new(Mutex::new(FilterCriteria::new()));
        let search = SearchDebouncer::new(Arc::clone(&criteria), DELAY);

        search.input("iphone");
        search.cancel();

        settle().await;
        assert_eq!(criteria.lock().unwrap().search_query(), "");
    }
}
