//! Progress reporting for batch operations.
//!
//! Batch functions with a `_with_progress` suffix accept a [`Progress`] and
//! call it as polygons complete.
//!
//! # Example
//!
//! ```
//! use texelmap::algo::Progress;
//!
//! let progress = Progress::new(|done, total, message| {
//!     eprintln!("[{}/{}] {}", done, total, message);
//! });
//! progress.report(1, 4, "Projecting faces");
//! ```

/// A progress callback.
///
/// The callback receives the number of finished steps, the total number of
/// steps and a short description. It may be called from several threads.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, done: usize, total: usize, message: &str) {
        (self.callback)(done, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_report_reaches_callback() {
        let last = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&last);
        let progress = Progress::new(move |done, _, _| seen.store(done, Ordering::SeqCst));

        progress.report(3, 10, "step");
        assert_eq!(last.load(Ordering::SeqCst), 3);

        Progress::none().report(1, 1, "ignored");
    }
}
