//! Rate limiting for bulk scrapes.
//!
//! Competitors are processed one at a time from an ordered queue. The queue
//! enforces a minimum idle interval between consecutive tasks and never
//! waits after the last task, so a bulk run of `n` competitors sleeps
//! exactly `n - 1` times.

use std::collections::VecDeque;
use std::time::Duration;

/// Ordered task queue with a minimum-interval policy between tasks.
///
/// Call [`MinIntervalQueue::next`] only after the previously returned task
/// has finished; the interval is measured from that call.
#[derive(Debug)]
pub struct MinIntervalQueue<T> {
    tasks: VecDeque<T>,
    min_interval: Duration,
    started: bool,
}

impl<T> MinIntervalQueue<T> {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            tasks: VecDeque::new(),
            min_interval,
            started: false,
        }
    }

    pub fn push(&mut self, task: T) {
        self.tasks.push_back(task);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the next task, sleeping `min_interval` first unless this is
    /// the first task handed out. Returns `None` without sleeping once the
    /// queue is drained.
    pub async fn next(&mut self) -> Option<T> {
        let task = self.tasks.pop_front()?;

        if self.started && !self.min_interval.is_zero() {
            tracing::debug!(
                delay_ms = self.min_interval.as_millis(),
                remaining = self.tasks.len() + 1,
                "rate limit — waiting before next task"
            );
            tokio::time::sleep(self.min_interval).await;
        }
        self.started = true;

        Some(task)
    }
}

impl<T> Extend<T> for MinIntervalQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tasks.extend(iter);
    }
}
