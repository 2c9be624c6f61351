//! Latest-wins debouncing for search-as-you-type

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs a task after a quiet period, dropping any task scheduled before it.
///
/// Each [`call`](Self::call) bumps a generation counter; a task only runs if
/// the counter has not moved while it slept.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    /// Debouncer with the given quiet period
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Quiet period
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `task`. The handle yields `None` if a later call superseded it.
    pub fn call<F, Fut, T>(&self, task: F) -> JoinHandle<Option<T>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) != ticket {
                return None;
            }
            Some(task().await)
        })
    }

    /// Drop whatever is pending
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_only_latest_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let runs = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for query in ["j", "jo", "joh", "john"] {
            let runs = Arc::clone(&runs);
            handles.push(debouncer.call(move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                query.to_string()
            }));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        assert_eq!(results, [None, None, None, Some("john".to_string())]);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_all_run() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let first = debouncer.call(|| async { 1 });
        tokio::time::sleep(Duration::from_millis(400)).await;
        let second = debouncer.call(|| async { 2 });

        assert_eq!(first.await.unwrap(), Some(1));
        assert_eq!(second.await.unwrap(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let pending = debouncer.call(|| async { "late" });
        debouncer.cancel();
        assert_eq!(pending.await.unwrap(), None);
    }
}
