//! Search-as-you-type debouncing.
//!
//! Each keystroke calls [`SearchDebouncer::submit`] and awaits the returned
//! future. After the quiet period only the most recent term resolves to
//! `Some`; every earlier one resolves to `None`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use listkit_bulk::GenerationCounter;
use tracing::debug;

use crate::config::DEFAULT_SEARCH_DEBOUNCE_MS;

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    generations: Arc<GenerationCounter>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        SearchDebouncer::new(Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS))
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        SearchDebouncer {
            delay,
            generations: Arc::new(GenerationCounter::new()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a keystroke now and waits out the delay.
    ///
    /// The keystroke is registered when `submit` is called, not when the
    /// future is first polled.
    pub fn submit(&self, term: &str) -> impl Future<Output = Option<String>> + Send + 'static {
        let generation = self.generations.bump();
        let generations = Arc::clone(&self.generations);
        let delay = self.delay;
        let term = term.to_string();

        async move {
            tokio::time::sleep(delay).await;
            if generations.is_current(generation) {
                Some(term)
            } else {
                debug!(term = %term, "superseded search term dropped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_last_keystroke_is_released() {
        let debouncer = SearchDebouncer::default();

        let first = debouncer.submit("a");
        let second = debouncer.submit("an");
        let third = debouncer.submit("ann");

        let (first, second, third) = tokio::join!(first, second, third);
        assert_eq!(first, None);
        assert_eq!(second, None);
        assert_eq!(third.as_deref(), Some("ann"));
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_longer_than_the_delay_release_each_term() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(100));

        assert_eq!(debouncer.submit("bo").await.as_deref(), Some("bo"));
        assert_eq!(debouncer.submit("bob").await.as_deref(), Some("bob"));
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_during_wait_supersedes() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(100));
        let pending = tokio::spawn(debouncer.submit("x"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        let latest = debouncer.submit("xy");

        assert_eq!(pending.await.unwrap(), None);
        assert_eq!(latest.await.as_deref(), Some("xy"));
    }
}
