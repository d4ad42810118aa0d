//! Auto-play timer.
//!
//! A spawned task ticking on a fixed interval. The task ends when its token
//! is cancelled; dropping the handle cancels it too, so a viewer that drops
//! its playback never leaves a timer running.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct Playback {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Playback {
    /// Start ticking. The first call to `on_tick` happens one `period` after start.
    pub fn start<F>(period: Duration, token: CancellationToken, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // Skip the first immediate tick
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => on_tick(),
                }
            }

            tracing::trace!("Playback timer stopped");
        });

        Self { token, handle }
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.token.cancel();
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_interval() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        let playback = Playback::start(
            Duration::from_millis(300),
            CancellationToken::new(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_millis(310)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        playback.stop();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_token_stops_timer() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let token = CancellationToken::new();

        let playback = Playback::start(Duration::from_millis(100), token.clone(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        token.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
        assert!(playback.handle.is_finished());
    }
}
