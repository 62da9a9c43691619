use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use crate::timer::Timer;

/// Suppresses bursts of calls, letting only the last one through once
/// `delay` passes without a newer call.
#[derive(Clone)]
pub struct Debouncer<Tm> {
    timer: Tm,
    delay: Duration,
    generation: Rc<Cell<u64>>,
}

impl<Tm: Timer> Debouncer<Tm> {
    pub fn new(timer: Tm, delay: Duration) -> Self {
        Self {
            timer,
            delay,
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Resolves to `Some(value)` after `delay`, or to `None` if another call
    /// (or [`cancel`](Self::cancel)) happened in the meantime.
    pub fn call<V>(&self, value: V) -> impl Future<Output = Option<V>> + use<Tm, V> {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        let current = self.generation.clone();
        let sleep = self.timer.sleep(self.delay);
        async move {
            sleep.await;
            (current.get() == generation).then_some(value)
        }
    }

    /// Drop any pending call.
    pub fn cancel(&self) {
        self.generation.set(self.generation.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TokioTimer;
    use tokio::time::{Instant, sleep};

    fn debouncer() -> Debouncer<TokioTimer> {
        Debouncer::new(TokioTimer, Duration::from_millis(300))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_lets_only_last_value_through() {
        let debouncer = debouncer();
        let start = Instant::now();

        let (a, b, c) = tokio::join!(
            debouncer.call("r"),
            async {
                sleep(Duration::from_millis(100)).await;
                debouncer.call("re").await
            },
            async {
                sleep(Duration::from_millis(200)).await;
                debouncer.call("rep").await
            },
        );

        assert_eq!((a, b, c), (None, None, Some("rep")));
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn calls_spaced_beyond_delay_all_fire() {
        let debouncer = debouncer();
        assert_eq!(debouncer.call(1).await, Some(1));
        assert_eq!(debouncer.call(2).await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_call() {
        let debouncer = debouncer();
        let pending = debouncer.call("q");
        debouncer.cancel();
        assert_eq!(pending.await, None);
    }
}
