use std::time::Duration;

use futures::future::LocalBoxFuture;

/// Source of delays, so timing logic can run on the browser's timers, on
/// tokio, or on tokio's paused test clock.
pub trait Timer: Clone + 'static {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::TokioTimer;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use futures::FutureExt;

    #[derive(Debug, Clone, Copy, Default)]
    pub struct TokioTimer;

    impl Timer for TokioTimer {
        fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
            tokio::time::sleep(duration).boxed_local()
        }
    }
}
