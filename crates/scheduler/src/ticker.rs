//! One-shot wake-up timer for the poll loop.
//!
//! The timer task only flips an atomic flag. The loop polls the flag and
//! re-arms the ticker once it has finished a cycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

pub struct Ticker {
    interval: Duration,
    ready: Arc<AtomicBool>,
    timer: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ready: Arc::new(AtomicBool::new(false)),
            timer: None,
        }
    }

    /// Clears the flag and starts a fresh timer, replacing any pending one.
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self) {
        self.cancel();
        self.ready.store(false, Ordering::Release);

        let ready = self.ready.clone();
        let interval = self.interval;
        self.timer = Some(tokio::spawn(async move {
            sleep(interval).await;
            ready.store(true, Ordering::Release);
        }));
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
