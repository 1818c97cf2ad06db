//! Cancellable one-second ticker backing the quiz countdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// A single tick of the session clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Background ticker owned by exactly one quiz session's host. Ticks arrive
/// on the returned channel; the host forwards each one to
/// `QuizSession::tick()`. Dropping the timer cancels and joins the thread,
/// so no tick can outlive a torn-down session.
pub struct SessionTimer {
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SessionTimer {
    /// Start ticking every `interval` (one second in production; tests pass
    /// something shorter).
    pub fn start(interval: Duration) -> (Self, Receiver<Tick>) {
        let (tx, rx) = std::sync::mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let handle = std::thread::spawn(move || run(interval, flag, tx));
        (
            Self {
                cancelled,
                handle: Some(handle),
            },
            rx,
        )
    }

    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("session timer thread panicked");
            }
        }
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run(interval: Duration, cancelled: Arc<AtomicBool>, tx: Sender<Tick>) {
    loop {
        std::thread::sleep(interval);
        if cancelled.load(Ordering::SeqCst) {
            break;
        }
        // Receiver gone means the session is gone; stop quietly.
        if tx.send(Tick).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_ticks_until_cancelled() {
        let (mut timer, rx) = SessionTimer::start(Duration::from_millis(5));
        let first = rx.recv_timeout(Duration::from_secs(1));
        assert!(first.is_ok());
        timer.cancel();
        // Drain whatever was in flight; afterwards the channel must close.
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn drop_cancels() {
        let (timer, rx) = SessionTimer::start(Duration::from_millis(5));
        drop(timer);
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
