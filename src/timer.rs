//! Repeating timer backed by a sleeper thread
//!
//! Each armed timer is a thread that sleeps for the period and enqueues a
//! tick event on the daemon channel. Cancelling flips a flag checked after
//! every sleep; a tick already enqueued when `cancel` runs is dropped by the
//! scheduler, which ignores ticks while stopped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::daemon::Event;
use crate::rotation::{TimerGuard, TimerSource};

pub struct ThreadTimerSource {
    tx: Sender<Event>,
}

impl ThreadTimerSource {
    pub fn new(tx: Sender<Event>) -> Self {
        Self { tx }
    }
}

impl TimerSource for ThreadTimerSource {
    fn arm(&mut self, period: Duration) -> Box<dyn TimerGuard> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let tx = self.tx.clone();

        thread::spawn(move || {
            debug!(period_secs = period.as_secs_f64(), "rotation timer armed");
            loop {
                thread::sleep(period);
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                if tx.send(Event::Tick).is_err() {
                    break;
                }
            }
            debug!("rotation timer disarmed");
        });

        Box::new(ThreadTimerGuard { stop })
    }
}

struct ThreadTimerGuard {
    stop: Arc<AtomicBool>,
}

impl TimerGuard for ThreadTimerGuard {
    fn cancel(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}
