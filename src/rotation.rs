//! Timed wallpaper rotation
//!
//! The scheduler owns the current position within the discovered file list
//! and advances it on every timer fire, either sequentially or with a
//! shuffled draw that never repeats the current entry. The position survives
//! restarts through an injected [`PositionStore`]; applying a wallpaper and
//! arming the timer also go through injected collaborators so the state
//! machine is testable in isolation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

/// Persisted rotation position (a single integer in the host's state store)
pub trait PositionStore {
    fn load(&mut self) -> usize;
    fn store(&mut self, position: usize);
}

/// Applies a selected file as the active wallpaper. Failures are the sink's
/// concern; the scheduler never sees them.
pub trait WallpaperSink {
    fn apply(&mut self, path: &Path);
}

/// Cancellable handle to an armed repeating timer
pub trait TimerGuard {
    fn cancel(&mut self);
}

/// Creates repeating timers whose fires call back into [`RotationScheduler::tick`]
pub trait TimerSource {
    fn arm(&mut self, period: Duration) -> Box<dyn TimerGuard>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RotationError {
    /// Rotation was requested but discovery produced no files. Fatal for the
    /// rotation feature only.
    #[error("no wallpapers discovered, rotation disabled")]
    EmptyCatalog,
}

pub struct RotationScheduler {
    apply: Box<dyn WallpaperSink>,
    store: Box<dyn PositionStore>,
    entries: Vec<PathBuf>,
    position: usize,
    shuffle: bool,
    rng: fastrand::Rng,
    timer: Option<Box<dyn TimerGuard>>,
}

impl RotationScheduler {
    pub fn new(apply: Box<dyn WallpaperSink>, store: Box<dyn PositionStore>) -> Self {
        Self {
            apply,
            store,
            entries: Vec::new(),
            position: 0,
            shuffle: false,
            rng: fastrand::Rng::new(),
            timer: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Begin rotating: apply the persisted position immediately (without
    /// advancing), then arm the repeating timer. The advance policy only
    /// applies to subsequent ticks.
    pub fn start(
        &mut self,
        entries: Vec<PathBuf>,
        interval: Duration,
        shuffle: bool,
        timers: &mut dyn TimerSource,
    ) -> Result<(), RotationError> {
        if entries.is_empty() {
            return Err(RotationError::EmptyCatalog);
        }

        self.position = self.store.load() % entries.len();
        self.entries = entries;
        self.shuffle = shuffle;

        info!(
            entries = self.entries.len(),
            position = self.position,
            shuffle = shuffle,
            interval_secs = interval.as_secs_f64(),
            "starting wallpaper rotation"
        );

        self.apply.apply(&self.entries[self.position]);
        self.timer = Some(timers.arm(interval));
        Ok(())
    }

    /// One timer fire: advance, apply, persist. Ticks that were already in
    /// flight when `stop` ran are ignored.
    pub fn tick(&mut self) {
        if self.timer.is_none() {
            return;
        }

        self.position = self.next_position();
        let entry = &self.entries[self.position];
        debug!(position = self.position, entry = %entry.display(), "rotating wallpaper");
        self.apply.apply(entry);
        self.store.store(self.position);
    }

    fn next_position(&mut self) -> usize {
        let len = self.entries.len();
        if !self.shuffle {
            return (self.position + 1) % len;
        }
        if len == 1 {
            return 0;
        }
        // Draw from one slot short of the full range, then shift draws at or
        // above the current position up by one. The current position can
        // never be selected again.
        let r = self.rng.usize(0..len - 1);
        if r >= self.position {
            r + 1
        } else {
            r
        }
    }

    /// Disarm the timer. Idempotent; after this returns no further tick will
    /// advance the rotation.
    pub fn stop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
            info!("wallpaper rotation stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct MemoryStore(Rc<Cell<usize>>);

    impl PositionStore for MemoryStore {
        fn load(&mut self) -> usize {
            self.0.get()
        }
        fn store(&mut self, position: usize) {
            self.0.set(position);
        }
    }

    struct RecordingSink(Rc<RefCell<Vec<PathBuf>>>);

    impl WallpaperSink for RecordingSink {
        fn apply(&mut self, path: &Path) {
            self.0.borrow_mut().push(path.to_path_buf());
        }
    }

    struct StubGuard(Rc<Cell<usize>>);

    impl TimerGuard for StubGuard {
        fn cancel(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct StubTimers {
        armed: Rc<RefCell<Vec<Duration>>>,
        cancelled: Rc<Cell<usize>>,
    }

    impl TimerSource for StubTimers {
        fn arm(&mut self, period: Duration) -> Box<dyn TimerGuard> {
            self.armed.borrow_mut().push(period);
            Box::new(StubGuard(Rc::clone(&self.cancelled)))
        }
    }

    struct Harness {
        scheduler: RotationScheduler,
        timers: StubTimers,
        applied: Rc<RefCell<Vec<PathBuf>>>,
        stored: Rc<Cell<usize>>,
        armed: Rc<RefCell<Vec<Duration>>>,
        cancelled: Rc<Cell<usize>>,
    }

    fn harness(initial_position: usize) -> Harness {
        let applied = Rc::new(RefCell::new(Vec::new()));
        let stored = Rc::new(Cell::new(initial_position));
        let armed = Rc::new(RefCell::new(Vec::new()));
        let cancelled = Rc::new(Cell::new(0));
        Harness {
            scheduler: RotationScheduler::new(
                Box::new(RecordingSink(Rc::clone(&applied))),
                Box::new(MemoryStore(Rc::clone(&stored))),
            ),
            timers: StubTimers {
                armed: Rc::clone(&armed),
                cancelled: Rc::clone(&cancelled),
            },
            applied,
            stored,
            armed,
            cancelled,
        }
    }

    fn entries(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_start_with_empty_catalog_fails_and_stays_stopped() {
        let mut h = harness(0);
        let result = h.scheduler.start(
            Vec::new(),
            Duration::from_secs(10),
            false,
            &mut h.timers,
        );
        assert_eq!(result, Err(RotationError::EmptyCatalog));
        assert!(!h.scheduler.is_running());
        assert!(h.applied.borrow().is_empty());
        assert!(h.armed.borrow().is_empty());
    }

    #[test]
    fn test_start_applies_persisted_position_without_advancing() {
        let mut h = harness(2);
        h.scheduler
            .start(entries(&["x", "y", "z"]), Duration::from_secs(10), false, &mut h.timers)
            .unwrap();
        assert_eq!(*h.applied.borrow(), entries(&["z"]));
        assert_eq!(h.scheduler.position(), 2);
        assert_eq!(*h.armed.borrow(), vec![Duration::from_secs(10)]);
    }

    #[test]
    fn test_start_wraps_stale_persisted_position() {
        // Persisted position may exceed the list length after files were removed
        let mut h = harness(7);
        h.scheduler
            .start(entries(&["x", "y", "z"]), Duration::from_secs(10), false, &mut h.timers)
            .unwrap();
        assert_eq!(h.scheduler.position(), 1);
        assert_eq!(*h.applied.borrow(), entries(&["y"]));
    }

    #[test]
    fn test_sequential_tick_advances_and_persists() {
        let mut h = harness(0);
        h.scheduler
            .start(entries(&["x", "y", "z"]), Duration::from_secs(10), false, &mut h.timers)
            .unwrap();
        h.scheduler.tick();
        assert_eq!(*h.applied.borrow(), entries(&["x", "y"]));
        assert_eq!(h.stored.get(), 1);
    }

    #[test]
    fn test_sequential_mode_visits_every_index_cyclically() {
        let mut h = harness(0);
        h.scheduler
            .start(
                entries(&["a", "b", "c", "d"]),
                Duration::from_secs(1),
                false,
                &mut h.timers,
            )
            .unwrap();
        let mut visited = Vec::new();
        for _ in 0..4 {
            h.scheduler.tick();
            visited.push(h.scheduler.position());
        }
        assert_eq!(visited, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_shuffle_never_repeats_the_previous_position() {
        for len in 2..=5usize {
            let names: Vec<String> = (0..len).map(|i| format!("/w/{i}.jpg")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut h = harness(0);
            h.scheduler
                .start(entries(&refs), Duration::from_secs(1), true, &mut h.timers)
                .unwrap();
            let mut previous = h.scheduler.position();
            for _ in 0..200 {
                h.scheduler.tick();
                assert_ne!(h.scheduler.position(), previous, "len={len}");
                previous = h.scheduler.position();
            }
        }
    }

    #[test]
    fn test_shuffle_keeps_position_in_bounds() {
        let mut h = harness(0);
        h.scheduler
            .start(entries(&["a", "b", "c"]), Duration::from_secs(1), true, &mut h.timers)
            .unwrap();
        for _ in 0..100 {
            h.scheduler.tick();
            assert!(h.scheduler.position() < 3);
        }
    }

    #[test]
    fn test_shuffle_with_single_entry_stays_put() {
        let mut h = harness(0);
        h.scheduler
            .start(entries(&["only"]), Duration::from_secs(1), true, &mut h.timers)
            .unwrap();
        h.scheduler.tick();
        assert_eq!(h.scheduler.position(), 0);
        assert_eq!(*h.applied.borrow(), entries(&["only", "only"]));
    }

    #[test]
    fn test_stop_cancels_the_timer_and_is_idempotent() {
        let mut h = harness(0);
        h.scheduler
            .start(entries(&["x", "y"]), Duration::from_secs(1), false, &mut h.timers)
            .unwrap();
        h.scheduler.stop();
        assert!(!h.scheduler.is_running());
        assert_eq!(h.cancelled.get(), 1);
        h.scheduler.stop();
        assert_eq!(h.cancelled.get(), 1);
    }

    #[test]
    fn test_tick_after_stop_is_ignored() {
        let mut h = harness(0);
        h.scheduler
            .start(entries(&["x", "y"]), Duration::from_secs(1), false, &mut h.timers)
            .unwrap();
        h.scheduler.stop();
        h.scheduler.tick();
        assert_eq!(*h.applied.borrow(), entries(&["x"]));
        assert_eq!(h.stored.get(), 0);
    }

    #[test]
    fn test_restart_resumes_from_persisted_position() {
        let mut h = harness(0);
        h.scheduler
            .start(entries(&["x", "y", "z"]), Duration::from_secs(1), false, &mut h.timers)
            .unwrap();
        h.scheduler.tick();
        h.scheduler.stop();
        assert_eq!(h.stored.get(), 1);

        // Config reload: a fresh start picks up where the last tick left off
        h.scheduler
            .start(entries(&["x", "y", "z"]), Duration::from_secs(1), false, &mut h.timers)
            .unwrap();
        assert_eq!(h.scheduler.position(), 1);
        assert_eq!(*h.applied.borrow(), entries(&["x", "y", "y"]));
    }
}
