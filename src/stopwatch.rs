use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

pub const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Default)]
struct Counter {
    elapsed: u64,
    paused: bool,
    stopped: bool,
}

/// Background stopwatch counting whole seconds, optionally capped at a limit.
///
/// The counter is shared between the ticking thread and whoever reads it, so
/// every state change happens under one lock.
#[derive(Debug)]
pub struct Stopwatch {
    counter: Mutex<Counter>,
    limit: Option<u64>,
    interval: Duration,
    started: AtomicBool,
}

impl Stopwatch {
    pub fn new(limit: Option<u64>) -> Self {
        Self::with_interval(limit, Duration::from_secs(1))
    }

    pub fn with_interval(limit: Option<u64>, interval: Duration) -> Self {
        Self {
            counter: Mutex::new(Counter::default()),
            limit,
            interval,
            started: AtomicBool::new(false),
        }
    }

    /// Stopwatch capped at `hours` of elapsed time.
    pub fn with_limit_hours(hours: f64, interval: Duration) -> Self {
        Self::with_interval(Some(hours_to_seconds(hours)), interval)
    }

    /// Spawns the ticking thread. Only the first call has any effect.
    pub fn start(self: &Arc<Self>) {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        debug!(limit = ?self.limit, interval_ms = self.interval.as_millis() as u64, "stopwatch started");

        if self.enforce_limit() {
            return;
        }

        // The thread only holds a weak handle so dropping the stopwatch ends it.
        let weak = Arc::downgrade(self);
        let interval = self.interval;
        thread::spawn(move || loop {
            thread::sleep(interval);
            let Some(stopwatch) = weak.upgrade() else {
                break;
            };
            if stopwatch.tick().is_break() {
                break;
            }
        });
    }

    /// Advances the clock by one step.
    ///
    /// Counts one second unless paused, then clamps and stops once the limit
    /// is reached. Reports `Break` when the stopwatch is stopped.
    pub fn tick(&self) -> ControlFlow<()> {
        let mut counter = self.lock();
        if counter.stopped {
            return ControlFlow::Break(());
        }

        if !counter.paused {
            counter.elapsed += 1;
        }
        self.clamp(&mut counter);

        if counter.stopped {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    /// Stops the stopwatch if it already sits at its limit.
    fn enforce_limit(&self) -> bool {
        let mut counter = self.lock();
        self.clamp(&mut counter);
        counter.stopped
    }

    fn clamp(&self, counter: &mut Counter) {
        let Some(limit) = self.limit else {
            return;
        };
        if counter.elapsed >= limit && !counter.stopped {
            counter.elapsed = limit;
            counter.stopped = true;
            info!(elapsed = limit, "stopwatch reached its limit");
        }
    }

    /// Pauses a running stopwatch or resumes a paused one.
    pub fn toggle_pause(&self) -> bool {
        let mut counter = self.lock();
        counter.paused = !counter.paused;
        debug!(paused = counter.paused, "stopwatch pause toggled");
        counter.paused
    }

    pub fn stop(&self) {
        let mut counter = self.lock();
        if !counter.stopped {
            counter.stopped = true;
            debug!(elapsed = counter.elapsed, "stopwatch stopped");
        }
    }

    /// Seconds counted since start.
    pub fn elapsed_seconds(&self) -> u64 {
        self.lock().elapsed
    }

    /// Same as `elapsed_seconds`, in fractional hours.
    pub fn elapsed_hours(&self) -> f64 {
        self.elapsed_seconds() as f64 / SECONDS_PER_HOUR
    }

    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    fn lock(&self) -> MutexGuard<'_, Counter> {
        self.counter.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Converts fractional hours to whole seconds, rounding to the nearest second.
/// Negative hours saturate at zero.
pub fn hours_to_seconds(hours: f64) -> u64 {
    (hours * SECONDS_PER_HOUR).round().max(0.0) as u64
}
