//! Fixed-timestep clock.
//!
//! Render frames arrive at whatever rate the host manages; physics must only
//! ever see a constant step. Two pieces handle this:
//!
//! - [`FramePacer`] measures wall-clock frame deltas and throttles the loop
//!   to at most `fps` frames per second by blocking.
//! - [`Accumulator`] buffers frame time and hands out whole physics steps,
//!   carrying the remainder into the next frame.
//!
//! ```text
//! frame deltas:  |--0.004--|--0.004--|---0.009---|
//! buffer:           0.004     0.008     0.017 -> 1 step, 0.000333 left
//! ```

use std::time::{Duration, Instant};

use tracing::{trace, warn};

/// Longest backlog, in seconds, a single frame may convert into steps.
/// Anything beyond that (a debugger pause, a suspended laptop) is dropped.
pub const MAX_CATCH_UP_SECONDS: u32 = 10;

// =============================================================================
// Accumulator
// =============================================================================

/// Buffers frame time and converts it into whole fixed-size steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    buffer: f64,
    timestep: f64,
    max_steps: u32,
}

impl Accumulator {
    /// Create an accumulator for `physics_tick` steps per second.
    ///
    /// A tick of zero is treated as one step per second.
    pub fn new(physics_tick: u32) -> Self {
        let tick = physics_tick.max(1);
        Self {
            buffer: 0.0,
            timestep: 1.0 / tick as f64,
            max_steps: tick.saturating_mul(MAX_CATCH_UP_SECONDS),
        }
    }

    /// Fixed step duration handed to the stepper.
    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Time carried over that has not yet been consumed by a step.
    pub fn buffer(&self) -> f64 {
        self.buffer
    }

    /// Add a frame's worth of time and return how many steps are now due.
    ///
    /// Negative, NaN or infinite deltas (clock discontinuities) count as
    /// zero. Steps are drained one at a time, matching a
    /// `while buffer >= step` loop, so the remaining buffer is always in
    /// `[0, timestep)`. At most [`MAX_CATCH_UP_SECONDS`] worth of steps are
    /// released per call; a backlog past that is discarded.
    pub fn accumulate(&mut self, delta: f64) -> u32 {
        let delta = if delta.is_finite() && delta > 0.0 {
            delta
        } else {
            0.0
        };
        self.buffer += delta;

        let mut steps = 0;
        while self.buffer >= self.timestep && steps < self.max_steps {
            self.buffer -= self.timestep;
            steps += 1;
        }

        if self.buffer >= self.timestep {
            warn!(
                dropped = self.buffer,
                steps, "frame backlog exceeds catch-up limit, dropping it"
            );
            self.buffer = 0.0;
        }
        steps
    }

    /// Fraction of a step sitting in the buffer, for render interpolation.
    pub fn interpolation_alpha(&self) -> f64 {
        self.buffer / self.timestep
    }

    pub fn reset(&mut self) {
        self.buffer = 0.0;
    }
}

// =============================================================================
// Time sources and sleeping
// =============================================================================

/// Source of monotonic timestamps in seconds.
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// Wall clock backed by [`Instant`], counting from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests and scripted runs.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: std::cell::Cell<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: std::cell::Cell::new(start),
        }
    }

    pub fn set(&self, time: f64) {
        self.now.set(time);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Blocking wait used to cap the frame rate.
pub trait Sleeper {
    fn sleep(&mut self, seconds: f64);
}

/// Blocks the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, seconds: f64) {
        if seconds > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(seconds));
        }
    }
}

/// Never blocks; tallies the sleep that was requested instead.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoSleep {
    pub calls: u64,
    pub last: f64,
    pub total: f64,
}

impl Sleeper for NoSleep {
    fn sleep(&mut self, seconds: f64) {
        self.calls += 1;
        self.last = seconds;
        self.total += seconds;
    }
}

// =============================================================================
// Frame Pacer
// =============================================================================

/// Measures frame deltas and enforces a minimum frame duration.
pub struct FramePacer<T: TimeSource, S: Sleeper> {
    clock: T,
    sleeper: S,
    last_frame: f64,
}

impl<T: TimeSource, S: Sleeper> FramePacer<T, S> {
    /// The first frame measures from the moment the pacer is created.
    pub fn new(clock: T, sleeper: S) -> Self {
        let last_frame = clock.now();
        Self {
            clock,
            sleeper,
            last_frame,
        }
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Start a frame and return the delta to feed the accumulator.
    ///
    /// A frame that came in faster than `1/fps` is held back by sleeping the
    /// shortfall, and the full `1/fps` is reported instead of the measured
    /// delta. Simulated time therefore never advances by less than one
    /// target frame per render frame. A clock that runs backwards yields zero.
    pub fn begin_frame(&mut self, fps: u32) -> f64 {
        let now = self.clock.now();
        let mut delta = (now - self.last_frame).max(0.0);
        self.last_frame = now;

        let frame_time = 1.0 / fps.max(1) as f64;
        if delta < frame_time {
            self.sleeper.sleep(frame_time - delta);
            delta = frame_time;
        }

        trace!(delta, frame_time, "frame start");
        delta
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_accumulator_small_deltas() {
        let mut acc = Accumulator::new(60);

        assert_eq!(acc.accumulate(0.004), 0);
        assert_eq!(acc.accumulate(0.004), 0);
        assert_eq!(acc.accumulate(0.009), 1);
        assert_relative_eq!(acc.buffer(), 0.017 - 1.0 / 60.0, epsilon = 1e-12);
    }

    #[test]
    fn test_accumulator_multiple_steps_per_frame() {
        let mut acc = Accumulator::new(60);
        // 3.5 steps worth
        assert_eq!(acc.accumulate(3.5 / 60.0), 3);
        assert_relative_eq!(acc.interpolation_alpha(), 0.5, epsilon = 1e-9);
        // Half step left over + half step = one more
        assert_eq!(acc.accumulate(0.5 / 60.0 + 1e-12), 1);
    }

    #[test]
    fn test_accumulator_conservation() {
        let deltas = [
            0.013, 0.0021, 0.051, 0.0166, 0.0, 0.034, 0.0009, 0.1, 0.0171, 0.02,
        ];
        let total: f64 = deltas.iter().sum();
        let mut acc = Accumulator::new(60);

        let steps: u32 = deltas.iter().map(|&d| acc.accumulate(d)).sum();

        let expected = (total * 60.0).floor() as i64;
        assert!(
            (steps as i64 - expected).abs() <= 1,
            "steps={} expected~{}",
            steps,
            expected
        );
        // Nothing lost or double counted
        assert_relative_eq!(
            steps as f64 * acc.timestep() + acc.buffer(),
            total,
            epsilon = 1e-9
        );
        assert!(acc.buffer() < acc.timestep());
    }

    #[test]
    fn test_accumulator_ignores_negative_delta() {
        let mut acc = Accumulator::new(60);
        acc.accumulate(0.01);
        assert_eq!(acc.accumulate(-5.0), 0);
        assert_eq!(acc.accumulate(f64::NAN), 0);
        assert_eq!(acc.accumulate(f64::INFINITY), 0);
        assert_eq!(acc.accumulate(f64::NEG_INFINITY), 0);
        assert_relative_eq!(acc.buffer(), 0.01);
    }

    #[test]
    fn test_accumulator_caps_huge_backlog() {
        let mut acc = Accumulator::new(60);

        // Finishes promptly and releases at most the catch-up window
        assert_eq!(acc.accumulate(1e300), 60 * MAX_CATCH_UP_SECONDS);
        assert_eq!(acc.buffer(), 0.0);

        // Normal frames afterwards behave as before
        assert_eq!(acc.accumulate(2.5 / 60.0), 2);
    }

    #[test]
    fn test_accumulator_reset() {
        let mut acc = Accumulator::new(30);
        acc.accumulate(0.02);
        acc.reset();
        assert_eq!(acc.buffer(), 0.0);
        assert_relative_eq!(acc.timestep(), 1.0 / 30.0);
    }

    #[test]
    fn test_pacer_throttles_fast_frames() {
        let clock = ManualClock::new(0.0);
        let mut pacer = FramePacer::new(&clock, NoSleep::default());

        clock.advance(0.005);
        let delta = pacer.begin_frame(60);

        assert_relative_eq!(delta, 1.0 / 60.0);
        assert_eq!(pacer.sleeper().calls, 1);
        assert_relative_eq!(pacer.sleeper().last, 1.0 / 60.0 - 0.005);
    }

    #[test]
    fn test_pacer_passes_slow_frames_through() {
        let clock = ManualClock::new(10.0);
        let mut pacer = FramePacer::new(&clock, NoSleep::default());

        clock.advance(0.1);
        let delta = pacer.begin_frame(60);

        assert_relative_eq!(delta, 0.1, epsilon = 1e-12);
        assert_eq!(pacer.sleeper().calls, 0);
    }

    #[test]
    fn test_pacer_clamps_backwards_clock() {
        let clock = ManualClock::new(5.0);
        let mut pacer = FramePacer::new(&clock, NoSleep::default());

        clock.set(4.0);
        // Measured delta is clamped to zero, then raised to the frame budget
        let delta = pacer.begin_frame(30);
        assert_relative_eq!(delta, 1.0 / 30.0);
        assert_relative_eq!(pacer.sleeper().last, 1.0 / 30.0);
    }

    #[test]
    fn test_throttled_frames_step_at_tick_rate() {
        // fps == physics tick: every throttled frame yields exactly one step
        // (allowing for float rounding on the boundary).
        let clock = ManualClock::new(0.0);
        let mut pacer = FramePacer::new(&clock, NoSleep::default());
        let mut acc = Accumulator::new(60);

        let mut steps = 0;
        for _ in 0..120 {
            clock.advance(0.001);
            steps += acc.accumulate(pacer.begin_frame(60));
        }
        assert!((119..=120).contains(&steps), "got {} steps", steps);
    }

    #[test]
    fn test_thread_sleeper_ignores_non_positive() {
        let mut sleeper = ThreadSleeper;
        let start = Instant::now();
        sleeper.sleep(0.0);
        sleeper.sleep(-1.0);
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
