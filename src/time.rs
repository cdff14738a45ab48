//! Fixed-timestep game clock and the passive-damage ticker.
//!
//! `draw_web()` calls at ~60fps with variable delta. GameTime converts
//! this into a fixed number of discrete ticks per second, and DpsTicker
//! turns those ticks into one DPS application per interval. Both are
//! driven by plain numbers so they are fully testable.

/// Game ticks per real-time second.
pub const TICKS_PER_SECOND: u32 = 10;

pub struct GameTime {
    /// Milliseconds per tick (e.g. 100ms = 10 ticks/sec)
    ms_per_tick: f64,
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Total elapsed ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    /// Create a new GameTime with the given tick rate.
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec as f64,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed wall-clock timestamp (from `performance.now()` or similar).
    /// Returns the number of discrete ticks to process this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            // Clamp to avoid spiral-of-death if tab was backgrounded
            Some(prev) => (now_ms - prev).clamp(0.0, 500.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}

/// Fires one passive-damage application every `interval_ticks` game ticks,
/// but only while the player has DPS.
///
/// While disarmed (DPS is 0) no progress is kept, so buying the first DPS
/// upgrade starts a full interval rather than firing immediately. `stop()`
/// cancels the ticker for good.
pub struct DpsTicker {
    interval_ticks: u32,
    elapsed: u32,
    stopped: bool,
}

impl DpsTicker {
    pub fn new(interval_ms: u32, ticks_per_sec: u32) -> Self {
        let interval_ticks = (interval_ms as u64 * ticks_per_sec as u64 / 1000).max(1) as u32;
        Self {
            interval_ticks,
            elapsed: 0,
            stopped: false,
        }
    }

    /// Whether a DPS application is pending.
    pub fn is_armed(&self, dps: f64) -> bool {
        !self.stopped && dps > 0.0
    }

    /// Advance by `delta_ticks` and return how many DPS applications are due.
    pub fn advance(&mut self, delta_ticks: u32, dps: f64) -> u32 {
        if !self.is_armed(dps) {
            self.elapsed = 0;
            return 0;
        }
        self.elapsed += delta_ticks;
        let fires = self.elapsed / self.interval_ticks;
        self.elapsed %= self.interval_ticks;
        fires
    }

    /// Cancel permanently (e.g. when the owning view is torn down).
    pub fn stop(&mut self) {
        self.stopped = true;
        self.elapsed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_returns_zero_ticks() {
        let mut gt = GameTime::new(10);
        assert_eq!(gt.update(0.0), 0);
    }

    #[test]
    fn one_tick_at_100ms() {
        let mut gt = GameTime::new(10); // 100ms per tick
        gt.update(0.0);
        assert_eq!(gt.update(100.0), 1);
        assert_eq!(gt.total_ticks, 1);
    }

    #[test]
    fn remainder_carried_over() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        assert_eq!(gt.update(150.0), 1); // 50ms left over
        assert_eq!(gt.update(200.0), 1); // 50ms + 50ms
        assert_eq!(gt.total_ticks, 2);
    }

    #[test]
    fn clamp_large_delta() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        // 10 second gap (tab backgrounded) → clamped to 500ms = 5 ticks
        assert_eq!(gt.update(10000.0), 5);
    }

    #[test]
    fn clock_going_backwards_yields_nothing() {
        let mut gt = GameTime::new(10);
        gt.update(1000.0);
        assert_eq!(gt.update(500.0), 0);
    }

    #[test]
    fn steady_60fps() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        let mut total = 0u32;
        for i in 1..=60 {
            total += gt.update(i as f64 * 16.667);
        }
        assert!((9..=11).contains(&total), "expected ~10 ticks, got {}", total);
    }

    #[test]
    fn ticker_interval_from_ms() {
        assert_eq!(DpsTicker::new(1000, 10).interval_ticks, 10);
        assert_eq!(DpsTicker::new(250, 10).interval_ticks, 2);
        // sub-tick intervals still fire at most once per tick
        assert_eq!(DpsTicker::new(10, 10).interval_ticks, 1);
    }

    #[test]
    fn ticker_fires_once_per_second() {
        let mut t = DpsTicker::new(1000, 10);
        let mut fires = 0;
        for _ in 0..9 {
            fires += t.advance(1, 0.5);
        }
        assert_eq!(fires, 0);
        assert_eq!(t.advance(1, 0.5), 1);
        assert_eq!(t.advance(25, 0.5), 2);
        assert_eq!(t.advance(5, 0.5), 1); // 5 carried + 5
    }

    #[test]
    fn ticker_idle_without_dps() {
        let mut t = DpsTicker::new(1000, 10);
        assert!(!t.is_armed(0.0));
        assert_eq!(t.advance(100, 0.0), 0);
    }

    #[test]
    fn ticker_discards_progress_when_dps_drops() {
        let mut t = DpsTicker::new(1000, 10);
        t.advance(9, 1.0);
        t.advance(1, 0.0);
        assert_eq!(t.advance(1, 1.0), 0);
        assert_eq!(t.advance(9, 1.0), 1);
    }

    #[test]
    fn stopped_ticker_never_fires() {
        let mut t = DpsTicker::new(1000, 10);
        t.advance(5, 1.0);
        t.stop();
        assert!(!t.is_armed(1.0));
        assert_eq!(t.advance(100, 1.0), 0);
    }
}
