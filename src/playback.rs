//! Simulated time and the signed, power-of-two playback speed.
//!
//! Speed is measured in simulated days per rendered frame. Fast-forward and
//! rewind double or halve its magnitude; a press that brings the speed
//! below normal in the pressed direction flips play/pause instead of
//! leaving the scene frozen.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

pub const FRAMES_PER_SECOND: f64 = 25.0;

/// A quarter hour of simulated time per real second, in days per frame.
pub const NORMAL_SPEED: f64 = 0.25 / FRAMES_PER_SECOND / 24.0;

const DAYS_PER_YEAR: f64 = 365.25;
const SECS_PER_DAY: f64 = 86_400.0;
const MICROS_PER_DAY: f64 = SECS_PER_DAY * 1e6;

/// Days to a duration, saturating at the `i64` microsecond range.
pub fn days_to_duration(days: f64) -> Duration {
    Duration::microseconds((days * MICROS_PER_DAY).round() as i64)
}

fn duration_secs(d: Duration) -> f64 {
    match d.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => d.num_milliseconds() as f64 / 1e3,
    }
}

/// Human readable rate for a per-frame step, e.g. `+2.00 d`. The caller
/// appends `/s`.
pub fn format_speed(interval: Duration) -> String {
    let per_sec = duration_secs(interval) * FRAMES_PER_SECOND;
    let sign = if per_sec < 0.0 { '-' } else { '+' };
    let secs = per_sec.abs();
    let days = secs / SECS_PER_DAY;

    let (value, unit) = if days >= DAYS_PER_YEAR {
        (days / DAYS_PER_YEAR, 'a')
    } else if days >= 1.0 {
        (days, 'd')
    } else if secs >= 3600.0 {
        (secs / 3600.0, 'h')
    } else if secs >= 60.0 {
        (secs / 60.0, 'm')
    } else {
        (secs, 's')
    };
    format!("{sign}{value:.2} {unit}")
}

#[derive(Clone, Debug)]
pub struct PlaybackClock {
    time: DateTime<Utc>,
    speed: f64,
    running: bool,
    label: String,
}

impl PlaybackClock {
    /// Paused at `start` with normal forward speed.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            time: start,
            speed: NORMAL_SPEED,
            running: false,
            label: format_speed(days_to_duration(NORMAL_SPEED)),
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Days of simulated time per frame. Negative runs backwards.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Rate of the most recent step, see [`format_speed`].
    pub fn speed_label(&self) -> &str {
        &self.label
    }

    /// Moves simulated time by `dt` and relabels the rate from it.
    pub fn advance(&mut self, dt: Duration) {
        match self.time.checked_add_signed(dt) {
            Some(t) => self.time = t,
            None => warn!(time = %self.time, "simulated time out of range, holding"),
        }
        self.label = format_speed(dt);
    }

    /// One frame at the current speed. Returns false while paused.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.advance(days_to_duration(self.speed));
        true
    }

    pub fn fast_forward(&mut self) {
        if self.running {
            if self.speed < 0.0 {
                self.speed /= 2.0;
            } else {
                self.speed *= 2.0;
            }
            if self.speed <= 0.0 && self.speed > -NORMAL_SPEED {
                self.toggle_play_pause();
            }
        } else {
            self.speed = NORMAL_SPEED;
            self.toggle_play_pause();
        }
        debug!(speed = self.speed, running = self.running, "fast forward");
    }

    pub fn rewind(&mut self) {
        if self.running {
            if self.speed > 0.0 {
                self.speed /= 2.0;
            } else {
                self.speed *= 2.0;
            }
            if self.speed >= 0.0 && self.speed < NORMAL_SPEED {
                self.toggle_play_pause();
            }
        } else {
            self.speed = -NORMAL_SPEED;
            self.toggle_play_pause();
        }
        debug!(speed = self.speed, running = self.running, "rewind");
    }

    /// Flips running and returns the new state so the host can start or
    /// stop its tick source.
    pub fn toggle_play_pause(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn running_clock() -> PlaybackClock {
        let mut clock = PlaybackClock::new(start());
        clock.toggle_play_pause();
        clock
    }

    fn per_frame(per_sec_secs: f64) -> Duration {
        Duration::microseconds((per_sec_secs / FRAMES_PER_SECOND * 1e6).round() as i64)
    }

    #[test]
    fn normal_speed_is_fifteen_minutes_per_second() {
        let clock = PlaybackClock::new(start());
        assert_eq!(clock.speed_label(), "+15.00 m");
        assert!(!clock.is_running());
    }

    #[test]
    fn formats_days() {
        assert_eq!(format_speed(per_frame(2.0 * SECS_PER_DAY)), "+2.00 d");
    }

    #[test]
    fn formats_years() {
        assert_eq!(format_speed(per_frame(400.0 * SECS_PER_DAY)), "+1.10 a");
    }

    #[test]
    fn formats_negative_minutes() {
        assert_eq!(format_speed(per_frame(-30.0 * 60.0)), "-30.00 m");
    }

    #[test]
    fn formats_hours_and_seconds() {
        assert_eq!(format_speed(per_frame(3.0 * 3600.0)), "+3.00 h");
        assert_eq!(format_speed(per_frame(12.5)), "+12.50 s");
        assert_eq!(format_speed(Duration::zero()), "+0.00 s");
    }

    #[test]
    fn unit_boundaries_are_inclusive() {
        assert_eq!(format_speed(per_frame(SECS_PER_DAY)), "+1.00 d");
        assert_eq!(format_speed(per_frame(3600.0)), "+1.00 h");
        assert_eq!(format_speed(per_frame(60.0)), "+1.00 m");
    }

    #[test]
    fn tick_only_moves_time_while_running() {
        let mut clock = PlaybackClock::new(start());
        assert!(!clock.tick());
        assert_eq!(clock.time(), start());

        clock.toggle_play_pause();
        assert!(clock.tick());
        assert_eq!(clock.time(), start() + Duration::seconds(36));
        assert_eq!(clock.speed_label(), "+15.00 m");
    }

    #[test]
    fn advance_relabels_from_the_step() {
        let mut clock = PlaybackClock::new(start());
        clock.advance(-Duration::hours(2));
        assert_eq!(clock.time(), start() - Duration::hours(2));
        assert_eq!(clock.speed_label(), "-2.08 d");
    }

    #[test]
    fn fast_forward_doubles_without_bound() {
        let mut clock = running_clock();
        for _ in 0..10 {
            clock.fast_forward();
        }
        assert_eq!(clock.speed(), NORMAL_SPEED * 1024.0);
        assert!(clock.is_running());
    }

    #[test]
    fn press_while_paused_snaps_to_normal_and_plays() {
        let mut clock = PlaybackClock::new(start());
        clock.rewind();
        assert_eq!(clock.speed(), -NORMAL_SPEED);
        assert!(clock.is_running());

        clock.toggle_play_pause();
        clock.fast_forward();
        assert_eq!(clock.speed(), NORMAL_SPEED);
        assert!(clock.is_running());
    }

    #[test]
    fn four_rewinds_then_four_fast_forwards_return_to_normal() {
        let mut clock = running_clock();
        for _ in 0..4 {
            clock.rewind();
        }
        assert_eq!(clock.speed(), -4.0 * NORMAL_SPEED);
        for _ in 0..4 {
            clock.fast_forward();
        }
        assert!((clock.speed() - NORMAL_SPEED).abs() < 1e-15);
        assert!(clock.is_running());
    }

    #[test]
    fn rewinding_through_zero_pauses_instead_of_freezing() {
        let mut clock = running_clock();
        clock.fast_forward();
        assert_eq!(clock.speed(), 2.0 * NORMAL_SPEED);

        let mut saw_slow = false;
        let mut saw_flip = false;
        for _ in 0..6 {
            clock.rewind();
            assert!(!(clock.is_running() && clock.speed() == 0.0));
            if clock.speed().abs() < NORMAL_SPEED {
                saw_slow = true;
                assert!(!clock.is_running());
            }
            if clock.speed() < 0.0 {
                saw_flip = true;
            }
        }
        assert!(saw_slow && saw_flip);
        assert!(clock.is_running());
        assert!(clock.speed() < 0.0);
    }

    #[test]
    fn exact_normal_speed_does_not_toggle() {
        let mut clock = running_clock();
        clock.rewind();
        clock.rewind();
        clock.rewind();
        // -2N, running. Halving to exactly -N stays running.
        assert_eq!(clock.speed(), -2.0 * NORMAL_SPEED);
        clock.fast_forward();
        assert_eq!(clock.speed(), -NORMAL_SPEED);
        assert!(clock.is_running());
        clock.fast_forward();
        assert_eq!(clock.speed(), -NORMAL_SPEED / 2.0);
        assert!(!clock.is_running());
    }
}
