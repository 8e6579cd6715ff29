//! Per-element countdown state machine.
//!
//! The machine is driven once per second by whatever owns the interval (see
//! `dom::IntervalGuard`) and talks to the page through the [`ClockHost`]
//! capability trait, so it can be ticked against a fake host in tests.

use thiserror::Error;

use crate::duration::{format_clock, format_relative, remaining_seconds};

/// What a countdown needs from its element: the target instant, a fresh
/// wall clock, somewhere to write text, and a way to announce expiry.
pub trait ClockHost {
    fn timestamp(&self) -> Result<i64, HostError>;
    fn now_millis(&self) -> f64;
    fn set_text(&mut self, text: &str);
    fn emit_refresh(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("element carries no timestamp attribute")]
    MissingTimestamp,
    #[error("timestamp attribute is not an integer: {0:?}")]
    InvalidTimestamp(String),
}

/// How the remaining duration is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// Primary `HH:MM:SS` clock; rolls over into a refresh signal.
    Clock,
    /// Secondary `za/pre ...` badge; keeps counting past zero, never refreshes.
    Relative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Rendered,
    /// The clock crossed zero on this tick; the refresh signal has fired.
    RolledOver,
    /// Nothing was rendered (bad timestamp, or already rolled over).
    Skipped,
}

pub struct Countdown {
    mode: DisplayMode,
    utc_offset_secs: i32,
    rolled_over: bool,
}

impl Countdown {
    pub fn new(mode: DisplayMode, utc_offset_secs: i32) -> Self {
        Self {
            mode,
            utc_offset_secs,
            rolled_over: false,
        }
    }

    /// Recompute and render the countdown. Called immediately on
    /// registration and then once per interval tick.
    ///
    /// The remaining duration is derived from a fresh `now_millis()` every
    /// time, so a delayed tick self-corrects instead of accumulating drift.
    /// A timestamp read failure skips this tick only; the next tick reads
    /// the attribute again.
    pub fn tick<H: ClockHost>(&mut self, host: &mut H) -> Tick {
        if self.rolled_over {
            return Tick::Skipped;
        }
        let target = match host.timestamp() {
            Ok(t) => t,
            Err(err) => {
                crate::util::cerror(&format!("countdown element unusable: {err}"));
                return Tick::Skipped;
            }
        };
        let remaining = remaining_seconds(target, host.now_millis(), self.utc_offset_secs);
        match self.mode {
            DisplayMode::Clock => {
                if remaining < 0.0 {
                    // Latch first so a re-entrant tick can never signal twice.
                    self.rolled_over = true;
                    host.emit_refresh();
                    return Tick::RolledOver;
                }
                host.set_text(&format_clock(remaining));
            }
            DisplayMode::Relative => {
                host.set_text(&format_relative(remaining));
            }
        }
        Tick::Rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeHost {
        target: Result<i64, HostError>,
        now_millis: f64,
        texts: Vec<String>,
        refreshes: u32,
    }

    impl FakeHost {
        fn at(target: i64, now_secs: f64) -> Self {
            Self {
                target: Ok(target),
                now_millis: now_secs * 1000.0,
                texts: Vec::new(),
                refreshes: 0,
            }
        }
    }

    impl ClockHost for FakeHost {
        fn timestamp(&self) -> Result<i64, HostError> {
            self.target.clone()
        }
        fn now_millis(&self) -> f64 {
            self.now_millis
        }
        fn set_text(&mut self, text: &str) {
            self.texts.push(text.to_string());
        }
        fn emit_refresh(&mut self) {
            self.refreshes += 1;
        }
    }

    #[test]
    fn renders_on_first_tick() {
        let mut host = FakeHost::at(90, 0.0);
        let mut countdown = Countdown::new(DisplayMode::Clock, 0);
        assert_eq!(countdown.tick(&mut host), Tick::Rendered);
        assert_eq!(host.texts, vec!["00:01:30"]);
    }

    #[test]
    fn clock_rolls_over_exactly_once() {
        let mut host = FakeHost::at(10, 9.0);
        let mut countdown = Countdown::new(DisplayMode::Clock, 0);
        assert_eq!(countdown.tick(&mut host), Tick::Rendered);

        // the deadline passes between ticks
        host.now_millis = 10_500.0;
        assert_eq!(countdown.tick(&mut host), Tick::RolledOver);
        assert_eq!(host.refreshes, 1);

        // further ticks neither render nor signal again
        host.now_millis = 60_000.0;
        assert_eq!(countdown.tick(&mut host), Tick::Skipped);
        assert_eq!(countdown.tick(&mut host), Tick::Skipped);
        assert_eq!(host.refreshes, 1);
        assert_eq!(host.texts.len(), 1);
    }

    #[test]
    fn rollover_does_not_render_a_negative_clock() {
        let mut host = FakeHost::at(10, 20.0);
        let mut countdown = Countdown::new(DisplayMode::Clock, 0);
        assert_eq!(countdown.tick(&mut host), Tick::RolledOver);
        assert!(host.texts.is_empty());
    }

    #[test]
    fn badge_flips_to_pre_and_keeps_counting() {
        let mut host = FakeHost::at(100, 98.0);
        let mut countdown = Countdown::new(DisplayMode::Relative, 0);
        countdown.tick(&mut host);
        assert_eq!(host.texts.last().unwrap(), "za 2 sekunde");

        host.now_millis = 105_000.0;
        assert_eq!(countdown.tick(&mut host), Tick::Rendered);
        assert_eq!(host.texts.last().unwrap(), "pre 5 sekundi");
        assert_eq!(host.refreshes, 0);

        host.now_millis = 100_000.0 + 13.0 * 3600.0 * 1000.0;
        countdown.tick(&mut host);
        assert_eq!(host.texts.last().unwrap(), "pre 13 sati");
        assert_eq!(host.refreshes, 0);
    }

    #[test]
    fn bad_timestamp_skips_without_latching() {
        let mut host = FakeHost::at(0, 0.0);
        host.target = Err(HostError::InvalidTimestamp("uskoro".into()));
        let mut countdown = Countdown::new(DisplayMode::Clock, 0);
        assert_eq!(countdown.tick(&mut host), Tick::Skipped);
        assert!(host.texts.is_empty());

        // the attribute gets fixed (fragment swap); ticking resumes
        host.target = Ok(120);
        assert_eq!(countdown.tick(&mut host), Tick::Rendered);
        assert_eq!(host.texts, vec!["00:02:00"]);
    }

    #[test]
    fn offset_shifts_the_rollover_moment() {
        // target an hour out, but the viewer sits one hour ahead of UTC
        let mut host = FakeHost::at(3600, 30.0);
        let mut countdown = Countdown::new(DisplayMode::Clock, 3600);
        assert_eq!(countdown.tick(&mut host), Tick::RolledOver);
    }
}
