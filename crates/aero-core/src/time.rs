//! Simulation time model with calendar semantics.
//!
//! # Design
//!
//! Time is a Unix-seconds counter advanced by a fixed step.  Unlike a pure
//! tick counter, this model needs *calendar* awareness: shift windows are
//! offsets from the start of a day, weekends are skipped, and the daily
//! infection report is keyed by date.  `SimDate` carries a day number since
//! the Unix epoch and derives the weekday arithmetically, so no datetime
//! crate is needed and all comparisons stay integer-exact.
//!
//! The clock is monotonically non-decreasing except for the deliberate
//! "time warp" at shift end (jump to the next workday start instead of
//! simulating idle overnight hours), which is applied by the scheduler via
//! [`SimClock::warp`].
//!
//! Schedule arithmetic relies on exact equality of seconds-of-day values,
//! so shift offsets and work-hour spans must be multiples of
//! `time_step_secs`.  The scheduler's config validation enforces this.

use std::fmt;

/// Seconds in one calendar day.
pub const SECS_PER_DAY: i64 = 86_400;

// ── SimDate ───────────────────────────────────────────────────────────────────

/// A calendar date, stored as whole days since the Unix epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimDate(pub i64);

impl SimDate {
    /// Date containing the given Unix timestamp.
    #[inline]
    pub fn from_unix_secs(secs: i64) -> Self {
        SimDate(secs.div_euclid(SECS_PER_DAY))
    }

    /// Day of week, Monday = 0 … Sunday = 6.
    ///
    /// Day 0 of the Unix epoch was a Thursday, hence the +3 offset.
    #[inline]
    pub fn weekday(self) -> u8 {
        ((self.0 + 3).rem_euclid(7)) as u8
    }

    /// The following calendar day.
    #[inline]
    pub fn next(self) -> SimDate {
        SimDate(self.0 + 1)
    }

    /// Whole days elapsed from `earlier` to `self` (negative if reversed).
    #[inline]
    pub fn days_since(self, earlier: SimDate) -> i64 {
        self.0 - earlier.0
    }

    /// Proleptic Gregorian `(year, month, day)` for this date.
    ///
    /// Days-from-civil inverse (Hinnant's algorithm); exact over the full
    /// `i64` day range this simulation can reach.
    pub fn ymd(self) -> (i32, u32, u32) {
        let z = self.0 + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
        let y = yoe + era * 400;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
        let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
        ((if m <= 2 { y + 1 } else { y }) as i32, m, d)
    }
}

impl fmt::Display for SimDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (y, m, d) = self.ymd();
        write!(f, "{y:04}-{m:02}-{d:02}")
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulation clock: current and start timestamps plus the fixed step.
///
/// Cheap to copy; holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (seconds) at which the run started.
    pub start_unix_secs: i64,
    /// How many simulated seconds one step represents.
    pub time_step_secs: u32,
    /// Current simulated Unix timestamp.
    pub now_unix_secs: i64,
}

impl SimClock {
    pub fn new(start_unix_secs: i64, time_step_secs: u32) -> Self {
        Self {
            start_unix_secs,
            time_step_secs,
            now_unix_secs: start_unix_secs,
        }
    }

    /// Advance the clock by exactly one time step.
    #[inline]
    pub fn advance(&mut self) {
        self.now_unix_secs += self.time_step_secs as i64;
    }

    /// Apply a deliberate jump (shift rollover, day skip, testing time cost).
    #[inline]
    pub fn warp(&mut self, delta_secs: i64) {
        self.now_unix_secs += delta_secs;
    }

    /// Seconds elapsed since the start of the current calendar day.
    #[inline]
    pub fn secs_of_day(&self) -> u32 {
        self.now_unix_secs.rem_euclid(SECS_PER_DAY) as u32
    }

    /// Seconds-of-day at which the run started (the "start of day" anchor
    /// used for day-boundary detection).
    #[inline]
    pub fn start_secs_of_day(&self) -> u32 {
        self.start_unix_secs.rem_euclid(SECS_PER_DAY) as u32
    }

    /// Current calendar date.
    #[inline]
    pub fn date(&self) -> SimDate {
        SimDate::from_unix_secs(self.now_unix_secs)
    }

    /// Date on which the run started.
    #[inline]
    pub fn start_date(&self) -> SimDate {
        SimDate::from_unix_secs(self.start_unix_secs)
    }

    /// Simulated seconds since the run started.
    #[inline]
    pub fn elapsed_secs(&self) -> i64 {
        self.now_unix_secs - self.start_unix_secs
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.secs_of_day();
        write!(
            f,
            "{} {:02}:{:02}:{:02}",
            self.date(),
            s / 3_600,
            (s % 3_600) / 60,
            s % 60
        )
    }
}
