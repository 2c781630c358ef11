//! Tasks and shift windows.

use aero_core::{Cell, CoreError, CoreResult};

/// One entry of an agent's weighted task list.
///
/// The first task in the list is the agent's primary station: shift
/// arrival places the agent there, and shift departure routes back to it.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    /// Destination cell.
    pub location: Cell,
    /// How many ticks the agent stays once arrived.
    pub duration_ticks: u32,
    /// Selection weight in the cumulative-probability draw.  A task with
    /// probability 0 is never drawn but still serves as the stay-in-place
    /// fallback when the draw exceeds all cumulative weights.
    pub probability: f64,
}

impl Task {
    pub fn new(location: Cell, duration_ticks: u32, probability: f64) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(CoreError::Config(format!(
                "task probability must be in 0..=1, got {probability}"
            )));
        }
        Ok(Task { location, duration_ticks, probability })
    }
}

/// An agent's daily active window, as an offset from the start of day.
///
/// Windows do not wrap past midnight; the model's config validation keeps
/// shift start + duration within one calendar day.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftWindow {
    /// Seconds after the start of day at which the shift begins.
    pub start_offset_secs: u32,
    /// Shift length in seconds.
    pub duration_secs: u32,
}

impl ShiftWindow {
    pub fn new(start_offset_secs: u32, duration_secs: u32) -> Self {
        Self { start_offset_secs, duration_secs }
    }

    /// Seconds-of-day at which the shift ends.
    #[inline]
    pub fn end_secs(&self) -> u32 {
        self.start_offset_secs + self.duration_secs
    }

    /// Whether `secs_of_day` falls inside the window.
    #[inline]
    pub fn contains(&self, secs_of_day: u32) -> bool {
        self.start_offset_secs <= secs_of_day && secs_of_day < self.end_secs()
    }
}
