//! Scheduled gatherings.

use aero_core::Cell;

/// A capacity-bounded event that pulls a random subset of the active crew
/// to a shared location once per day.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gathering {
    /// Candidate cells; each attendee is routed to a random one.
    pub locations: Vec<Cell>,
    /// Seconds-of-day at which the gathering fires.
    pub start_secs_of_day: u32,
    /// Stay length at the gathering, in ticks.
    pub duration_ticks: u32,
    /// Maximum attendee count.
    pub size: usize,
    /// Fired today; reset at each day start.
    happened: bool,
}

impl Gathering {
    pub fn new(
        locations: Vec<Cell>,
        start_secs_of_day: u32,
        duration_ticks: u32,
        size: usize,
    ) -> Self {
        Self { locations, start_secs_of_day, duration_ticks, size, happened: false }
    }

    pub fn happened(&self) -> bool {
        self.happened
    }

    pub(crate) fn mark_happened(&mut self) {
        self.happened = true;
    }

    pub(crate) fn reset_day(&mut self) {
        self.happened = false;
    }
}
