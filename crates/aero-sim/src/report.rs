//! The per-day new-infection report.

use std::collections::BTreeMap;

use aero_core::SimDate;

/// New-infection counts keyed by calendar date.
///
/// Every simulated date gets an entry (zero included), so the series is
/// gapless and plots directly.  Backdated infections always *increment*
/// their date's entry, never overwrite it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyReport {
    days: BTreeMap<SimDate, u32>,
}

impl DailyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `date` has an entry, starting it at zero.
    pub(crate) fn begin_day(&mut self, date: SimDate) {
        self.days.entry(date).or_insert(0);
    }

    /// Count one new infection on `date`.
    pub(crate) fn record(&mut self, date: SimDate) {
        *self.days.entry(date).or_insert(0) += 1;
    }

    /// New infections recorded on `date` (0 if the date was never reached).
    pub fn count_on(&self, date: SimDate) -> u32 {
        self.days.get(&date).copied().unwrap_or(0)
    }

    /// Total new infections over the run.
    pub fn total(&self) -> u32 {
        self.days.values().sum()
    }

    /// The full date → count series, in date order.
    pub fn days(&self) -> &BTreeMap<SimDate, u32> {
        &self.days
    }

    /// Attack rate as a percentage of `agent_count`, plus the date/count
    /// series it was computed from.
    pub fn attack_rate(&self, agent_count: usize) -> (f64, Vec<SimDate>, Vec<u32>) {
        let dates: Vec<SimDate> = self.days.keys().copied().collect();
        let counts: Vec<u32> = self.days.values().copied().collect();
        let rate = if agent_count == 0 {
            0.0
        } else {
            f64::from(self.total()) / agent_count as f64 * 100.0
        };
        (rate, dates, counts)
    }
}
