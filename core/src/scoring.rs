//! Threat scoring: severity weights and the saturating per-account accumulator.
//!
//! Both the source and the destination of a suspicious event receive the
//! full weight. Nothing ever lowers a threat level.

use crate::event::{Severity, ThreatEvent};
use serde::{Deserialize, Serialize};

pub const MAX_THREAT_LEVEL: u8 = 10;

impl Severity {
    pub fn weight(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 3,
            Self::High => 7,
            Self::Critical => 10,
        }
    }
}

/// Weight contributed by one event. Absent severity counts as medium.
pub fn threat_weight(severity: Option<Severity>, suspicious: bool) -> u8 {
    if !suspicious {
        return 0;
    }
    severity.unwrap_or(Severity::Medium).weight()
}

/// `min(10, level + weight)`.
pub fn accumulate(level: u8, weight: u8) -> u8 {
    level.saturating_add(weight).min(MAX_THREAT_LEVEL)
}

/// Per-account running statistics shared by both aggregators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatTally {
    pub threat_level: u8,
    pub transaction_count: u32,
    pub suspicious_transaction_count: u32,
}

impl ThreatTally {
    /// Fold one event touching this account.
    pub fn record(&mut self, event: &ThreatEvent) {
        self.transaction_count += 1;
        if event.suspicious {
            self.suspicious_transaction_count += 1;
            self.threat_level = accumulate(
                self.threat_level,
                threat_weight(event.severity, event.suspicious),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_weights() {
        let weights: Vec<u8> = Severity::ALL.iter().map(|s| s.weight()).collect();
        assert_eq!(weights, vec![1, 3, 7, 10]);
    }

    #[test]
    fn unflagged_events_weigh_nothing() {
        for severity in Severity::ALL {
            assert_eq!(threat_weight(Some(severity), false), 0);
        }
        assert_eq!(threat_weight(None, false), 0);
    }

    #[test]
    fn absent_severity_is_medium() {
        assert_eq!(threat_weight(None, true), 3);
    }

    #[test]
    fn accumulator_saturates_at_ten() {
        let mut level = 0;
        for _ in 0..50 {
            level = accumulate(level, Severity::Critical.weight());
        }
        assert_eq!(level, MAX_THREAT_LEVEL);
        assert_eq!(accumulate(8, 7), 10);
        assert_eq!(accumulate(u8::MAX, 1), 10);
        assert_eq!(accumulate(2, 1), 3);
    }

    #[test]
    fn tally_counts_and_scores() {
        let mut tally = ThreatTally::default();
        tally.record(&ThreatEvent::transfer("1", "A", "B", 0));
        tally.record(&ThreatEvent::transfer("2", "A", "B", 0).flagged(Some(Severity::High)));
        tally.record(&ThreatEvent::transfer("3", "A", "B", 0).flagged(None));

        assert_eq!(tally.transaction_count, 3);
        assert_eq!(tally.suspicious_transaction_count, 2);
        assert_eq!(tally.threat_level, 10, "7 + 3 should saturate at 10");
    }
}
