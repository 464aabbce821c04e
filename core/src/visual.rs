//! Visual state handed to the rendering side: node tiers, edge classes,
//! dollar labels, and stroke widths. No colors live here.

use serde::{Deserialize, Serialize};

pub const HIGH_THREAT_ABOVE: u8 = 7;
pub const MEDIUM_THREAT_ABOVE: u8 = 3;

const STROKE_PER_TRANSACTION: f64 = 1.2;
const MIN_STROKE: f64 = 3.0;
const MAX_STROKE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatTier {
    Compromised,
    High,
    Medium,
    Normal,
}

impl ThreatTier {
    /// Compromised overrides any threat level.
    pub fn classify(threat_level: u8, is_compromised: bool) -> Self {
        if is_compromised {
            Self::Compromised
        } else if threat_level > HIGH_THREAT_ABOVE {
            Self::High
        } else if threat_level > MEDIUM_THREAT_ABOVE {
            Self::Medium
        } else {
            Self::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeClass {
    Suspicious,
    HighVolume,
    Normal,
}

impl EdgeClass {
    /// Suspicious takes priority over high volume.
    pub fn classify(is_suspicious: bool, is_high_volume: bool) -> Self {
        match (is_suspicious, is_high_volume) {
            (true, _) => Self::Suspicious,
            (false, true) => Self::HighVolume,
            (false, false) => Self::Normal,
        }
    }
}

pub fn stroke_width(count: u32) -> f64 {
    (count as f64 * STROKE_PER_TRANSACTION).clamp(MIN_STROKE, MAX_STROKE)
}

/// `$` followed by the amount with comma thousands separators: `$12,000`.
pub fn dollar_label(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(ThreatTier::classify(0, false), ThreatTier::Normal);
        assert_eq!(ThreatTier::classify(3, false), ThreatTier::Normal);
        assert_eq!(ThreatTier::classify(4, false), ThreatTier::Medium);
        assert_eq!(ThreatTier::classify(7, false), ThreatTier::Medium);
        assert_eq!(ThreatTier::classify(8, false), ThreatTier::High);
        assert_eq!(ThreatTier::classify(0, true), ThreatTier::Compromised);
    }

    #[test]
    fn suspicious_beats_high_volume() {
        assert_eq!(EdgeClass::classify(true, true), EdgeClass::Suspicious);
        assert_eq!(EdgeClass::classify(false, true), EdgeClass::HighVolume);
        assert_eq!(EdgeClass::classify(false, false), EdgeClass::Normal);
    }

    #[test]
    fn labels_use_thousands_separators() {
        assert_eq!(dollar_label(0), "$0");
        assert_eq!(dollar_label(999), "$999");
        assert_eq!(dollar_label(1_000), "$1,000");
        assert_eq!(dollar_label(12_000), "$12,000");
        assert_eq!(dollar_label(1_234_567), "$1,234,567");
    }

    #[test]
    fn stroke_is_clamped() {
        assert_eq!(stroke_width(1), 3.0);
        assert!((stroke_width(4) - 4.8).abs() < 1e-9);
        assert_eq!(stroke_width(40), 8.0);
    }
}
