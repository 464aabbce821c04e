use crate::{
    error::{ThreatError, ThreatResult},
    types::TimestampMs,
};
use serde::{Deserialize, Serialize};

// ── Defaults ───────────────────────────────────────────────────────

pub const DEFAULT_GRAPH_EVENT_CAP: usize = 30;
pub const DEFAULT_ACCOUNT_PREFIX: &str = "ACC_";
pub const DEFAULT_HIGH_VOLUME_THRESHOLD: u32 = 5;
pub const DEFAULT_LABEL_AMOUNT_PER_TRANSACTION: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatGraphConfig {
    /// Only this many leading events build graph nodes and edges.
    /// Compromised-account detection always sees the full sequence.
    pub graph_event_cap: usize,
    /// Stripped from account ids when building display names.
    pub account_prefix: String,
    pub layout: LayoutConfig,
    /// An edge is high volume when its count is strictly above this.
    pub high_volume_threshold: u32,
    /// Dollar label for an edge is `count * label_amount_per_transaction`.
    pub label_amount_per_transaction: u64,
    pub simulation: SimulationConfig,
}

impl Default for ThreatGraphConfig {
    fn default() -> Self {
        Self {
            graph_event_cap: DEFAULT_GRAPH_EVENT_CAP,
            account_prefix: DEFAULT_ACCOUNT_PREFIX.to_string(),
            layout: LayoutConfig::default(),
            high_volume_threshold: DEFAULT_HIGH_VOLUME_THRESHOLD,
            label_amount_per_transaction: DEFAULT_LABEL_AMOUNT_PER_TRANSACTION,
            simulation: SimulationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { center_x: 400.0, center_y: 300.0, radius: 200.0 }
    }
}

// ── Simulation ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub account_count: usize,
    /// Probability that a generated event is suspicious.
    pub suspicious_rate: f64,
    /// Share of suspicious events aimed at the single target account.
    pub targeted_share: f64,
    /// Probability that a suspicious event is blocked rather than let through.
    pub block_rate: f64,
    pub start_timestamp_ms: TimestampMs,
    pub mean_interval_ms: u64,
    pub amount_pareto_xmin: f64,
    pub amount_pareto_alpha: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            account_count: 12,
            suspicious_rate: 0.30,
            targeted_share: 0.60,
            block_rate: 0.25,
            start_timestamp_ms: 1_700_000_000_000,
            mean_interval_ms: 1_500,
            amount_pareto_xmin: 50.0,
            amount_pareto_alpha: 1.6,
        }
    }
}

impl ThreatGraphConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ThreatGraphConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ThreatResult<()> {
        if self.graph_event_cap == 0 {
            return Err(invalid("graph_event_cap", "must be at least 1"));
        }
        let layout = &self.layout;
        if !layout.center_x.is_finite() || !layout.center_y.is_finite() {
            return Err(invalid("layout.center", "coordinates must be finite"));
        }
        if !layout.radius.is_finite() || layout.radius <= 0.0 {
            let reason = format!("must be positive, got {}", layout.radius);
            return Err(invalid("layout.radius", reason));
        }

        let sim = &self.simulation;
        if sim.account_count < 2 {
            return Err(invalid("simulation.account_count", "need at least 2 accounts"));
        }
        for (field, rate) in [
            ("simulation.suspicious_rate", sim.suspicious_rate),
            ("simulation.targeted_share", sim.targeted_share),
            ("simulation.block_rate", sim.block_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(invalid(field, format!("must be within [0, 1], got {rate}")));
            }
        }
        if sim.mean_interval_ms == 0 {
            return Err(invalid("simulation.mean_interval_ms", "must be at least 1"));
        }
        if sim.amount_pareto_xmin <= 0.0 || sim.amount_pareto_alpha <= 0.0 {
            return Err(invalid("simulation.amount_pareto", "xmin and alpha must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ThreatError {
    ThreatError::InvalidConfig { field, reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ThreatGraphConfig::default();
        config.validate().expect("default config should validate");
        assert_eq!(config.graph_event_cap, 30);
        assert_eq!(config.layout.radius, 200.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{ "graph_event_cap": 10, "layout": { "radius": 50.0 } }"#;
        let config: ThreatGraphConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.graph_event_cap, 10);
        assert_eq!(config.layout.radius, 50.0);
        assert_eq!(config.layout.center_x, 400.0);
        assert_eq!(config.account_prefix, "ACC_");
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = ThreatGraphConfig { graph_event_cap: 0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ThreatError::InvalidConfig { field: "graph_event_cap", .. })
        ));

        config.graph_event_cap = 30;
        config.layout.radius = -1.0;
        assert!(config.validate().is_err());

        config.layout.radius = 200.0;
        config.simulation.suspicious_rate = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ThreatError::InvalidConfig { field: "simulation.suspicious_rate", .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ThreatGraphConfig::load("/nonexistent/threat-graph.json").unwrap_err();
        assert!(err.to_string().contains("Cannot read"), "unexpected error: {err}");
    }
}
