//! Threat events: the read-only input to every aggregation.
//!
//! RULE: Ingestion is lenient. Nothing here rejects an event for missing
//! data. Aggregators decide what to skip (see `ThreatEvent::endpoints`).

use crate::{
    error::ThreatResult,
    types::{AccountId, EventId, TimestampMs},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One financial transaction annotated with optional suspicion metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatEvent {
    #[serde(default)]
    pub id: EventId,
    #[serde(default)]
    pub source_account: Option<AccountId>,
    #[serde(default)]
    pub dest_account: Option<AccountId>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub timestamp: TimestampMs,
    #[serde(default)]
    pub suspicious: bool,
    #[serde(default, deserialize_with = "lenient_severity")]
    pub severity: Option<Severity>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: TransactionStatus,
    #[serde(default)]
    pub attack_type: Option<String>,
    #[serde(default)]
    pub source_geo: Option<GeoLocation>,
    #[serde(default)]
    pub dest_geo: Option<GeoLocation>,
}

impl ThreatEvent {
    /// A plain, unflagged transfer between two accounts.
    pub fn transfer(
        id: impl Into<EventId>,
        source: impl Into<AccountId>,
        dest: impl Into<AccountId>,
        timestamp: TimestampMs,
    ) -> Self {
        Self {
            id: id.into(),
            source_account: Some(source.into()),
            dest_account: Some(dest.into()),
            amount: None,
            timestamp,
            suspicious: false,
            severity: None,
            status: TransactionStatus::Success,
            attack_type: None,
            source_geo: None,
            dest_geo: None,
        }
    }

    /// Mark the event suspicious with the given severity.
    pub fn flagged(mut self, severity: Option<Severity>) -> Self {
        self.suspicious = true;
        self.severity = severity;
        self.status = TransactionStatus::Suspicious;
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_attack_type(mut self, attack_type: impl Into<String>) -> Self {
        self.attack_type = Some(attack_type.into());
        self
    }

    pub fn with_geo(mut self, source: GeoLocation, dest: GeoLocation) -> Self {
        self.source_geo = Some(source);
        self.dest_geo = Some(dest);
        self
    }

    /// Source account, if present and non-empty.
    pub fn source(&self) -> Option<&str> {
        self.source_account.as_deref().filter(|s| !s.is_empty())
    }

    /// Destination account, if present and non-empty.
    pub fn dest(&self) -> Option<&str> {
        self.dest_account.as_deref().filter(|s| !s.is_empty())
    }

    /// Both endpoints, or `None` if the event cannot contribute to a graph.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        Some((self.source()?, self.dest()?))
    }

    /// Amount with absent treated as zero.
    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }
}

/// Parse a JSON array of events.
pub fn parse_events(json: &str) -> ThreatResult<Vec<ThreatEvent>> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Anything but a known label string becomes `None`, so one bad field
/// never fails the whole batch.
fn lenient_severity<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(Severity::from_label))
}

fn lenient_status<'de, D>(deserializer: D) -> Result<TransactionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .map(TransactionStatus::from_label)
        .unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Blocked,
    Suspicious,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    pub fn from_label(label: &str) -> Self {
        match label {
            "success" => Self::Success,
            "blocked" => Self::Blocked,
            "suspicious" => Self::Suspicious,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub country: String,
    pub city: String,
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_event() {
        let json = r#"[{
            "id": "evt-1",
            "source_account": "ACC_A",
            "dest_account": "ACC_B",
            "amount": 250.5,
            "timestamp": 1700000000000,
            "suspicious": true,
            "severity": "high",
            "status": "blocked",
            "attack_type": "account_takeover",
            "source_geo": { "country": "US", "city": "Austin", "lat": 30.27, "lng": -97.74 },
            "dest_geo":   { "country": "GB", "city": "London", "lat": 51.5, "lng": -0.12 }
        }]"#;

        let events = parse_events(json).unwrap();
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.endpoints(), Some(("ACC_A", "ACC_B")));
        assert_eq!(e.severity, Some(Severity::High));
        assert_eq!(e.status, TransactionStatus::Blocked);
        assert_eq!(e.attack_type.as_deref(), Some("account_takeover"));
        assert_eq!(e.dest_geo.as_ref().map(|g| g.city.as_str()), Some("London"));
    }

    #[test]
    fn unknown_labels_are_lenient() {
        let json =
            r#"[{ "id": "e", "timestamp": 0, "severity": "apocalyptic", "status": "pending" }]"#;
        let events = parse_events(json).unwrap();
        assert_eq!(events[0].severity, None);
        assert_eq!(events[0].status, TransactionStatus::Unknown);
        assert!(!events[0].suspicious);
    }

    #[test]
    fn malformed_event_does_not_sink_the_batch() {
        let json = r#"[
            { "id": "no-timestamp", "source_account": "ACC_A", "dest_account": "ACC_B" },
            { "source_account": "ACC_C", "dest_account": "ACC_D", "timestamp": 5 },
            { "id": "odd-types", "timestamp": 1, "suspicious": true,
              "severity": 3, "status": { "code": 7 },
              "source_account": "ACC_A", "dest_account": "ACC_C" },
            { "id": "ok", "timestamp": 2, "source_account": "ACC_B", "dest_account": "ACC_A",
              "severity": "critical", "status": "success" }
        ]"#;

        let events = parse_events(json).expect("lenient batch should parse");
        assert_eq!(events.len(), 4, "every event survives parsing");

        assert_eq!(events[0].timestamp, 0, "missing timestamp defaults to zero");
        assert_eq!(events[0].endpoints(), Some(("ACC_A", "ACC_B")));
        assert_eq!(events[1].id, "", "missing id defaults to empty");
        assert_eq!(events[1].timestamp, 5);

        assert_eq!(events[2].severity, None, "non-string severity is treated as absent");
        assert_eq!(events[2].status, TransactionStatus::Unknown);
        assert!(events[2].suspicious);

        assert_eq!(events[3].severity, Some(Severity::Critical));
        assert_eq!(events[3].status, TransactionStatus::Success);
    }

    #[test]
    fn empty_account_ids_are_not_endpoints() {
        let mut event = ThreatEvent::transfer("e", "ACC_A", "", 0);
        assert_eq!(event.endpoints(), None);

        event.dest_account = None;
        assert_eq!(event.source(), Some("ACC_A"));
        assert_eq!(event.endpoints(), None);
    }

    #[test]
    fn missing_amount_is_zero() {
        let event = ThreatEvent::transfer("e", "ACC_A", "ACC_B", 0);
        assert_eq!(event.amount_or_zero(), 0.0);
        assert_eq!(event.with_amount(12.5).amount_or_zero(), 12.5);
    }
}
