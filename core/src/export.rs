//! Export aggregation: the full, uncapped account/transaction document.
//!
//! `export` is a pure function of its input: the caller owns the returned
//! document. Nothing is cached between calls.

use crate::{
    config::ThreatGraphConfig,
    detector::CompromisedAccountDetector,
    error::ThreatResult,
    event::{GeoLocation, Severity, ThreatEvent, TransactionStatus},
    ledger::{EdgeKey, Ledger},
    name_generator::display_name,
    scoring::ThreatTally,
    types::{AccountId, EventId, TimestampMs},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatDataDocument {
    pub timestamp: TimestampMs,
    pub total_events: usize,
    pub suspicious_events: usize,
    pub accounts: Vec<AccountRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub network_graph: ExportGraph,
}

impl ThreatDataDocument {
    /// `threat-data-<YYYY-MM-DD>.json`, dated from the document timestamp (UTC).
    pub fn file_name(&self) -> String {
        let at = DateTime::<Utc>::from_timestamp_millis(self.timestamp).unwrap_or_default();
        format!("threat-data-{}.json", at.format("%Y-%m-%d"))
    }

    pub fn to_json_pretty(&self) -> ThreatResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn account(&self, id: &str) -> Option<&AccountRecord> {
        self.accounts.iter().find(|a| a.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: AccountId,
    pub name: String,
    pub is_compromised: bool,
    pub threat_level: u8,
    pub total_transactions: u32,
    pub suspicious_transactions: u32,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: EventId,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: f64,
    pub timestamp: TimestampMs,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<String>,
    /// Drives the exported edge's suspicious flag, same as the rendered graph.
    pub suspicious: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportGraph {
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
    pub compromised_account: Option<AccountId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNode {
    pub id: AccountId,
    pub label: String,
    pub is_compromised: bool,
    pub threat_level: u8,
    pub total_transactions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEdge {
    pub from: AccountId,
    pub to: AccountId,
    /// Sum of transaction amounts.
    pub weight: f64,
    pub is_suspicious: bool,
    pub transactions: u32,
}

/// Working state for one account while folding events.
struct AccountDraft {
    id: AccountId,
    name: String,
    tally: ThreatTally,
    total_amount: f64,
    location: Option<GeoLocation>,
}

impl AccountDraft {
    fn record(&mut self, event: &ThreatEvent) {
        self.tally.record(event);
        self.total_amount += event.amount_or_zero();
    }

    fn finish(self, compromised: Option<&str>) -> AccountRecord {
        AccountRecord {
            is_compromised: compromised == Some(self.id.as_str()),
            id: self.id,
            name: self.name,
            threat_level: self.tally.threat_level,
            total_transactions: self.tally.transaction_count,
            suspicious_transactions: self.tally.suspicious_transaction_count,
            total_amount: self.total_amount,
            location: self.location,
        }
    }
}

pub struct ThreatDataExporter {
    config: ThreatGraphConfig,
}

impl ThreatDataExporter {
    pub fn new(config: ThreatGraphConfig) -> Self {
        Self { config }
    }

    /// Export stamped with the current time.
    pub fn export(&self, events: &[ThreatEvent]) -> ThreatDataDocument {
        self.export_at(events, Utc::now())
    }

    pub fn export_at(&self, events: &[ThreatEvent], at: DateTime<Utc>) -> ThreatDataDocument {
        let prefix = self.config.account_prefix.as_str();
        let mut accounts: Ledger<AccountId, AccountDraft> = Ledger::new();
        let mut transactions = Vec::with_capacity(events.len());

        for event in events {
            let Some((source, dest)) = event.endpoints() else { continue };

            accounts
                .get_or_insert_with(source, || draft(source, prefix, event.source_geo.clone()))
                .record(event);
            accounts
                .get_or_insert_with(dest, || draft(dest, prefix, event.dest_geo.clone()))
                .record(event);

            transactions.push(TransactionRecord {
                id: event.id.clone(),
                from: source.to_string(),
                to: dest.to_string(),
                amount: event.amount_or_zero(),
                timestamp: event.timestamp,
                status: event.status,
                severity: event.severity,
                attack_type: event.attack_type.clone(),
                suspicious: event.suspicious,
            });
        }

        let compromised = CompromisedAccountDetector::detect(events).map(|c| c.account_id);
        if let Some(id) = &compromised {
            log::info!("export: compromised account {id}");
        }

        let accounts: Vec<AccountRecord> = accounts
            .into_values()
            .into_iter()
            .map(|a| a.finish(compromised.as_deref()))
            .collect();
        let network_graph = build_export_graph(&accounts, &transactions, compromised);

        log::debug!(
            "export: {} accounts, {} transactions, {} edges",
            accounts.len(),
            transactions.len(),
            network_graph.edges.len()
        );

        ThreatDataDocument {
            timestamp: at.timestamp_millis(),
            total_events: events.len(),
            suspicious_events: events.iter().filter(|e| e.suspicious).count(),
            accounts,
            transactions,
            network_graph,
        }
    }
}

impl Default for ThreatDataExporter {
    fn default() -> Self {
        Self::new(ThreatGraphConfig::default())
    }
}

fn draft(id: &str, prefix: &str, location: Option<GeoLocation>) -> AccountDraft {
    AccountDraft {
        id: id.to_string(),
        name: display_name(id, prefix),
        tally: ThreatTally::default(),
        total_amount: 0.0,
        location,
    }
}

/// Fold transaction records (not raw events) into directed edges.
fn build_export_graph(
    accounts: &[AccountRecord],
    transactions: &[TransactionRecord],
    compromised: Option<AccountId>,
) -> ExportGraph {
    let nodes = accounts
        .iter()
        .map(|a| ExportNode {
            id: a.id.clone(),
            label: a.name.clone(),
            is_compromised: a.is_compromised,
            threat_level: a.threat_level,
            total_transactions: a.total_transactions,
        })
        .collect();

    let mut edges: Ledger<EdgeKey, ExportEdge> = Ledger::new();
    for txn in transactions {
        let key = EdgeKey::new(&txn.from, &txn.to);
        let edge = edges.get_or_insert_with(&key, || ExportEdge {
            from: txn.from.clone(),
            to: txn.to.clone(),
            weight: 0.0,
            is_suspicious: false,
            transactions: 0,
        });
        edge.weight += txn.amount;
        edge.transactions += 1;
        edge.is_suspicious |= txn.suspicious;
    }

    ExportGraph {
        nodes,
        edges: edges.into_values(),
        compromised_account: compromised,
    }
}
