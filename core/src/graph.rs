//! Graph aggregation: events to an account network with radial layout.
//!
//! PIPELINE (one pass, rebuilt from scratch on every call):
//!   1. Detect the compromised account over the FULL event sequence.
//!   2. Fold the first `graph_event_cap` events into accounts and edges.
//!   3. Lay out: compromised account at the center, everyone else on the ring.
//!   4. Attach visual state (tiers, edge classes, labels).

use crate::{
    config::ThreatGraphConfig,
    detector::CompromisedAccountDetector,
    event::ThreatEvent,
    layout::{Position, RadialLayout},
    ledger::{EdgeKey, Ledger},
    name_generator::display_name,
    scoring::ThreatTally,
    types::AccountId,
    visual::{dollar_label, stroke_width, EdgeClass, ThreatTier},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: AccountId,
    pub display_name: String,
    pub is_compromised: bool,
    #[serde(flatten)]
    pub tally: ThreatTally,
    pub is_source: bool,
    pub is_destination: bool,
    pub position: Position,
    pub tier: ThreatTier,
}

impl GraphNode {
    fn new(id: &str, prefix: &str, compromised: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name(id, prefix),
            is_compromised: compromised == Some(id),
            tally: ThreatTally::default(),
            is_source: false,
            is_destination: false,
            position: Position::default(),
            tier: ThreatTier::Normal,
        }
    }

    pub fn threat_level(&self) -> u8 {
        self.tally.threat_level
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: AccountId,
    pub target: AccountId,
    pub count: u32,
    pub is_suspicious: bool,
    pub is_high_volume: bool,
    pub class: EdgeClass,
    pub label: String,
    pub stroke_width: f64,
}

impl GraphEdge {
    fn new(key: &EdgeKey) -> Self {
        Self {
            id: String::new(),
            source: key.source.clone(),
            target: key.target.clone(),
            count: 0,
            is_suspicious: false,
            is_high_volume: false,
            class: EdgeClass::Normal,
            label: String::new(),
            stroke_width: 0.0,
        }
    }

    fn fold(&mut self, event: &ThreatEvent) {
        self.count += 1;
        self.is_suspicious |= event.suspicious;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Detected over the full sequence; may name an account outside `nodes`.
    pub compromised_account_id: Option<AccountId>,
}

impl NetworkGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.source == source && e.target == target)
    }

    pub fn count_tier(&self, tier: ThreatTier) -> usize {
        self.nodes.iter().filter(|n| n.tier == tier).count()
    }
}

pub struct GraphAggregator {
    config: ThreatGraphConfig,
}

impl GraphAggregator {
    pub fn new(config: ThreatGraphConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, events: &[ThreatEvent]) -> NetworkGraph {
        let compromised = CompromisedAccountDetector::detect(events).map(|c| c.account_id);
        let prefix = self.config.account_prefix.as_str();
        let compromised_id = compromised.as_deref();
        let new_node = |id: &str| GraphNode::new(id, prefix, compromised_id);

        let mut accounts: Ledger<AccountId, GraphNode> = Ledger::new();
        let mut edges: Ledger<EdgeKey, GraphEdge> = Ledger::new();
        let mut skipped = 0usize;

        for event in events.iter().take(self.config.graph_event_cap) {
            let Some((source, dest)) = event.endpoints() else {
                skipped += 1;
                continue;
            };

            let node = accounts.get_or_insert_with(source, || new_node(source));
            node.is_source = true;
            node.tally.record(event);

            let node = accounts.get_or_insert_with(dest, || new_node(dest));
            node.is_destination = true;
            node.tally.record(event);

            let key = EdgeKey::new(source, dest);
            edges.get_or_insert_with(&key, || GraphEdge::new(&key)).fold(event);
        }

        if skipped > 0 {
            log::debug!("graph: skipped {skipped} events missing an account id");
        }

        let anchor = compromised_id.and_then(|id| accounts.position(id));
        let nodes = self.place(accounts.into_values(), anchor);
        let edges = self.decorate(edges.into_values());

        log::debug!(
            "graph: {} nodes, {} edges from {} of {} events",
            nodes.len(),
            edges.len(),
            events.len().min(self.config.graph_event_cap),
            events.len()
        );

        NetworkGraph { nodes, edges, compromised_account_id: compromised }
    }

    /// Assign positions and tiers. The anchor, if any, moves to the front;
    /// the rest keep discovery order.
    fn place(&self, mut nodes: Vec<GraphNode>, anchor: Option<usize>) -> Vec<GraphNode> {
        let positions = RadialLayout::new(&self.config.layout).arrange(nodes.len(), anchor);
        for (node, position) in nodes.iter_mut().zip(positions) {
            node.position = position;
            node.tier = ThreatTier::classify(node.tally.threat_level, node.is_compromised);
        }
        if let Some(i) = anchor {
            let center = nodes.remove(i);
            nodes.insert(0, center);
        }
        nodes
    }

    fn decorate(&self, mut edges: Vec<GraphEdge>) -> Vec<GraphEdge> {
        for (i, edge) in edges.iter_mut().enumerate() {
            edge.id = format!("edge-{i}");
            edge.is_high_volume = edge.count > self.config.high_volume_threshold;
            edge.class = EdgeClass::classify(edge.is_suspicious, edge.is_high_volume);
            let amount = u64::from(edge.count) * self.config.label_amount_per_transaction;
            edge.label = dollar_label(amount);
            edge.stroke_width = stroke_width(edge.count);
        }
        edges
    }
}

impl Default for GraphAggregator {
    fn default() -> Self {
        Self::new(ThreatGraphConfig::default())
    }
}
