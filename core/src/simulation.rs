//! Deterministic threat-event simulator.
//!
//! Produces a plausible event stream for the runner and for tests:
//!   - a fixed pool of accounts, each with a home location
//!   - one target account that draws `targeted_share` of suspicious traffic
//!   - suspicious events at `suspicious_rate`, blocked at `block_rate`
//!   - Pareto-distributed amounts, exponential inter-arrival times
//!
//! Same seed and config → identical events, byte for byte.

use crate::{
    config::{SimulationConfig, ThreatGraphConfig},
    error::ThreatResult,
    event::{GeoLocation, Severity, ThreatEvent, TransactionStatus},
    name_generator::NameGenerator,
    rng::{RngBank, StreamRng, StreamSlot},
    types::{AccountId, TimestampMs},
};

const ATTACK_TYPES: &[&str] = &[
    "account_takeover",
    "card_testing",
    "credential_stuffing",
    "money_mule",
    "phishing",
    "synthetic_identity",
];

/// (country, city, lat, lng)
const CITIES: &[(&str, &str, f64, f64)] = &[
    ("US", "New York", 40.7128, -74.0060),
    ("US", "Austin", 30.2672, -97.7431),
    ("GB", "London", 51.5074, -0.1278),
    ("DE", "Frankfurt", 50.1109, 8.6821),
    ("NG", "Lagos", 6.5244, 3.3792),
    ("BR", "Sao Paulo", -23.5505, -46.6333),
    ("SG", "Singapore", 1.3521, 103.8198),
    ("JP", "Tokyo", 35.6762, 139.6503),
    ("AE", "Dubai", 25.2048, 55.2708),
    ("RU", "Moscow", 55.7558, 37.6173),
    ("IN", "Mumbai", 19.0760, 72.8777),
    ("AU", "Sydney", -33.8688, 151.2093),
];

/// Share of suspicious events that arrive without a severity label.
const UNLABELLED_SEVERITY_RATE: f64 = 0.10;

pub struct EventSimulator {
    config: SimulationConfig,
    accounts: Vec<AccountId>,
    homes: Vec<GeoLocation>,
    target: usize,
    traffic: StreamRng,
    amounts: StreamRng,
    ids: StreamRng,
    clock: TimestampMs,
}

impl EventSimulator {
    pub fn new(seed: u64, config: &ThreatGraphConfig) -> ThreatResult<Self> {
        config.validate()?;
        let sim = config.simulation.clone();
        let bank = RngBank::new(seed);

        let mut accounts_rng = bank.for_stream(StreamSlot::Accounts);
        let accounts = NameGenerator::generate_pool(
            &mut accounts_rng,
            &config.account_prefix,
            sim.account_count,
        );
        let target = accounts_rng.next_below(accounts.len());

        let mut geo_rng = bank.for_stream(StreamSlot::Geo);
        let homes = accounts
            .iter()
            .map(|_| {
                let (country, city, lat, lng) = *geo_rng.pick(CITIES);
                GeoLocation { country: country.to_string(), city: city.to_string(), lat, lng }
            })
            .collect();

        log::debug!(
            "simulation: seed={seed} accounts={} target={}",
            accounts.len(),
            accounts[target]
        );

        Ok(Self {
            clock: sim.start_timestamp_ms,
            config: sim,
            accounts,
            homes,
            target,
            traffic: bank.for_stream(StreamSlot::Traffic),
            amounts: bank.for_stream(StreamSlot::Amounts),
            ids: bank.for_stream(StreamSlot::Ids),
        })
    }

    pub fn accounts(&self) -> &[AccountId] {
        &self.accounts
    }

    /// The account suspicious traffic is steered towards.
    pub fn target(&self) -> &str {
        &self.accounts[self.target]
    }

    pub fn generate(&mut self, count: usize) -> Vec<ThreatEvent> {
        (0..count).map(|_| self.next_event()).collect()
    }

    pub fn next_event(&mut self) -> ThreatEvent {
        let gap = self.traffic.exponential(self.config.mean_interval_ms as f64).round() as i64;
        self.clock += gap.max(1);

        let suspicious = self.traffic.chance(self.config.suspicious_rate);
        let dest = if suspicious && self.traffic.chance(self.config.targeted_share) {
            self.target
        } else {
            self.traffic.next_below(self.accounts.len())
        };
        // Any account but the destination.
        let mut source = self.traffic.next_below(self.accounts.len() - 1);
        if source >= dest {
            source += 1;
        }

        let raw = self
            .amounts
            .pareto(self.config.amount_pareto_xmin, self.config.amount_pareto_alpha);
        let amount = (raw * 100.0).round() / 100.0;

        let id = self.next_id();
        let (from, to) = (&self.accounts[source], &self.accounts[dest]);
        let event = ThreatEvent::transfer(id, from, to, self.clock)
            .with_amount(amount)
            .with_geo(self.homes[source].clone(), self.homes[dest].clone());

        if !suspicious {
            return event;
        }

        let severity = self.draw_severity();
        let status = if self.traffic.chance(self.config.block_rate) {
            TransactionStatus::Blocked
        } else {
            TransactionStatus::Suspicious
        };
        let attack_type = *self.traffic.pick(ATTACK_TYPES);

        event.flagged(severity).with_status(status).with_attack_type(attack_type)
    }

    fn draw_severity(&mut self) -> Option<Severity> {
        if self.traffic.chance(UNLABELLED_SEVERITY_RATE) {
            return None;
        }
        let roll = self.traffic.next_f64();
        Some(match roll {
            r if r < 0.30 => Severity::Low,
            r if r < 0.65 => Severity::Medium,
            r if r < 0.90 => Severity::High,
            _ => Severity::Critical,
        })
    }

    /// UUIDv4-formatted, but drawn from the seeded stream.
    fn next_id(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.ids.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
    }
}
