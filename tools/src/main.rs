//! threat-runner: headless driver for the threat graph core.
//!
//! Usage:
//!   threat-runner --events events.json --out-dir ./exports
//!   threat-runner --simulate 200 --seed 12345 --config graph.json --print-graph

use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use threat_graph_core::{
    config::ThreatGraphConfig,
    detector::CompromisedAccountDetector,
    event::{parse_events, ThreatEvent},
    export::{ThreatDataDocument, ThreatDataExporter},
    graph::{GraphAggregator, NetworkGraph},
    simulation::EventSimulator,
    visual::{EdgeClass, ThreatTier},
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let simulate = parse_arg(&args, "--simulate", 60usize);
    let print_graph = args.iter().any(|a| a == "--print-graph");
    let events_path = flag_value(&args, "--events");
    let config_path = flag_value(&args, "--config");
    let out_dir = flag_value(&args, "--out-dir").unwrap_or(".");

    let config = match config_path {
        Some(path) => ThreatGraphConfig::load(path)?,
        None => {
            log::info!("no --config given, using defaults");
            ThreatGraphConfig::default()
        }
    };

    let events = load_events(events_path, seed, simulate, &config)?;

    println!("threat-runner: threat graph core");
    match events_path {
        Some(path) => println!("  events:    {path}"),
        None => println!("  simulated: {simulate} events (seed {seed})"),
    }
    println!("  out_dir:   {out_dir}");
    println!();

    let cap = config.graph_event_cap;
    let graph = GraphAggregator::new(config.clone()).build(&events);
    let document = ThreatDataExporter::new(config).export(&events);

    print_summary(&events, cap, &graph, &document);

    let path = Path::new(out_dir).join(document.file_name());
    std::fs::write(&path, document.to_json_pretty()?)
        .with_context(|| format!("Cannot write {}", path.display()))?;
    println!();
    println!("  export written: {}", path.display());

    if print_graph {
        println!("{}", serde_json::to_string_pretty(&graph)?);
    }

    Ok(())
}

fn load_events(
    events_path: Option<&str>,
    seed: u64,
    simulate: usize,
    config: &ThreatGraphConfig,
) -> Result<Vec<ThreatEvent>> {
    match events_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
            Ok(parse_events(&content)?)
        }
        None => {
            let mut sim = EventSimulator::new(seed, config)?;
            log::info!("simulating {simulate} events, target account {}", sim.target());
            Ok(sim.generate(simulate))
        }
    }
}

fn print_summary(
    events: &[ThreatEvent],
    cap: usize,
    graph: &NetworkGraph,
    document: &ThreatDataDocument,
) {
    println!("=== EVENT SUMMARY ===");
    println!("  total events:      {}", document.total_events);
    println!("  suspicious events: {}", document.suspicious_events);
    println!("  accounts:          {}", document.accounts.len());
    println!("  transactions:      {}", document.transactions.len());

    match CompromisedAccountDetector::detect(events) {
        Some(c) => println!(
            "  compromised:       {} ({} suspicious hits)",
            c.account_id, c.suspicious_hits
        ),
        None => println!("  compromised:       (none)"),
    }

    println!();
    println!("=== GRAPH (first {} events) ===", events.len().min(cap));
    println!("  nodes: {} | edges: {}", graph.nodes.len(), graph.edges.len());
    println!(
        "  tiers: compromised {} | high {} | medium {} | normal {}",
        graph.count_tier(ThreatTier::Compromised),
        graph.count_tier(ThreatTier::High),
        graph.count_tier(ThreatTier::Medium),
        graph.count_tier(ThreatTier::Normal),
    );
    let count_class = |class: EdgeClass| graph.edges.iter().filter(|e| e.class == class).count();
    println!(
        "  edges: suspicious {} | high volume {} | normal {}",
        count_class(EdgeClass::Suspicious),
        count_class(EdgeClass::HighVolume),
        count_class(EdgeClass::Normal),
    );

    let mut hottest: Vec<_> = graph.nodes.iter().filter(|n| n.threat_level() > 0).collect();
    hottest.sort_by(|a, b| b.threat_level().cmp(&a.threat_level()));
    for node in hottest.iter().take(5) {
        println!(
            "  {:<24} threat {:>2} | {} txns ({} suspicious)",
            node.display_name,
            node.threat_level(),
            node.tally.transaction_count,
            node.tally.suspicious_transaction_count
        );
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
