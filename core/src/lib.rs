//! Threat graph core: turns a stream of transaction threat events into an
//! account network (with radial layout) and a normalized export document.

pub mod config;
pub mod detector;
pub mod error;
pub mod event;
pub mod export;
pub mod graph;
pub mod layout;
pub mod ledger;
pub mod name_generator;
pub mod rng;
pub mod scoring;
pub mod simulation;
pub mod types;
pub mod visual;
