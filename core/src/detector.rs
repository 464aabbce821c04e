//! Compromised-account detection.
//!
//! The compromised account is the destination named by the most suspicious
//! events. Ties go to whichever account reached the winning count first in a
//! single left-to-right scan; a later account must strictly exceed it.

use crate::{event::ThreatEvent, types::AccountId};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompromisedAccount {
    pub account_id: AccountId,
    /// Suspicious events naming this account as destination.
    pub suspicious_hits: u32,
}

pub struct CompromisedAccountDetector;

impl CompromisedAccountDetector {
    pub fn detect(events: &[ThreatEvent]) -> Option<CompromisedAccount> {
        let mut hits: HashMap<&str, u32> = HashMap::new();
        let mut leader: Option<(&str, u32)> = None;

        for event in events.iter().filter(|e| e.suspicious) {
            let Some(dest) = event.dest() else { continue };
            let count = hits.entry(dest).or_insert(0);
            *count += 1;

            if leader.map_or(true, |(_, best)| *count > best) {
                leader = Some((dest, *count));
            }
        }

        leader.map(|(account_id, suspicious_hits)| CompromisedAccount {
            account_id: account_id.to_string(),
            suspicious_hits,
        })
    }
}
