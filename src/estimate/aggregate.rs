//! Bottom-up remaining-effort sums per Initiative.

use crate::estimate::parents::InitiativeGroups;
use crate::tracker::IssueSource;
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// 8-hour day, 5-day week, 4-week month.
pub const SECONDS_PER_MONTH: u64 = 8 * 3600 * 5 * 4;

pub fn seconds_to_months(seconds: u64) -> f64 {
    seconds as f64 / SECONDS_PER_MONTH as f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitiativeEstimate {
    pub key: String,
    pub summary: String,
    /// Values currently stored on the Initiative.
    pub current_next_cycle: Option<f64>,
    pub current_remaining: Option<f64>,
    pub next_cycle_seconds: u64,
    pub remaining_seconds: u64,
    /// Epics that contributed, in processing order.
    pub epics: Vec<String>,
}

impl InitiativeEstimate {
    pub fn next_cycle_months(&self) -> f64 {
        seconds_to_months(self.next_cycle_seconds)
    }

    pub fn remaining_months(&self) -> f64 {
        seconds_to_months(self.remaining_seconds)
    }
}

/// Sum the remaining estimate of every open Epic under each Initiative.
///
/// Epics labelled `next_cycle_label` also count toward the next-cycle sum. An
/// Epic without an estimate counts as zero. `groups` is a partition, so an
/// Epic linked from several Initiatives counts once, for the one it was
/// grouped under.
pub fn aggregate(
    source: &dyn IssueSource,
    groups: &InitiativeGroups,
    next_cycle_label: &str,
) -> Result<Vec<InitiativeEstimate>> {
    let mut estimates = Vec::with_capacity(groups.len());

    for (initiative_key, epics) in groups.iter() {
        let initiative = source
            .fetch(initiative_key)
            .with_context(|| format!("Failed to fetch initiative {initiative_key}"))?;
        let mut estimate = InitiativeEstimate {
            key: initiative.key.clone(),
            summary: initiative.summary.clone(),
            current_next_cycle: initiative.fte_next_cycle,
            current_remaining: initiative.fte_remaining,
            next_cycle_seconds: 0,
            remaining_seconds: 0,
            epics: Vec::new(),
        };

        for listed in epics {
            let epic = source
                .fetch(&listed.key)
                .with_context(|| format!("Failed to fetch epic {}", listed.key))?;
            if epic.is_terminal() {
                debug!("Skipping {} ({})", epic.key, epic.status);
                continue;
            }
            let seconds = match epic.remaining_estimate_seconds {
                Some(seconds) => seconds,
                None => {
                    warn!("Found no estimate in {}, counting it as 0", epic.key);
                    0
                }
            };
            debug!("Epic {}: remaining estimate {}s", epic.key, seconds);
            estimate.remaining_seconds += seconds;
            if epic.has_label(next_cycle_label) {
                estimate.next_cycle_seconds += seconds;
            }
            estimate.epics.push(epic.key);
        }
        estimates.push(estimate);
    }
    Ok(estimates)
}
