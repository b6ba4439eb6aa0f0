//! Write computed estimates back onto Initiatives.

use crate::domain::FieldMap;
use crate::estimate::aggregate::InitiativeEstimate;
use crate::estimate::ignore::IgnoreList;
use crate::tracker::IssueSource;
use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Also write the next-cycle field.
    pub include_next_cycle: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Ignored,
    DryRun,
}

/// Months rounded to two decimals, as stored on the Initiative.
fn stored_value(months: f64) -> f64 {
    (months * 100.0).round() / 100.0
}

pub fn update_fields(
    fields: &FieldMap,
    estimate: &InitiativeEstimate,
    include_next_cycle: bool,
) -> Map<String, Value> {
    let mut update = Map::new();
    if include_next_cycle {
        update.insert(fields.fte_next_cycle.clone(), json!(stored_value(estimate.next_cycle_months())));
    }
    update.insert(fields.fte_remaining.clone(), json!(stored_value(estimate.remaining_months())));
    update
}

pub fn write_back(
    source: &dyn IssueSource,
    fields: &FieldMap,
    estimate: &InitiativeEstimate,
    ignore: &IgnoreList,
    options: UpdateOptions,
) -> Result<UpdateOutcome> {
    if ignore.contains(&estimate.key) {
        warn!("NOT updating {} (found in the ignore list)", estimate.key);
        return Ok(UpdateOutcome::Ignored);
    }

    let which = if options.include_next_cycle { "next and remaining" } else { "remaining only" };
    let update = update_fields(fields, estimate, options.include_next_cycle);
    if options.dry_run {
        info!("Dry run: would update FTEs ({}) in {}: {:?}", which, estimate.key, update);
        return Ok(UpdateOutcome::DryRun);
    }

    info!("Updating FTEs ({}) in {}", which, estimate.key);
    source
        .update(&estimate.key, &update)
        .with_context(|| format!("Failed to update {}", estimate.key))?;
    Ok(UpdateOutcome::Updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Issue, IssueType};
    use crate::tracker::MemorySource;

    fn estimate(key: &str) -> InitiativeEstimate {
        InitiativeEstimate {
            key: key.into(),
            summary: "Init".into(),
            current_next_cycle: None,
            current_remaining: None,
            next_cycle_seconds: 144_000,
            remaining_seconds: 200_000,
            epics: vec!["SWG-14".into()],
        }
    }

    fn source() -> MemorySource {
        MemorySource::from_issues(vec![Issue::new("SWG-1", IssueType::Initiative, "To Do")])
    }

    #[test]
    fn writes_remaining_only_by_default() {
        let source = source();
        let fields = FieldMap::default();
        let outcome =
            write_back(&source, &fields, &estimate("SWG-1"), &IgnoreList::default(), UpdateOptions::default())
                .unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);

        let updates = source.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1.get(&fields.fte_remaining), Some(&json!(0.35)));
        assert!(updates[0].1.get(&fields.fte_next_cycle).is_none());
        assert_eq!(source.fetch("SWG-1").unwrap().fte_remaining, Some(0.35));
    }

    #[test]
    fn next_cycle_is_written_on_request() {
        let source = source();
        let fields = FieldMap::default();
        let options = UpdateOptions { include_next_cycle: true, dry_run: false };
        write_back(&source, &fields, &estimate("SWG-1"), &IgnoreList::default(), options).unwrap();
        assert_eq!(source.updates()[0].1.get(&fields.fte_next_cycle), Some(&json!(0.25)));
    }

    #[test]
    fn ignored_and_dry_run_leave_the_tracker_alone() {
        let source = source();
        let fields = FieldMap::default();
        let ignore = IgnoreList::parse("SWG-1 Init\n");
        let outcome =
            write_back(&source, &fields, &estimate("SWG-1"), &ignore, UpdateOptions::default()).unwrap();
        assert_eq!(outcome, UpdateOutcome::Ignored);

        let dry = UpdateOptions { include_next_cycle: true, dry_run: true };
        let outcome = write_back(&source, &fields, &estimate("SWG-1"), &IgnoreList::default(), dry).unwrap();
        assert_eq!(outcome, UpdateOutcome::DryRun);
        assert!(source.updates().is_empty());
    }
}
