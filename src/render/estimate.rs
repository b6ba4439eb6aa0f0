//! One summary line per Initiative.

use crate::estimate::InitiativeEstimate;

pub fn estimate_line(estimate: &InitiativeEstimate) -> String {
    format!(
        "Initiative {} ({:.2}/{:.2}): true-next: {:.2} true-remaining: {:.2}",
        estimate.key,
        estimate.current_next_cycle.unwrap_or(0.0),
        estimate.current_remaining.unwrap_or(0.0),
        estimate.next_cycle_months(),
        estimate.remaining_months()
    )
}

pub fn render_estimates(estimates: &[InitiativeEstimate]) -> String {
    estimates.iter().map(|e| estimate_line(e) + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_shows_current_and_computed_values() {
        let estimate = InitiativeEstimate {
            key: "SWG-1".into(),
            summary: "Init".into(),
            current_next_cycle: None,
            current_remaining: Some(1.5),
            next_cycle_seconds: 144_000,
            remaining_seconds: 144_000,
            epics: vec!["SWG-14".into()],
        };
        assert_eq!(
            estimate_line(&estimate),
            "Initiative SWG-1 (0.00/1.50): true-next: 0.25 true-remaining: 0.25"
        );
    }
}
