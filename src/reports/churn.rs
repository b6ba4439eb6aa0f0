//! Fix-version churn: how often an issue's fix version was moved.

use crate::domain::ChangeItem;
use crate::tracker::IssueSource;
use anyhow::{Context, Result};
use tracing::debug;

const FIX_VERSION_FIELD: &str = "Fix Version";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixVersionChurn {
    pub key: String,
    /// New fix versions in history order, ignored ones left out.
    pub versions: Vec<String>,
}

impl FixVersionChurn {
    pub fn count(&self) -> usize {
        self.versions.len()
    }

    /// `<key>, <count>, <v1>, <v2>...`
    pub fn line(&self) -> String {
        format!("{}, {}, {}", self.key, self.count(), self.versions.join(", "))
    }
}

pub fn count_fix_versions(key: &str, history: &[ChangeItem], ignored: &[String]) -> FixVersionChurn {
    let versions = history
        .iter()
        .filter(|item| item.field == FIX_VERSION_FIELD)
        .filter_map(|item| item.to.as_deref())
        .filter(|version| !ignored.iter().any(|i| i == version))
        .map(str::to_string)
        .collect();
    FixVersionChurn { key: key.to_string(), versions }
}

pub fn fix_version_churn(source: &dyn IssueSource, key: &str, ignored: &[String]) -> Result<FixVersionChurn> {
    let history = source.changelog(key).with_context(|| format!("Failed to read changelog of {key}"))?;
    let churn = count_fix_versions(key, &history, ignored);
    debug!("{}: {} fix version changes", key, churn.count());
    Ok(churn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(field: &str, to: Option<&str>) -> ChangeItem {
        ChangeItem { field: field.into(), from: None, to: to.map(String::from), created: None }
    }

    #[test]
    fn counts_only_set_and_relevant_fix_versions() {
        let history = vec![
            change("Fix Version", Some("2019.06")),
            change("status", Some("Closed")),
            change("Fix Version", None),
            change("Fix Version", Some("NEXT-CYCLE")),
            change("Fix Version", Some("SAN19")),
            change("Fix Version", Some("2019.12")),
        ];
        let ignored = vec!["NEXT-CYCLE".to_string(), "SAN19".to_string()];
        let churn = count_fix_versions("SWG-364", &history, &ignored);
        assert_eq!(churn.line(), "SWG-364, 2, 2019.06, 2019.12");
    }

    #[test]
    fn no_changes_still_produces_a_line() {
        let churn = count_fix_versions("SWG-1", &[], &[]);
        assert_eq!(churn.line(), "SWG-1, 0, ");
    }
}
