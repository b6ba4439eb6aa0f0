//! Text reports built straight from tracker queries.

pub mod churn;
pub mod closed;

pub use churn::{count_fix_versions, fix_version_churn, FixVersionChurn};
pub use closed::{closed_query, closed_sections, render_closed_report, ClosedItem, ClosedSection, DEFAULT_WEEKS};
