//! Estimate aggregation for the FTE update and reporting commands.
//!
//! Works from Epic → Initiative links directly; the full tree is not built.

pub mod aggregate;
pub mod ignore;
pub mod parents;
pub mod update;

pub use aggregate::{aggregate, seconds_to_months, InitiativeEstimate, SECONDS_PER_MONTH};
pub use ignore::{write_ignore_list, IgnoreList, DEFAULT_IGNORE_FILE};
pub use parents::{find_parent_initiatives, group_by_initiative, InitiativeGroups};
pub use update::{update_fields, write_back, UpdateOptions, UpdateOutcome};
