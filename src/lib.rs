//! jiramap: rebuild Jira Initiative → Epic → Story trees from issue links.
//!
//! The tree builder walks open Initiatives through structural links, a
//! bounded reconciliation loop places whatever it missed, and the result is
//! written as a Freeplane mind map. The same tracker plumbing drives the
//! estimate, closed-work and fix-version reports.

pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod estimate;
pub mod render;
pub mod reports;
pub mod tracker;
pub mod tree;
