//! Output rendering (Freeplane outline, text tree, estimate lines)

pub mod estimate;
pub mod outline;
pub mod text;

pub use estimate::{estimate_line, render_estimates};
pub use outline::{render_outline, OutlineDocument};
pub use text::render_text;
