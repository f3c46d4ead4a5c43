//! Domain types shared across the workspace.

pub mod cadence;
pub mod history;
pub mod recommendation;
