//! Wellness dashboard: history, goals and progress against baseline

pub mod progress;
pub mod render;
pub mod view;

pub use progress::{compare, ProgressChange, Trend};
pub use render::render;
pub use view::{DashboardError, DashboardView};
