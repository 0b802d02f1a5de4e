//! Terminal UI (TUI) module for the sales-assistant client.

// === Submodules ===

pub mod app;
pub mod projection;
pub mod scrolling;
pub mod transcript;
pub mod ui;
pub mod views;
pub mod widgets;

// === Re-exports ===

pub use app::TuiOptions;
pub use ui::run_tui;
