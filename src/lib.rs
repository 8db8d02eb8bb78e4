pub mod dashboard;
pub mod export;
pub mod metrics;
pub mod model;
pub mod remote;
pub mod session;
pub mod tui;

mod tui_shell;
