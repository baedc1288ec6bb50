//! Feature panels
//!
//! One panel per shell tab. Each panel binds user actions to a single
//! capability call and keeps a status line plus the latest result; errors
//! are caught and shown as status text, never returned.

pub mod ai;
pub mod fs;
pub mod kv;
pub mod os;
pub mod ui;

pub use ai::AiPanel;
pub use fs::FsPanel;
pub use kv::KvPanel;
pub use os::OsPanel;
pub use ui::UiPanel;

use colored::Colorize;
use serde_json::Value;

/// Initial status line of panels with an explicit status
pub const IDLE_STATUS: &str = "Idle";

/// Something the shell can draw
pub trait PanelView {
    /// Heading shown above the panel
    fn title(&self) -> &'static str;

    /// Panel body, already coloured for the terminal
    fn render(&self) -> String;

    /// Actions the panel understands, as `(word, description)` pairs
    fn actions(&self) -> &'static [(&'static str, &'static str)];
}

/// Pretty JSON for a preview box
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// `Status: ...` line, red when the status reports a failure
pub(crate) fn status_line(status: &str) -> String {
    let failed = status.contains("failed:") || status.starts_with("Error: ");
    let status = if failed {
        status.red().to_string()
    } else {
        status.to_string()
    };
    format!("{} {}", "Status:".bold(), status)
}

/// Labelled preview box
pub(crate) fn callout(label: &str, body: &str) -> String {
    let mut out = format!("{}\n", label.bold());
    for line in body.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}
