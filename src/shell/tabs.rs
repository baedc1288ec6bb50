//! Shell tabs

use colored::Colorize;
use std::fmt;

/// One tab of the shell, each hosting a single panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Key-value counter
    Kv,
    /// File write/read
    Fs,
    /// User and version metadata
    Os,
    /// AI chat
    Ai,
    /// File picker
    Ui,
}

impl Tab {
    /// Every tab, in display order
    pub const ALL: [Tab; 5] = [Tab::Kv, Tab::Fs, Tab::Os, Tab::Ai, Tab::Ui];

    /// Short identifier used on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Self::Kv => "kv",
            Self::Fs => "fs",
            Self::Os => "os",
            Self::Ai => "ai",
            Self::Ui => "ui",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Kv => "KV store",
            Self::Fs => "File system",
            Self::Os => "OS",
            Self::Ai => "AI chat",
            Self::Ui => "UI helpers",
        }
    }

    /// One-line description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Kv => "Get/set and increment counters",
            Self::Fs => "Read and write a demo file",
            Self::Os => "User profile + version info",
            Self::Ai => "Prompt Puter AI and see replies",
            Self::Ui => "File picker example",
        }
    }

    /// Parse a tab id (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use puter_demo::shell::Tab;
    ///
    /// assert_eq!(Tab::parse_str("AI").unwrap(), Tab::Ai);
    /// assert!(Tab::parse_str("db").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|tab| tab.id() == wanted)
            .ok_or_else(|| format!("Unknown tab: {}", s.trim()))
    }

    /// Tab bar with this tab highlighted
    pub fn tab_bar(&self) -> String {
        Self::ALL
            .iter()
            .map(|tab| {
                if tab == self {
                    format!("[{}]", tab.label().bold().cyan())
                } else {
                    format!(" {} ", tab.label())
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Tab {
    fn default() -> Self {
        Self::Kv
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
