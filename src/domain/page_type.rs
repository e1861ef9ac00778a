//! PageType - Coarse Classification of the Current Screen

use serde::{Deserialize, Serialize};

/// Page type used to pick a refresh strategy.
///
/// Determined once per page load and never changes afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Production,
    Chart,
    Report,
    Dashboard,
    #[default]
    Unknown,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Production => "production",
            PageType::Chart => "chart",
            PageType::Report => "report",
            PageType::Dashboard => "dashboard",
            PageType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
