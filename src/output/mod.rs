pub mod console;
pub mod json;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::ScanResult;
use crate::policy::PolicyResult;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Summary,
}

impl OutputFormat {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Some(Self::Console),
            "json" => Some(Self::Json),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }
}

/// Render a scan result (and optional policy verdict) in the given format.
pub fn render(
    result: &ScanResult,
    verdict: Option<&PolicyResult>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(console::render(result, verdict)),
        OutputFormat::Json => json::render(result, verdict),
        OutputFormat::Summary => Ok(console::render_summary(result, verdict)),
    }
}
