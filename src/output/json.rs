use serde::Serialize;

use crate::error::Result;
use crate::model::ScanResult;
use crate::policy::PolicyResult;

#[derive(Serialize)]
struct JsonReport<'a> {
    result: &'a ScanResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    policy: Option<&'a PolicyResult>,
}

/// Machine-readable report: the full scan result plus the optional policy
/// verdict, with stable field names.
pub fn render(result: &ScanResult, verdict: Option<&PolicyResult>) -> Result<String> {
    let report = JsonReport {
        result,
        policy: verdict,
    };
    let mut rendered = serde_json::to_string_pretty(&report)?;
    rendered.push('\n');
    Ok(rendered)
}
