//! Shared data model for scan results.
//!
//! The extractor creates `AIComponent`s, the analysis passes mutate their
//! `flags`, the scorer writes `risk` exactly once, and everything ends up in
//! a `ScanResult` whose `summary` is always recomputable from `components`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::WorkflowInfo;

/// Type of AI component detected in a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    LlmProvider,
    AgentFramework,
    Model,
    Endpoint,
    Container,
    Tool,
    McpServer,
    McpClient,
    Workflow,
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LlmProvider => write!(f, "llm_provider"),
            Self::AgentFramework => write!(f, "agent_framework"),
            Self::Model => write!(f, "model"),
            Self::Endpoint => write!(f, "endpoint"),
            Self::Container => write!(f, "container"),
            Self::Tool => write!(f, "tool"),
            Self::McpServer => write!(f, "mcp_server"),
            Self::McpClient => write!(f, "mcp_client"),
            Self::Workflow => write!(f, "workflow"),
        }
    }
}

/// How the component is used within the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageType {
    Completion,
    Embedding,
    ImageGen,
    Speech,
    Agent,
    ToolUse,
    Orchestration,
    Unknown,
}

impl std::fmt::Display for UsageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completion => write!(f, "completion"),
            Self::Embedding => write!(f, "embedding"),
            Self::ImageGen => write!(f, "image_gen"),
            Self::Speech => write!(f, "speech"),
            Self::Agent => write!(f, "agent"),
            Self::ToolUse => write!(f, "tool_use"),
            Self::Orchestration => write!(f, "orchestration"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Band a risk score into a severity. Thresholds are fixed:
    /// critical >= 76, high >= 51, medium >= 26, else low.
    pub fn from_score(score: u32) -> Self {
        match score {
            76.. => Self::Critical,
            51..=75 => Self::High,
            26..=50 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Where a component was detected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file_path: String,
    pub line_number: Option<u32>,
    #[serde(default)]
    pub context_snippet: String,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, context_snippet: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line_number: None,
            context_snippet: context_snippet.into(),
        }
    }
}

/// Risk assessment written by the scorer after all flag mutation is done.
///
/// `severity` is always the band of `score`; `score` is clamped to 0..=100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u32,
    pub severity: Severity,
    pub factors: Vec<String>,
    pub owasp_categories: Vec<String>,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            score: 0,
            severity: Severity::Low,
            factors: Vec::new(),
            owasp_categories: Vec::new(),
        }
    }
}

/// A detected AI/LLM-related element inside a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIComponent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub model_name: String,
    pub location: SourceLocation,
    pub usage_type: UsageType,
    #[serde(default)]
    pub risk: RiskAssessment,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub source: String,
}

impl AIComponent {
    pub fn new(
        name: impl Into<String>,
        component_type: ComponentType,
        provider: impl Into<String>,
        location: SourceLocation,
        usage_type: UsageType,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            component_type,
            version: String::new(),
            provider: provider.into(),
            model_name: String::new(),
            location,
            usage_type,
            risk: RiskAssessment::default(),
            metadata: BTreeMap::new(),
            flags: Vec::new(),
            source: "n8n".into(),
        }
    }

    /// Append a risk flag unless it is already present.
    pub fn add_flag(&mut self, flag: &str) {
        if !self.has_flag(flag) {
            self.flags.push(flag.to_string());
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// Summary statistics, derived from `components` by `ScanResult::build_summary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_components: usize,
    pub total_files_scanned: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_provider: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<String, usize>,
    pub highest_risk_score: u32,
    pub scan_duration_seconds: f64,
}

/// Complete scan result. Immutable once returned by the scan pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub target_path: String,
    pub scan_timestamp: String,
    pub tool_version: String,
    pub components: Vec<AIComponent>,
    pub workflows: Vec<WorkflowInfo>,
    pub summary: ScanSummary,
}

impl ScanResult {
    pub fn new(target_path: impl Into<String>) -> Self {
        Self {
            target_path: target_path.into(),
            scan_timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            components: Vec::new(),
            workflows: Vec::new(),
            summary: ScanSummary::default(),
        }
    }

    /// Recompute `summary` from `components`. The summary is a derived
    /// cache; callers may always rebuild it by iterating `components`.
    pub fn build_summary(&mut self) {
        let mut summary = ScanSummary {
            scan_duration_seconds: self.summary.scan_duration_seconds,
            ..Default::default()
        };
        summary.total_components = self.components.len();

        let mut files = std::collections::BTreeSet::new();
        for component in &self.components {
            *summary
                .by_type
                .entry(component.component_type.to_string())
                .or_insert(0) += 1;
            if !component.provider.is_empty() {
                *summary
                    .by_provider
                    .entry(component.provider.clone())
                    .or_insert(0) += 1;
            }
            *summary
                .by_severity
                .entry(component.risk.severity.to_string())
                .or_insert(0) += 1;
            if !component.location.file_path.is_empty() {
                files.insert(component.location.file_path.clone());
            }
            summary.highest_risk_score = summary.highest_risk_score.max(component.risk.score);
        }
        summary.total_files_scanned = files.len();
        self.summary = summary;
    }
}
