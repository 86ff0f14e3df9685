//! Declarative policy gate over a finished scan result.
//!
//! Pure evaluation: thresholds and blocklists in, an ordered violation list
//! out. Unset policy fields are simply not checked; an empty policy always
//! passes.

use serde::{Deserialize, Serialize};

use crate::model::ScanResult;

/// Policy definition for scan enforcement, typically loaded from the
/// `[policy]` section of `.flowshield.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Policy {
    /// Maximum allowed critical-severity components.
    #[serde(default)]
    pub max_critical: Option<usize>,
    /// Maximum allowed high-severity components.
    #[serde(default)]
    pub max_high: Option<usize>,
    /// Maximum allowed risk score for any single component.
    #[serde(default)]
    pub max_risk_score: Option<u32>,
    /// Providers that are not allowed (case-insensitive match).
    #[serde(default)]
    pub block_providers: Vec<String>,
    /// Risk flags that cause failure.
    #[serde(default)]
    pub block_flags: Vec<String>,
}

/// Outcome of a policy evaluation. `passed` is true iff `violations` is
/// empty — the two are never set independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResult {
    pub passed: bool,
    pub violations: Vec<String>,
}

impl PolicyResult {
    fn from_violations(violations: Vec<String>) -> Self {
        Self {
            passed: violations.is_empty(),
            violations,
        }
    }
}

/// Evaluate a scan result against a policy. Check order: critical count,
/// high count, per-component max score, blocked providers, blocked flags.
pub fn evaluate(result: &ScanResult, policy: &Policy) -> PolicyResult {
    let mut violations = Vec::new();

    let severity_count =
        |name: &str| result.summary.by_severity.get(name).copied().unwrap_or(0);

    if let Some(max_critical) = policy.max_critical {
        let critical = severity_count("critical");
        if critical > max_critical {
            violations.push(format!(
                "Found {critical} critical component(s), policy allows max {max_critical}"
            ));
        }
    }

    if let Some(max_high) = policy.max_high {
        let high = severity_count("high");
        if high > max_high {
            violations.push(format!(
                "Found {high} high-severity component(s), policy allows max {max_high}"
            ));
        }
    }

    if let Some(max_score) = policy.max_risk_score {
        for component in &result.components {
            if component.risk.score > max_score {
                violations.push(format!(
                    "Component '{}' has risk score {}, policy max is {}",
                    component.name, component.risk.score, max_score
                ));
            }
        }
    }

    if !policy.block_providers.is_empty() {
        let blocked: Vec<String> = policy
            .block_providers
            .iter()
            .map(|p| p.to_lowercase())
            .collect();
        for component in &result.components {
            if blocked.contains(&component.provider.to_lowercase()) {
                violations.push(format!(
                    "Blocked provider '{}' found in component '{}'",
                    component.provider, component.name
                ));
            }
        }
    }

    if !policy.block_flags.is_empty() {
        for component in &result.components {
            for flag in &component.flags {
                if policy.block_flags.iter().any(|blocked| blocked == flag) {
                    violations.push(format!(
                        "Blocked flag '{flag}' found in component '{}'",
                        component.name
                    ));
                }
            }
        }
    }

    PolicyResult::from_violations(violations)
}
