use crate::model::{AIComponent, ScanResult, Severity};
use crate::policy::PolicyResult;

/// Render components sorted by severity (critical first) then name, with
/// risk factors and the policy verdict block.
pub fn render(result: &ScanResult, verdict: Option<&PolicyResult>) -> String {
    let mut output = String::new();

    if result.components.is_empty() {
        output.push_str("\n  No AI components detected.\n\n");
        output.push_str(&render_verdict(verdict));
        return output;
    }

    let mut sorted: Vec<&AIComponent> = result.components.iter().collect();
    sorted.sort_by(|a, b| {
        b.risk
            .severity
            .cmp(&a.risk.severity)
            .then_with(|| b.risk.score.cmp(&a.risk.score))
            .then_with(|| a.name.cmp(&b.name))
    });

    output.push_str(&format!(
        "\n  {} AI component(s) in {} workflow(s):\n\n",
        result.components.len(),
        result.workflows.len()
    ));

    for component in &sorted {
        let severity_tag = match component.risk.severity {
            Severity::Critical => "[CRITICAL]",
            Severity::High => "[HIGH]    ",
            Severity::Medium => "[MEDIUM]  ",
            Severity::Low => "[LOW]     ",
        };

        output.push_str(&format!(
            "  {} {:<3} {} ({}, {})\n",
            severity_tag, component.risk.score, component.name, component.component_type,
            component.provider,
        ));
        if !component.location.context_snippet.is_empty() {
            output.push_str(&format!("           at {}\n", component.location.context_snippet));
        }
        if !component.model_name.is_empty() {
            output.push_str(&format!("           model: {}\n", component.model_name));
        }
        for factor in &component.risk.factors {
            output.push_str(&format!("           risk: {factor}\n"));
        }
        output.push('\n');
    }

    output.push_str(&render_verdict(verdict));
    output
}

/// Counts-only rendering for quick CI logs.
pub fn render_summary(result: &ScanResult, verdict: Option<&PolicyResult>) -> String {
    let mut output = String::new();
    let summary = &result.summary;

    output.push_str(&format!(
        "\n  {} component(s), {} file(s), highest risk {}\n",
        summary.total_components, summary.total_files_scanned, summary.highest_risk_score
    ));
    for severity in ["critical", "high", "medium", "low"] {
        if let Some(count) = summary.by_severity.get(severity) {
            output.push_str(&format!("    {severity}: {count}\n"));
        }
    }
    output.push_str(&render_verdict(verdict));
    output
}

fn render_verdict(verdict: Option<&PolicyResult>) -> String {
    let Some(verdict) = verdict else {
        return String::new();
    };
    let mut output = String::new();
    for violation in &verdict.violations {
        output.push_str(&format!("  violation: {violation}\n"));
    }
    let status = if verdict.passed { "PASS" } else { "FAIL" };
    output.push_str(&format!(
        "  Policy: {} ({} violation(s))\n\n",
        status,
        verdict.violations.len()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AIComponent, ComponentType, ScanResult, SourceLocation, UsageType};

    #[test]
    fn empty_result_renders_placeholder() {
        let result = ScanResult::new(".");
        let text = render(&result, None);
        assert!(text.contains("No AI components detected"));
    }

    #[test]
    fn critical_components_render_first() {
        let mut result = ScanResult::new(".");
        let mut low = AIComponent::new(
            "Low Risk",
            ComponentType::Tool,
            "n8n",
            SourceLocation::default(),
            UsageType::ToolUse,
        );
        low.risk.score = 5;
        let mut critical = AIComponent::new(
            "Critical Agent",
            ComponentType::AgentFramework,
            "n8n",
            SourceLocation::default(),
            UsageType::Agent,
        );
        critical.risk.score = 85;
        critical.risk.severity = crate::model::Severity::Critical;
        result.components = vec![low, critical];
        result.build_summary();

        let text = render(&result, None);
        let critical_pos = text.find("Critical Agent").unwrap();
        let low_pos = text.find("Low Risk").unwrap();
        assert!(critical_pos < low_pos);
    }

    #[test]
    fn verdict_block_lists_violations() {
        let result = ScanResult::new(".");
        let verdict = PolicyResult {
            passed: false,
            violations: vec!["Found 2 critical component(s), policy allows max 0".into()],
        };
        let text = render(&result, Some(&verdict));
        assert!(text.contains("Policy: FAIL"));
        assert!(text.contains("violation: Found 2 critical"));
    }
}
