//! FlowShield — risk scanner for AI agents and MCP usage in
//! workflow-automation graphs.
//!
//! Offline-first: parses exported workflow JSON (or pre-fetched workflow
//! values), inventories the AI/LLM components inside, derives risk flags
//! from graph topology, scores each component deterministically, and gates
//! the result against a declarative policy.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use flowshield::{evaluate_policy, scan_path, Policy};
//!
//! let result = scan_path(Path::new("./workflows")).unwrap();
//! let verdict = evaluate_policy(&result, &Policy::default());
//! println!("Pass: {}, Components: {}", verdict.passed, result.components.len());
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod output;
pub mod policy;
pub mod risk;
pub mod taxonomy;
pub mod workflow;

use std::path::Path;
use std::time::Instant;

use tracing::debug;
use walkdir::WalkDir;

use error::{Result, ShieldError};
use model::ScanResult;
pub use output::OutputFormat;
pub use policy::{Policy, PolicyResult};
use workflow::{Workflow, WorkflowInfo};

/// Scan a workflow export file or a directory of `*.json` exports.
///
/// Structurally invalid or unreadable files are skipped, never fatal: a
/// batch scan completes for all well-formed inputs regardless of malformed
/// siblings.
pub fn scan_path(path: &Path) -> Result<ScanResult> {
    if !path.exists() {
        return Err(ShieldError::TargetNotFound(path.display().to_string()));
    }

    let started = Instant::now();
    let mut result = ScanResult::new(path.display().to_string());

    for file in collect_workflow_files(path) {
        let text = match std::fs::read_to_string(&file) {
            Ok(text) => text,
            Err(err) => {
                debug!(file = %file.display(), %err, "skipping unreadable file");
                continue;
            }
        };
        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                debug!(file = %file.display(), %err, "skipping non-JSON file");
                continue;
            }
        };
        let fallback = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        scan_workflow_value(&value, &fallback, &file.display().to_string(), &mut result);
    }

    finish_scan(result, started)
}

/// Scan pre-fetched workflow JSON values, e.g. from a live automation
/// platform API. Each value gets a synthetic `n8n://workflows/...` location.
pub fn scan_values(values: &[serde_json::Value], target: &str) -> Result<ScanResult> {
    let started = Instant::now();
    let mut result = ScanResult::new(target);

    for value in values {
        let Some(workflow) = Workflow::parse(value, "unknown") else {
            debug!("skipping invalid workflow value");
            continue;
        };
        let location = format!("n8n://workflows/{}/{}.json", workflow.id, workflow.name);
        scan_parsed_workflow(&workflow, &location, &mut result);
    }

    finish_scan(result, started)
}

/// Evaluate a finished scan result against a policy.
pub fn evaluate_policy(result: &ScanResult, policy: &Policy) -> PolicyResult {
    policy::evaluate(result, policy)
}

/// Render a scan report in the specified format.
pub fn render_report(
    result: &ScanResult,
    verdict: Option<&PolicyResult>,
    format: OutputFormat,
) -> Result<String> {
    output::render(result, verdict, format)
}

fn collect_workflow_files(path: &Path) -> Vec<std::path::PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.to_string_lossy().to_lowercase() == "json")
                .unwrap_or(false)
        })
        .collect()
}

fn scan_workflow_value(
    value: &serde_json::Value,
    fallback_name: &str,
    file_path: &str,
    result: &mut ScanResult,
) {
    let Some(workflow) = Workflow::parse(value, fallback_name) else {
        debug!(file = file_path, "skipping structurally invalid workflow");
        return;
    };
    scan_parsed_workflow(&workflow, file_path, result);
}

/// Per-workflow pipeline stage: extract components, inspect base nodes,
/// apply intra-workflow risk patterns. The cross-workflow pass and scoring
/// happen later, in `finish_scan`.
fn scan_parsed_workflow(workflow: &Workflow, file_path: &str, result: &mut ScanResult) {
    let info = WorkflowInfo::from_workflow(workflow);

    let mut components: Vec<model::AIComponent> = workflow
        .nodes
        .iter()
        .filter_map(|node| extract::extract_node(node, file_path, &info))
        .collect();
    components.extend(extract::inspect_base_nodes(workflow, file_path, &info));

    analysis::apply_workflow_risks(workflow, &info, &mut components);

    result.components.extend(components);
    result.workflows.push(info);
}

/// Barrier: the cross-workflow pass needs every workflow's components and
/// info; scoring must follow all flag mutation.
fn finish_scan(mut result: ScanResult, started: Instant) -> Result<ScanResult> {
    analysis::detect_cross_workflow_chains(&result.workflows, &mut result.components);
    risk::score_all(&mut result.components);
    result.summary.scan_duration_seconds = started.elapsed().as_secs_f64();
    result.build_summary();
    Ok(result)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;

    fn agent(name: &str) -> serde_json::Value {
        json!({"name": name, "type": "@n8n/n8n-nodes-langchain.agent", "parameters": {}})
    }

    #[test]
    fn agent_with_code_and_http_tools_scenario() {
        let wf = json!({
            "name": "tooling",
            "nodes": [
                agent("Agent"),
                {"name": "Code", "type": "@n8n/n8n-nodes-langchain.toolCode", "parameters": {}},
                {"name": "HTTP", "type": "@n8n/n8n-nodes-langchain.toolHttpRequest", "parameters": {}}
            ],
            "connections": {
                "Agent": {"ai_tool": [[{"node": "Code"}, {"node": "HTTP"}]]}
            }
        });
        let result = scan_values(&[wf], "api").unwrap();
        let agent = result
            .components
            .iter()
            .find(|c| c.component_type == model::ComponentType::AgentFramework)
            .unwrap();
        assert!(agent.has_flag("code_http_tools"));
        assert_eq!(agent.risk.score, 30);
        assert_eq!(agent.risk.severity, model::Severity::Medium);
    }

    #[test]
    fn unauthenticated_webhook_scenario() {
        let wf = json!({
            "name": "hooked",
            "nodes": [
                {"name": "Webhook", "type": "n8n-nodes-base.webhook", "parameters": {}},
                agent("Agent A"),
                agent("Agent B")
            ],
            "connections": {"Webhook": {"main": [[{"node": "Agent A"}]]}}
        });
        let result = scan_values(&[wf], "api").unwrap();
        let agents: Vec<_> = result
            .components
            .iter()
            .filter(|c| c.component_type == model::ComponentType::AgentFramework)
            .collect();
        assert_eq!(agents.len(), 2);
        for agent in agents {
            assert!(agent.has_flag("webhook_no_auth"));
        }
    }

    #[test]
    fn chained_sub_workflow_agents_do_not_get_trust_flag() {
        // Two workflows, one agent each, wired through an execute-workflow
        // node in both directions. Chain validation fires; the multi-agent
        // trust flag must not.
        let make = |suffix: &str| {
            json!({
                "name": format!("wf-{suffix}"),
                "nodes": [
                    agent(&format!("Agent {suffix}")),
                    {"name": "Execute", "type": "n8n-nodes-base.executeWorkflow", "parameters": {}}
                ],
                "connections": {
                    (format!("Agent {suffix}")): {"main": [[{"node": "Execute"}]]},
                    "Execute": {"main": [[{"node": format!("Agent {suffix}")}]]}
                }
            })
        };
        let result = scan_values(&[make("one"), make("two")], "api").unwrap();
        let agents: Vec<_> = result
            .components
            .iter()
            .filter(|c| c.component_type == model::ComponentType::AgentFramework)
            .collect();
        assert_eq!(agents.len(), 2);
        for agent in agents {
            assert!(agent.has_flag("agent_chain_no_validation"));
            assert!(!agent.has_flag("multi_agent_no_trust"));
        }
    }

    #[test]
    fn deprecated_model_scores_without_flag() {
        let wf = json!({
            "name": "legacy",
            "nodes": [{
                "name": "Chat",
                "type": "@n8n/n8n-nodes-langchain.lmChatOpenAi",
                "parameters": {"model": "gpt-3.5-turbo"}
            }],
            "connections": {}
        });
        let result = scan_values(&[wf], "api").unwrap();
        let chat = &result.components[0];
        assert!(chat.flags.is_empty());
        assert_eq!(chat.risk.score, 10);
        assert!(chat.risk.factors[0].contains("gpt-3.5-turbo"));
    }

    #[test]
    fn invalid_values_are_skipped_not_fatal() {
        let values = vec![
            json!(null),
            json!({"connections": {}}),
            json!({"nodes": []}),
            json!({"nodes": [], "connections": {}}),
        ];
        let result = scan_values(&values, "api").unwrap();
        assert_eq!(result.workflows.len(), 1);
        assert!(result.components.is_empty());
    }

    #[test]
    fn policy_gate_end_to_end() {
        let wf = json!({
            "name": "risky",
            "nodes": [
                {"name": "Webhook", "type": "n8n-nodes-base.webhook", "parameters": {}},
                {"name": "Agent", "type": "@n8n/n8n-nodes-langchain.agent",
                 "parameters": {"apiKey": "sk-abcdefghijklmnopqrstuv"}},
                {"name": "Code", "type": "@n8n/n8n-nodes-langchain.toolCode", "parameters": {}},
                {"name": "HTTP", "type": "@n8n/n8n-nodes-langchain.toolHttpRequest", "parameters": {}}
            ],
            "connections": {
                "Webhook": {"main": [[{"node": "Agent"}]]},
                "Agent": {"ai_tool": [[{"node": "Code"}, {"node": "HTTP"}]]}
            }
        });
        let result = scan_values(&[wf], "api").unwrap();
        let agent = result
            .components
            .iter()
            .find(|c| c.name == "Agent")
            .unwrap();
        // hardcoded_credentials 30 + webhook_no_auth 25 + code_http_tools 30
        assert_eq!(agent.risk.score, 85);
        assert_eq!(agent.risk.severity, model::Severity::Critical);

        let verdict = evaluate_policy(
            &result,
            &Policy {
                max_critical: Some(0),
                ..Default::default()
            },
        );
        assert!(!verdict.passed);
        assert!(verdict.violations[0].contains("1 critical"));
    }

    #[test]
    fn scan_directory_skips_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("good.json"),
            serde_json::to_string(&json!({
                "name": "good",
                "nodes": [agent("Agent")],
                "connections": {}
            }))
            .unwrap(),
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let result = scan_path(dir.path()).unwrap();
        assert_eq!(result.workflows.len(), 1);
        assert_eq!(result.components.len(), 1);
        assert_eq!(result.summary.total_components, 1);
    }

    #[test]
    fn scan_missing_path_errors() {
        assert!(scan_path(Path::new("/definitely/not/here")).is_err());
    }

    #[test]
    fn workflow_name_falls_back_to_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("support-bot.json"),
            serde_json::to_string(&json!({"nodes": [agent("A")], "connections": {}})).unwrap(),
        )
        .unwrap();
        let result = scan_path(dir.path()).unwrap();
        assert_eq!(result.workflows[0].workflow_name, "support-bot");
    }
}
