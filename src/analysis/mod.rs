//! Risk pattern analysis over the workflow graph.
//!
//! Runs after extraction is complete for a workflow: the checks need the
//! full component set and the full connection graph. The cross-workflow
//! pass is a barrier — it runs once, after every workflow in the batch has
//! produced its components and `WorkflowInfo`.

use serde_json::Value;

use crate::model::{AIComponent, ComponentType};
use crate::taxonomy::{flags, is_agent_node};
use crate::workflow::{Workflow, WorkflowInfo, WorkflowNode};

/// Node types that count as a code-execution tool when wired to an agent.
fn is_code_tool(node_type: &str) -> bool {
    node_type.contains(".toolCode") || node_type == "n8n-nodes-base.code"
}

/// Node types that count as an HTTP tool when wired to an agent.
fn is_http_tool(node_type: &str) -> bool {
    node_type.contains(".toolHttpRequest") || node_type == "n8n-nodes-base.httpRequest"
}

/// Apply intra-workflow risk patterns, mutating component flags in place.
pub fn apply_workflow_risks(
    workflow: &Workflow,
    info: &WorkflowInfo,
    components: &mut [AIComponent],
) {
    if has_insecure_webhook(&workflow.nodes) {
        for component in components.iter_mut() {
            if component.component_type == ComponentType::AgentFramework {
                component.add_flag(flags::WEBHOOK_NO_AUTH);
            }
        }
    }

    check_agent_tool_risks(workflow, info, components);
    check_agent_chain_risks(workflow, info, components);
}

/// A webhook trigger with `authentication` absent, null, or "none" lets
/// anyone on the network drive the workflow.
fn has_insecure_webhook(nodes: &[WorkflowNode]) -> bool {
    nodes.iter().any(|node| {
        node.node_type.to_lowercase().contains("webhook") && {
            match node.parameters.get("authentication") {
                None | Some(Value::Null) => true,
                Some(Value::String(auth)) => auth == "none",
                Some(_) => false,
            }
        }
    })
}

/// An agent directly wired to both a code-execution tool and an HTTP tool
/// can fetch attacker-controlled content and execute what it produces.
fn check_agent_tool_risks(
    workflow: &Workflow,
    info: &WorkflowInfo,
    components: &mut [AIComponent],
) {
    for node in &workflow.nodes {
        if !is_agent_node(&node.node_type) {
            continue;
        }

        let mut has_code = false;
        let mut has_http = false;
        for target in info.connections.targets(&node.name) {
            let Some(connected) = workflow.node_by_name(target) else {
                continue;
            };
            has_code |= is_code_tool(&connected.node_type);
            has_http |= is_http_tool(&connected.node_type);
        }

        if has_code && has_http {
            for component in components.iter_mut() {
                if component.component_type == ComponentType::AgentFramework
                    && component.name == node.name
                {
                    component.add_flag(flags::CODE_HTTP_TOOLS);
                }
            }
        }
    }
}

/// A sub-workflow execution node with an agent as direct predecessor AND
/// direct successor chains agent output into agent input with no
/// validation step in between.
fn check_agent_chain_risks(
    workflow: &Workflow,
    info: &WorkflowInfo,
    components: &mut [AIComponent],
) {
    for node in &workflow.nodes {
        if !node.node_type.contains("executeWorkflow") {
            continue;
        }

        let has_agent_input = info
            .connections
            .sources_of(&node.name)
            .iter()
            .filter_map(|source| workflow.node_by_name(source))
            .any(|source| is_agent_node(&source.node_type));

        let has_agent_output = info
            .connections
            .targets(&node.name)
            .iter()
            .filter_map(|target| workflow.node_by_name(target))
            .any(|target| is_agent_node(&target.node_type));

        if has_agent_input && has_agent_output {
            for component in components.iter_mut() {
                if component.component_type == ComponentType::AgentFramework {
                    component.add_flag(flags::AGENT_CHAIN_NO_VALIDATION);
                }
            }
        }
    }
}

/// Cross-workflow barrier pass over the whole batch: a workflow holding
/// more than one agent component plus at least one recorded agent chain is
/// a multi-agent system; its agents get `multi_agent_no_trust` unless they
/// already carry the stronger `agent_chain_no_validation` flag.
pub fn detect_cross_workflow_chains(
    workflows: &[WorkflowInfo],
    components: &mut [AIComponent],
) {
    for info in workflows {
        let agent_count = components
            .iter()
            .filter(|c| {
                c.component_type == ComponentType::AgentFramework
                    && component_workflow(c) == info.workflow_name
            })
            .count();

        if agent_count > 1 && !info.agent_chains.is_empty() {
            for component in components.iter_mut() {
                if component.component_type == ComponentType::AgentFramework
                    && component_workflow(component) == info.workflow_name
                    && !component.has_flag(flags::AGENT_CHAIN_NO_VALIDATION)
                {
                    component.add_flag(flags::MULTI_AGENT_NO_TRUST);
                }
            }
        }
    }
}

fn component_workflow(component: &AIComponent) -> &str {
    component
        .metadata
        .get("workflow_name")
        .map(String::as_str)
        .unwrap_or_default()
}
