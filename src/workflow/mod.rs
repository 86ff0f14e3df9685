//! Workflow graph model: validates raw node/connection JSON and derives the
//! normalized connection graph, trigger category, and in-workflow agent
//! chains that every later pass consumes.
//!
//! Node names double as graph vertex ids. Uniqueness within a workflow is a
//! documented precondition of the input schema; dangling references are
//! tolerated but never dereferenced.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::taxonomy::is_agent_node;

/// One node of a workflow, deserialized leniently: missing fields become
/// empty strings / empty maps rather than rejecting the workflow.
#[derive(Debug, Clone)]
pub struct WorkflowNode {
    pub name: String,
    pub node_type: String,
    pub parameters: Map<String, Value>,
    pub credentials: Map<String, Value>,
}

impl WorkflowNode {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let str_field = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let map_field = |key: &str| {
            obj.get(key)
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default()
        };
        Some(Self {
            name: str_field("name"),
            node_type: str_field("type"),
            parameters: map_field("parameters"),
            credentials: map_field("credentials"),
        })
    }
}

/// A validated workflow: node list plus the raw connections object.
#[derive(Debug, Clone)]
pub struct Workflow {
    pub name: String,
    pub id: String,
    pub nodes: Vec<WorkflowNode>,
    pub connections: Value,
}

impl Workflow {
    /// Parse a raw JSON value. A value is a valid workflow iff it is an
    /// object with a `nodes` array and a `connections` object; anything
    /// else is rejected wholesale.
    pub fn parse(value: &Value, fallback_name: &str) -> Option<Self> {
        let obj = value.as_object()?;
        let nodes = obj.get("nodes")?.as_array()?;
        let connections = obj.get("connections")?;
        connections.as_object()?;

        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(fallback_name)
            .to_string();
        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(Self {
            name,
            id,
            nodes: nodes.iter().filter_map(WorkflowNode::from_value).collect(),
            connections: connections.clone(),
        })
    }

    pub fn node_by_name(&self, name: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

/// Normalized adjacency: source node name -> ordered, deduplicated target
/// node names. Direction is data flow, source to target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionGraph {
    edges: BTreeMap<String, Vec<String>>,
}

impl ConnectionGraph {
    /// Flatten the nested per-node, per-output-slot, per-group connection
    /// structure. Any malformed sub-shape contributes no edges; this never
    /// fails.
    pub fn build(connections: &Value) -> Self {
        let mut edges = BTreeMap::new();
        let Some(sources) = connections.as_object() else {
            return Self { edges };
        };

        for (source, slots) in sources {
            let mut targets: Vec<String> = Vec::new();
            if let Some(slots) = slots.as_object() {
                for groups in slots.values() {
                    let Some(groups) = groups.as_array() else {
                        continue;
                    };
                    for group in groups {
                        let Some(group) = group.as_array() else {
                            continue;
                        };
                        for conn in group {
                            let target = conn
                                .as_object()
                                .and_then(|c| c.get("node"))
                                .and_then(Value::as_str);
                            if let Some(target) = target {
                                if !target.is_empty() && !targets.iter().any(|t| t == target) {
                                    targets.push(target.to_string());
                                }
                            }
                        }
                    }
                }
            }
            edges.insert(source.clone(), targets);
        }

        Self { edges }
    }

    /// Direct targets of a node; empty when the node has no outgoing edges.
    pub fn targets(&self, name: &str) -> &[String] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reverse lookup over all edges: nodes with a direct edge into `name`.
    pub fn sources_of(&self, name: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, targets)| targets.iter().any(|t| t == name))
            .map(|(source, _)| source.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.edges.iter()
    }
}

/// How a workflow starts execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Webhook,
    Schedule,
    Manual,
    Unknown,
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Webhook => write!(f, "webhook"),
            Self::Schedule => write!(f, "schedule"),
            Self::Manual => write!(f, "manual"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Derived per-workflow metadata consumed by the analysis passes and kept
/// in the scan result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInfo {
    pub workflow_name: String,
    pub workflow_id: String,
    pub node_types: Vec<String>,
    pub connections: ConnectionGraph,
    pub trigger: TriggerKind,
    pub agent_chains: Vec<Vec<String>>,
}

impl WorkflowInfo {
    pub fn from_workflow(workflow: &Workflow) -> Self {
        let connections = ConnectionGraph::build(&workflow.connections);
        let trigger = detect_trigger(&workflow.nodes);
        let agent_chains = extract_agent_chains(&workflow.nodes, &connections);
        Self {
            workflow_name: workflow.name.clone(),
            workflow_id: workflow.id.clone(),
            node_types: workflow.nodes.iter().map(|n| n.node_type.clone()).collect(),
            connections,
            trigger,
            agent_chains,
        }
    }
}

/// Classify the workflow trigger from node type strings, first matching
/// node wins; within a node: webhook, then schedule/cron, then manual.
pub fn detect_trigger(nodes: &[WorkflowNode]) -> TriggerKind {
    for node in nodes {
        let lower = node.node_type.to_lowercase();
        if lower.contains("webhook") {
            return TriggerKind::Webhook;
        }
        if lower.contains("schedule") || lower.contains("cron") {
            return TriggerKind::Schedule;
        }
        if lower.contains("trigger") && lower.contains("manual") {
            return TriggerKind::Manual;
        }
    }
    TriggerKind::Unknown
}

/// Extract chains of >= 2 connected agent nodes. From each agent vertex,
/// greedily follow the first outgoing edge that lands on another agent;
/// stop when none exists or the next vertex is already in the chain.
pub fn extract_agent_chains(
    nodes: &[WorkflowNode],
    connections: &ConnectionGraph,
) -> Vec<Vec<String>> {
    let agent_names: Vec<&str> = nodes
        .iter()
        .filter(|n| is_agent_node(&n.node_type))
        .map(|n| n.name.as_str())
        .collect();

    let mut chains = Vec::new();
    for &start in &agent_names {
        let mut chain = vec![start.to_string()];
        let mut current = start.to_string();

        loop {
            let next = connections
                .targets(&current)
                .iter()
                .find(|t| agent_names.contains(&t.as_str()))
                .cloned();
            match next {
                Some(next) if !chain.contains(&next) => {
                    chain.push(next.clone());
                    current = next;
                }
                _ => break,
            }
        }

        if chain.len() > 1 {
            chains.push(chain);
        }
    }
    chains
}
