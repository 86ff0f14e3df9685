//! Component extraction: maps workflow nodes to `AIComponent` records via
//! the taxonomy rule table, and inspects non-AI base nodes for embedded
//! credentials and dangerous script code.

use serde_json::{Map, Value};
use url::Url;

use crate::model::{AIComponent, ComponentType, SourceLocation, UsageType};
use crate::taxonomy::{flags, is_ai_node, map_node_type, patterns};
use crate::workflow::{Workflow, WorkflowInfo, WorkflowNode};

const HTTP_REQUEST_NODE: &str = "n8n-nodes-base.httpRequest";
const CODE_NODE: &str = "n8n-nodes-base.code";

/// Parameter keys checked, in order, for a model identifier.
const MODEL_KEYS: &[&str] = &["model", "modelId", "modelName", "modelVersion"];

/// Extract an `AIComponent` from a single node, or `None` when the node's
/// type matches no taxonomy rule.
pub fn extract_node(
    node: &WorkflowNode,
    file_path: &str,
    info: &WorkflowInfo,
) -> Option<AIComponent> {
    let (component_type, usage_type, provider) = map_node_type(&node.node_type)?;

    let name = if node.name.is_empty() {
        node.node_type.clone()
    } else {
        node.name.clone()
    };

    let mut component = AIComponent::new(
        name,
        component_type,
        provider,
        node_location(file_path, info, &node.name),
        usage_type,
    );
    component.model_name = extract_model_name(&node.parameters);
    insert_workflow_metadata(&mut component, info, &node.node_type);

    if has_hardcoded_credentials(&node.parameters) {
        component.add_flag(flags::HARDCODED_CREDENTIALS);
    }

    if component.component_type == ComponentType::McpClient {
        check_mcp_endpoints(&node.parameters, &mut component);
    }

    Some(component)
}

/// Inspect non-AI base nodes for security risks and emit synthetic
/// components: HTTP-request nodes carrying a provider API key, and code
/// nodes containing dangerous script patterns. At most one synthetic
/// component per offending node; the first matching pattern wins.
pub fn inspect_base_nodes(
    workflow: &Workflow,
    file_path: &str,
    info: &WorkflowInfo,
) -> Vec<AIComponent> {
    let mut found = Vec::new();

    for node in &workflow.nodes {
        if is_ai_node(&node.node_type) {
            continue;
        }

        if node.node_type == HTTP_REQUEST_NODE {
            let blob = Value::Object(node.parameters.clone()).to_string();
            if let Some(provider) = patterns::match_api_key(&blob) {
                let mut component = AIComponent::new(
                    format!("{provider} API Key in HTTP Request"),
                    ComponentType::LlmProvider,
                    provider,
                    node_location(file_path, info, &node.name),
                    UsageType::Unknown,
                );
                insert_workflow_metadata(&mut component, info, &node.node_type);
                component
                    .metadata
                    .insert("node_name".into(), node.name.clone());
                component.add_flag(flags::HARDCODED_CREDENTIALS);
                found.push(component);
            }
        }

        if node.node_type == CODE_NODE {
            let code = ["jsCode", "code"]
                .iter()
                .find_map(|key| node.parameters.get(*key).and_then(Value::as_str))
                .unwrap_or_default();
            if !code.is_empty() && patterns::matches_dangerous_code(code) {
                let mut component = AIComponent::new(
                    format!("Dangerous Code: {}", node.name),
                    ComponentType::Tool,
                    "n8n",
                    node_location(file_path, info, &node.name),
                    UsageType::ToolUse,
                );
                insert_workflow_metadata(&mut component, info, &node.node_type);
                component
                    .metadata
                    .insert("node_name".into(), node.name.clone());
                component.add_flag(flags::CODE_HTTP_TOOLS);
                found.push(component);
            }
        }
    }

    found
}

fn node_location(file_path: &str, info: &WorkflowInfo, node_name: &str) -> SourceLocation {
    SourceLocation::new(
        file_path,
        format!("Workflow: {}, Node: {}", info.workflow_name, node_name),
    )
}

fn insert_workflow_metadata(component: &mut AIComponent, info: &WorkflowInfo, node_type: &str) {
    component
        .metadata
        .insert("workflow_name".into(), info.workflow_name.clone());
    component
        .metadata
        .insert("workflow_id".into(), info.workflow_id.clone());
    component.metadata.insert("node_type".into(), node_type.into());
    component
        .metadata
        .insert("trigger_type".into(), info.trigger.to_string());
}

/// Pull a model identifier from node parameters: fixed key list at the top
/// level, then inside a nested `resource` object; first non-empty string.
fn extract_model_name(parameters: &Map<String, Value>) -> String {
    for key in MODEL_KEYS {
        if let Some(value) = parameters.get(*key).and_then(Value::as_str) {
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }
    if let Some(resource) = parameters.get("resource").and_then(Value::as_object) {
        for key in MODEL_KEYS {
            if let Some(value) = resource.get(*key).and_then(Value::as_str) {
                if !value.is_empty() {
                    return value.to_string();
                }
            }
        }
    }
    String::new()
}

/// A credential parameter key holding a real-looking string, or a provider
/// API-key pattern anywhere in the serialized parameters, means the node
/// embeds a secret instead of referencing the credential store.
fn has_hardcoded_credentials(parameters: &Map<String, Value>) -> bool {
    for key in patterns::CREDENTIAL_PARAMETER_KEYS {
        if let Some(value) = parameters.get(*key).and_then(Value::as_str) {
            if value.len() > 5 && !patterns::is_placeholder(value) {
                return true;
            }
        }
    }
    let blob = Value::Object(parameters.clone()).to_string();
    patterns::match_api_key(&blob).is_some()
}

/// Flag MCP clients whose endpoint resolves to a non-local host. Flagged
/// at most once per component.
fn check_mcp_endpoints(parameters: &Map<String, Value>, component: &mut AIComponent) {
    for key in patterns::URL_PARAMETER_KEYS {
        let Some(value) = parameters.get(*key).and_then(Value::as_str) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if !is_local_endpoint(value) {
            component.add_flag(flags::MCP_UNKNOWN_SERVER);
            break;
        }
    }
}

fn is_local_endpoint(value: &str) -> bool {
    if let Ok(url) = Url::parse(value) {
        if let Some(host) = url.host_str() {
            let host = host.trim_matches(['[', ']']);
            return host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1" || host == "::1";
        }
    }
    // Not parseable as a URL: fall back to substring checks.
    let lower = value.to_lowercase();
    lower.contains("localhost") || value.contains("127.0.0.1") || value.contains("::1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn workflow_from(value: serde_json::Value) -> (Workflow, WorkflowInfo) {
        let workflow = Workflow::parse(&value, "test").unwrap();
        let info = WorkflowInfo::from_workflow(&workflow);
        (workflow, info)
    }

    #[test]
    fn extracts_llm_provider_with_model_name() {
        let (workflow, info) = workflow_from(json!({
            "name": "wf",
            "nodes": [{
                "name": "OpenAI Chat Model",
                "type": "@n8n/n8n-nodes-langchain.lmChatOpenAi",
                "parameters": {"model": "gpt-4o"}
            }],
            "connections": {}
        }));
        let component = extract_node(&workflow.nodes[0], "wf.json", &info).unwrap();
        assert_eq!(component.component_type, ComponentType::LlmProvider);
        assert_eq!(component.provider, "OpenAI");
        assert_eq!(component.model_name, "gpt-4o");
        assert_eq!(component.metadata.get("workflow_name").unwrap(), "wf");
        assert!(component.flags.is_empty());
    }

    #[test]
    fn model_name_found_in_nested_resource() {
        let (workflow, info) = workflow_from(json!({
            "nodes": [{
                "name": "Claude",
                "type": "@n8n/n8n-nodes-langchain.lmChatAnthropic",
                "parameters": {"resource": {"modelId": "claude-2.0"}}
            }],
            "connections": {}
        }));
        let component = extract_node(&workflow.nodes[0], "wf.json", &info).unwrap();
        assert_eq!(component.model_name, "claude-2.0");
    }

    #[test]
    fn non_ai_node_yields_none() {
        let (workflow, info) = workflow_from(json!({
            "nodes": [{"name": "Set", "type": "n8n-nodes-base.set", "parameters": {}}],
            "connections": {}
        }));
        assert!(extract_node(&workflow.nodes[0], "wf.json", &info).is_none());
    }

    #[test]
    fn hardcoded_credential_key_flagged() {
        let (workflow, info) = workflow_from(json!({
            "nodes": [{
                "name": "Agent",
                "type": "@n8n/n8n-nodes-langchain.agent",
                "parameters": {"apiKey": "supersecretvalue"}
            }],
            "connections": {}
        }));
        let component = extract_node(&workflow.nodes[0], "wf.json", &info).unwrap();
        assert!(component.has_flag("hardcoded_credentials"));
    }

    #[test]
    fn placeholder_and_short_values_not_flagged() {
        let (workflow, info) = workflow_from(json!({
            "nodes": [{
                "name": "Agent",
                "type": "@n8n/n8n-nodes-langchain.agent",
                "parameters": {"apiKey": "YOUR_API_KEY", "token": "abc"}
            }],
            "connections": {}
        }));
        let component = extract_node(&workflow.nodes[0], "wf.json", &info).unwrap();
        assert!(!component.has_flag("hardcoded_credentials"));
    }

    #[test]
    fn api_key_pattern_in_blob_flagged() {
        let (workflow, info) = workflow_from(json!({
            "nodes": [{
                "name": "Chat",
                "type": "@n8n/n8n-nodes-langchain.lmChatOpenAi",
                "parameters": {"options": {"header": "Bearer sk-abcdefghijklmnopqrstuv"}}
            }],
            "connections": {}
        }));
        let component = extract_node(&workflow.nodes[0], "wf.json", &info).unwrap();
        assert!(component.has_flag("hardcoded_credentials"));
    }

    #[test]
    fn mcp_client_remote_endpoint_flagged_once() {
        let (workflow, info) = workflow_from(json!({
            "nodes": [{
                "name": "MCP",
                "type": "@n8n/n8n-nodes-langchain.mcpClientTool",
                "parameters": {
                    "sseEndpoint": "https://mcp.example.com/sse",
                    "serverUrl": "https://other.example.com"
                }
            }],
            "connections": {}
        }));
        let component = extract_node(&workflow.nodes[0], "wf.json", &info).unwrap();
        assert_eq!(
            component.flags.iter().filter(|f| *f == "mcp_unknown_server").count(),
            1
        );
    }

    #[test]
    fn mcp_client_local_endpoint_not_flagged() {
        for endpoint in [
            "http://localhost:3001/sse",
            "http://127.0.0.1:8080",
            "http://[::1]:9000/sse",
        ] {
            let (workflow, info) = workflow_from(json!({
                "nodes": [{
                    "name": "MCP",
                    "type": "@n8n/n8n-nodes-langchain.mcpClientTool",
                    "parameters": {"sseEndpoint": endpoint}
                }],
                "connections": {}
            }));
            let component = extract_node(&workflow.nodes[0], "wf.json", &info).unwrap();
            assert!(
                !component.has_flag("mcp_unknown_server"),
                "{endpoint} should be local"
            );
        }
    }

    #[test]
    fn http_request_with_api_key_emits_synthetic_provider() {
        let (workflow, info) = workflow_from(json!({
            "nodes": [{
                "name": "Call OpenAI",
                "type": "n8n-nodes-base.httpRequest",
                "parameters": {"headerAuth": "sk-abcdefghijklmnopqrstuv"}
            }],
            "connections": {}
        }));
        let found = inspect_base_nodes(&workflow, "wf.json", &info);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "OpenAI API Key in HTTP Request");
        assert_eq!(found[0].component_type, ComponentType::LlmProvider);
        assert_eq!(found[0].usage_type, UsageType::Unknown);
        assert!(found[0].has_flag("hardcoded_credentials"));
    }

    #[test]
    fn code_node_with_dangerous_pattern_emits_synthetic_tool() {
        let (workflow, info) = workflow_from(json!({
            "nodes": [{
                "name": "Run Script",
                "type": "n8n-nodes-base.code",
                "parameters": {"jsCode": "const {execSync} = require('child_process'); execSync(cmd);"}
            }],
            "connections": {}
        }));
        let found = inspect_base_nodes(&workflow, "wf.json", &info);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Dangerous Code: Run Script");
        assert_eq!(found[0].component_type, ComponentType::Tool);
        assert!(found[0].has_flag("code_http_tools"));
    }

    #[test]
    fn one_synthetic_component_per_node() {
        // Multiple dangerous patterns in one node still produce one finding.
        let (workflow, info) = workflow_from(json!({
            "nodes": [{
                "name": "Script",
                "type": "n8n-nodes-base.code",
                "parameters": {"code": "eval(x); spawn('sh'); require(\"fs\")"}
            }],
            "connections": {}
        }));
        let found = inspect_base_nodes(&workflow, "wf.json", &info);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn clean_base_nodes_emit_nothing() {
        let (workflow, info) = workflow_from(json!({
            "nodes": [
                {"name": "HTTP", "type": "n8n-nodes-base.httpRequest",
                 "parameters": {"url": "https://api.example.com"}},
                {"name": "Code", "type": "n8n-nodes-base.code",
                 "parameters": {"jsCode": "return items;"}}
            ],
            "connections": {}
        }));
        assert!(inspect_base_nodes(&workflow, "wf.json", &info).is_empty());
    }
}
