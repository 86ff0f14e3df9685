//! Risk flag registry: the closed flag vocabulary with weights, descriptions,
//! remediations, and OWASP LLM Top 10 category tags.

pub const HARDCODED_API_KEY: &str = "hardcoded_api_key";
pub const HARDCODED_CREDENTIALS: &str = "hardcoded_credentials";
pub const CODE_HTTP_TOOLS: &str = "code_http_tools";
pub const SHADOW_AI: &str = "shadow_ai";
pub const WEBHOOK_NO_AUTH: &str = "webhook_no_auth";
pub const INTERNET_FACING: &str = "internet_facing";
pub const MULTI_AGENT_NO_TRUST: &str = "multi_agent_no_trust";
pub const AGENT_CHAIN_NO_VALIDATION: &str = "agent_chain_no_validation";
pub const MCP_UNKNOWN_SERVER: &str = "mcp_unknown_server";
pub const NO_AUTH: &str = "no_auth";
pub const NO_RATE_LIMIT: &str = "no_rate_limit";
pub const DEPRECATED_MODEL: &str = "deprecated_model";
pub const NO_ERROR_HANDLING: &str = "no_error_handling";
pub const UNPINNED_MODEL: &str = "unpinned_model";

use serde::Serialize;

/// Everything known about one risk flag.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FlagInfo {
    pub flag: &'static str,
    pub weight: u32,
    pub description: &'static str,
    pub remediation: &'static str,
    pub owasp_categories: &'static [&'static str],
}

/// The flag registry. Weights are on a 0-100 scale and sum per component
/// before clamping; unknown flags are not in this table and score zero.
pub static FLAG_REGISTRY: &[FlagInfo] = &[
    FlagInfo {
        flag: HARDCODED_API_KEY,
        weight: 30,
        description: "Hardcoded API key",
        remediation: "Move the key into a credential store and reference it from the node",
        owasp_categories: &["LLM06: Sensitive Information Disclosure"],
    },
    FlagInfo {
        flag: HARDCODED_CREDENTIALS,
        weight: 30,
        description: "Hardcoded credentials in node parameters",
        remediation: "Use the platform credential manager instead of inline secrets",
        owasp_categories: &["LLM06: Sensitive Information Disclosure"],
    },
    FlagInfo {
        flag: CODE_HTTP_TOOLS,
        weight: 30,
        description: "Agent can execute arbitrary code or HTTP requests",
        remediation: "Split code and HTTP capabilities across separate, constrained agents",
        owasp_categories: &["LLM08: Excessive Agency"],
    },
    FlagInfo {
        flag: SHADOW_AI,
        weight: 25,
        description: "Unauthorized AI usage",
        remediation: "Register the component with your AI governance inventory",
        owasp_categories: &["LLM05: Supply Chain Vulnerabilities"],
    },
    FlagInfo {
        flag: WEBHOOK_NO_AUTH,
        weight: 25,
        description: "Webhook trigger without authentication",
        remediation: "Enable header or basic authentication on the webhook trigger",
        owasp_categories: &["LLM01: Prompt Injection"],
    },
    FlagInfo {
        flag: INTERNET_FACING,
        weight: 20,
        description: "Component exposed to the internet",
        remediation: "Restrict network exposure to trusted origins",
        owasp_categories: &["LLM04: Model Denial of Service"],
    },
    FlagInfo {
        flag: MULTI_AGENT_NO_TRUST,
        weight: 20,
        description: "Multiple agents without trust boundaries",
        remediation: "Insert validation steps between cooperating agents",
        owasp_categories: &["LLM08: Excessive Agency"],
    },
    FlagInfo {
        flag: AGENT_CHAIN_NO_VALIDATION,
        weight: 20,
        description: "Agent chain without input validation",
        remediation: "Validate sub-workflow inputs and outputs between agents",
        owasp_categories: &["LLM02: Insecure Output Handling"],
    },
    FlagInfo {
        flag: MCP_UNKNOWN_SERVER,
        weight: 20,
        description: "MCP server from untrusted source",
        remediation: "Pin MCP endpoints to vetted, locally controlled servers",
        owasp_categories: &["LLM05: Supply Chain Vulnerabilities"],
    },
    FlagInfo {
        flag: NO_AUTH,
        weight: 15,
        description: "Endpoint without authentication",
        remediation: "Require authentication on the exposed endpoint",
        owasp_categories: &["LLM04: Model Denial of Service"],
    },
    FlagInfo {
        flag: NO_RATE_LIMIT,
        weight: 10,
        description: "No rate limiting configured",
        remediation: "Add rate limiting in front of the component",
        owasp_categories: &["LLM04: Model Denial of Service"],
    },
    FlagInfo {
        flag: DEPRECATED_MODEL,
        weight: 10,
        description: "Deprecated model in use",
        remediation: "Migrate to a currently supported model",
        owasp_categories: &["LLM05: Supply Chain Vulnerabilities"],
    },
    FlagInfo {
        flag: NO_ERROR_HANDLING,
        weight: 10,
        description: "No error handling around AI calls",
        remediation: "Add failure branches for AI node errors",
        owasp_categories: &["LLM09: Overreliance"],
    },
    FlagInfo {
        flag: UNPINNED_MODEL,
        weight: 5,
        description: "Model version not pinned",
        remediation: "Pin an explicit model version",
        owasp_categories: &["LLM05: Supply Chain Vulnerabilities"],
    },
];

/// Look up registry metadata for a flag. Unknown flags return `None` and
/// contribute nothing to scoring.
pub fn flag_info(flag: &str) -> Option<&'static FlagInfo> {
    FLAG_REGISTRY.iter().find(|info| info.flag == flag)
}
