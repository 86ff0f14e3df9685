//! Static detection knowledge: the node-type rule table plus the pattern
//! and flag tables in the submodules. Pure data, no scanning behavior.
//!
//! New node families are supported by appending a row to `NODE_RULES`,
//! never by editing control flow.

pub mod flags;
pub mod patterns;

use crate::model::{ComponentType, UsageType};

/// How a rule matches a node-type string.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Case-sensitive substring containment.
    Contains(&'static str),
    /// Case-insensitive substring containment.
    ContainsNoCase(&'static str),
}

impl Matcher {
    pub fn matches(&self, node_type: &str) -> bool {
        match self {
            Self::Contains(needle) => node_type.contains(needle),
            Self::ContainsNoCase(needle) => node_type.to_lowercase().contains(needle),
        }
    }
}

/// How a rule resolves the provider for a matched node.
#[derive(Debug, Clone, Copy)]
pub enum ProviderResolver {
    Fixed(&'static str),
    /// Derive an embedding provider from the node-type string.
    EmbeddingVendor,
    /// Derive a vector-store vendor from the node-type string.
    VectorStoreVendor,
}

impl ProviderResolver {
    pub fn resolve(&self, node_type: &str) -> String {
        match self {
            Self::Fixed(provider) => (*provider).to_string(),
            Self::EmbeddingVendor => embedding_vendor(node_type).to_string(),
            Self::VectorStoreVendor => vector_store_vendor(node_type).to_string(),
        }
    }
}

fn embedding_vendor(node_type: &str) -> &'static str {
    if node_type.contains("AzureOpenAi") || node_type.contains("Azure") {
        "Azure OpenAI"
    } else if node_type.contains("OpenAi") {
        "OpenAI"
    } else if node_type.contains("Cohere") {
        "Cohere"
    } else if node_type.contains("HuggingFace") {
        "HuggingFace"
    } else if node_type.contains("GoogleGemini") {
        "Google"
    } else if node_type.contains("Ollama") {
        "Ollama"
    } else {
        "unknown"
    }
}

fn vector_store_vendor(node_type: &str) -> &'static str {
    if node_type.contains("Chroma") {
        "ChromaDB"
    } else if node_type.contains("Pinecone") {
        "Pinecone"
    } else if node_type.contains("Qdrant") {
        "Qdrant"
    } else if node_type.contains("Supabase") {
        "Supabase"
    } else if node_type.contains("InMemory") {
        "in-memory"
    } else if node_type.contains("Weaviate") {
        "Weaviate"
    } else {
        "unknown"
    }
}

/// One row of the node-type taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct NodeRule {
    pub matcher: Matcher,
    pub component_type: ComponentType,
    pub usage_type: UsageType,
    pub provider: ProviderResolver,
}

/// Ordered rule table, most specific first; first match wins.
///
/// The trailing `chain` row intentionally absorbs any remaining
/// `@n8n/n8n-nodes-langchain.*` type — the package name itself contains
/// "chain" — so output parsers, text splitters and similar helper nodes
/// surface as orchestration components.
pub static NODE_RULES: &[NodeRule] = &[
    // LLM chat nodes
    NodeRule {
        matcher: Matcher::Contains(".lmChatOpenAi"),
        component_type: ComponentType::LlmProvider,
        usage_type: UsageType::Completion,
        provider: ProviderResolver::Fixed("OpenAI"),
    },
    NodeRule {
        matcher: Matcher::Contains(".lmChatAnthropic"),
        component_type: ComponentType::LlmProvider,
        usage_type: UsageType::Completion,
        provider: ProviderResolver::Fixed("Anthropic"),
    },
    NodeRule {
        matcher: Matcher::Contains(".lmChatGoogleGemini"),
        component_type: ComponentType::LlmProvider,
        usage_type: UsageType::Completion,
        provider: ProviderResolver::Fixed("Google"),
    },
    NodeRule {
        matcher: Matcher::Contains(".lmChatOllama"),
        component_type: ComponentType::LlmProvider,
        usage_type: UsageType::Completion,
        provider: ProviderResolver::Fixed("Ollama"),
    },
    NodeRule {
        matcher: Matcher::Contains(".lmChatAzureOpenAi"),
        component_type: ComponentType::LlmProvider,
        usage_type: UsageType::Completion,
        provider: ProviderResolver::Fixed("Azure OpenAI"),
    },
    NodeRule {
        matcher: Matcher::Contains(".lmChatMistralCloud"),
        component_type: ComponentType::LlmProvider,
        usage_type: UsageType::Completion,
        provider: ProviderResolver::Fixed("Mistral"),
    },
    NodeRule {
        matcher: Matcher::Contains(".lmChatGroq"),
        component_type: ComponentType::LlmProvider,
        usage_type: UsageType::Completion,
        provider: ProviderResolver::Fixed("Groq"),
    },
    NodeRule {
        matcher: Matcher::Contains(".lmChatCohere"),
        component_type: ComponentType::LlmProvider,
        usage_type: UsageType::Completion,
        provider: ProviderResolver::Fixed("Cohere"),
    },
    NodeRule {
        matcher: Matcher::Contains(".lmChatHuggingFace"),
        component_type: ComponentType::LlmProvider,
        usage_type: UsageType::Completion,
        provider: ProviderResolver::Fixed("HuggingFace"),
    },
    // MCP client
    NodeRule {
        matcher: Matcher::Contains(".mcpClientTool"),
        component_type: ComponentType::McpClient,
        usage_type: UsageType::ToolUse,
        provider: ProviderResolver::Fixed("MCP"),
    },
    // Tool nodes
    NodeRule {
        matcher: Matcher::Contains(".toolHttpRequest"),
        component_type: ComponentType::Tool,
        usage_type: UsageType::ToolUse,
        provider: ProviderResolver::Fixed("n8n"),
    },
    NodeRule {
        matcher: Matcher::Contains(".toolCode"),
        component_type: ComponentType::Tool,
        usage_type: UsageType::ToolUse,
        provider: ProviderResolver::Fixed("n8n"),
    },
    NodeRule {
        matcher: Matcher::Contains(".toolWorkflow"),
        component_type: ComponentType::Tool,
        usage_type: UsageType::ToolUse,
        provider: ProviderResolver::Fixed("n8n"),
    },
    NodeRule {
        matcher: Matcher::Contains(".toolCalculator"),
        component_type: ComponentType::Tool,
        usage_type: UsageType::ToolUse,
        provider: ProviderResolver::Fixed("n8n"),
    },
    NodeRule {
        matcher: Matcher::Contains(".toolWikipedia"),
        component_type: ComponentType::Tool,
        usage_type: UsageType::ToolUse,
        provider: ProviderResolver::Fixed("n8n"),
    },
    // Agent nodes
    NodeRule {
        matcher: Matcher::Contains(".agent"),
        component_type: ComponentType::AgentFramework,
        usage_type: UsageType::Agent,
        provider: ProviderResolver::Fixed("n8n"),
    },
    // Embedding nodes
    NodeRule {
        matcher: Matcher::ContainsNoCase("embedding"),
        component_type: ComponentType::Model,
        usage_type: UsageType::Embedding,
        provider: ProviderResolver::EmbeddingVendor,
    },
    // Vector store nodes
    NodeRule {
        matcher: Matcher::Contains("vectorStore"),
        component_type: ComponentType::Tool,
        usage_type: UsageType::Embedding,
        provider: ProviderResolver::VectorStoreVendor,
    },
    // Chain nodes (also the langchain package-name catch-all)
    NodeRule {
        matcher: Matcher::ContainsNoCase("chain"),
        component_type: ComponentType::AgentFramework,
        usage_type: UsageType::Orchestration,
        provider: ProviderResolver::Fixed("n8n"),
    },
    // Memory nodes outside the langchain namespace
    NodeRule {
        matcher: Matcher::ContainsNoCase("memory"),
        component_type: ComponentType::Tool,
        usage_type: UsageType::ToolUse,
        provider: ProviderResolver::Fixed("n8n"),
    },
];

/// Look up a node type against the rule table. First match wins; `None`
/// means the node is outside AI scope for extraction.
pub fn map_node_type(node_type: &str) -> Option<(ComponentType, UsageType, String)> {
    NODE_RULES
        .iter()
        .find(|rule| rule.matcher.matches(node_type))
        .map(|rule| {
            (
                rule.component_type,
                rule.usage_type,
                rule.provider.resolve(node_type),
            )
        })
}

/// Whether the node type maps to any AI component rule.
pub fn is_ai_node(node_type: &str) -> bool {
    NODE_RULES.iter().any(|rule| rule.matcher.matches(node_type))
}

/// Agent vertex check used by graph passes and the `.agent` rule alike.
pub fn is_agent_node(node_type: &str) -> bool {
    node_type.contains(".agent")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lm_chat_rules_win_over_generic_chain() {
        let (ct, ut, provider) =
            map_node_type("@n8n/n8n-nodes-langchain.lmChatOpenAi").unwrap();
        assert_eq!(ct, ComponentType::LlmProvider);
        assert_eq!(ut, UsageType::Completion);
        assert_eq!(provider, "OpenAI");
    }

    #[test]
    fn agent_rule_maps_to_agent_framework() {
        let (ct, ut, provider) = map_node_type("@n8n/n8n-nodes-langchain.agent").unwrap();
        assert_eq!(ct, ComponentType::AgentFramework);
        assert_eq!(ut, UsageType::Agent);
        assert_eq!(provider, "n8n");
    }

    #[test]
    fn mcp_client_rule() {
        let (ct, ut, provider) =
            map_node_type("@n8n/n8n-nodes-langchain.mcpClientTool").unwrap();
        assert_eq!(ct, ComponentType::McpClient);
        assert_eq!(ut, UsageType::ToolUse);
        assert_eq!(provider, "MCP");
    }

    #[test]
    fn embedding_vendor_resolution() {
        let (ct, ut, provider) =
            map_node_type("@n8n/n8n-nodes-langchain.embeddingsOpenAi").unwrap();
        assert_eq!(ct, ComponentType::Model);
        assert_eq!(ut, UsageType::Embedding);
        assert_eq!(provider, "OpenAI");

        let (_, _, provider) =
            map_node_type("@n8n/n8n-nodes-langchain.embeddingsGoogleGemini").unwrap();
        assert_eq!(provider, "Google");
    }

    #[test]
    fn vector_store_vendor_resolution() {
        let (ct, ut, provider) =
            map_node_type("@n8n/n8n-nodes-langchain.vectorStoreChroma").unwrap();
        assert_eq!(ct, ComponentType::Tool);
        assert_eq!(ut, UsageType::Embedding);
        assert_eq!(provider, "ChromaDB");

        let (_, _, provider) =
            map_node_type("@n8n/n8n-nodes-langchain.vectorStoreInMemory").unwrap();
        assert_eq!(provider, "in-memory");
    }

    #[test]
    fn langchain_helpers_fall_through_to_chain_rule() {
        // Package name contains "chain", so helper nodes become orchestration.
        let (ct, ut, _) =
            map_node_type("@n8n/n8n-nodes-langchain.outputParserStructured").unwrap();
        assert_eq!(ct, ComponentType::AgentFramework);
        assert_eq!(ut, UsageType::Orchestration);

        let (ct, _, _) =
            map_node_type("@n8n/n8n-nodes-langchain.memoryBufferWindow").unwrap();
        assert_eq!(ct, ComponentType::AgentFramework);
    }

    #[test]
    fn base_nodes_do_not_match() {
        assert!(map_node_type("n8n-nodes-base.httpRequest").is_none());
        assert!(map_node_type("n8n-nodes-base.code").is_none());
        assert!(map_node_type("n8n-nodes-base.webhook").is_none());
        assert!(!is_ai_node("n8n-nodes-base.set"));
    }

    #[test]
    fn agent_check_is_case_sensitive() {
        assert!(is_agent_node("@n8n/n8n-nodes-langchain.agent"));
        assert!(!is_agent_node("@n8n/n8n-nodes-langchain.Agent"));
    }
}
