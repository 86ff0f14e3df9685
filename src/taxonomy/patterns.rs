//! Pattern tables: provider API-key regexes, dangerous code patterns,
//! credential parameter keys, and the deprecated-model set.

use once_cell::sync::Lazy;
use regex::Regex;

/// Provider API-key patterns, checked in order. The `sk-proj-` form allows
/// hyphens and must be tried before the generic `sk-` pattern.
pub static API_KEY_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"sk-proj-[a-zA-Z0-9_-]{20,}", "OpenAI"),
        (r"sk-[a-zA-Z0-9]{20,}", "OpenAI"),
        (r"sk-ant-[a-zA-Z0-9-]{20,}", "Anthropic"),
        (r"hf_[a-zA-Z0-9]{20,}", "HuggingFace"),
        (r"key-[a-zA-Z0-9]{20,}", "Cohere"),
        (r"gsk_[a-zA-Z0-9]{20,}", "Groq"),
        (r"r8_[a-zA-Z0-9]{20,}", "Replicate"),
        (r"xai-[a-zA-Z0-9]{20,}", "xAI"),
        (r"AIza[a-zA-Z0-9_-]{20,}", "Google"),
    ]
    .into_iter()
    .map(|(pattern, provider)| (Regex::new(pattern).unwrap(), provider))
    .collect()
});

/// Find the first API-key pattern matching anywhere in `text`, returning
/// the provider it belongs to.
pub fn match_api_key(text: &str) -> Option<&'static str> {
    API_KEY_PATTERNS
        .iter()
        .find(|(regex, _)| regex.is_match(text))
        .map(|(_, provider)| *provider)
}

/// Literal patterns that make embedded script-node code dangerous:
/// process spawning, eval, raw fs access, cookie/location reads.
pub static DANGEROUS_CODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"child_process",
        r"execSync\(",
        r"exec\(",
        r"spawn\(",
        r#"require\(['"]fs['"]\)"#,
        r"eval\(",
        r"fs\.write",
        r"document\.cookie",
        r"window\.location",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

pub fn matches_dangerous_code(code: &str) -> bool {
    DANGEROUS_CODE_PATTERNS.iter().any(|re| re.is_match(code))
}

/// Parameter keys that should never hold an inline secret.
pub static CREDENTIAL_PARAMETER_KEYS: &[&str] = &[
    "apiKey",
    "api_key",
    "token",
    "accessToken",
    "access_token",
    "secret",
    "secretKey",
    "secret_key",
    "password",
    "authToken",
    "auth_token",
];

/// Values that look like secrets but are documentation placeholders.
pub static PLACEHOLDER_VALUES: &[&str] =
    &["your_api_key", "your-api-key", "placeholder", "example"];

pub fn is_placeholder(value: &str) -> bool {
    let lower = value.to_lowercase();
    PLACEHOLDER_VALUES.iter().any(|p| *p == lower)
}

/// Parameter keys that may carry an MCP server endpoint.
pub static URL_PARAMETER_KEYS: &[&str] = &["sseEndpoint", "sseUrl", "serverUrl", "url", "endpoint"];

/// Model identifiers that are deprecated by their vendor.
pub static DEPRECATED_MODELS: &[&str] = &[
    // OpenAI
    "gpt-3.5-turbo",
    "gpt-3.5-turbo-0301",
    "gpt-3.5-turbo-0613",
    "text-davinci-003",
    "text-davinci-002",
    "code-davinci-002",
    "text-ada-001",
    "text-babbage-001",
    "text-curie-001",
    "text-embedding-ada-002",
    "gpt-4-0314",
    "gpt-4-0613",
    "gpt-4-32k-0314",
    "gpt-4-32k-0613",
    // Anthropic
    "claude-instant-1",
    "claude-instant-1.2",
    "claude-2.0",
    "claude-2.1",
    "claude-3-haiku-20240307",
];

pub fn is_deprecated_model(model: &str) -> bool {
    DEPRECATED_MODELS.iter().any(|m| *m == model)
}
