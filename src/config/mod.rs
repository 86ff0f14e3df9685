use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::Policy;

/// Top-level configuration from `.flowshield.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: Policy,
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# FlowShield configuration
# See https://github.com/limaronaldo/flowshield for documentation.

[policy]
# Maximum allowed critical-severity components.
# max_critical = 0

# Maximum allowed high-severity components.
# max_high = 3

# Maximum allowed risk score for any single component (0-100).
# max_risk_score = 75

# Providers that are not allowed (case-insensitive).
# block_providers = ["openai"]

# Risk flags that cause failure.
# block_flags = ["hardcoded_credentials", "mcp_unknown_server"]
"#
    }
}
