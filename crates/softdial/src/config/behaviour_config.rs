use crate::config::{default_token_ttl_secs, default_upstream_timeout_secs};

use serde::{Deserialize, Serialize};

/// Runtime behaviour switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Serve fixtures and synthetic tokens without contacting the platform.
    #[serde(default)]
    pub mock: bool,

    /// Lifetime of issued client tokens, in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Timeout applied to each platform REST request, in seconds.
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            mock: false,
            token_ttl_secs: default_token_ttl_secs(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
        }
    }
}
