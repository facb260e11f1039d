use serde::{Deserialize, Serialize};

/// Telephony platform account settings.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TwilioConfig {
    /// Account identifier.
    #[serde(default)]
    pub account_sid: String,

    /// API key identifier used for REST calls and token signing.
    #[serde(default)]
    pub api_key_sid: String,

    /// API key secret.
    #[serde(default)]
    pub api_key_secret: String,

    /// Voice application that routes calls placed from the browser.
    #[serde(default)]
    pub app_sid: String,
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("api_key_sid", &self.api_key_sid)
            .field("api_key_secret", &"<redacted>")
            .field("app_sid", &self.app_sid)
            .finish()
    }
}
