mod behaviour_config;
mod company_config;
#[allow(clippy::module_inception)]
mod config;
mod server_config;
mod twilio_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, company_config::CompanyConfig, config::Config,
    server_config::ServerConfig, twilio_config::TwilioConfig,
};

pub(crate) const DEFAULT_HOST: &str = "0.0.0.0";
pub(crate) const DEFAULT_PORT: u16 = 3000;
pub(crate) const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
pub(crate) const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Company numbers used by the offline fixtures when none are configured.
pub(crate) const MOCK_COMPANY_A_NUMBER: &str = "+15550001000";
pub(crate) const MOCK_COMPANY_B_NUMBER: &str = "+15550002000";

pub(crate) fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

pub(crate) fn default_upstream_timeout_secs() -> u64 {
    DEFAULT_UPSTREAM_TIMEOUT_SECS
}
