//! Configuration loading for softdial.
//!
//! An optional TOML file supplies the base values and process environment
//! variables override them. Credentials are validated separately so that
//! offline mode can start without any.

use crate::{
    AppError, AppResult,
    config::{
        BehaviourConfig, CompanyConfig, MOCK_COMPANY_A_NUMBER, MOCK_COMPANY_B_NUMBER,
        ServerConfig, TwilioConfig,
    },
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use softdial_core::{CompanyNumbers, TwilioCredentials};
use tracing::{debug, info, instrument};

/// Environment variable naming an explicit config file.
pub(crate) const CONFIG_PATH_ENV: &str = "SOFTDIAL_CONFIG";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Platform account and voice application.
    #[serde(default)]
    pub twilio: TwilioConfig,
    /// Company A and B numbers.
    #[serde(default)]
    pub companies: CompanyConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Runtime behaviour.
    #[serde(default)]
    pub behaviour: BehaviourConfig,
}

impl Config {
    /// Load configuration from the config file (if any) and the process
    /// environment.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path(
            std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from),
            ProjectDirs::from("com", "softdial", "Softdial"),
        );
        let contents = Self::read_config_file(config_path.as_deref())?;

        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Read the config file at `config_path`. A missing path or file reads as
    /// no file.
    #[track_caller]
    pub fn read_config_file(config_path: Option<&Path>) -> AppResult<Option<String>> {
        let Some(config_path) = config_path else {
            debug!("No config directory, using defaults and environment");
            return Ok(None);
        };

        if !config_path.exists() {
            debug!(config_path = ?config_path, "No config file, using defaults and environment");
            return Ok(None);
        }

        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config {:?}: {}", config_path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        info!(config_path = ?config_path, "Configuration file loaded");

        Ok(Some(contents))
    }

    /// Build a config from optional TOML text, then apply overrides from
    /// `lookup` (an environment accessor).
    #[track_caller]
    pub fn from_sources<F>(toml_text: Option<&str>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config = match toml_text {
            Some(text) => toml::from_str(text).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?,
            None => Config::default(),
        };

        config.apply_env(lookup)?;

        Ok(config)
    }

    #[track_caller]
    fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, target: &mut String| {
            if let Some(value) = lookup(key) {
                *target = value.trim().to_string();
            }
        };

        text("TWILIO_ACCOUNT_SID", &mut self.twilio.account_sid);
        text("TWILIO_API_KEY_SID", &mut self.twilio.api_key_sid);
        text("TWILIO_API_KEY_SECRET", &mut self.twilio.api_key_secret);
        text("TWILIO_APP_SID", &mut self.twilio.app_sid);
        text("COMPANY_A_NUMBER", &mut self.companies.a_number);
        text("COMPANY_B_NUMBER", &mut self.companies.b_number);
        text("HOST", &mut self.server.host);

        if let Some(value) = lookup("MOCK") {
            let value = value.trim();
            self.behaviour.mock = value == "1" || value.eq_ignore_ascii_case("true");
        }

        if let Some(value) = lookup("PORT") {
            self.server.port = parse_number("PORT", &value)?;
        }

        if let Some(value) = lookup("TOKEN_TTL_SECS") {
            self.behaviour.token_ttl_secs = parse_number("TOKEN_TTL_SECS", &value)?;
        }

        if let Some(value) = lookup("STATIC_DIR") {
            let value = value.trim();
            self.server.static_dir = (!value.is_empty()).then(|| PathBuf::from(value));
        }

        Ok(())
    }

    /// Check that every credential needed for live mode is present.
    ///
    /// Always succeeds in mock mode.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate_credentials(&self) -> AppResult<()> {
        if self.behaviour.mock {
            return Ok(());
        }

        let missing: Vec<&str> = [
            ("TWILIO_ACCOUNT_SID", &self.twilio.account_sid),
            ("TWILIO_API_KEY_SID", &self.twilio.api_key_sid),
            ("TWILIO_API_KEY_SECRET", &self.twilio.api_key_secret),
            ("TWILIO_APP_SID", &self.twilio.app_sid),
            ("COMPANY_A_NUMBER", &self.companies.a_number),
            ("COMPANY_B_NUMBER", &self.companies.b_number),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::ConfigError {
                reason: format!("Missing configuration: {}", missing.join(", ")),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// The two company numbers. Mock mode fills blanks with fixture numbers.
    pub fn company_numbers(&self) -> CompanyNumbers {
        let pick = |configured: &str, fallback: &str| {
            if configured.is_empty() && self.behaviour.mock {
                fallback.to_string()
            } else {
                configured.to_string()
            }
        };

        CompanyNumbers::new(
            pick(&self.companies.a_number, MOCK_COMPANY_A_NUMBER),
            pick(&self.companies.b_number, MOCK_COMPANY_B_NUMBER),
        )
    }

    /// REST and signing credentials.
    pub fn credentials(&self) -> TwilioCredentials {
        TwilioCredentials {
            account_sid: self.twilio.account_sid.clone(),
            api_key_sid: self.twilio.api_key_sid.clone(),
            api_key_secret: self.twilio.api_key_secret.clone(),
        }
    }

    /// Timeout for each platform REST request.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.behaviour.upstream_timeout_secs)
    }

    /// Lifetime of issued client tokens.
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.behaviour.token_ttl_secs)
    }

    /// Address the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Config file location: an explicit path wins, otherwise `config.toml`
    /// in the platform config directory, if there is one.
    pub(crate) fn config_path(
        explicit: Option<PathBuf>,
        project_dirs: Option<ProjectDirs>,
    ) -> Option<PathBuf> {
        explicit.or_else(|| project_dirs.map(|dirs| dirs.config_dir().join("config.toml")))
    }
}

#[track_caller]
fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> AppResult<T> {
    value.trim().parse().map_err(|_| AppError::ConfigError {
        reason: format!("{} must be a number, got {:?}", key, value),
        location: ErrorLocation::from(Location::caller()),
    })
}
