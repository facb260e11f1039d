use crate::{AppResult, config::Config};

use std::sync::Arc;

use softdial_core::{
    AccessTokenIssuer, CallLogFetcher, CompanyNumbers, MockTelephony, RecordingFetcher,
    TelephonyApi, TokenIssuer, TwilioRestClient,
};
use tracing::info;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub(crate) mock: bool,
    pub(crate) numbers: Arc<CompanyNumbers>,
    pub(crate) call_logs: Arc<CallLogFetcher>,
    pub(crate) recordings: Arc<RecordingFetcher>,
    pub(crate) tokens: Arc<TokenIssuer>,
}

impl AppState {
    /// Assemble state from explicit parts.
    pub fn new(
        mock: bool,
        numbers: CompanyNumbers,
        telephony: Arc<dyn TelephonyApi>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            mock,
            numbers: Arc::new(numbers),
            call_logs: Arc::new(CallLogFetcher::new(Arc::clone(&telephony))),
            recordings: Arc::new(RecordingFetcher::new(telephony)),
            tokens: Arc::new(tokens),
        }
    }

    /// Build the live or offline state described by `config`.
    #[track_caller]
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let numbers = config.company_numbers();

        if config.behaviour.mock {
            info!("Mock mode: serving fixtures and synthetic tokens");
            let telephony = Arc::new(MockTelephony::new(&numbers));
            return Ok(Self::new(true, numbers, telephony, TokenIssuer::Mock));
        }

        let telephony = Arc::new(TwilioRestClient::new(
            config.credentials(),
            config.upstream_timeout(),
        )?);
        let issuer = AccessTokenIssuer::new(
            config.credentials(),
            config.twilio.app_sid.clone(),
            config.token_ttl(),
        );

        Ok(Self::new(
            false,
            numbers,
            telephony,
            TokenIssuer::Signed(issuer),
        ))
    }
}
