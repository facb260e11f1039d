//! Capability tokens for the browser voice client.
//!
//! Tokens are HS256 JWTs signed with the API key secret and carry a single
//! voice grant: outgoing calls through the configured application, incoming
//! calls disallowed.

use crate::{CoreResult, DialerError, telephony::TwilioCredentials};

use std::{panic::Location, time::Duration};

use chrono::Utc;
use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Identity used when the caller supplies none.
pub const DEFAULT_IDENTITY: &str = "agent";

const TOKEN_CONTENT_TYPE: &str = "twilio-fpa;v=1";

/// Registered and platform-specific claims of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Token identifier, `{api_key_sid}-{iat}`.
    pub jti: String,
    /// API key that signed the token.
    pub iss: String,
    /// Account the token is valid for.
    pub sub: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Not valid before (unix seconds).
    pub nbf: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Capabilities granted to the holder.
    pub grants: Grants,
}

/// Grant section of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grants {
    /// Client identity the token is scoped to.
    pub identity: String,
    /// Voice capability.
    pub voice: VoiceGrant,
}

/// Voice capability of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceGrant {
    /// Whether the client may receive calls.
    pub incoming: IncomingGrant,
    /// Application that handles calls placed by the client.
    pub outgoing: OutgoingGrant,
}

/// Incoming-call part of a voice grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingGrant {
    /// Always false: the dialer is outbound only.
    pub allow: bool,
}

/// Outgoing-call part of a voice grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingGrant {
    /// Voice application whose webhook routes outbound calls.
    pub application_sid: String,
}

/// Signs access tokens for a single account and voice application.
pub struct AccessTokenIssuer {
    credentials: TwilioCredentials,
    application_sid: String,
    ttl: Duration,
}

impl AccessTokenIssuer {
    /// Create an issuer whose tokens live for `ttl`.
    pub fn new(credentials: TwilioCredentials, application_sid: String, ttl: Duration) -> Self {
        Self {
            credentials,
            application_sid,
            ttl,
        }
    }

    /// Mint a signed token scoped to `identity`.
    ///
    /// # Errors
    ///
    /// Returns `TokenIssuanceFailure` if the token cannot be encoded.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn mint(&self, identity: &str) -> CoreResult<String> {
        let identity = normalize_identity(identity);
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);

        let claims = AccessTokenClaims {
            jti: format!("{}-{}", self.credentials.api_key_sid, iat),
            iss: self.credentials.api_key_sid.clone(),
            sub: self.credentials.account_sid.clone(),
            iat,
            nbf: iat,
            exp: iat.saturating_add(ttl),
            grants: Grants {
                identity: identity.to_string(),
                voice: VoiceGrant {
                    incoming: IncomingGrant { allow: false },
                    outgoing: OutgoingGrant {
                        application_sid: self.application_sid.clone(),
                    },
                },
            },
        };

        let mut header = Header::new(Algorithm::HS256);
        header.cty = Some(TOKEN_CONTENT_TYPE.to_string());

        let key = EncodingKey::from_secret(self.credentials.api_key_secret.as_bytes());

        let token = encode(&header, &claims, &key).map_err(|e| DialerError::TokenIssuanceFailure {
            reason: format!("Failed to sign access token: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(identity = %identity, ttl_secs = ttl, "Access token issued");

        Ok(token)
    }
}

/// Source of client tokens for the `/token` endpoint.
pub enum TokenIssuer {
    /// Real signed tokens.
    Signed(AccessTokenIssuer),
    /// Offline mode: `mock-{identity}`, no signing.
    Mock,
}

impl TokenIssuer {
    /// Issue a token for `identity`.
    #[track_caller]
    pub fn issue(&self, identity: &str) -> CoreResult<String> {
        match self {
            TokenIssuer::Signed(issuer) => issuer.mint(identity),
            TokenIssuer::Mock => Ok(format!("mock-{}", normalize_identity(identity))),
        }
    }
}

fn normalize_identity(identity: &str) -> &str {
    let trimmed = identity.trim();
    if trimmed.is_empty() {
        DEFAULT_IDENTITY
    } else {
        trimmed
    }
}
