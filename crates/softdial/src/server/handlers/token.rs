use crate::{AppResult, server::AppState};

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use softdial_core::{DEFAULT_IDENTITY, TokenResponse};
use tracing::instrument;

/// Query string of `GET /token`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenParams {
    pub(crate) identity: Option<String>,
}

/// `GET /token`: short-lived client credential for the browser dialer.
#[instrument(skip(state))]
pub(crate) async fn issue_token(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> AppResult<Json<TokenResponse>> {
    let identity = params.identity.as_deref().unwrap_or(DEFAULT_IDENTITY);
    let token = state.tokens.issue(identity)?;

    Ok(Json(TokenResponse { token }))
}
