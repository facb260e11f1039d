use crate::server::AppState;

use axum::{
    Form,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use softdial_core::{
    TWIML_CONTENT_TYPE, build_routing_response, mock_routing_response, reject_response,
};
use tracing::{info, instrument, warn};

/// Form body the platform posts when the browser places a call.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct VoiceForm {
    #[serde(rename = "To", default)]
    pub(crate) to: String,
    #[serde(rename = "Company")]
    pub(crate) company: Option<String>,
}

/// `POST /voice`: call-control markup for an outbound browser call.
///
/// Always answers with markup. Calls that cannot be routed are rejected.
#[instrument(skip(state))]
pub(crate) async fn route_call(State(state): State<AppState>, Form(form): Form<VoiceForm>) -> Response {
    let body = if state.mock {
        mock_routing_response()
    } else {
        match build_routing_response(&form.to, form.company.as_deref(), &state.numbers) {
            Ok(twiml) => {
                info!(to = %form.to, company = ?form.company, "Routing outbound call");
                twiml
            }
            Err(e) => {
                warn!(error = %e, to = %form.to, "Rejecting unroutable call");
                reject_response()
            }
        }
    };

    ([(header::CONTENT_TYPE, TWIML_CONTENT_TYPE)], body).into_response()
}
