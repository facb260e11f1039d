//! Call-control markup for the inbound voice webhook.
//!
//! When the browser client places a call, the platform asks the voice
//! application what to do with the leg. The answer bridges it to the
//! requested number with the selected company's caller ID and records it.

use crate::{
    CoreResult, DialerError,
    model::{Company, CompanyNumbers},
};

use std::panic::Location;

use error_location::ErrorLocation;

/// Path the platform notifies once a recording is available.
pub const RECORDING_STATUS_CALLBACK_PATH: &str = "/recording-status";

/// Content type of call-control markup responses.
pub const TWIML_CONTENT_TYPE: &str = "text/xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Build markup bridging the inbound leg to `destination`.
///
/// The caller ID is company B's number only when `company_selector` is
/// exactly `"B"`; every other selector, including none, uses company A.
///
/// # Errors
///
/// Returns `InvalidInput` when `destination` is empty or blank, rather than
/// instructing the platform to dial an empty target.
#[track_caller]
pub fn build_routing_response(
    destination: &str,
    company_selector: Option<&str>,
    numbers: &CompanyNumbers,
) -> CoreResult<String> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(DialerError::InvalidInput {
            reason: "Destination number is empty".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let company = Company::from_selector(company_selector);
    let caller_id = numbers.number_for(company);

    Ok(format!(
        r#"{XML_DECLARATION}<Response><Dial callerId="{caller_id}" record="record-from-answer" recordingStatusCallback="{callback}" recordingStatusCallbackEvent="completed"><Number>{destination}</Number></Dial></Response>"#,
        caller_id = escape_xml(caller_id),
        callback = RECORDING_STATUS_CALLBACK_PATH,
        destination = escape_xml(destination),
    ))
}

/// Markup refusing the leg; used when a request cannot be routed.
pub fn reject_response() -> String {
    format!("{XML_DECLARATION}<Response><Reject/></Response>")
}

/// Markup answered in offline mode.
pub fn mock_routing_response() -> String {
    format!("{XML_DECLARATION}<Response><Say>Mock mode.</Say></Response>")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
