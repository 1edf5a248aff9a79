//! Inbound-call routing for the telephony provider.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{Datelike, Local, Timelike};

use crate::AppState;

/// GET /voice
///
/// Answers the telephony webhook with a TwiML redirect to the voice
/// agent. Inside ordering hours the main agent takes the call; past the
/// cutoff the after-hours agent answers instead.
pub async fn voice_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let local = Local::now();
    let minutes_of_day = local.hour() * 60 + local.minute();
    let accepting = state.hours.accepting_orders(local.weekday(), minutes_of_day);

    let agent_id = if accepting {
        &state.voice.main_agent_id
    } else {
        tracing::info!("outside ordering window, routing to after-hours agent");
        &state.voice.fallback_agent_id
    };

    let twiml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Response>\n  <Redirect>{}?agent_id={}</Redirect>\n</Response>",
        state.voice.redirect_base, agent_id
    );

    ([(header::CONTENT_TYPE, "text/xml")], twiml).into_response()
}
