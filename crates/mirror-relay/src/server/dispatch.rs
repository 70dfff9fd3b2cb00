//! Request dispatch
//!
//! WebSocket upgrades are claimed by [`route_upgrades`] before routing, on any
//! path except a bare `/create`. Plain requests reach the explicit routes, and
//! anything unmatched lands in [`dispatch`], which serves static assets.

use super::error::RelayError;
use super::{assets, relay, RelayState};
use axum::{
    extract::{FromRequestParts, Query, Request, State, WebSocketUpgrade},
    http::{header, request::Parts, HeaderMap, Method, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use mirror_core::{Role, SessionId};
use serde::{Deserialize, Serialize};

/// Body returned by the session-creation endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
}

/// Query parameters of a pairing upgrade
#[derive(Debug, Default, PartialEq)]
struct PairingParams {
    id: Option<String>,
    role: Option<String>,
}

impl PairingParams {
    /// Pick `id` and `role` out of decoded query pairs; the first occurrence wins
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "id" if params.id.is_none() => params.id = Some(value),
                "role" if params.role.is_none() => params.role = Some(value),
                _ => {}
            }
        }
        params
    }
}

/// Create a new session
///
/// GET /create
pub async fn create_session(
    State(state): State<RelayState>,
) -> Result<Json<CreateSessionResponse>, RelayError> {
    let session = state.registry().create()?;

    Ok(Json(CreateSessionResponse {
        session_id: session.id().clone(),
    }))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Hand WebSocket upgrades to pairing before any route sees them
pub async fn route_upgrades(
    State(state): State<RelayState>,
    request: Request,
    next: Next,
) -> Response {
    if *request.method() == Method::GET
        && is_upgrade_request(request.headers())
        && !is_bare_create(request.uri())
    {
        let (mut parts, _body) = request.into_parts();
        return pair(state, &mut parts).await;
    }

    next.run(request).await
}

/// Route a request that matched no explicit endpoint
pub async fn dispatch(State(state): State<RelayState>, request: Request) -> Response {
    let (parts, _body) = request.into_parts();

    match parts.method {
        Method::GET | Method::HEAD => {
            assets::serve(&state.config().relay.asset_root, parts.uri.path()).await
        }
        _ => RelayError::MethodNotAllowed.into_response(),
    }
}

/// Validate pairing parameters and upgrade the connection
async fn pair(state: RelayState, parts: &mut Parts) -> Response {
    let params = match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
        Ok(Query(pairs)) => PairingParams::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!(uri = %parts.uri, error = %rejection, "Unreadable pairing query");
            return rejection.into_response();
        }
    };

    let Some(session_id) = params.id.filter(|id| !id.is_empty()) else {
        tracing::debug!(uri = %parts.uri, "Pairing request without session id");
        return RelayError::MissingParameter("id").into_response();
    };
    let role = Role::from_param(params.role.as_deref());

    let ws = match WebSocketUpgrade::from_request_parts(parts, &state).await {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    tracing::debug!(session_id = %session_id, role = %role, "Upgrading pairing connection");

    let max_message_bytes = state.config().relay.max_message_bytes;
    ws.max_message_size(max_message_bytes)
        .on_upgrade(move |socket| relay::run_relay(state, socket, session_id, role))
}

/// Session creation keeps priority only for the exact `/create` target
fn is_bare_create(uri: &Uri) -> bool {
    uri.path() == "/create" && uri.query().is_none()
}

/// Whether the request asks for a WebSocket upgrade
fn is_upgrade_request(headers: &HeaderMap) -> bool {
    let connection_upgrade = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));

    let upgrade_websocket = headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("websocket"));

    connection_upgrade && upgrade_websocket
}
