//! HTTP handlers.

use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Form, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use benison_biscuit::codec::encode_base64url;
use benison_biscuit::keys::public_key_to_der;
use benison_exchange::ExchangeRequest;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

/// Prefix of the issuance counter names reported by `/stats/blessings`.
pub const BLESSING_STATS_PREFIX: &str = "http/blessings/";

/// `GET /auth/bless`: request fields in the query string.
pub async fn bless_query(
    State(state): State<AppState>,
    Query(request): Query<ExchangeRequest>,
) -> Result<Response, ApiError> {
    bless(&state, request).await
}

/// `POST /auth/bless`: request fields in a urlencoded body.
pub async fn bless_form(
    State(state): State<AppState>,
    Form(request): Form<ExchangeRequest>,
) -> Result<Response, ApiError> {
    bless(&state, request).await
}

async fn bless(state: &AppState, request: ExchangeRequest) -> Result<Response, ApiError> {
    let encoded = state.exchanger().exchange(&request).await?;
    Ok(([(header::CONTENT_TYPE, encoded.content_type())], encoded.body).into_response())
}

/// Blessing names and key clients should recognize as roots.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlessingRoot {
    pub names: Vec<String>,
    /// Base64url SubjectPublicKeyInfo DER.
    pub public_key: String,
}

/// `GET /blessing-root`
pub async fn blessing_root(
    State(state): State<AppState>,
) -> Result<Json<BlessingRoot>, ApiError> {
    let principal = state.exchanger().principal();
    let der = public_key_to_der(&principal.public_key())?;
    Ok(Json(BlessingRoot {
        names: vec![principal.default_blessing().to_string()],
        public_key: encode_base64url(der),
    }))
}

/// `GET /stats/blessings`
pub async fn blessing_stats(State(state): State<AppState>) -> Json<BTreeMap<String, u64>> {
    let stats = state
        .exchanger()
        .counters()
        .snapshot()
        .into_iter()
        .map(|(name, count)| (format!("{BLESSING_STATS_PREFIX}{name}"), count))
        .collect();
    Json(stats)
}

/// `GET /healthz`
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "benison-server" }))
}
