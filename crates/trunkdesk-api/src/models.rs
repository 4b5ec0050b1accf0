// Wire types for the auth, dashboard, and mutation-acknowledgement payloads.
//
// Entity payloads are generic on the client side (`list<T>`, `create<B>`);
// their shapes live in `trunkdesk-core::model`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Auth ─────────────────────────────────────────────────────────────

/// Body of `POST /api/auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    /// `"admin"` or `"user"`.
    pub role: String,
}

// ── Dashboard ────────────────────────────────────────────────────────

/// `GET /api/dashboard` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardResponse {
    #[serde(rename = "statsByAreaCode", default)]
    pub stats_by_area_code: BTreeMap<String, AreaCodeStatsWire>,
    #[serde(rename = "totalNSOTrunks", default)]
    pub total_nso_trunks: u64,
    #[serde(rename = "totalVNOTrunks", default)]
    pub total_vno_trunks: u64,
    #[serde(rename = "totalDIDs", default)]
    pub total_dids: u64,
}

/// Per-area-code stats as the server sends them.
///
/// `remainingChannels` may be negative when a trunk is over-allocated and
/// `utilization` arrives with one decimal place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaCodeStatsWire {
    #[serde(default)]
    pub total_channels: i64,
    #[serde(default)]
    pub allocated_channels: i64,
    #[serde(default)]
    pub remaining_channels: i64,
    #[serde(default)]
    pub utilization: f64,
}

// ── Mutations ────────────────────────────────────────────────────────

/// `201` body returned by every create endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Created {
    #[serde(default)]
    pub message: String,
    pub id: u64,
}

/// `200` body returned by update and delete endpoints, and by most errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
