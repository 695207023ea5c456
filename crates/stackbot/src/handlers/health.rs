//! Liveness, readiness and version probes.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ProbeStatus {
    status: &'static str,
}

const UP: ProbeStatus = ProbeStatus { status: "UP" };

/// GET /livez
pub async fn livez() -> Json<ProbeStatus> {
    Json(UP)
}

/// GET /readyz
///
/// Nothing to wait on: providers are optional and the fallback is local.
pub async fn readyz() -> Json<ProbeStatus> {
    Json(UP)
}

#[derive(Serialize)]
pub struct VersionInfo {
    name: &'static str,
    version: &'static str,
}

/// GET /version
pub async fn version() -> Json<VersionInfo> {
    Json(VersionInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
