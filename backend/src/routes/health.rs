//! Probes for orchestrators and load balancers
//!
//! `/health` and `/health/live` answer as long as the process serves
//! requests. `/health/ready` also pings the credential store and answers
//! 503 while it is unreachable.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<StoreChecks>,
}

#[derive(Debug, Serialize)]
pub struct StoreChecks {
    pub store: StoreProbe,
}

#[derive(Debug, Serialize)]
pub struct StoreProbe {
    pub status: &'static str,
    /// Backend name (`postgres` or `memory`)
    pub backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeReport {
    fn plain(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks: None,
        }
    }
}

pub async fn health_check() -> Json<ProbeReport> {
    Json(ProbeReport::plain("healthy"))
}

pub async fn liveness_check() -> Json<ProbeReport> {
    Json(ProbeReport::plain("alive"))
}

pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ProbeReport>) {
    let outcome = state.store().health_check().await;
    if let Err(e) = &outcome {
        tracing::warn!(error = %e, "Readiness probe failed");
    }

    let (code, status) = match outcome {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not_ready"),
    };
    let store = StoreProbe {
        status: if code.is_success() { "healthy" } else { "unhealthy" },
        backend: state.config().storage.backend.as_str(),
        error: outcome.err().map(|e| e.to_string()),
    };

    (
        code,
        Json(ProbeReport {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks: Some(StoreChecks { store }),
        }),
    )
}
