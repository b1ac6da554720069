use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use shopchat_core::Catalog;
use shopchat_gateway::{CacheStatus, RemoteCatalog};

#[derive(Clone)]
pub struct HealthState {
    catalog: Arc<Catalog>,
    remote: Option<Arc<RemoteCatalog>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub catalog: HealthCheck,
    pub remote: HealthCheck,
    pub checked_at: String,
}

pub fn router(catalog: Arc<Catalog>, remote: Option<Arc<RemoteCatalog>>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { catalog, remote })
}

/// Only an empty local catalog fails the check; the remote source degrades
/// without affecting the status code.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state.catalog);
    let remote = remote_check(state.remote.as_deref()).await;
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        catalog,
        remote,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn catalog_check(catalog: &Catalog) -> HealthCheck {
    if catalog.is_empty() {
        HealthCheck { status: "degraded", detail: "local catalog has no products".to_string() }
    } else {
        HealthCheck { status: "ready", detail: format!("{} local products loaded", catalog.len()) }
    }
}

async fn remote_check(remote: Option<&RemoteCatalog>) -> HealthCheck {
    let Some(remote) = remote else {
        return HealthCheck {
            status: "disabled",
            detail: "remote product source disabled".to_string(),
        };
    };

    match remote.cache_status().await {
        CacheStatus::Empty => HealthCheck {
            status: "degraded",
            detail: format!("no products cached from {} yet", remote.upstream_url()),
        },
        CacheStatus::Fresh { age_secs, count } => HealthCheck {
            status: "ready",
            detail: format!("{count} remote products cached {age_secs}s ago"),
        },
        CacheStatus::Stale { age_secs, count } => HealthCheck {
            status: "degraded",
            detail: format!("serving {count} stale remote products cached {age_secs}s ago"),
        },
    }
}
