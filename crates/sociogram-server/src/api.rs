//! HTTP front door.
//!
//! Two endpoints: `GET /` identifies the service, `GET /accounts/sync`
//! runs the account sync and answers with the
//! `{success, message, data|error}` envelope the client apps expect.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use sociogram_remote::RemoteClient;

use crate::profile::Profile;
use crate::sync;

#[derive(Clone)]
pub struct AppState {
    pub remote: Arc<RemoteClient>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/accounts/sync", get(accounts_sync))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct SyncResponse {
    success: bool,
    message: String,
    data: Vec<Profile>,
}

async fn root() -> &'static str {
    "sociogram provisioning and sync service"
}

async fn accounts_sync(State(state): State<AppState>) -> Response {
    match sync::sync_accounts(state.remote.as_ref()).await {
        Ok(profiles) => {
            let message = format!("Synced {} profiles", profiles.len());
            (
                StatusCode::OK,
                Json(SyncResponse {
                    success: true,
                    message,
                    data: profiles,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "account sync failed");
            let body = serde_json::json!({
                "success": false,
                "message": "Account sync failed",
                "error": e.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
