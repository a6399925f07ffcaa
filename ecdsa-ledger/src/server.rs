//! HTTP boundary for the ledger
//!
//! Routes:
//! - `GET  /balance/:address` → `{ "balance": n }`
//! - `POST /send` with `{ message, signature }` → sender's new `{ "balance": n }`
//! - `GET  /health`
//! - `GET  /metrics` (Prometheus text format)

use crate::{
    crypto::{derive_address_from_signature, Secp256k1Recovery, SignatureRecovery},
    metrics::Metrics,
    types::{Address, BalanceResponse, TransferRequest},
    Config, Error, Ledger, Result,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

/// Shared request-handler state
#[derive(Clone)]
pub struct AppState {
    /// The process-wide ledger
    pub ledger: Arc<Ledger>,

    /// Signer recovery backend
    pub recovery: Arc<dyn SignatureRecovery>,

    /// Metrics collector
    pub metrics: Metrics,

    /// Name reported by `/health`
    pub service_name: String,

    /// Version reported by `/health`
    pub service_version: String,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_name", &self.service_name)
            .field("service_version", &self.service_version)
            .field("accounts", &self.ledger.account_count())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State with the default secp256k1 recovery backend
    pub fn new(ledger: Arc<Ledger>, metrics: Metrics) -> Self {
        Self {
            ledger,
            recovery: Arc::new(Secp256k1Recovery),
            metrics,
            service_name: "ecdsa-ledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Replace the recovery backend
    pub fn with_recovery(mut self, recovery: Arc<dyn SignatureRecovery>) -> Self {
        self.recovery = recovery;
        self
    }

    /// Take the service identity reported by `/health` from `config`
    pub fn with_identity(mut self, config: &Config) -> Self {
        self.service_name = config.service_name.clone();
        self.service_version = config.service_version.clone();
        self
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: String,
    version: String,
    accounts: usize,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let mut body = json!({
            "message": self.client_message(),
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
                "type": self.kind(),
            }
        });

        if let Error::InsufficientFunds { amount, balance } = self {
            body["amount"] = json!(amount);
            body["balance"] = json!(balance);
        }

        (status, Json(body)).into_response()
    }
}

impl Error {
    fn client_message(&self) -> String {
        match self {
            Error::InsufficientFunds { .. } => "Not enough funds!".to_string(),
            e if e.is_client_error() => e.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: state.service_name.clone(),
        version: state.service_version.clone(),
        accounts: state.ledger.account_count(),
    })
}

async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>> {
    let address = Address::parse(&address)?;
    state.metrics.record_balance_query();

    Ok(Json(BalanceResponse {
        balance: state.ledger.get_balance(&address),
    }))
}

async fn send(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<BalanceResponse>> {
    let result = payload
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))
        .and_then(|Json(request)| apply_transfer(&state, &request));

    match result {
        Ok(balance) => Ok(Json(BalanceResponse { balance })),
        Err(e) => {
            state.metrics.record_rejection(e.kind());
            if e.is_client_error() {
                warn!(error = %e, "Transfer rejected");
            } else {
                error!(error = %e, "Transfer failed");
            }
            Err(e)
        }
    }
}

/// Recover the sender and apply the transfer. The sender always comes from
/// the signature, never from the request body.
fn apply_transfer(state: &AppState, request: &TransferRequest) -> Result<u64> {
    let signature = request.signature()?;
    let sender =
        derive_address_from_signature(state.recovery.as_ref(), &request.message, &signature)?;
    let recipient = request.message.recipient;
    let amount = request.message.amount;

    let balance = state.ledger.transfer(&sender, &recipient, amount)?;
    state.metrics.record_transfer(amount);
    info!(%sender, %recipient, amount, balance, "Transfer accepted");

    Ok(balance)
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.export() {
        Ok(body) => (
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Failed to gather metrics",
                "details": e.to_string(),
            })),
        )
            .into_response(),
    }
}

/// Build the router with permissive CORS
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/balance/:address", get(get_balance))
        .route("/send", post(send))
        .route("/metrics", get(metrics_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Seed the ledger from `config` and serve until ctrl-c
pub async fn serve(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let ledger = Arc::new(Ledger::from_config(&config));
    let metrics = Metrics::new()?;
    let state = AppState::new(ledger, metrics).with_identity(&config);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
