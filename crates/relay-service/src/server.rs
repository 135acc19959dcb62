//! HTTP server for the relay API.
//!
//! Routes, all under `/api`:
//! - `POST /gasless/submit`: validate and publish a gasless deposit
//! - `POST /sponsored-cctp/sign`: sign a sponsored CCTP quote (bearer token)
//! - `GET /health`: liveness and sponsor address

use crate::apis::{cctp, gasless::GaslessSubmitHandler, health::HealthResponse};
use axum::{
	extract::{rejection::JsonRejection, State},
	http::{HeaderMap, HeaderName, HeaderValue, Method},
	response::Json,
	routing::{get, post},
	Router,
};
use relay_config::{ApiConfig, CorsConfig};
use relay_sponsor::SponsorService;
use relay_types::{APIError, GaslessSubmitResponse, SecretString, SponsoredSignature};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
	cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
	limit::RequestBodyLimitLayer,
	timeout::TimeoutLayer,
	trace::TraceLayer,
};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Configured `service.id`.
	pub service_id: String,
	pub sponsor: Arc<SponsorService>,
	pub gasless: Arc<GaslessSubmitHandler>,
	/// Bearer token of the signing endpoint; `None` disables it.
	pub auth_token: Option<SecretString>,
}

/// Builds the router with middleware configured from `api`.
pub fn build_router(state: AppState, api: &ApiConfig) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/gasless/submit", post(handle_gasless_submit))
				.route("/sponsored-cctp/sign", post(handle_sponsored_cctp_sign))
				.route("/health", get(handle_health)),
		)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(RequestBodyLimitLayer::new(api.max_request_size))
				// Timeout sits inside the body limit; it needs a `Default` response body.
				.layer(TimeoutLayer::new(Duration::from_secs(api.timeout_seconds)))
				.layer(cors_layer(api.cors.as_ref())),
		)
		.with_state(state)
}

/// Binds `host:port` and serves until Ctrl-C.
pub async fn start_server(
	api_config: ApiConfig,
	state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(state, &api_config);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Relay API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(async {
			if let Err(e) = tokio::signal::ctrl_c().await {
				tracing::error!("Failed to listen for shutdown signal: {}", e);
			}
		})
		.await?;

	Ok(())
}

fn cors_layer(cors: Option<&CorsConfig>) -> CorsLayer {
	let Some(cors) = cors else {
		return CorsLayer::permissive();
	};

	let origins: AllowOrigin = if cors.allowed_origins.is_empty() {
		Any.into()
	} else {
		AllowOrigin::list(parse_list::<HeaderValue>(&cors.allowed_origins, "origin"))
	};
	let headers: AllowHeaders = if cors.allowed_headers.is_empty() {
		Any.into()
	} else {
		AllowHeaders::list(parse_list::<HeaderName>(&cors.allowed_headers, "header"))
	};
	let methods: AllowMethods = if cors.allowed_methods.is_empty() {
		Any.into()
	} else {
		AllowMethods::list(parse_list::<Method>(&cors.allowed_methods, "method"))
	};

	CorsLayer::new()
		.allow_origin(origins)
		.allow_headers(headers)
		.allow_methods(methods)
}

fn parse_list<T: std::str::FromStr>(values: &[String], kind: &str) -> Vec<T> {
	values
		.iter()
		.filter_map(|value| match value.parse() {
			Ok(parsed) => Some(parsed),
			Err(_) => {
				tracing::warn!("Ignoring invalid CORS {}: {}", kind, value);
				None
			},
		})
		.collect()
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, APIError> {
	payload
		.map(|Json(body)| body)
		.map_err(|e| APIError::invalid_input(format!("Invalid JSON body: {}", e.body_text())))
}

/// Handles POST /api/gasless/submit requests.
async fn handle_gasless_submit(
	State(state): State<AppState>,
	payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GaslessSubmitResponse>, APIError> {
	let body = json_body(payload)?;
	match state.gasless.handle(body).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Gasless submission failed: {}", e);
			Err(e)
		},
	}
}

/// Handles POST /api/sponsored-cctp/sign requests.
async fn handle_sponsored_cctp_sign(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SponsoredSignature>, APIError> {
	if let Err(e) = cctp::authorize(state.auth_token.as_ref(), &headers) {
		tracing::warn!("Sponsored signing refused: {}", e);
		return Err(e);
	}

	let body = json_body(payload)?;
	match cctp::sign_sponsored_quote(body, &state.sponsor).await {
		Ok(signed) => Ok(Json(signed)),
		Err(e) => {
			tracing::warn!("Sponsored signing failed: {}", e);
			Err(e)
		},
	}
}

/// Handles GET /api/health requests.
async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
	Json(HealthResponse::ok(
		state.service_id.clone(),
		state.sponsor.address(),
	))
}
