//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding handler
//! - Wire up middleware (request ID, tracing, CORS headers, preflight)
//! - Bind server to listener with graceful shutdown
//! - Convert pipeline errors into JSON envelopes at one boundary

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    response::{IntoResponse, Response},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::forwarding::{ErrorKind, Forwarder};
use crate::http::middleware::{preflight_middleware, CorsHeaders};
use crate::http::request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
use crate::observability::metrics;
use crate::security::Credential;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
}

/// Errors building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid CORS header value: {0}")]
    Cors(#[from] header::InvalidHeaderValue),
}

/// HTTP server for the forwarding proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and credential.
    pub fn new(config: ProxyConfig, credential: Credential) -> Result<Self, ServerError> {
        let forwarder = Arc::new(Forwarder::new(&config, credential)?);
        let cors = CorsHeaders::from_config(&config.cors)?;

        tracing::debug!(
            prefix = forwarder.prefix(),
            upstream = %config.upstream.base_url,
            "Forwarder initialized"
        );

        let router = Self::build_router(AppState { forwarder }, cors);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, cors: CorsHeaders) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %req.request_id(),
                )
            }))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                cors.allow_origin,
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                cors.allow_methods,
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                cors.allow_headers,
            ))
            .layer(axum::middleware::from_fn(preflight_middleware));

        Router::new()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(middleware)
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            prefix = %self.config.routing.prefix,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single entry point: every non-preflight request lands here.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(method = %method, path = %path, "Forwarding request");

    match state.forwarder.forward(request).await {
        Ok(response) => {
            let status = response.status().as_u16();
            tracing::info!(method = %method, path = %path, status, "Relayed upstream response");
            metrics::record_request(&method, status, metrics::OUTCOME_RELAYED, start_time);
            response
        }
        Err(e) => {
            let kind = e.kind();
            match kind {
                ErrorKind::Internal => {
                    tracing::error!(method = %method, path = %path, error = %e, "Error forwarding request");
                }
                ErrorKind::Configuration => {
                    tracing::error!(error = %e, "Proxy is misconfigured");
                }
                ErrorKind::Usage | ErrorKind::UpstreamEmpty => {
                    tracing::warn!(method = %method, path = %path, error = %e, "Request not relayed");
                }
            }
            let response = e.into_response();
            metrics::record_request(&method, response.status().as_u16(), kind.as_str(), start_time);
            response
        }
    }
}
