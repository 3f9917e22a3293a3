//! Router construction and serving.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderValue, Request},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::gateway::ContractProvider;
use crate::lifecycle::shutdown_signal;
use crate::rest::handlers::{invoke_handler, query_handler, AppState};

/// Default per-request deadline. Covers endorse, submit and commit status.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Request ids as 32 random hex digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRequestId;

impl MakeRequestId for RandomRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id: u128 = rand::random();
        HeaderValue::from_str(&format!("{:032x}", id))
            .ok()
            .map(RequestId::new)
    }
}

/// REST facade bound to one contract provider.
pub struct RestServer {
    router: Router,
}

impl RestServer {
    pub fn new(provider: Arc<dyn ContractProvider>, request_timeout: Duration) -> Self {
        Self {
            router: Self::build_router(provider, request_timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(provider: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/invoke", post(invoke_handler))
            .route("/query", get(query_handler))
            .with_state(provider)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(RandomRequestId))
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until a shutdown signal arrives.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "REST server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("REST server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_distinct_hex() {
        let request = Request::new(());
        let mut maker = RandomRequestId;
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();

        let a = a.header_value().to_str().unwrap().to_string();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b.header_value().to_str().unwrap());
    }
}
