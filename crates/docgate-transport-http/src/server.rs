//! HTTP server that binds an axum Router to a TCP socket.

use std::future::Future;

use tokio::net::TcpListener;

use crate::error::HttpTransportError;
use crate::router::{build_router, AppState};

/// Axum-based HTTP server for the document gateway.
pub struct HttpServer {
    pub(crate) addr: String,
    pub(crate) state: AppState,
}

impl HttpServer {
    /// Creates a new HTTP server.
    ///
    /// # Arguments
    ///
    /// * `state` - store context and API key gate
    /// * `addr` - `host:port` to listen on
    pub fn new(state: AppState, addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            state,
        }
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run<F>(self, shutdown: F) -> Result<(), HttpTransportError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener =
            TcpListener::bind(self.addr.as_str())
                .await
                .map_err(|e| HttpTransportError::Bind {
                    addr: self.addr.clone(),
                    source: e,
                })?;

        let local = listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| self.addr.clone());
        tracing::info!(addr = %local, "docgate HTTP server ready");

        let router = build_router(self.state);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| HttpTransportError::Serve(e.to_string()))?;

        tracing::info!("HTTP server stopped accepting connections");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgate_runtime::{AppContext, InstanceRegistry};

    use crate::auth::ApiKeyGate;

    fn state() -> AppState {
        AppState::new(
            AppContext::new(InstanceRegistry::default()),
            ApiKeyGate::new(None, "s3cret").expect("gate"),
        )
    }

    #[test]
    fn new_keeps_address() {
        let server = HttpServer::new(state(), "0.0.0.0:3000");
        assert_eq!(server.addr, "0.0.0.0:3000");
    }

    #[tokio::test]
    async fn unparsable_address_is_bind_error() {
        let server = HttpServer::new(state(), "not-an-address");
        let err = server.run(async {}).await.expect_err("bind fails");
        assert!(matches!(err, HttpTransportError::Bind { .. }));
    }

    #[tokio::test]
    async fn resolved_shutdown_stops_server() {
        let server = HttpServer::new(state(), "127.0.0.1:0");
        server.run(async {}).await.expect("clean stop");
    }
}
