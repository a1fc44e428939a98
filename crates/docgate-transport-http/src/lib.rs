//! HTTP transport adapter for docgate.
//! Exposes document CRUD routes behind a shared API key gate.

pub mod auth;
pub mod envelope;
mod error;
pub mod handlers;
pub mod router;
mod routes;
pub mod server;

pub use auth::{load_secret, ApiKeyGate, ApiKeyPrincipal, AuthError, DEFAULT_API_KEY_HEADER};
pub use envelope::{Envelope, FetchedFrom};
pub use error::HttpTransportError;
pub use handlers::DocumentHandlers;
pub use router::{build_router, AppState};
pub use server::HttpServer;
