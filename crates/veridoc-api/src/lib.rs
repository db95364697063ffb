//! # veridoc-api — HTTP Front-End
//!
//! Exposes the validation engine over HTTP:
//!
//! - `POST /api/validate` — run one validation pass; the request body is
//!   the serialized request contract, as JSON or YAML.
//! - `GET /health` — liveness probe, unauthenticated.
//!
//! ## Crate Policy
//!
//! - No validation logic in handlers — everything delegates to the engine.
//! - All errors map to structured HTTP responses via [`AppError`].
//! - Engine calls run on the blocking pool: schema fetches block.

use std::sync::Arc;

use veridoc_engine::Engine;

pub mod error;
pub mod routes;

pub use error::AppError;

/// Shared application state: one engine reused by every request.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Engine>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            engine: Arc::new(Engine::new()),
        }
    }

    pub fn with_engine(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
