//! HCMO form server.
//!
//! Routes:
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | POST | `/api/export` | `{ "jsonld": <document> }` | export bundle |
//! | POST | `/api/graph` | form fields | JSON-LD document, 422 on invalid form |
//! | GET | `/api/blueprint/inventory` | | `{ "tiers" or "domains", "statusIcons" }` |
//! | GET | `/api/blueprint/examples` | | `{ "statusIcons", "examples" }` |
//! | POST | `/api/blueprint/score` | `{ "exampleId"?, "fields"? }` | coverage summary |
//! | GET | `/healthz` | | `ok` |
//!
//! Anything else is served from the public directory when one is configured.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod error;
pub mod handlers;

use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use hcmo_blueprint::{Blueprint, BlueprintError};
use hcmo_conformance::Exporter;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::AppError;

/// Request body limit.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Export pipeline.
    pub exporter: Exporter,
    blueprint: Result<Arc<Blueprint>, Arc<str>>,
}

impl AppState {
    /// State over an exporter and the outcome of loading the blueprint.
    /// A load failure is logged and reported by the blueprint endpoints.
    pub fn new(exporter: Exporter, blueprint: Result<Blueprint, BlueprintError>) -> Self {
        let blueprint = blueprint.map(Arc::new).map_err(|e| {
            tracing::error!(error = %e, "blueprint failed to load; blueprint endpoints disabled");
            Arc::from(e.to_string())
        });
        Self {
            exporter,
            blueprint,
        }
    }

    /// Loads the blueprint and builds the exporter from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let blueprint = Blueprint::load(&config.inventory_source(), &config.examples);
        Self::new(config.exporter(), blueprint)
    }

    /// The loaded blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if it failed to load.
    pub fn blueprint(&self) -> Result<&Blueprint, AppError> {
        self.blueprint
            .as_deref()
            .map_err(|reason| AppError::Unavailable(Arc::clone(reason)))
    }
}

/// Builds the application router.
pub fn build_router(state: AppState, public_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/export", post(handlers::export))
        .route("/api/graph", post(handlers::graph))
        .route("/api/blueprint/inventory", get(handlers::inventory))
        .route("/api/blueprint/examples", get(handlers::examples))
        .route("/api/blueprint/score", post(handlers::score))
        .route("/healthz", get(handlers::health))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match public_dir {
        Some(dir) if dir.is_dir() => {
            tracing::info!(dir = %dir.display(), "serving static files");
            api.fallback_service(ServeDir::new(dir))
        }
        Some(dir) => {
            tracing::warn!(dir = %dir.display(), "public directory not found; static files disabled");
            api
        }
        None => api,
    }
}
