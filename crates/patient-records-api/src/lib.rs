//! Patient Records HTTP API
//!
//! JSON REST surface over the patient and encounter rule engines.
//!
//! | Method | Path                                   |
//! |--------|----------------------------------------|
//! | GET    | `/patients?field=value...`             |
//! | POST   | `/patients`                            |
//! | GET    | `/patients/:patient_id`                |
//! | PUT    | `/patients/:patient_id`                |
//! | DELETE | `/patients/:patient_id`                |
//! | GET    | `/patients/:patient_id/encounters`     |
//! | POST   | `/patients/:patient_id/encounters`     |
//! | GET    | `/patients/:patient_id/encounters/:id` |
//! | PUT    | `/patients/:patient_id/encounters/:id` |

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::{Arc, Mutex};

use axum::http::header::{HeaderValue, InvalidHeaderValue, CONTENT_TYPE};
use axum::http::Method;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use patient_records_core::{Database, ServiceResult};

pub use config::Config;
pub use error::ApiError;
pub use extract::ValidatedJson;

/// Shared handler state: one SQLite connection behind a mutex.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Run a blocking store operation off the async runtime.
    pub async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database) -> ServiceResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let db = db
                .lock()
                .map_err(|e| ApiError::Internal(format!("Lock poisoned: {e}")))?;
            f(&db).map_err(ApiError::from)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Store task failed: {e}")))?
    }
}

/// Build the API router with request tracing.
pub fn api_router(state: AppState) -> Router {
    routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// CORS policy admitting the browser front end at `origin`.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(origin)?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]))
}
