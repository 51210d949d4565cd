//! Route table.
//!
//! Path params use `:param` syntax (matchit 0.7 / axum 0.7). The patient
//! segment is named `patient_id` on every route so the trees agree.

mod encounters;
mod patients;

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patients", get(patients::query).post(patients::create))
        .route(
            "/patients/:patient_id",
            get(patients::get_by_id)
                .put(patients::update)
                .delete(patients::delete),
        )
        .route(
            "/patients/:patient_id/encounters",
            get(encounters::list).post(encounters::create),
        )
        .route(
            "/patients/:patient_id/encounters/:id",
            get(encounters::get_by_id).put(encounters::update),
        )
}
