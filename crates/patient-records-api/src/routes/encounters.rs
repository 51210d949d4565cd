//! Encounter endpoints, nested under their patient.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use patient_records_core::{Encounter, EncounterService};

use crate::error::ApiError;
use crate::extract::{IdPath, ValidatedJson};
use crate::AppState;

/// `GET /patients/:patient_id/encounters`
pub async fn list(
    State(state): State<AppState>,
    IdPath(patient_id): IdPath<i64>,
) -> Result<Json<Vec<Encounter>>, ApiError> {
    let encounters = state
        .run(move |db| EncounterService::new(db).get_encounters_by_patient_id(patient_id))
        .await?;
    Ok(Json(encounters))
}

/// `GET /patients/:patient_id/encounters/:id`
pub async fn get_by_id(
    State(state): State<AppState>,
    IdPath((patient_id, id)): IdPath<(i64, i64)>,
) -> Result<Json<Encounter>, ApiError> {
    tracing::info!(patient_id, id, "Request received to get encounter by id");
    let encounter = state
        .run(move |db| EncounterService::new(db).get_encounter_by_id(id, patient_id))
        .await?;
    Ok(Json(encounter))
}

/// `POST /patients/:patient_id/encounters`
pub async fn create(
    State(state): State<AppState>,
    IdPath(patient_id): IdPath<i64>,
    ValidatedJson(encounter): ValidatedJson<Encounter>,
) -> Result<(StatusCode, Json<Encounter>), ApiError> {
    tracing::info!(patient_id, "Request received to add encounter");
    let created = state
        .run(move |db| EncounterService::new(db).add_encounter(&encounter, patient_id))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /patients/:patient_id/encounters/:id`
pub async fn update(
    State(state): State<AppState>,
    IdPath((patient_id, id)): IdPath<(i64, i64)>,
    ValidatedJson(encounter): ValidatedJson<Encounter>,
) -> Result<Json<Encounter>, ApiError> {
    tracing::info!(patient_id, id, "Request received to update encounter");
    let updated = state
        .run(move |db| {
            EncounterService::new(db).update_encounter_by_id(id, &encounter, patient_id)
        })
        .await?;
    Ok(Json(updated))
}
