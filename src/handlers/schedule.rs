use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{PickupCategory, PickupSchedule};
use crate::services::{calendar, normalizer, orchestrator};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ScheduleQuery {
    pub address: String,
}

#[derive(Serialize)]
pub struct ScheduleView {
    pub city: String,
    pub schedule: PickupSchedule,
    pub next_pickups: BTreeMap<PickupCategory, NaiveDate>,
    pub summary: String,
}

/// Inspection endpoint: resolved schedule for an address as JSON, no
/// reminders and no session involvement.
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<ScheduleView>, AppError> {
    let geo = state
        .geocoder
        .geocode(&query.address)
        .await
        .map_err(|e| AppError::Geocoding(e.to_string()))?;

    let raw = state
        .schedule_source
        .fetch_raw_schedule(geo.latitude, geo.longitude)
        .await
        .map_err(|e| AppError::Gis(e.to_string()))?;

    let schedule = normalizer::normalize(&geo.city, &raw)?;
    let today = Utc::now().with_timezone(&state.config.timezone).date_naive();

    let next_pickups = schedule
        .iter()
        .filter_map(|(category, expr)| {
            calendar::next_expr_occurrence(today, expr).map(|date| (category, date))
        })
        .collect();

    Ok(Json(ScheduleView {
        city: geo.city,
        summary: orchestrator::summarize(&schedule),
        schedule,
        next_pickups,
    }))
}
