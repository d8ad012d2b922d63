use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::{AppError, ScheduleError};
use crate::models::{Affirmation, EscalationState, PickupCategory, PickupSchedule, ScheduleExpr};
use crate::services::orchestrator::{self, ResolveOutcome};
use crate::services::planner::ReminderPolicy;
use crate::services::{calendar, normalizer};
use crate::state::AppState;

const APOLOGY: &str = "Sorry, I encountered an error. Please try again later.";

const UPGRADE_OFFER: &str =
    "Would you like me to set a recurring reminder every month for bulk trash pickup?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillIntent {
    /// "When is my next pickup?" — answer only, no reminders created.
    PickupQuery,
    /// "Remind me" — create reminders and run the upgrade flow.
    SetReminders,
}

#[derive(Debug, Deserialize)]
pub struct SkillRequest {
    pub session_id: String,
    pub address: String,
    pub intent: SkillIntent,
    #[serde(default)]
    pub categories: Option<Vec<PickupCategory>>,
    /// Yes/no slot from the platform when this turn answers the
    /// recurring-reminder offer.
    #[serde(default)]
    pub affirmation: Option<Affirmation>,
}

#[derive(Debug, Serialize)]
pub struct SkillResponse {
    pub speech: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionEndedRequest {
    pub session_id: String,
}

/// Session-ended notification from the platform. Clears the stored
/// escalation state so the next conversation starts fresh.
pub async fn session_ended(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionEndedRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_session(&db, &req.session_id)
            .map_err(|e| AppError::Session(e.to_string()))?
    };
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

/// One conversational turn. Core errors become the apology line here;
/// the voice platform expects speech, not HTTP error codes.
pub async fn skill_turn(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SkillRequest>,
) -> Json<SkillResponse> {
    match run_turn(&state, &req).await {
        Ok(resp) => Json(resp),
        Err(e) => {
            tracing::error!(error = %e, session = %req.session_id, "skill turn failed");
            Json(SkillResponse {
                speech: APOLOGY.to_string(),
                reprompt: None,
            })
        }
    }
}

async fn run_turn(state: &Arc<AppState>, req: &SkillRequest) -> Result<SkillResponse, AppError> {
    let geo = state
        .geocoder
        .geocode(&req.address)
        .await
        .map_err(|e| AppError::Geocoding(e.to_string()))?;

    tracing::info!(city = %geo.city, intent = ?req.intent, session = %req.session_id, "processing turn");

    let raw = state
        .schedule_source
        .fetch_raw_schedule(geo.latitude, geo.longitude)
        .await
        .map_err(|e| AppError::Gis(e.to_string()))?;

    let today = Utc::now().with_timezone(&state.config.timezone).date_naive();

    match req.intent {
        SkillIntent::PickupQuery => {
            let schedule = normalizer::normalize(&geo.city, &raw)?;
            let speech = match &req.categories {
                Some(categories) => next_pickup_speech(&schedule, categories, today)?,
                None => orchestrator::summarize(&schedule),
            };
            Ok(SkillResponse {
                speech,
                reprompt: None,
            })
        }
        SkillIntent::SetReminders => {
            // An unqualified "remind me" covers whatever categories the
            // address actually has; explicit requests stay strict.
            let categories = req
                .categories
                .clone()
                .unwrap_or_else(|| raw.keys().copied().collect());
            let policy = ReminderPolicy {
                lead_days: state.config.reminder_lead_days,
                lead_hour: state.config.reminder_lead_hour,
                categories,
            };

            let escalation_state = {
                let db = state.db.lock().unwrap();
                queries::get_session_state(&db, &req.session_id)
                    .map_err(|e| AppError::Session(e.to_string()))?
            }
            .unwrap_or(EscalationState::NotOffered);

            let outcome = orchestrator::resolve_for_address(
                &geo.city,
                &raw,
                &policy,
                today,
                state.config.timezone,
                escalation_state,
                req.affirmation,
            )?;

            for spec in &outcome.reminders {
                state
                    .reminders
                    .create_reminder(spec)
                    .await
                    .map_err(|e| AppError::Reminder(e.to_string()))?;
            }

            {
                let db = state.db.lock().unwrap();
                queries::save_session_state(&db, &req.session_id, outcome.escalation)
                    .map_err(|e| AppError::Session(e.to_string()))?;
            }

            let (speech, reprompt) = set_reminders_speech(&outcome, req.affirmation);
            Ok(SkillResponse { speech, reprompt })
        }
    }
}

fn set_reminders_speech(
    outcome: &ResolveOutcome,
    affirmation: Option<Affirmation>,
) -> (String, Option<String>) {
    let count = outcome.reminders.len();
    let mut speech = if count == 1 {
        format!("I've set a reminder for your next pickup. {}", outcome.summary)
    } else {
        format!(
            "I've set {count} reminders for your upcoming pickups. {}",
            outcome.summary
        )
    };

    match (outcome.escalation, affirmation) {
        (EscalationState::Accepted, Some(Affirmation::Yes)) => {
            speech.push_str(
                " I've also set a recurring reminder for bulk trash pickup every month.",
            );
        }
        (EscalationState::Declined, Some(Affirmation::No)) => {
            speech.push_str(
                " Okay, I've only set a one-time reminder for your next bulk trash pickup.",
            );
        }
        _ => {}
    }

    if outcome.offer_upgrade {
        speech.push(' ');
        speech.push_str(UPGRADE_OFFER);
        (speech, Some(UPGRADE_OFFER.to_string()))
    } else {
        (speech, None)
    }
}

/// Concrete next pickup dates for the requested categories, e.g.
/// "The next trash pickups are on Monday, June 23 and Thursday, June 19."
fn next_pickup_speech(
    schedule: &PickupSchedule,
    categories: &[PickupCategory],
    today: NaiveDate,
) -> Result<String, ScheduleError> {
    let mut sentences = Vec::new();

    for category in PickupCategory::ALL {
        if !categories.contains(&category) {
            continue;
        }
        let expr = schedule
            .get(category)
            .ok_or(ScheduleError::UnresolvableSchedule(category))?;
        let label = category.label().to_lowercase();

        let sentence = match expr {
            ScheduleExpr::WeeklyMultiDay(days) if days.len() > 1 => {
                let dates: Vec<String> = days
                    .iter()
                    .map(|day| spoken_date(calendar::next_weekday_occurrence(today, *day)))
                    .collect();
                format!("The next {label} pickups are on {}.", dates.join(" and "))
            }
            expr => {
                let next = calendar::next_expr_occurrence(today, expr)
                    .ok_or(ScheduleError::UnresolvableSchedule(category))?;
                format!("The next {label} pickup is on {}.", spoken_date(next))
            }
        };
        sentences.push(sentence);
    }

    Ok(sentences.join(" "))
}

fn spoken_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}
