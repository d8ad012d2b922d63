use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceExt;

use curbside::config::AppConfig;
use curbside::db;
use curbside::handlers;
use curbside::models::{PickupCategory, Recurrence, ReminderSpec};
use curbside::services::geocoding::{GeocodedAddress, Geocoder};
use curbside::services::gis::ScheduleSource;
use curbside::services::reminders::ReminderSink;
use curbside::state::AppState;

// ── Mock Collaborators ──

struct MockGeocoder {
    city: &'static str,
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, _address: &str) -> anyhow::Result<GeocodedAddress> {
        Ok(GeocodedAddress {
            latitude: 26.1224,
            longitude: -80.1373,
            city: self.city.to_string(),
        })
    }
}

struct MockScheduleSource {
    raw: BTreeMap<PickupCategory, String>,
}

#[async_trait]
impl ScheduleSource for MockScheduleSource {
    async fn fetch_raw_schedule(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> anyhow::Result<BTreeMap<PickupCategory, String>> {
        Ok(self.raw.clone())
    }
}

struct MockReminderSink {
    created: Arc<Mutex<Vec<ReminderSpec>>>,
}

#[async_trait]
impl ReminderSink for MockReminderSink {
    async fn create_reminder(&self, spec: &ReminderSpec) -> anyhow::Result<()> {
        self.created.lock().unwrap().push(spec.clone());
        Ok(())
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        google_api_key: "test-key".to_string(),
        gis_base_url: "http://localhost:9999".to_string(),
        reminders_api_url: "http://localhost:9999".to_string(),
        reminders_api_token: "test-token".to_string(),
        timezone: chrono_tz::America::New_York,
        reminder_lead_days: 1,
        reminder_lead_hour: 19,
    }
}

fn fort_lauderdale_raw() -> BTreeMap<PickupCategory, String> {
    [
        (PickupCategory::Trash, "Monday & Thursday"),
        (PickupCategory::Recycling, "Wednesday"),
        (PickupCategory::BulkTrash, "1st Tuesday"),
        (PickupCategory::YardWaste, "Friday"),
    ]
    .into_iter()
    .map(|(c, v)| (c, v.to_string()))
    .collect()
}

struct TestHarness {
    state: Arc<AppState>,
    created: Arc<Mutex<Vec<ReminderSpec>>>,
}

fn test_harness(city: &'static str, raw: BTreeMap<PickupCategory, String>) -> TestHarness {
    let conn = db::init_db(":memory:").unwrap();
    let created = Arc::new(Mutex::new(vec![]));
    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: test_config(),
        geocoder: Box::new(MockGeocoder { city }),
        schedule_source: Box::new(MockScheduleSource { raw }),
        reminders: Box::new(MockReminderSink {
            created: Arc::clone(&created),
        }),
    });
    TestHarness { state, created }
}

fn test_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/skill", post(handlers::skill::skill_turn))
        .route("/skill/session_ended", post(handlers::skill::session_ended))
        .route("/api/schedule", get(handlers::schedule::get_schedule))
        .with_state(state)
}

fn skill_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/skill")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(res: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let harness = test_harness("Fort Lauderdale", fort_lauderdale_raw());
    let app = test_app(harness.state);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

// ── Pickup Queries ──

#[tokio::test]
async fn test_query_full_schedule_summary() {
    let harness = test_harness("Fort Lauderdale", fort_lauderdale_raw());
    let app = test_app(harness.state);

    let res = app
        .oneshot(skill_request(serde_json::json!({
            "session_id": "s1",
            "address": "123 Main St",
            "intent": "pickup_query",
        })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(
        json["speech"],
        "Trash pickup is on Monday and Thursday. \
         Recycling pickup is on Wednesday. \
         Bulk trash pickup is on the 1st Tuesday of each month. \
         Yard waste pickup is on Friday."
    );
    // Query turns create no reminders.
    assert!(harness.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_query_trash_speaks_concrete_dates() {
    let harness = test_harness("Fort Lauderdale", fort_lauderdale_raw());
    let app = test_app(harness.state);

    let res = app
        .oneshot(skill_request(serde_json::json!({
            "session_id": "s1",
            "address": "123 Main St",
            "intent": "pickup_query",
            "categories": ["trash"],
        })))
        .await
        .unwrap();

    let json = json_body(res).await;
    let speech = json["speech"].as_str().unwrap();
    // Dates depend on the wall clock; shape and count do not.
    assert!(
        speech.starts_with("The next trash pickups are on "),
        "speech: {speech}"
    );
    assert!(speech.contains(" and "), "speech: {speech}");
}

#[tokio::test]
async fn test_query_unsupported_city_apologizes() {
    let harness = test_harness("Hollywood", fort_lauderdale_raw());
    let app = test_app(harness.state);

    let res = app
        .oneshot(skill_request(serde_json::json!({
            "session_id": "s1",
            "address": "123 Main St",
            "intent": "pickup_query",
        })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(
        json["speech"],
        "Sorry, I encountered an error. Please try again later."
    );
}

// ── Reminder Creation + Escalation Flow ──

#[tokio::test]
async fn test_set_reminders_first_turn_offers_upgrade() {
    let harness = test_harness("Fort Lauderdale", fort_lauderdale_raw());
    let app = test_app(Arc::clone(&harness.state));

    let res = app
        .oneshot(skill_request(serde_json::json!({
            "session_id": "s1",
            "address": "123 Main St",
            "intent": "set_reminders",
        })))
        .await
        .unwrap();

    let json = json_body(res).await;
    let speech = json["speech"].as_str().unwrap();
    assert!(
        speech.contains("Would you like me to set a recurring reminder"),
        "speech: {speech}"
    );
    assert!(json["reprompt"].is_string());

    // Two trash days + recycling + bulk + yard waste, all one-time.
    let created = harness.created.lock().unwrap();
    assert_eq!(created.len(), 5);
    assert!(created.iter().all(|r| r.recurrence == Recurrence::OneTime));

    // Offer state persisted for the next turn.
    let db = harness.state.db.lock().unwrap();
    let state = curbside::db::queries::get_session_state(&db, "s1").unwrap();
    assert_eq!(state, Some(curbside::models::EscalationState::Offered));
}

#[tokio::test]
async fn test_affirmative_second_turn_creates_recurring() {
    let harness = test_harness("Fort Lauderdale", fort_lauderdale_raw());

    let app = test_app(Arc::clone(&harness.state));
    app.oneshot(skill_request(serde_json::json!({
        "session_id": "s1",
        "address": "123 Main St",
        "intent": "set_reminders",
    })))
    .await
    .unwrap();

    let app = test_app(Arc::clone(&harness.state));
    let res = app
        .oneshot(skill_request(serde_json::json!({
            "session_id": "s1",
            "address": "123 Main St",
            "intent": "set_reminders",
            "affirmation": "yes",
        })))
        .await
        .unwrap();

    let json = json_body(res).await;
    let speech = json["speech"].as_str().unwrap();
    assert!(speech.contains("recurring"), "speech: {speech}");
    assert!(json["reprompt"].is_null());

    let created = harness.created.lock().unwrap();
    // 5 one-time from each turn, plus exactly one monthly-recurring.
    assert_eq!(created.len(), 11);
    let recurring: Vec<&ReminderSpec> = created
        .iter()
        .filter(|r| r.recurrence != Recurrence::OneTime)
        .collect();
    assert_eq!(recurring.len(), 1);
    assert_eq!(recurring[0].category, PickupCategory::BulkTrash);

    let db = harness.state.db.lock().unwrap();
    let state = curbside::db::queries::get_session_state(&db, "s1").unwrap();
    assert_eq!(state, Some(curbside::models::EscalationState::Accepted));
}

#[tokio::test]
async fn test_negative_second_turn_declines() {
    let harness = test_harness("Fort Lauderdale", fort_lauderdale_raw());

    let app = test_app(Arc::clone(&harness.state));
    app.oneshot(skill_request(serde_json::json!({
        "session_id": "s1",
        "address": "123 Main St",
        "intent": "set_reminders",
    })))
    .await
    .unwrap();

    let app = test_app(Arc::clone(&harness.state));
    let res = app
        .oneshot(skill_request(serde_json::json!({
            "session_id": "s1",
            "address": "123 Main St",
            "intent": "set_reminders",
            "affirmation": "no",
        })))
        .await
        .unwrap();

    let json = json_body(res).await;
    let speech = json["speech"].as_str().unwrap();
    assert!(speech.contains("one-time reminder"), "speech: {speech}");

    let created = harness.created.lock().unwrap();
    assert!(created.iter().all(|r| r.recurrence == Recurrence::OneTime));

    let db = harness.state.db.lock().unwrap();
    let state = curbside::db::queries::get_session_state(&db, "s1").unwrap();
    assert_eq!(state, Some(curbside::models::EscalationState::Declined));
}

#[tokio::test]
async fn test_tamarac_bulk_never_offers_upgrade() {
    let raw: BTreeMap<PickupCategory, String> = [
        (PickupCategory::Trash, "Mon/Thu"),
        (PickupCategory::BulkTrash, "Tuesday"),
    ]
    .into_iter()
    .map(|(c, v)| (c, v.to_string()))
    .collect();
    let harness = test_harness("Tamarac", raw);
    let app = test_app(Arc::clone(&harness.state));

    let res = app
        .oneshot(skill_request(serde_json::json!({
            "session_id": "s1",
            "address": "456 Pine Rd",
            "intent": "set_reminders",
        })))
        .await
        .unwrap();

    let json = json_body(res).await;
    let speech = json["speech"].as_str().unwrap();
    assert!(!speech.contains("recurring"), "speech: {speech}");
    assert!(json["reprompt"].is_null());

    let created = harness.created.lock().unwrap();
    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|r| r.recurrence == Recurrence::OneTime));
}

#[tokio::test]
async fn test_session_ended_clears_state() {
    let harness = test_harness("Fort Lauderdale", fort_lauderdale_raw());

    let app = test_app(Arc::clone(&harness.state));
    app.oneshot(skill_request(serde_json::json!({
        "session_id": "s1",
        "address": "123 Main St",
        "intent": "set_reminders",
    })))
    .await
    .unwrap();

    let app = test_app(Arc::clone(&harness.state));
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/skill/session_ended")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "session_id": "s1" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["deleted"], true);

    let db = harness.state.db.lock().unwrap();
    let state = curbside::db::queries::get_session_state(&db, "s1").unwrap();
    assert_eq!(state, None);
}

// ── Schedule Inspection API ──

#[tokio::test]
async fn test_schedule_api_returns_city_and_summary() {
    let harness = test_harness("Fort Lauderdale", fort_lauderdale_raw());
    let app = test_app(harness.state);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/schedule?address=123%20Main%20St")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["city"], "Fort Lauderdale");
    assert!(json["summary"]
        .as_str()
        .unwrap()
        .starts_with("Trash pickup is on Monday and Thursday."));
    assert!(json["next_pickups"]["bulk_trash"].is_string());
}

#[tokio::test]
async fn test_schedule_api_unsupported_city_is_422() {
    let harness = test_harness("Hollywood", fort_lauderdale_raw());
    let app = test_app(harness.state);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/schedule?address=123%20Main%20St")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(res).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("no pickup rules registered"));
}
