use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use equus_api::{app, AppState};
use equus_booking::BookingPolicy;
use equus_catalog::{AdditionalBenefit, HorseRecord, JourneyRecord, PriceUnit, ServiceRecord, ServiceType};
use equus_core::ReservationSubmitter;
use equus_store::{InMemoryCatalog, InMemoryReservationStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: Arc<InMemoryReservationStore>,
}

fn service(id: &str, service_type: ServiceType, price_unit: PriceUnit, benefits: Vec<AdditionalBenefit>) -> ServiceRecord {
    ServiceRecord {
        id: id.to_string(),
        name: id.to_string(),
        price: 100,
        price_unit,
        service_type,
        additional_benefits: benefits,
        provider_ref: Some("provider-1".to_string()),
        is_active: true,
    }
}

async fn setup() -> TestApp {
    let catalog = InMemoryCatalog::new();
    catalog
        .add_service(service("svc-stable", ServiceType::HorseStable, PriceUnit::PerDay, vec![]))
        .await;
    catalog
        .add_service(service(
            "svc-vet",
            ServiceType::Veterinary,
            PriceUnit::PerProject,
            vec![AdditionalBenefit::new("Go to Horse Home", 150)],
        ))
        .await;
    catalog
        .add_service(service(
            "svc-photo",
            ServiceType::PhotographyServices,
            PriceUnit::PerProject,
            vec![AdditionalBenefit::new("Drone", 50), AdditionalBenefit::new("Album", 75)],
        ))
        .await;
    catalog
        .add_horse(HorseRecord {
            id: "horse-1".to_string(),
            name: "Najm".to_string(),
            owner_ref: Some("user-1".to_string()),
        })
        .await;
    catalog
        .add_journey(JourneyRecord {
            id: "journey-1".to_string(),
            name: "Desert ride".to_string(),
            max_participants: Some(10),
        })
        .await;

    let store = Arc::new(InMemoryReservationStore::new());
    let state = AppState {
        catalog: Arc::new(catalog),
        submitter: Arc::new(ReservationSubmitter::new(store.clone())),
        policy: Arc::new(BookingPolicy::default()),
    };

    TestApp {
        router: app(state),
        store,
    }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn stable_draft(days: i64) -> Value {
    let start = Utc::now() + Duration::days(7);
    json!({
        "serviceRef": "svc-stable",
        "startDate": start.to_rfc3339(),
        "endDate": (start + Duration::days(days)).to_rfc3339(),
        "horses": ["horse-1"]
    })
}

#[tokio::test]
async fn test_health() {
    let app = setup().await;
    let (status, body) = send(&app.router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_catalog_routes() {
    let app = setup().await;

    let (status, body) = send(&app.router, "GET", "/v1/services/svc-vet", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serviceType"], "veterinary");

    let (status, _) = send(&app.router, "GET", "/v1/services/svc-missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, horses) = send(&app.router, "GET", "/v1/users/user-1/horses", None).await;
    assert_eq!(horses.as_array().unwrap().len(), 1);

    let (_, journeys) = send(&app.router, "GET", "/v1/journeys", None).await;
    assert_eq!(journeys[0]["id"], "journey-1");
}

#[tokio::test]
async fn test_quote_uses_catalog_prices() {
    let app = setup().await;

    // Client-side price and surcharges are ignored
    let draft = json!({
        "serviceRef": "svc-photo",
        "unitPrice": 1,
        "additionalBenefits": [{"name": "Drone", "price": 0}, {"name": "Album", "price": 0}]
    });
    let (status, quote) = send(&app.router, "POST", "/v1/reservations/quote", Some(json!({ "draft": draft }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["units"], 1);
    assert_eq!(quote["total"], 225);

    let (_, quote) = send(
        &app.router,
        "POST",
        "/v1/reservations/quote",
        Some(json!({ "draft": stable_draft(3) })),
    )
    .await;
    assert_eq!(quote["units"], 3);
    assert_eq!(quote["total"], 300);
}

#[tokio::test]
async fn test_validate_reports_field_errors() {
    let app = setup().await;

    let draft = json!({
        "serviceRef": "svc-vet",
        "horse": "horse-1",
        "additionalBenefits": [{"name": "Go to Horse Home"}]
    });
    let (status, body) = send(&app.router, "POST", "/v1/reservations/validate", Some(json!({ "draft": draft }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["errors"]["providedAddress"], "address required when on-site service selected");

    let (_, body) = send(
        &app.router,
        "POST",
        "/v1/reservations/validate",
        Some(json!({ "draft": {"serviceRef": "svc-stable"}, "step": "horses" })),
    )
    .await;
    assert_eq!(body["errors"], json!({"horses": "at least one horse required"}));
}

#[tokio::test]
async fn test_submit_reservation() {
    let app = setup().await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/v1/reservations",
        Some(json!({ "userRef": "user-1", "draft": stable_draft(3) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["totalPrice"], 300);

    let id = body["id"].as_str().unwrap();
    let stored = app.store.get(id).await.unwrap();
    assert_eq!(stored.total_price, 300);
    assert_eq!(stored.user.id, "user-1");
    assert_eq!(stored.items[0].horses[0].id, "horse-1");
}

#[tokio::test]
async fn test_submit_rejects_equal_dates() {
    let app = setup().await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/v1/reservations",
        Some(json!({ "userRef": "user-1", "draft": stable_draft(0) })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["endDate"], "end date must be after start");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_submit_cart() {
    let app = setup().await;

    let shoot = json!({
        "serviceRef": "svc-photo",
        "projectDetails": {"description": "wedding shoot"},
        "locationLink": "https://maps.example/x",
        "additionalBenefits": [{"name": "Drone"}, {"name": "Album"}]
    });
    let (status, body) = send(
        &app.router,
        "POST",
        "/v1/reservations",
        Some(json!({ "userRef": "user-1", "drafts": [stable_draft(3), shoot] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["totalPrice"], 525);
}

#[tokio::test]
async fn test_store_failure_is_bad_gateway() {
    let app = setup().await;
    app.store.set_unavailable(true);

    let (status, body) = send(
        &app.router,
        "POST",
        "/v1/reservations",
        Some(json!({ "userRef": "user-1", "draft": stable_draft(3) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "submission failed"}));
}

#[tokio::test]
async fn test_unknown_benefit_and_empty_cart() {
    let app = setup().await;

    let draft = json!({
        "serviceRef": "svc-vet",
        "horse": "horse-1",
        "additionalBenefits": [{"name": "Free saddle"}]
    });
    let (status, _) = send(&app.router, "POST", "/v1/reservations/quote", Some(json!({ "draft": draft }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        "POST",
        "/v1/reservations",
        Some(json!({ "userRef": "user-1", "drafts": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_steps_for_service_type() {
    let app = setup().await;

    let (status, body) = send(
        &app.router,
        "GET",
        "/v1/reservations/steps/horse_stable?priceUnit=per_day",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["steps"], json!(["horses", "schedule", "extras", "review"]));

    let (status, _) = send(&app.router, "GET", "/v1/reservations/steps/dragon_riding", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
