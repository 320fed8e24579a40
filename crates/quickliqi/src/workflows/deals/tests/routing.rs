use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

use crate::workflows::deals::router::create_handler;
use crate::workflows::deals::DealPipelineService;

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn create_route_returns_evaluated_deal() {
    let (service, _, _) = build_service();
    let router = deal_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/deals",
            serde_json::to_value(strong_submission()).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "New");
    assert_eq!(body["deal_signal"], "Green");
    assert_eq!(body["deal_notes"], "Meets buyer criteria.");
    assert_eq!(body["mao_cash"], 52_800);
    assert_eq!(body["dscr"], 999.0);
    assert_eq!(body["property_type"], "SFR");
}

#[tokio::test]
async fn create_handler_rejects_invalid_state() {
    let (service, _, _) = build_service();
    let mut submission = strong_submission();
    submission.state = "Tennessee".to_string();

    let response = create_handler(State(Arc::new(service)), axum::Json(submission)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("two-letter"));
}

#[tokio::test]
async fn create_handler_maps_storage_failure_to_internal_error() {
    let service = Arc::new(DealPipelineService::new(
        Arc::new(ReadOnlyRepository),
        Arc::new(MemorySettingsStore::default()),
    ));

    let response = create_handler(State(service), axum::Json(strong_submission())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_deal_returns_not_found() {
    let (service, _, _) = build_service();
    let router = deal_router_with_service(service);

    let response = router
        .oneshot(empty_request("GET", "/api/deals/deal-424242"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "record not found");
}

#[tokio::test]
async fn list_route_filters_by_status_label() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let kept = service.create(strong_submission()).expect("deal");
    let moved = service.create(strong_submission()).expect("deal");
    service
        .update_status(&moved.id, crate::workflows::deals::DealStatus::OfferSent)
        .expect("moved");
    let router = crate::workflows::deals::deal_router(service);

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/deals?status=Offer%20Sent"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let deals = body.as_array().expect("deal list");
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0]["id"], moved.id.0.as_str());

    let response = router
        .oneshot(empty_request("GET", "/api/deals?status=New"))
        .await
        .unwrap();
    let body = read_json_body(response).await;
    assert_eq!(body[0]["id"], kept.id.0.as_str());
}

#[tokio::test]
async fn settings_routes_read_and_cascade() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let deal = service.create(strong_submission()).expect("deal");
    let router = crate::workflows::deals::deal_router(service.clone());

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/settings"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["min_coc_pct"], 12.0);
    assert_eq!(body["rent_input_mode"], "manual");

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/settings",
            json!({ "min_coc_pct": 20.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["min_coc_pct"], 20.0);

    let refreshed = service.get(&deal.id).expect("deal");
    assert_eq!(refreshed.metrics.deal_notes, "CoC 15.0% < 20%.");
}

#[tokio::test]
async fn status_patch_and_delete_round_trip() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let deal = service.create(strong_submission()).expect("deal");
    let router = crate::workflows::deals::deal_router(service.clone());
    let uri = format!("/api/deals/{}", deal.id.0);

    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("{uri}/status"),
            json!({ "status": "Under Contract" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "Under Contract");

    let response = router
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recalculate_route_reports_count() {
    let (service, _, _) = build_service();
    service.create(strong_submission()).expect("deal");
    let router = deal_router_with_service(service);

    let response = router
        .oneshot(empty_request("POST", "/api/calculate-metrics"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["updated"], 1);
    assert_eq!(body["message"], "Recalculated metrics for 1 deals");
}

#[tokio::test]
async fn export_route_serves_csv_attachment() {
    let (service, _, _) = build_service();
    service.create(strong_submission()).expect("deal");
    let router = deal_router_with_service(service);

    let response = router
        .oneshot(empty_request("GET", "/api/export"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=quickliqi_deals_"));

    let body = read_text_body(response).await;
    assert!(body.starts_with("Address,City,State,Price"));
    assert_eq!(body.lines().count(), 2);
}
