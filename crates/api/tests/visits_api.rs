//! Integration tests for the visit history endpoint.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::{body_json, get};
use visitlog_core::types::RecordId;
use visitlog_core::visit::{VisitRecord, VISITS_TABLE};
use visitlog_store::MemoryStore;

fn record(id: &str, customer: &str, hour: u32) -> VisitRecord {
    VisitRecord {
        id: RecordId::new(id),
        created_at: Utc.with_ymd_and_hms(2025, 3, 31, hour, 0, 0).unwrap(),
        staff_name: "金城暁".into(),
        customer_name: customer.into(),
        category: "既存フォロー".into(),
        sub_category: "納品対応".into(),
        visit_type: Some("既存先".into()),
        content: Some("納品完了".into()),
        item_1: Some("名刺".into()),
        item_2: None,
        item_3: Some("".into()),
        item_4: None,
        ai_feedback: None,
    }
}

#[tokio::test]
async fn empty_store_returns_empty_history() {
    let app = common::build_test_app(Arc::new(MemoryStore::new()));
    let response = get(app, "/api/v1/visits").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
}

#[tokio::test]
async fn history_is_newest_first_in_local_dates() {
    let store = Arc::new(MemoryStore::new());
    store.seed(VISITS_TABLE, record("1", "早朝商店", 2)).await;
    store.seed(VISITS_TABLE, record("2", "深夜印刷", 16)).await;
    let app = common::build_test_app(Arc::clone(&store));

    let json = body_json(get(app, "/api/v1/visits").await).await;
    let history = json["data"].as_array().unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["customer_name"], "深夜印刷");
    // 16:00 UTC is already the next day at +09:00.
    assert_eq!(history[0]["date"], "2025/04/01");
    assert_eq!(history[1]["date"], "2025/03/31");

    let details = history[1]["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["label"], "納品商品");
    assert_eq!(details[0]["value"], "名刺");
}

#[tokio::test]
async fn feedback_appears_once_written() {
    let store = Arc::new(MemoryStore::new());
    store.seed(VISITS_TABLE, record("7", "A商事", 3)).await;
    let app = common::build_test_app(Arc::clone(&store));

    let json = body_json(get(app.clone(), "/api/v1/visits").await).await;
    assert!(json["data"][0].get("annotation").is_none());

    assert!(store.annotate(VISITS_TABLE, &RecordId::new("7"), "いい訪問です").await);

    let json = body_json(get(app, "/api/v1/visits").await).await;
    let annotation = &json["data"][0]["annotation"];
    assert_eq!(annotation["title"], "AI部長からの激励");
    assert_eq!(annotation["body"], "いい訪問です");
}

#[tokio::test]
async fn unreachable_store_is_reported() {
    let store = Arc::new(MemoryStore::new());
    store.set_failure(Some("timed out")).await;
    let app = common::build_test_app(store);

    let response = get(app, "/api/v1/visits").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"], "Record store unavailable: timed out");
}
