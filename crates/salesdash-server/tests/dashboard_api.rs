//! Route tests for the dashboard server

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use salesdash_data::{DataBundle, DataSources, DateRange};
use salesdash_server::{render, router, AppState, Metrics};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt;

fn write_fixtures(dir: &TempDir) {
    fs::write(
        dir.path().join("monthly_sales.csv"),
        "year_month,total_revenue,total_orders\n\
         2017-01,127545.67,750\n\
         2017-02,271298.65,1653\n\
         2017-03,414369.39,2546\n\
         2018-08,985491.64,6351\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("product_summary.csv"),
        "product_category_name_english,total_revenue,total_items_sold\n\
         health_beauty,1233131.72,9670\n\
         watches_gifts,1165898.98,5859\n\
         bed_bath_table,1023434.76,10953\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("city_sales.csv"),
        "customer_city,total_orders,order_category\n\
         sao paulo,15045,High\n\
         rio de janeiro,6601,High\n\
         campinas,1398,Medium\n\
         niteroi,820,Low\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("new_customers_trend.csv"),
        "year_month,new_customers\n\
         2017-01,750\n\
         2017-02,1650\n\
         2017-03,2540\n",
    )
    .unwrap();
}

fn create_test_app(dir: &TempDir) -> Router {
    write_fixtures(dir);
    let bundle = DataBundle::load(&DataSources::in_directory(dir.path()))
        .expect("Failed to load fixtures");
    let metrics = Metrics::new().expect("Failed to register metrics");
    router(AppState::new(bundle, DateRange::default(), metrics))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed");

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

fn slot_state<'a>(panels: &'a Value, id: &str) -> &'a str {
    panels["panels"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|panel| panel["charts"].as_array().unwrap())
        .find(|slot| slot["id"] == id)
        .and_then(|slot| slot["outcome"]["state"].as_str())
        .unwrap_or_else(|| panic!("slot {id} not found"))
}

#[tokio::test]
async fn test_health_check() {
    let dir = TempDir::new().unwrap();
    let (status, _, body) = get(create_test_app(&dir), "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_dashboard_page_defaults() {
    let dir = TempDir::new().unwrap();
    let (status, headers, body) = get(create_test_app(&dir), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(body.contains("📊 E-commerce Sales Dashboard"));
    assert!(body.contains("Filter Data"));
    assert!(body.contains(r#"value="2017-01-01""#));
    assert!(body.contains(r#"value="2018-08-31""#));
    assert!(body.contains("Dashboard E-commerce Sales"));
    assert!(body.contains(r#""monthly-revenue": {"#));
}

#[tokio::test]
async fn test_dashboard_page_uses_query_range() {
    let dir = TempDir::new().unwrap();
    let (status, _, body) = get(
        create_test_app(&dir),
        "/?start=2017-02-01&end=2017-03-31",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"value="2017-02-01""#));
    assert!(body.contains(r#"value="2017-03-31""#));
}

#[tokio::test]
async fn test_malformed_date_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let (status, _, body) = get(create_test_app(&dir), "/?start=01/02/2017").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("01/02/2017"));
}

#[tokio::test]
async fn test_api_panels_filters_trends() {
    let dir = TempDir::new().unwrap();
    let (status, headers, body) = get(
        create_test_app(&dir),
        "/api/panels?start=2017-01-01&end=2017-02-28",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers.contains_key(header::ETAG));

    let panels: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(panels["range"]["start"], "2017-01-01");

    let points = panels["panels"][0]["charts"][0]["outcome"]["chart"]["points"]
        .as_array()
        .unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[1]["label"], "2017-02");
}

#[tokio::test]
async fn test_api_panels_inverted_range() {
    let dir = TempDir::new().unwrap();
    let (status, _, body) = get(
        create_test_app(&dir),
        "/api/panels?start=2018-01-01&end=2017-01-01",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let panels: Value = serde_json::from_str(&body).unwrap();

    for id in ["monthly-revenue", "monthly-orders", "new-customer-growth"] {
        assert_eq!(slot_state(&panels, id), "no_data");
    }
    for id in [
        "top-categories-revenue",
        "top-categories-items",
        "top-cities-orders",
        "city-clustering",
    ] {
        assert_eq!(slot_state(&panels, id), "ready");
    }
}

#[tokio::test]
async fn test_api_panels_etag_is_stable() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);

    let (_, first, _) = get(app.clone(), "/api/panels").await;
    let (_, second, _) = get(app.clone(), "/api/panels").await;
    let etag = first[header::ETAG].to_str().unwrap().to_string();
    assert_eq!(etag, second[header::ETAG].to_str().unwrap());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/panels")
                .header(header::IF_NONE_MATCH, &etag)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_api_panels_if_none_match_list() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);

    let (_, headers, _) = get(app.clone(), "/api/panels").await;
    let etag = headers[header::ETAG].to_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/panels")
                .header(header::IF_NONE_MATCH, format!(r#""other", {etag}"#))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[test]
fn test_reloaded_fixtures_share_fingerprint() {
    let dir = TempDir::new().unwrap();
    write_fixtures(&dir);
    let sources = DataSources::in_directory(dir.path());

    let first = DataBundle::load(&sources).expect("Failed to load fixtures");
    let second = DataBundle::load(&sources).expect("Failed to reload fixtures");

    let range = DateRange::default();
    assert_eq!(
        render(&first, range).fingerprint(),
        render(&second, range).fingerprint()
    );
}

#[tokio::test]
async fn test_metrics_count_renders() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);

    get(app.clone(), "/").await;
    get(app.clone(), "/api/panels?start=2018-01-01&end=2017-01-01").await;
    let (status, _, body) = get(app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("salesdash_renders_total 2"));
    assert!(body.contains(r#"salesdash_chart_outcomes_total{outcome="no_data"} 3"#));
    assert!(body.contains(r#"salesdash_chart_outcomes_total{outcome="ready"} 11"#));
}
