use reqwest::StatusCode;
use restock_analytics::AnalyticsConfig;
use restock_core::{ItemId, TenantId};
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = restock_api::app::build_app(AnalyticsConfig::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn post(&self, tenant: Option<TenantId>, path: &str, body: Value) -> (StatusCode, Value) {
        let mut req = reqwest::Client::new()
            .post(format!("{}{}", self.base_url, path))
            .json(&body);
        if let Some(t) = tenant {
            req = req.header("x-tenant-id", t.to_string());
        }
        let res = req.send().await.unwrap();
        let status = res.status();
        let body = res.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn monthly(quantity: f64, months: u32) -> Value {
    let points: Vec<Value> = (1..=months)
        .map(|m| json!({ "period": format!("2024-{m:02}-01"), "quantity": quantity }))
        .collect();
    json!({ "granularity": "monthly", "points": points })
}

fn item(sku: &str, current: i64, safety: i64, reorder_point: i64) -> Value {
    json!({
        "id": ItemId::new().to_string(),
        "sku": sku,
        "name": format!("Item {sku}"),
        "current_stock": current,
        "safety_stock": safety,
        "reorder_point": reorder_point,
        "moq": 10,
        "lead_time_days": 7,
        "unit_cost": 1000.0,
        "unit_price": 1500.0
    })
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn tenant_header_is_required() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.post(None, "/v1/forecast", json!({ "history": [1.0] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_tenant");

    let res = reqwest::Client::new()
        .post(format!("{}/v1/forecast", srv.base_url))
        .header("x-tenant-id", "not-a-uuid")
        .json(&json!({ "history": [1.0] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_tenant");
}

#[tokio::test]
async fn evaluate_ranks_critical_item() {
    let srv = TestServer::spawn().await;
    let tenant = TenantId::new();

    let body = json!({
        "items": [
            { "item": item("SKU-CRIT", 5, 20, 35), "monthly_demand": monthly(60.0, 6) },
            { "item": item("SKU-OK", 200, 20, 35), "monthly_demand": monthly(60.0, 6) }
        ]
    });
    let (status, report) = srv.post(Some(tenant), "/v1/replenishment/evaluate", body).await;
    assert_eq!(status, StatusCode::OK, "body={report}");

    assert_eq!(report["tenant_id"], tenant.to_string());
    assert_eq!(report["forecasts"].as_array().unwrap().len(), 2);
    let recs = report["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["rank"], 1);
    assert_eq!(recs[0]["recommendation"]["sku"], "SKU-CRIT");
    assert_eq!(recs[0]["recommendation"]["status"], "critical");
    assert_eq!(recs[0]["recommendation"]["urgency_level"], 3);
    assert_eq!(recs[0]["recommendation"]["recommended_quantity"], 541);
    assert!(report["failures"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn evaluate_reports_invalid_items_as_failures() {
    let srv = TestServer::spawn().await;
    let mut bad = item("SKU-BAD", 5, 20, 35);
    bad["moq"] = json!(0);

    let (status, report) = srv
        .post(
            Some(TenantId::new()),
            "/v1/replenishment/evaluate",
            json!({ "items": [{ "item": bad, "monthly_demand": monthly(10.0, 4) }] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["failures"][0]["sku"], "SKU-BAD");
}

#[tokio::test]
async fn evaluate_isolates_overflowing_item() {
    let srv = TestServer::spawn().await;
    let mut huge = item("SKU-HUGE", 5, 20, 35);
    huge["unit_cost"] = json!(1e-30);
    let body = json!({
        "items": [
            { "item": huge, "monthly_demand": monthly(1e20, 6), "revenue": 1.0 },
            { "item": item("SKU-CRIT", 5, 20, 35), "monthly_demand": monthly(60.0, 6) }
        ]
    });
    let (status, report) = srv.post(Some(TenantId::new()), "/v1/replenishment/evaluate", body).await;
    assert_eq!(status, StatusCode::OK, "body={report}");
    assert_eq!(report["failures"][0]["sku"], "SKU-HUGE");
    assert_eq!(report["recommendations"][0]["recommendation"]["sku"], "SKU-CRIT");
}

#[tokio::test]
async fn forecast_replays_moving_average() {
    let srv = TestServer::spawn().await;
    let body = json!({
        "history": [10.0, 12.0, 11.0, 13.0, 12.0],
        "periods": 2,
        "parameters": { "method": "sma", "window_size": 3, "average": 12.0 }
    });
    let (status, result) = srv.post(Some(TenantId::new()), "/v1/forecast", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["method"], "sma");
    assert_eq!(result["forecast"], json!([12.0, 12.0]));

    let (status, auto) = srv
        .post(Some(TenantId::new()), "/v1/forecast", json!({ "history": [], "periods": 3 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(auto["forecast"], json!([0.0, 0.0, 0.0]));
    assert_eq!(auto["accuracy"]["confidence"], "low");
}

#[tokio::test]
async fn classify_marks_new_items() {
    let srv = TestServer::spawn().await;
    let body = json!({
        "items": [
            { "item_id": ItemId::new().to_string(), "name": "old", "monthly_demand": monthly(10.0, 6), "value": 900.0 },
            { "item_id": ItemId::new().to_string(), "name": "new", "monthly_demand": monthly(10.0, 2), "value": 100.0 }
        ]
    });
    let (status, out) = srv.post(Some(TenantId::new()), "/v1/classify", body).await;
    assert_eq!(status, StatusCode::OK);
    let out = out.as_array().unwrap();
    assert_eq!(out[0]["kind"], "graded");
    assert_eq!(out[0]["xyz_grade"], "X");
    assert_eq!(out[1]["kind"], "new_item");
    assert_eq!(out[1]["months_of_history"], 1);
}

#[tokio::test]
async fn eoq_reference_values_and_validation() {
    let srv = TestServer::spawn().await;
    let tenant = TenantId::new();

    let (status, out) = srv
        .post(
            Some(tenant),
            "/v1/policy/eoq",
            json!({ "annual_demand": 1200.0, "ordering_cost": 50000.0, "holding_cost_per_unit": 2500.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["eoq"], 220);

    let (status, err) = srv
        .post(
            Some(tenant),
            "/v1/policy/eoq",
            json!({ "annual_demand": -1.0, "holding_cost_per_unit": 10.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation_error");
}

#[tokio::test]
async fn kpi_proposals_are_sorted_by_priority() {
    let srv = TestServer::spawn().await;
    let targets = json!({
        "inventory_turnover": 12.0,
        "average_inventory_days": 30.0,
        "inventory_accuracy": 98.0,
        "stockout_rate": 2.0,
        "on_time_order_rate": 95.0,
        "average_lead_time_days": 7.0,
        "order_fulfillment_rate": 97.0
    });
    let mut metrics = targets.clone();
    metrics["average_inventory_days"] = json!(40.0);
    metrics["stockout_rate"] = json!(4.0);

    let (status, out) = srv
        .post(
            Some(TenantId::new()),
            "/v1/kpi/proposals",
            json!({ "metrics": metrics, "targets": targets }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body={out}");
    let out = out.as_array().unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0]["kind"], "recalculate_buffers");
    assert_eq!(out[0]["priority"], "high");
    assert_eq!(out[1]["kind"], "shorten_order_cycle");

    let (status, out) = srv
        .post(
            Some(TenantId::new()),
            "/v1/kpi/proposals",
            json!({ "metrics": targets, "targets": targets, "category": "order" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(out.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn simulation_runs_ten_scenarios() {
    let srv = TestServer::spawn().await;
    let body = json!({
        "item_id": ItemId::new().to_string(),
        "current_stock": 50,
        "average_daily_demand": 10.0,
        "demand_std_dev": 3.0,
        "lead_time_days": 7.0
    });
    let (status, out) = srv.post(Some(TenantId::new()), "/v1/policy/simulate", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["scenarios"].as_array().unwrap().len(), 10);
    assert_eq!(out["baseline"]["reorder_point"], 84);
}
