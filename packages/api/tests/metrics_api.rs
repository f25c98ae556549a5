mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, current_month};
use serde_json::{Value, json};
use storage_metrics_api::entity::sea_orm_active_enums::UserRole;

async fn seed_facility(app: &TestApp, token: &str) {
    for (id, size, price) in [("A1", "5m²", 50.0), ("A2", "10m²", 100.0), ("B1", "20m²", 200.0)] {
        let (status, _) = app
            .post(
                "/api/v1/units",
                token,
                json!({ "id": id, "size": size, "pricePerMonth": price, "floor": 0 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create unit {id}");
    }

    let (status, customer) = app
        .post(
            "/api/v1/customers",
            token,
            json!({ "name": "Jane Doe", "email": "jane@example.com", "type": "private" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/api/v1/units/A2/rent",
            token,
            json!({ "customerId": customer["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_calculate_creates_then_updates_the_current_month() {
    let app = TestApp::new().await;
    let token = app.token("manager", UserRole::Manager).await;

    let (status, body) = app.post("/api/v1/metrics/calculate", &token, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], true);
    assert_eq!(body["metric"]["month"], current_month());
    assert_eq!(body["metric"]["totalUnits"], 0);
    assert_eq!(body["metric"]["occupancyRate"], 0.0);

    let (status, body) = app.post("/api/v1/metrics/calculate", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);

    let (status, list) = app.get("/api/v1/metrics", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_snapshot_reflects_units_and_customers() {
    let app = TestApp::new().await;
    let token = app.token("admin", UserRole::Admin).await;
    seed_facility(&app, &token).await;

    let (status, body) = app.post("/api/v1/metrics/calculate", &token, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);

    let metric = &body["metric"];
    assert_eq!(metric["totalUnits"], 3);
    assert_eq!(metric["occupiedUnits"], 1);
    assert_eq!(metric["occupancyRate"], 33.33);
    assert_eq!(metric["totalRevenue"], 100.0);
    assert_eq!(metric["newCustomers"], 1);
    assert_eq!(metric["churnedCustomers"], 0);
    assert_eq!(metric["averageRentalDuration"], 0.0);
    assert_eq!(metric["revenueBySize"]["10m²"], 100.0);
    assert_eq!(metric["occupancyBySize"]["5m²"]["occupied"], 0);

    let (status, stored) = app
        .get(&format!("/api/v1/metrics/{}", current_month()), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["totalRevenue"], 100.0);
}

fn without_updated_at(mut metric: Value) -> Value {
    if let Some(fields) = metric.as_object_mut() {
        fields.remove("updatedAt");
    }
    metric
}

#[tokio::test]
async fn test_recalculation_follows_rentals() {
    let app = TestApp::new().await;
    let token = app.token("admin", UserRole::Admin).await;
    seed_facility(&app, &token).await;

    let (status, first) = app.post("/api/v1/metrics/calculate", &token, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["metric"]["occupiedUnits"], 1);
    assert_eq!(first["metric"]["totalRevenue"], 100.0);

    let (_, customers) = app.get("/api/v1/customers", &token).await;
    let customer_id = customers["items"][0]["id"].clone();
    let (status, _) = app
        .post("/api/v1/units/A1/rent", &token, json!({ "customerId": customer_id }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = app.post("/api/v1/metrics/calculate", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], false);
    assert_eq!(second["metric"]["occupiedUnits"], 2);
    assert_eq!(second["metric"]["occupancyRate"], 66.67);
    assert_eq!(second["metric"]["totalRevenue"], 150.0);
    assert_eq!(second["metric"]["revenueBySize"]["5m²"], 50.0);
    assert_eq!(second["metric"]["createdAt"], first["metric"]["createdAt"]);

    let (status, _) = app.post("/api/v1/units/A2/release", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, third) = app.post("/api/v1/metrics/calculate", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(third["created"], false);
    assert_eq!(third["metric"]["occupiedUnits"], 1);
    assert_eq!(third["metric"]["totalRevenue"], 50.0);
    assert!(third["metric"]["revenueBySize"].get("10m²").is_none());

    let (status, list) = app.get("/api/v1/metrics", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["totalRevenue"], 50.0);
}

#[tokio::test]
async fn test_recalculating_unchanged_data_is_stable() {
    let app = TestApp::new().await;
    let token = app.token("admin", UserRole::Admin).await;
    seed_facility(&app, &token).await;

    let (_, first) = app.post("/api/v1/metrics/calculate", &token, json!({})).await;
    let (status, second) = app.post("/api/v1/metrics/calculate", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], false);
    assert_eq!(
        without_updated_at(second["metric"].clone()),
        without_updated_at(first["metric"].clone())
    );
}

#[tokio::test]
async fn test_ten_units_six_rented_at_fifty() {
    let app = TestApp::new().await;
    let token = app.token("admin", UserRole::Admin).await;

    let (_, customer) = app
        .post(
            "/api/v1/customers",
            &token,
            json!({ "name": "Acme Storage Ltd", "type": "business", "companyName": "Acme" }),
        )
        .await;
    for n in 0..10 {
        let id = format!("U{n:02}");
        let (status, _) = app
            .post(
                "/api/v1/units",
                &token,
                json!({ "id": id, "size": "5m²", "pricePerMonth": 50.0 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        if n < 6 {
            let (status, _) = app
                .post(
                    &format!("/api/v1/units/{id}/rent"),
                    &token,
                    json!({ "customerId": customer["id"] }),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    let (_, body) = app.post("/api/v1/metrics/calculate", &token, json!({})).await;
    assert_eq!(body["metric"]["occupancyRate"], 60.0);
    assert_eq!(body["metric"]["totalRevenue"], 300.0);
    assert_eq!(body["metric"]["revenueBySize"]["5m²"], 300.0);
    assert_eq!(body["metric"]["occupancyBySize"]["5m²"]["total"], 10);
}

#[tokio::test]
async fn test_month_lookup_errors() {
    let app = TestApp::new().await;
    let token = app.token("staff", UserRole::Staff).await;

    let (status, body) = app.get("/api/v1/metrics/1999-01", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = app.get("/api/v1/metrics/2024-13", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .get("/api/v1/metrics?startMonth=January", &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_permissions() {
    let app = TestApp::new().await;
    let staff = app.token("staff", UserRole::Staff).await;

    let (status, _) = app
        .request(Method::GET, "/api/v1/metrics/dashboard", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.post("/api/v1/metrics/calculate", &staff, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _) = app.get("/api/v1/metrics/dashboard", &staff).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::GET,
            "/api/v1/metrics",
            Some("not-a-token"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_and_analytics() {
    let app = TestApp::new().await;
    let token = app.token("admin", UserRole::Admin).await;
    seed_facility(&app, &token).await;
    app.post("/api/v1/metrics/calculate", &token, json!({})).await;

    let (status, dashboard) = app.get("/api/v1/metrics/dashboard", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["overview"]["totalUnits"], 3);
    assert_eq!(dashboard["overview"]["occupiedUnits"], 1);
    assert_eq!(dashboard["overview"]["availableUnits"], 2);
    assert_eq!(dashboard["overview"]["activeCustomers"], 1);
    assert_eq!(dashboard["overview"]["currentRevenue"], 100.0);
    assert_eq!(dashboard["overview"]["potentialRevenue"], 350.0);
    assert_eq!(
        dashboard["historicalMetrics"].as_array().map(Vec::len),
        Some(1)
    );
    assert_eq!(dashboard["trends"]["revenueChange"], 0.0);

    let (status, revenue) = app.get("/api/v1/metrics/revenue?months=6", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(revenue["currentRevenue"], 100.0);
    assert_eq!(revenue["lostRevenue"], 250.0);

    let (status, occupancy) = app.get("/api/v1/metrics/occupancy", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(occupancy["monthlyTrend"].as_array().map(Vec::len), Some(1));
}
