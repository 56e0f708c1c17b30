mod common;

use axum::http::StatusCode;
use axum::{Router, routing::get};
use axum_test::TestServer;
use common::MemoryStore;
use fixmycar::api::handlers::health_handler;
use fixmycar::api::routes::api_routes;
use serde_json::{Value, json};
use std::sync::Arc;

fn server(store: &Arc<MemoryStore>) -> TestServer {
    let state = common::create_test_state(store);
    let app = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .with_state(state);

    TestServer::new(app).unwrap()
}

async fn create_customer(server: &TestServer, email: &str, phone: &str) -> i64 {
    let response = server
        .post("/api/customers")
        .json(&json!({
            "first_name": "Ann",
            "last_name": "Lee",
            "email": email,
            "phone": phone
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

async fn create_car(server: &TestServer, vin: &str, customer_id: i64) -> i64 {
    let response = server
        .post("/api/cars")
        .json(&json!({
            "brand": "VW",
            "model": "Golf",
            "vin": vin,
            "year": 2010,
            "customer_id": customer_id
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

async fn create_center(server: &TestServer) -> i64 {
    let response = server
        .post("/api/service-centers")
        .json(&json!({ "name": "Fix", "address": "123 St", "phone": "555-0100" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_reports_database_and_caches() {
    let store = MemoryStore::new();
    let server = server(&store);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["caches"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_duplicate_email_returns_conflict() {
    let store = MemoryStore::new();
    let server = server(&store);
    create_customer(&server, "a@x.com", "555-0100").await;

    let response = server
        .post("/api/customers")
        .json(&json!({
            "first_name": "Bob",
            "last_name": "Ray",
            "email": "a@x.com",
            "phone": "555-0199"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "conflict");
    assert_eq!(json["error"]["details"]["field"], "email");
}

#[tokio::test]
async fn test_invalid_email_returns_bad_request() {
    let store = MemoryStore::new();
    let server = server(&store);

    let response = server
        .post("/api/customers")
        .json(&json!({
            "first_name": "Ann",
            "last_name": "Lee",
            "email": "not-an-email",
            "phone": "555-0100"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_missing_and_non_positive_ids() {
    let store = MemoryStore::new();
    let server = server(&store);

    let missing = server.get("/api/customers/999").await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(missing.json::<Value>()["error"]["code"], "not_found");

    server
        .get("/api/cars/0")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_status_flow() {
    let store = MemoryStore::new();
    let server = server(&store);
    let customer_id = create_customer(&server, "a@x.com", "555-0100").await;
    let car_id = create_car(&server, "V1", customer_id).await;
    let center_id = create_center(&server).await;

    let created = server
        .post("/api/requests")
        .json(&json!({
            "description": "brake check",
            "car_id": car_id,
            "customer_id": customer_id,
            "service_center_id": center_id
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let request = created.json::<Value>();
    assert_eq!(request["status"], "PENDING");
    let request_id = request["id"].as_i64().unwrap();

    server
        .patch(&format!("/api/requests/{}/status", request_id))
        .json(&json!({ "status": "DONE" }))
        .await
        .assert_status_ok();

    let fetched = server.get(&format!("/api/requests/{}", request_id)).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>()["status"], "DONE");

    let of_center = server
        .get(&format!("/api/service-centers/{}/requests", center_id))
        .await;
    assert_eq!(of_center.json::<Value>().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_transfer_and_customer_cascade() {
    let store = MemoryStore::new();
    let server = server(&store);
    let ann = create_customer(&server, "a@x.com", "555-0100").await;
    let bob = create_customer(&server, "b@x.com", "555-0101").await;
    let car_id = create_car(&server, "V1", ann).await;
    create_car(&server, "V2", ann).await;

    let moved = server
        .put(&format!("/api/cars/{}/owner", car_id))
        .json(&json!({ "customer_id": bob }))
        .await;
    moved.assert_status_ok();
    assert_eq!(moved.json::<Value>()["customer_id"], bob);

    let ann_cars = server.get(&format!("/api/customers/{}/cars", ann)).await;
    assert_eq!(ann_cars.json::<Value>().as_array().unwrap().len(), 1);

    let deleted = server.delete(&format!("/api/customers/{}", ann)).await;
    deleted.assert_status_ok();
    let json = deleted.json::<Value>();
    assert_eq!(json["kind"], "customer");
    assert_eq!(json["deleted_cars"].as_array().unwrap().len(), 1);

    server
        .get(&format!("/api/customers/{}", ann))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get(&format!("/api/cars/{}", car_id))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_bulk_create_with_year_filter() {
    let store = MemoryStore::new();
    let server = server(&store);
    let customer_id = create_customer(&server, "a@x.com", "555-0100").await;

    let response = server
        .post("/api/cars/bulk")
        .add_query_param("year_filter", 2010)
        .json(&json!([
            { "brand": "VW", "model": "Golf", "vin": "V1", "year": 2010, "customer_id": customer_id },
            { "brand": "VW", "model": "Polo", "vin": "V2", "year": 2015, "customer_id": customer_id },
            { "brand": "VW", "model": "Golf", "vin": "V1", "year": 2010, "customer_id": customer_id }
        ]))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["created"], 1);
    let outcomes: Vec<&str> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["outcome"].as_str().unwrap())
        .collect();
    assert_eq!(outcomes, vec!["created", "skipped", "failed"]);
    assert_eq!(json["items"][2]["code"], "conflict");
}

#[tokio::test]
async fn test_remove_request_from_service_center() {
    let store = MemoryStore::new();
    let customer = store.seed_customer("a@x.com");
    let car = store.seed_car("V1", customer.id);
    let center = store.seed_service_center("Fix");
    let other = store.seed_service_center("Other");
    let request = store.seed_request(car.id, customer.id, center.id);
    let server = server(&store);

    server
        .delete(&format!(
            "/api/service-centers/{}/requests/{}",
            other.id, request.id
        ))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .delete(&format!(
            "/api/service-centers/{}/requests/{}",
            center.id, request.id
        ))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert_eq!(store.request_count(), 0);
}
