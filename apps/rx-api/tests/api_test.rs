use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use rx_api::{build_router, AppState};
use rx_core::StockPolicy;
use rx_db::{Database, DbConfig};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test app over a fresh in-memory database
async fn setup_app(policy: StockPolicy) -> Router {
    let db = Database::new(DbConfig::in_memory().stock_policy(policy))
        .await
        .expect("Failed to init DB");
    build_router(AppState::new(db))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn add_product(app: &Router, id: &str, price: Value, stock: i64) {
    let (status, _) = send(
        app,
        "POST",
        "/products",
        Some(json!({ "productId": id, "name": format!("Product {}", id), "salePrice": price })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    if stock > 0 {
        let (status, _) = send(
            app,
            "POST",
            "/purchases",
            Some(json!({ "productId": id, "quantity": stock })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_health() {
    let app = setup_app(StockPolicy::Reject).await;

    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_product_lifecycle() {
    let app = setup_app(StockPolicy::Reject).await;

    // Insert without an ID: first generated ID is "1"
    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({ "name": "Paracetamol 500mg", "salePrice": "3.50" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["product"]["productId"], "1");
    assert_eq!(body["product"]["salePriceCents"], 350);

    let (status, body) = send(&app, "GET", "/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["quantityAvailable"], 0);

    let (status, _) = send(
        &app,
        "PUT",
        "/products/1",
        Some(json!({ "name": "Paracetamol 500mg x20", "salePrice": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/products", None).await;
    assert_eq!(body["products"][0]["name"], "Paracetamol 500mg x20");
    assert_eq!(body["products"][0]["salePriceCents"], 600);

    let (status, _) = send(&app, "DELETE", "/products/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/products/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(&app, "DELETE", "/products/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_errors() {
    let app = setup_app(StockPolicy::Reject).await;
    add_product(&app, "P1", json!(10), 0).await;

    // Duplicate ID
    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({ "productId": "P1", "name": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // Empty name
    let (status, body) = send(&app, "POST", "/products", Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Three decimals
    let (status, _) = send(
        &app,
        "POST",
        "/products",
        Some(json!({ "name": "Too precise", "salePrice": "1.005" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Update of a missing product
    let (status, _) = send(&app, "PUT", "/products/404", Some(json!({ "name": "Ghost" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Malformed JSON keeps the error envelope
    let req = Request::builder()
        .method("POST")
        .uri("/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sale_and_dashboard_totals() {
    let app = setup_app(StockPolicy::Reject).await;
    add_product(&app, "P1", json!(10), 20).await;
    add_product(&app, "P2", json!("20.00"), 20).await;

    let (status, body) = send(
        &app,
        "POST",
        "/sales",
        Some(json!({
            "saleId": "INV-0001",
            "items": [
                { "productId": "P1", "quantity": 3 },
                { "productId": "P2", "quantity": 2 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["receipt"]["totalCents"], 7000);

    let (status, body) = send(&app, "GET", "/sales/INV-0001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));

    let (status, body) = send(&app, "GET", "/dashboard/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSalesCents"], 7000);
    assert_eq!(body["totalProducts"], 2);
    assert_eq!(body["topProducts"][0]["productId"], "P1");
    assert_eq!(body["stockDistribution"].as_array().map(Vec::len), Some(4));

    let (_, body) = send(&app, "GET", "/products/P1", None).await;
    assert_eq!(body["product"]["quantityAvailable"], 17);
}

#[tokio::test]
async fn test_oversell_rejected() {
    let app = setup_app(StockPolicy::Reject).await;
    add_product(&app, "P1", json!(10), 0).await;

    let (status, body) = send(
        &app,
        "POST",
        "/sales",
        Some(json!({ "saleId": "S1", "items": [{ "productId": "P1", "quantity": 5 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let (status, _) = send(&app, "GET", "/sales/S1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/products/P1", None).await;
    assert_eq!(body["product"]["quantityAvailable"], 0);
}

#[tokio::test]
async fn test_oversell_allowed() {
    let app = setup_app(StockPolicy::AllowNegative).await;
    add_product(&app, "P1", json!(10), 0).await;

    let (status, _) = send(
        &app,
        "POST",
        "/sales",
        Some(json!({ "saleId": "S1", "items": [{ "productId": "P1", "quantity": 5 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/products/P1", None).await;
    assert_eq!(body["product"]["quantityAvailable"], -5);
}

#[tokio::test]
async fn test_sale_validation() {
    let app = setup_app(StockPolicy::Reject).await;
    add_product(&app, "P1", json!(10), 10).await;

    for payload in [
        json!({ "saleId": "", "items": [{ "productId": "P1", "quantity": 1 }] }),
        json!({ "saleId": "S1", "items": [] }),
        json!({ "saleId": "S1", "items": [{ "productId": "P1", "quantity": 0 }] }),
    ] {
        let (status, body) = send(&app, "POST", "/sales", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let (status, _) = send(
        &app,
        "POST",
        "/sales",
        Some(json!({ "saleId": "S1", "items": [{ "productId": "GHOST", "quantity": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_suppliers_and_purchases() {
    let app = setup_app(StockPolicy::Reject).await;
    add_product(&app, "P1", json!(10), 0).await;

    let (status, body) = send(
        &app,
        "POST",
        "/suppliers",
        Some(json!({ "name": "MediSupply Co", "contact": "0300-1234567" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["supplier"]["suppId"], "1");

    let (status, _) = send(
        &app,
        "POST",
        "/purchases",
        Some(json!({ "productId": "P1", "quantity": 30, "suppId": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        "/purchases",
        Some(json!({ "productId": "P1", "quantity": 5, "suppId": "99" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/suppliers", None).await;
    assert_eq!(body["suppliers"].as_array().map(Vec::len), Some(1));

    let (status, _) = send(&app, "DELETE", "/suppliers/1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", "/suppliers/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/products/P1", None).await;
    assert_eq!(body["product"]["quantityAvailable"], 30);
}

#[tokio::test]
async fn test_create_user() {
    let app = setup_app(StockPolicy::Reject).await;

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "username": "pharm01", "password": "correct horse", "role": "pharmacist" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "pharmacist");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "username": "pharm01", "password": "correct horse", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "username": "cashier1", "password": "correct horse", "role": "cashier" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/dashboard/stats", None).await;
    assert_eq!(body["totalUsers"], 1);
}

#[tokio::test]
async fn test_oversized_price_rejected() {
    let app = setup_app(StockPolicy::Reject).await;

    for price in [json!("92233720368547758.07"), json!("1000000000000000"), json!(1000001)] {
        let (status, body) = send(
            &app,
            "POST",
            "/products",
            Some(json!({ "productId": "P1", "name": "Orphan drug", "salePrice": price })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    add_product(&app, "P1", json!("1000000.00"), 0).await;
    let (status, body) = send(
        &app,
        "PUT",
        "/products/P1",
        Some(json!({ "name": "Orphan drug", "salePrice": "1000000.01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_dashboard_at_largest_allowed_values() {
    let app = setup_app(StockPolicy::Reject).await;
    add_product(&app, "P1", json!("1000000.00"), rx_core::MAX_PURCHASE_QUANTITY).await;

    let (status, body) = send(
        &app,
        "POST",
        "/sales",
        Some(json!({ "saleId": "S1", "items": [{ "productId": "P1", "quantity": 999 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["receipt"]["totalCents"], 99_900_000_000_i64);

    let (status, body) = send(&app, "GET", "/dashboard/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSalesCents"], 99_900_000_000_i64);
    assert_eq!(
        body["inventoryValueCents"],
        (rx_core::MAX_PURCHASE_QUANTITY - 999) * rx_core::MAX_PRICE_CENTS
    );
}

#[tokio::test]
async fn test_low_stock_listing() {
    let app = setup_app(StockPolicy::Reject).await;
    add_product(&app, "P1", json!(10), 3).await;
    add_product(&app, "P2", json!(10), 50).await;
    add_product(&app, "P3", json!(10), 0).await;

    let (status, body) = send(&app, "GET", "/products/low-stock", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["productId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["P3", "P1"]);
}
