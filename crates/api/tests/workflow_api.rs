//! End-to-end marketplace flows against a PostGIS database.

mod common;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::Utc;
use common::{
    body_json, build_test_app, get, post_json_as, post_raw, put_json_as, IDENTITY_SECRET,
    PAYMENT_SECRET,
};
use leasehold_core::signature::{sign_payment_webhook, sign_svix};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn register_manager(pool: &PgPool, clerk_id: &str) {
    let response = post_json_as(
        build_test_app(pool.clone()),
        "/api/v1/managers",
        clerk_id,
        json!({
            "clerk_id": clerk_id,
            "name": "Kofi Manager",
            "email": format!("{clerk_id}@example.com"),
            "phone_number": "+233240000000"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn list_property(pool: &PgPool, manager: &str, name: &str, price: f64, extra: Value) -> Value {
    let mut body = json!({
        "name": name,
        "description": "Sunny rooms near the market",
        "price_per_month": price,
        "security_deposit": price,
        "property_type": "Apartment",
        "beds": 2,
        "baths": 1.0,
        "square_feet": 850,
        "amenities": "wifi,parking",
        "manager_clerk_id": manager,
        "address": "12 Oxford St",
        "city": "Accra",
        "country": "Ghana"
    });
    if let (Some(target), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        target.extend(extra.clone());
    }
    let response =
        post_json_as(build_test_app(pool.clone()), "/api/v1/properties", manager, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn application_body(property_id: &Value, tenant: &str) -> Value {
    json!({
        "property_id": property_id,
        "tenant_clerk_id": tenant,
        "name": "Ama Mensah",
        "email": "ama@example.com",
        "phone_number": "+233200000000",
        "message": "Available from next month"
    })
}

/// Submit an application for `tenant` and return its id.
async fn submit_application(pool: &PgPool, property_id: &Value, tenant: &str) -> i64 {
    let response = post_json_as(
        build_test_app(pool.clone()),
        "/api/v1/applications",
        tenant,
        application_body(property_id, tenant),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn decide(pool: &PgPool, application_id: i64, manager: &str, status: &str) -> Response {
    put_json_as(
        build_test_app(pool.clone()),
        &format!("/api/v1/applications/{application_id}/status"),
        manager,
        json!({ "status": status }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_application_approval_creates_lease_and_pending_payment(pool: PgPool) {
    register_manager(&pool, "mgr_1").await;
    register_manager(&pool, "mgr_2").await;
    let property = list_property(&pool, "mgr_1", "Osu Loft", 900.0, json!({})).await;
    let property_id = property["id"].clone();

    // Geocoded because no coordinates were supplied.
    let latitude = property["location"]["latitude"].as_f64().unwrap();
    assert!((latitude - common::GEOCODED.latitude).abs() < 1e-9);
    assert_eq!(property["amenities"], json!(["WiFi", "Parking"]));

    let app = build_test_app(pool.clone());
    let response =
        post_json_as(app, "/api/v1/applications", "tenant_1", application_body(&property_id, "tenant_1"))
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let application = body_json(response).await["data"].clone();
    assert_eq!(application["status"], "Pending");
    assert_eq!(application["tenant"]["clerk_id"], "tenant_1");
    assert_eq!(application["manager"]["clerk_id"], "mgr_1");
    assert!(application["lease"].is_null());
    let application_id = application["id"].as_i64().unwrap();

    // A second active application for the same property is rejected.
    let app = build_test_app(pool.clone());
    let response =
        post_json_as(app, "/api/v1/applications", "tenant_1", application_body(&property_id, "tenant_1"))
            .await;
    common::assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;

    // Only the owning manager may decide.
    let status_uri = format!("/api/v1/applications/{application_id}/status");
    let app = build_test_app(pool.clone());
    let response = put_json_as(app, &status_uri, "mgr_2", json!({"status": "Approved"})).await;
    common::assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let app = build_test_app(pool.clone());
    let response = put_json_as(app, &status_uri, "mgr_1", json!({"status": "Approved"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let approved = body_json(response).await["data"].clone();
    assert_eq!(approved["status"], "Approved");
    assert_eq!(approved["lease"]["rent"], 900.0);
    assert_eq!(approved["lease"]["deposit"], 900.0);
    let lease_id = approved["lease_id"].as_i64().unwrap();
    assert_eq!(approved["lease"]["id"].as_i64(), Some(lease_id));

    // Decisions are final.
    let app = build_test_app(pool.clone());
    let response = put_json_as(app, &status_uri, "mgr_1", json!({"status": "Denied"})).await;
    common::assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/leases/{lease_id}/payments"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payments = body_json(response).await["data"].clone();
    assert_eq!(payments.as_array().map(Vec::len), Some(1));
    assert_eq!(payments[0]["status"], "Pending");
    assert_eq!(payments[0]["amount_due"], 900.0);
    assert_eq!(payments[0]["amount_paid"], 0.0);

    let response = get(
        build_test_app(pool.clone()),
        "/api/v1/tenants/tenant_1/current-residences",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let residences = body_json(response).await["data"].clone();
    assert_eq!(residences[0]["id"], property_id);

    let response = get(
        build_test_app(pool.clone()),
        "/api/v1/applications?userId=mgr_1&userType=manager",
    )
    .await;
    let listed = body_json(response).await["data"].clone();
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["lease"]["id"].as_i64(), Some(lease_id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_records_settlement_once(pool: PgPool) {
    register_manager(&pool, "mgr_1").await;
    let property = list_property(&pool, "mgr_1", "Labone House", 1200.0, json!({})).await;

    let application_id = submit_application(&pool, &property["id"], "tenant_1").await;
    let response = decide(&pool, application_id, "mgr_1", "Approved").await;
    let lease_id = body_json(response).await["data"]["lease_id"].as_i64().unwrap();

    let verify_uri = format!("/api/v1/payments/verify/LEASE_{lease_id}_1700000000000");
    let response = get(build_test_app(pool.clone()), &verify_uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["message"], "Payment verified and recorded");
    assert_eq!(first["payment"]["status"], "Paid");
    assert_eq!(first["payment"]["amount_paid"], 1200.0);

    let response = get(build_test_app(pool.clone()), &verify_uri).await;
    let second = body_json(response).await;
    assert_eq!(second["message"], "Payment already recorded");
    assert_eq!(second["payment"]["id"], first["payment"]["id"]);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/payments/lease/{lease_id}"),
    )
    .await;
    let payments = body_json(response).await["data"].clone();
    // The pending installment from approval plus one settlement.
    assert_eq!(payments.as_array().map(Vec::len), Some(2));

    let response = get(build_test_app(pool.clone()), "/api/v1/tenants/tenant_1/stats").await;
    let stats = body_json(response).await["data"].clone();
    assert_eq!(stats["approved_applications"], 1);
    assert_eq!(stats["active_leases"], 1);
    assert_eq!(stats["total_paid"], 1200.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_webhook_and_verify_settle_one_payment(pool: PgPool) {
    register_manager(&pool, "mgr_1").await;
    let property = list_property(&pool, "mgr_1", "Airport Residence", 1200.0, json!({})).await;
    let application_id = submit_application(&pool, &property["id"], "tenant_1").await;
    let response = decide(&pool, application_id, "mgr_1", "Approved").await;
    let lease_id = body_json(response).await["data"]["lease_id"].as_i64().unwrap();

    let reference = format!("LEASE_{lease_id}_1700000000123");
    let body = serde_json::to_vec(&json!({
        "event": "charge.success",
        "data": {
            "status": "success",
            "reference": reference,
            "amount": 120_000,
            "currency": "GHS",
            "metadata": {"lease_id": lease_id}
        }
    }))
    .unwrap();
    let signature = sign_payment_webhook(PAYMENT_SECRET, &body);

    // Gateways redeliver; each delivery is acknowledged.
    for _ in 0..2 {
        let response = post_raw(
            build_test_app(pool.clone()),
            "/api/v1/payments/webhook",
            &[("x-paystack-signature", signature.as_str())],
            &body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let ack = body_json(response).await;
        assert_eq!(ack, json!({"success": true, "event": "charge.success"}));
    }

    // Polling the same reference finds the row the webhook wrote.
    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/payments/verify/{reference}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let verified = body_json(response).await;
    assert_eq!(verified["message"], "Payment already recorded");
    assert_eq!(verified["payment"]["status"], "Paid");
    assert_eq!(verified["payment"]["amount_paid"], 1200.0);

    let settled: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE provider_reference = $1")
            .bind(&reference)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(settled, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_denial_creates_no_lease(pool: PgPool) {
    register_manager(&pool, "mgr_1").await;
    let property = list_property(&pool, "mgr_1", "Dzorwulu Cottage", 650.0, json!({})).await;
    let application_id = submit_application(&pool, &property["id"], "tenant_1").await;

    let response = decide(&pool, application_id, "mgr_1", "Denied").await;
    assert_eq!(response.status(), StatusCode::OK);
    let denied = body_json(response).await["data"].clone();
    assert_eq!(denied["status"], "Denied");
    assert!(denied["lease_id"].is_null());
    assert!(denied["lease"].is_null());

    let leases: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leases")
        .fetch_one(&pool)
        .await
        .unwrap();
    let payments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((leases, payments), (0, 0));

    let response = decide(&pool, application_id, "mgr_1", "Approved").await;
    common::assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;

    // A denied application no longer blocks a fresh one.
    submit_application(&pool, &property["id"], "tenant_1").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_unknown_lease_returns_404(pool: PgPool) {
    let response = get(
        build_test_app(pool),
        "/api/v1/payments/verify/LEASE_999_1700000000000",
    )
    .await;
    common::assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_filters_price_and_location(pool: PgPool) {
    register_manager(&pool, "mgr_1").await;
    let cheap = list_property(
        &pool,
        "mgr_1",
        "Budget Studio",
        400.0,
        json!({"latitude": 5.6037, "longitude": -0.187}),
    )
    .await;
    let pricey = list_property(
        &pool,
        "mgr_1",
        "Harbour Villa",
        2500.0,
        json!({"latitude": 6.6885, "longitude": -1.6244, "city": "Kumasi", "property_type": "Villa"}),
    )
    .await;

    let response = get(build_test_app(pool.clone()), "/api/v1/properties?priceMin=1000").await;
    let found = body_json(response).await["data"].clone();
    assert_eq!(found.as_array().map(Vec::len), Some(1));
    assert_eq!(found[0]["id"], pricey["id"]);

    let response = get(build_test_app(pool.clone()), "/api/v1/properties?location=kumasi").await;
    let found = body_json(response).await["data"].clone();
    assert_eq!(found.as_array().map(Vec::len), Some(1));
    assert_eq!(found[0]["id"], pricey["id"]);

    // Both cities are well within the search radius of Accra.
    let response = get(
        build_test_app(pool.clone()),
        "/api/v1/properties?latitude=5.6&longitude=-0.19&propertyType=Apartment",
    )
    .await;
    let found = body_json(response).await["data"].clone();
    assert_eq!(found.as_array().map(Vec::len), Some(1));
    assert_eq!(found[0]["id"], cheap["id"]);

    // Malformed filters are ignored rather than rejected.
    let response = get(build_test_app(pool.clone()), "/api/v1/properties?priceMin=cheap").await;
    assert_eq!(response.status(), StatusCode::OK);
    let found = body_json(response).await["data"].clone();
    assert_eq!(found.as_array().map(Vec::len), Some(2));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_favorites_round_trip(pool: PgPool) {
    register_manager(&pool, "mgr_1").await;
    let property = list_property(&pool, "mgr_1", "Cantonments Flat", 700.0, json!({})).await;
    let id = property["id"].as_i64().unwrap();

    let response = post_json_as(
        build_test_app(pool.clone()),
        "/api/v1/tenants",
        "tenant_1",
        json!({"clerk_id": "tenant_1", "name": "Ama", "email": "ama@example.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let uri = format!("/api/v1/tenants/tenant_1/favorites/{id}");
    let response = common::post_as(build_test_app(pool.clone()), &uri, "tenant_1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let tenant = body_json(response).await["data"].clone();
    assert_eq!(tenant["favorites"][0]["id"], id);

    let response = common::post_as(build_test_app(pool.clone()), &uri, "tenant_1").await;
    common::assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;

    let response = common::delete_as(build_test_app(pool.clone()), &uri, "tenant_1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let tenant = body_json(response).await["data"].clone();
    assert_eq!(tenant["favorites"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_identity_events_mirror_profiles(pool: PgPool) {
    let deliver = |id: &'static str, body: Value| {
        let pool = pool.clone();
        async move {
            let body = serde_json::to_vec(&body).unwrap();
            let timestamp = Utc::now().timestamp().to_string();
            let signature = sign_svix(IDENTITY_SECRET, id, &timestamp, &body).unwrap();
            post_raw(
                build_test_app(pool),
                "/api/v1/webhooks/clerk",
                &[
                    ("svix-id", id),
                    ("svix-timestamp", timestamp.as_str()),
                    ("svix-signature", signature.as_str()),
                ],
                &body,
            )
            .await
        }
    };

    let response = deliver(
        "msg_created",
        json!({
            "type": "user.created",
            "data": {
                "id": "user_9",
                "first_name": "Yaw",
                "last_name": "Boateng",
                "email_addresses": [{"email_address": "yaw@example.com"}],
                "phone_numbers": [],
                "public_metadata": {"userType": "manager"}
            }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(build_test_app(pool.clone()), "/api/v1/tenants/user_9").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Yaw Boateng");
    let response = get(build_test_app(pool.clone()), "/api/v1/managers/user_9").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = deliver(
        "msg_updated",
        json!({
            "type": "user.updated",
            "data": {"id": "user_9", "first_name": "Yaw", "last_name": "Mensah"}
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get(build_test_app(pool.clone()), "/api/v1/managers/user_9").await;
    assert_eq!(body_json(response).await["data"]["name"], "Yaw Mensah");

    let response = deliver(
        "msg_deleted",
        json!({"type": "user.deleted", "data": {"id": "user_9"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get(build_test_app(pool.clone()), "/api/v1/tenants/user_9").await;
    common::assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    let response = get(build_test_app(pool), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["payments_configured"], true);
    assert_eq!(json["auth_configured"], true);
    assert_eq!(json["identity_sync_configured"], true);
}
