//! Request validation that rejects before touching the database.

mod common;

use axum::http::StatusCode;
use common::{assert_error, get, lazy_pool, post_json, post_json_as, put_json_as};
use serde_json::json;

#[tokio::test]
async fn application_with_blank_fields_returns_400() {
    let app = common::build_test_app(lazy_pool());
    let response = post_json_as(
        app,
        "/api/v1/applications",
        "user_a",
        json!({
            "property_id": 1,
            "tenant_clerk_id": "user_a",
            "name": "  ",
            "email": "not-an-email",
            "phone_number": "+233"
        }),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn application_without_property_returns_400() {
    let app = common::build_test_app(lazy_pool());
    let response = post_json_as(
        app,
        "/api/v1/applications",
        "user_a",
        json!({
            "tenant_clerk_id": "user_a",
            "name": "Ama",
            "email": "ama@example.com",
            "phone_number": "+233"
        }),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn pending_is_not_a_decision() {
    for status in ["Pending", "approved", ""] {
        let app = common::build_test_app(lazy_pool());
        let response = put_json_as(
            app,
            "/api/v1/applications/1/status",
            "mgr_a",
            json!({ "status": status }),
        )
        .await;
        assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    }
}

#[tokio::test]
async fn listing_applications_requires_user_type() {
    for uri in [
        "/api/v1/applications",
        "/api/v1/applications?userId=u1",
        "/api/v1/applications?userId=u1&userType=admin",
    ] {
        let app = common::build_test_app(lazy_pool());
        let response = get(app, uri).await;
        assert_error(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
    }
}

#[tokio::test]
async fn initialize_rejects_non_positive_amounts() {
    for amount in [json!(0), json!(-10.5)] {
        let app = common::build_test_app(lazy_pool());
        let response = post_json(
            app,
            "/api/v1/payments/initialize",
            json!({"lease_id": 1, "amount": amount, "email": "ama@example.com"}),
        )
        .await;
        assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    }
}

#[tokio::test]
async fn initialize_requires_an_email() {
    let app = common::build_test_app(lazy_pool());
    let response = post_json(
        app,
        "/api/v1/payments/initialize",
        json!({"lease_id": 1, "amount": 100.0, "email": " "}),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn verify_without_gateway_returns_500() {
    let app = common::build_test_app_with(lazy_pool(), common::test_config(), None);
    let response = get(app, "/api/v1/payments/verify/LEASE_1_1700000000000").await;
    assert_error(response, StatusCode::INTERNAL_SERVER_ERROR, "NOT_CONFIGURED").await;
}

#[tokio::test]
async fn property_with_unknown_type_returns_400() {
    let app = common::build_test_app(lazy_pool());
    let response = post_json_as(
        app,
        "/api/v1/properties",
        "mgr_a",
        json!({
            "name": "Castle",
            "description": "Drafty",
            "price_per_month": 5000.0,
            "property_type": "Castle",
            "manager_clerk_id": "mgr_a",
            "address": "1 Hill Rd",
            "city": "Cape Coast",
            "country": "Ghana"
        }),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn property_with_out_of_range_coordinates_returns_400() {
    let app = common::build_test_app(lazy_pool());
    let response = post_json_as(
        app,
        "/api/v1/properties",
        "mgr_a",
        json!({
            "name": "Loft",
            "description": "Bright",
            "price_per_month": 900.0,
            "property_type": "Apartment",
            "manager_clerk_id": "mgr_a",
            "address": "1 Main St",
            "city": "Accra",
            "country": "Ghana",
            "latitude": 120.0,
            "longitude": 10.0
        }),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}
