//! Tests HTTP de punta a punta: salud, autenticación, roles y el flujo
//! marca → modelo → coche.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;

use common::{
    call, car_form, create_car, get_auth, json_request, post_json_auth, send, spawn_app,
    toyota_camry, TEST_PASSWORD,
};

#[tokio::test]
async fn test_health_check() {
    let test = spawn_app().await;
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&test.app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cars_require_token() {
    let test = spawn_app().await;
    let (status, body) = call(&test.app, json_request(Method::GET, "/api/cars", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let test = spawn_app().await;
    let (status, _) = get_auth(&test.app, "/api/admin/brands", "not.a.token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_agent_cannot_mutate_reference_data() {
    let test = spawn_app().await;
    let (status, body) = post_json_auth(
        &test.app,
        "/api/admin/brands",
        &test.agent_token,
        json!({ "name": "Toyota", "category": "regular" }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    // Lectura permitida para cualquier rol autenticado
    let (status, body) = get_auth(&test.app, "/api/admin/brands", &test.agent_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["brands"], json!([]));
}

#[tokio::test]
async fn test_login_and_me() {
    let test = spawn_app().await;
    let (status, body) = call(
        &test.app,
        json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "Agent@Dealer.test", "password": TEST_PASSWORD })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["role"], "agent");
    let token = body["token"].as_str().expect("token").to_string();

    let (status, body) = get_auth(&test.app, "/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "agent@dealer.test");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let test = spawn_app().await;
    let (status, body) = call(
        &test.app,
        json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "admin@dealer.test", "password": "incorrect" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_end_to_end_brand_model_car() {
    let test = spawn_app().await;
    let (brand_id, model_id) = toyota_camry(&test).await;

    let (status, body) = create_car(
        &test,
        car_form(" stk001 ", "ka01ab1234", &brand_id, &model_id).images("front", 4),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["car"]["stock_code"], "STK001");
    assert_eq!(body["car"]["plate_number"], "KA01AB1234");

    let car_id = body["car"]["id"].as_str().expect("car id");
    let (status, body) = get_auth(&test.app, &format!("/api/cars/{}", car_id), &test.admin_token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["car"]["brand"]["name"], "Toyota");
    assert_eq!(body["car"]["model"]["name"], "Camry");
    assert_eq!(body["car"]["createdBy"]["email"], "agent@dealer.test");
    assert_eq!(body["car"]["images"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn test_unknown_car_is_not_found() {
    let test = spawn_app().await;
    let (status, body) = get_auth(
        &test.app,
        "/api/cars/00000000-0000-0000-0000-000000000001",
        &test.agent_token,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_delete_car_then_gone() {
    let test = spawn_app().await;
    let (brand_id, model_id) = toyota_camry(&test).await;
    let (_, body) = create_car(
        &test,
        car_form("STK010", "KA01AA0010", &brand_id, &model_id).images("img", 4),
    )
    .await;
    let uri = format!("/api/cars/{}", body["car"]["id"].as_str().expect("car id"));

    let (status, _) = call(
        &test.app,
        json_request(Method::DELETE, &uri, Some(&test.agent_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &test.app,
        json_request(Method::DELETE, &uri, Some(&test.agent_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_brand_body_gets_error_envelope() {
    let test = spawn_app().await;
    let (status, body) = post_json_auth(
        &test.app,
        "/api/admin/brands",
        &test.admin_token,
        json!({ "category": "regular" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap_or_default().contains("name"));
}

#[tokio::test]
async fn test_non_uuid_ids_get_error_envelope() {
    let test = spawn_app().await;

    let (status, body) = get_auth(&test.app, "/api/cars/not-a-uuid", &test.agent_token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = get_auth(&test.app, "/api/admin/brands/42", &test.agent_token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = get_auth(&test.app, "/api/cars?page=abc", &test.agent_token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let test = spawn_app().await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/cars")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = send(&test.app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
