//! Marcas, modelos y desplegables vía HTTP

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    car_form, create_brand, create_car, create_model, delete_auth, get_auth, post_json_auth,
    put_json_auth, spawn_app,
};

#[tokio::test]
async fn test_brand_defaults_to_regular_and_is_trimmed() {
    let test = spawn_app().await;
    let (status, body) = post_json_auth(
        &test.app,
        "/api/admin/brands",
        &test.admin_token,
        json!({ "name": "  Honda  " }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["brand"]["name"], "Honda");
    assert_eq!(body["brand"]["category"], "regular");
}

#[tokio::test]
async fn test_duplicate_brand_name_is_rejected() {
    let test = spawn_app().await;
    create_brand(&test, "Toyota", "regular").await;

    let (status, body) = post_json_auth(
        &test.app,
        "/api/admin/brands",
        &test.admin_token,
        json!({ "name": "Toyota", "category": "luxury" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_KEY");
    assert_eq!(body["message"], "Brand with name 'Toyota' already exists");
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let test = spawn_app().await;
    let (status, body) = post_json_auth(
        &test.app,
        "/api/admin/brands",
        &test.admin_token,
        json!({ "name": "Tesla", "category": "exotic" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_brands_are_listed_by_name() {
    let test = spawn_app().await;
    for name in ["Volvo", "Audi", "Kia"] {
        create_brand(&test, name, "regular").await;
    }

    let (status, body) = get_auth(&test.app, "/api/admin/brands", &test.agent_token).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["brands"]
        .as_array()
        .expect("brands array")
        .iter()
        .filter_map(|b| b["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Audi", "Kia", "Volvo"]);
}

#[tokio::test]
async fn test_delete_brand_blocked_while_models_exist() {
    let test = spawn_app().await;
    let brand = create_brand(&test, "Hyundai", "regular").await;
    let brand_id = brand["id"].as_str().unwrap();
    create_model(&test, "Creta", brand_id).await;
    create_model(&test, "Venue", brand_id).await;

    let uri = format!("/api/admin/brands/{}", brand_id);
    let (status, body) = delete_auth(&test.app, &uri, &test.admin_token).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Cannot delete brand. It has 2 associated models.");

    let (status, _) = get_auth(&test.app, &uri, &test.admin_token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_brand_without_models() {
    let test = spawn_app().await;
    let brand = create_brand(&test, "Lexus", "luxury").await;
    let uri = format!("/api/admin/brands/{}", brand["id"].as_str().unwrap());

    let (status, body) = delete_auth(&test.app, &uri, &test.admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = get_auth(&test.app, &uri, &test.admin_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_brand_rename_conflict() {
    let test = spawn_app().await;
    create_brand(&test, "Skoda", "regular").await;
    let vw = create_brand(&test, "Volkswagen", "regular").await;
    let uri = format!("/api/admin/brands/{}", vw["id"].as_str().unwrap());

    let (status, _) = put_json_auth(&test.app, &uri, &test.admin_token, json!({ "name": "Skoda" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        put_json_auth(&test.app, &uri, &test.admin_token, json!({ "category": "luxury" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["brand"]["name"], "Volkswagen");
    assert_eq!(body["brand"]["category"], "luxury");
}

#[tokio::test]
async fn test_model_name_unique_per_brand_only() {
    let test = spawn_app().await;
    let toyota = create_brand(&test, "Toyota", "regular").await;
    let lexus = create_brand(&test, "Lexus", "luxury").await;
    let toyota_id = toyota["id"].as_str().unwrap();
    let lexus_id = lexus["id"].as_str().unwrap();

    let model = create_model(&test, "Camry", toyota_id).await;
    assert_eq!(model["brand"]["name"], "Toyota");
    create_model(&test, "Camry", lexus_id).await;

    let (status, body) = post_json_auth(
        &test.app,
        "/api/admin/models",
        &test.admin_token,
        json!({ "name": "Camry", "brand": toyota_id }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_KEY");
}

#[tokio::test]
async fn test_model_with_unknown_brand_is_not_found() {
    let test = spawn_app().await;
    let (status, body) = post_json_auth(
        &test.app,
        "/api/admin/models",
        &test.admin_token,
        json!({ "name": "Ghost", "brand": "00000000-0000-0000-0000-0000000000aa" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_models_filtered_by_brand() {
    let test = spawn_app().await;
    let kia = create_brand(&test, "Kia", "regular").await;
    let mg = create_brand(&test, "MG Motor", "regular").await;
    let kia_id = kia["id"].as_str().unwrap();
    create_model(&test, "Sonet", kia_id).await;
    create_model(&test, "Seltos", kia_id).await;
    create_model(&test, "Hector", mg["id"].as_str().unwrap()).await;

    let (status, body) = get_auth(
        &test.app,
        &format!("/api/admin/models?brand={}", kia_id),
        &test.agent_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["models"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Seltos", "Sonet"]);
}

#[tokio::test]
async fn test_delete_model_blocked_while_cars_exist() {
    let test = spawn_app().await;
    let brand = create_brand(&test, "Toyota", "regular").await;
    let brand_id = brand["id"].as_str().unwrap();
    let model = create_model(&test, "Camry", brand_id).await;
    let model_id = model["id"].as_str().unwrap();

    let (status, _) = create_car(
        &test,
        car_form("STK100", "KA01ZZ0100", brand_id, model_id).images("p", 4),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = delete_auth(
        &test.app,
        &format!("/api/admin/models/{}", model_id),
        &test.admin_token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Cannot delete model. It has 1 associated cars.");
}

#[tokio::test]
async fn test_dropdown_upsert_replaces_options() {
    let test = spawn_app().await;
    let uri = "/api/admin/dropdowns/fuel_type";

    let (status, body) = put_json_auth(
        &test.app,
        uri,
        &test.admin_token,
        json!({ "options": ["Petrol", "Diesel"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dropdown"]["options"], json!(["Petrol", "Diesel"]));

    let (status, body) =
        put_json_auth(&test.app, uri, &test.admin_token, json!({ "options": ["CNG"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dropdown"]["options"], json!(["CNG"]));

    let (status, body) = get_auth(&test.app, uri, &test.agent_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dropdown"]["field_name"], "fuel_type");
    assert_eq!(body["dropdown"]["options"], json!(["CNG"]));
}

#[tokio::test]
async fn test_dropdown_unknown_field_and_bad_body() {
    let test = spawn_app().await;

    let (status, body) = put_json_auth(
        &test.app,
        "/api/admin/dropdowns/colour",
        &test.admin_token,
        json!({ "options": ["Red"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, body) = put_json_auth(
        &test.app,
        "/api/admin/dropdowns/transmission",
        &test.admin_token,
        json!({ "options": "Manual" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Options must be an array");

    let (status, _) = get_auth(&test.app, "/api/admin/dropdowns/ownership", &test.admin_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
