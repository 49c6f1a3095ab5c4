#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use car_inventory::clients::{MemoryImageStorage, SharedImageStorage};
use car_inventory::config::EnvironmentConfig;
use car_inventory::models::{User, UserRole};
use car_inventory::repositories::{MemoryInventoryRepository, SharedRepository};
use car_inventory::utils::jwt::{generate_token, JwtConfig};
use car_inventory::{create_app, AppState};

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Aplicación de prueba sobre el backend en memoria
pub struct TestApp {
    pub app: Router,
    pub repository: SharedRepository,
    pub admin: User,
    pub agent: User,
    pub admin_token: String,
    pub agent_token: String,
}

/// Configuración segura para tests: secreto fijo y timeout corto
pub fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        upload_timeout: Duration::from_secs(5),
        ..EnvironmentConfig::default()
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(Arc::new(MemoryImageStorage::new()), test_config()).await
}

pub async fn spawn_app_with(images: SharedImageStorage, config: EnvironmentConfig) -> TestApp {
    let repository: SharedRepository = Arc::new(MemoryInventoryRepository::new());
    let jwt = JwtConfig::from(&config);

    let admin = create_user(&repository, "admin@dealer.test", UserRole::Admin).await;
    let agent = create_user(&repository, "agent@dealer.test", UserRole::Agent).await;
    let admin_token = generate_token(&admin, &jwt).expect("token generation should succeed");
    let agent_token = generate_token(&agent, &jwt).expect("token generation should succeed");

    let app = create_app(AppState::new(repository.clone(), images, config));

    TestApp {
        app,
        repository,
        admin,
        agent,
        admin_token,
        agent_token,
    }
}

/// Usuario con hash bcrypt de coste bajo para que los tests sean rápidos
pub async fn create_user(repository: &SharedRepository, email: &str, role: UserRole) -> User {
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: bcrypt::hash(TEST_PASSWORD, 4).expect("hashing should succeed"),
        role,
        created_at: Utc::now(),
    };
    repository
        .upsert_user(&user)
        .await
        .expect("user creation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Envía la petición y devuelve estado y cuerpo JSON
pub async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(app, request).await;
    let status = response.status();
    (status, body_json(response).await)
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    }
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    call(app, json_request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    call(app, json_request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn put_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    call(app, json_request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    call(app, json_request(Method::DELETE, uri, Some(token), None)).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "----car-inventory-test-boundary";

/// Constructor mínimo de cuerpos multipart/form-data
#[derive(Default, Clone)]
pub struct MultipartForm {
    parts: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.parts.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.parts.extend_from_slice(bytes);
        self.parts.extend_from_slice(b"\r\n");
        self
    }

    /// Añade `count` imágenes JPEG llamadas `{prefix}{n}.jpg`
    pub fn images(self, prefix: &str, count: usize) -> Self {
        (1..=count).fold(self, |form, n| {
            form.file("images", &format!("{}{}.jpg", prefix, n), "image/jpeg", b"\xff\xd8\xff\xe0")
        })
    }

    pub fn into_request(mut self, method: Method, uri: &str, token: &str) -> Request<Body> {
        self.parts
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.parts))
            .expect("request should build")
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_brand(test: &TestApp, name: &str, category: &str) -> Value {
    let (status, body) = post_json_auth(
        &test.app,
        "/api/admin/brands",
        &test.admin_token,
        json!({ "name": name, "category": category }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "brand creation failed: {}", body);
    body["brand"].clone()
}

pub async fn create_model(test: &TestApp, name: &str, brand_id: &str) -> Value {
    let (status, body) = post_json_auth(
        &test.app,
        "/api/admin/models",
        &test.admin_token,
        json!({ "name": name, "brand": brand_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "model creation failed: {}", body);
    body["model"].clone()
}

/// Formulario de alta completo sin imágenes
pub fn car_form(stock_code: &str, plate_number: &str, brand_id: &str, model_id: &str) -> MultipartForm {
    MultipartForm::new()
        .text("stock_code", stock_code)
        .text("plate_number", plate_number)
        .text("brand", brand_id)
        .text("model", model_id)
        .text("variant", "VXi")
        .text("year_of_manufacture", "2019")
        .text("registration_year", "2020")
        .text("fuel_type", "Petrol")
        .text("transmission", "Manual")
        .text("km", "42000")
        .text("price", "525000")
        .text("ownership", "1st Owner")
        .text("registration_state", "KA")
        .text("rto", "KA01")
}

pub async fn create_car(test: &TestApp, form: MultipartForm) -> (StatusCode, Value) {
    call(&test.app, form.into_request(Method::POST, "/api/cars", &test.agent_token)).await
}

/// Marca + modelo listos para dar de alta coches
pub async fn toyota_camry(test: &TestApp) -> (String, String) {
    let brand = create_brand(test, "Toyota", "regular").await;
    let brand_id = brand["id"].as_str().expect("brand id").to_string();
    let model = create_model(test, "Camry", &brand_id).await;
    let model_id = model["id"].as_str().expect("model id").to_string();
    (brand_id, model_id)
}
