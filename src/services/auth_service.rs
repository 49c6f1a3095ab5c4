//! Servicio de autenticación
//!
//! Login con email y contraseña (bcrypt) y emisión del JWT.

use bcrypt::{hash, verify, DEFAULT_COST};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::models::UserSummary;
use crate::repositories::SharedRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

#[derive(Clone)]
pub struct AuthService {
    repository: SharedRepository,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(repository: SharedRepository, jwt: JwtConfig) -> Self {
        Self { repository, jwt }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();

        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = match self.repository.find_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("⚠️ Login con email desconocido: {}", email);
                return Err(invalid());
            }
        };

        let password_ok = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("bcrypt verify failed: {}", e)))?;
        if !password_ok {
            tracing::warn!("⚠️ Contraseña incorrecta para {}", email);
            return Err(invalid());
        }

        let token = generate_token(&user, &self.jwt)?;
        tracing::info!("🔐 Login correcto: {} ({})", user.email, user.role.as_str());
        Ok(LoginResponse::success(token, UserSummary::from(&user)))
    }
}

/// Hash bcrypt de una contraseña
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("bcrypt hash failed: {}", e)))
}
