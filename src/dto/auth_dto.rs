use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserSummary;

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserSummary,
}

impl LoginResponse {
    pub fn success(token: String, user: UserSummary) -> Self {
        Self {
            success: true,
            token,
            user,
        }
    }
}
