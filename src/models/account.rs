use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "user_id")]
    pub id: Option<i64>,
    pub username: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    /// Lowercase hex SHA-256 of the password.
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    pub message: Option<String>,
    pub error: Option<String>,
}
