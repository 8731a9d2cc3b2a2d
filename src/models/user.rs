use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(type_name = "ENUM", rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub hashed_password: String,
    pub role: UserRole,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct UserRegistrationRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UserLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UserLoginResponse {
    pub token: String,
    pub user_id: i32,
    pub role: UserRole,
}

#[derive(Debug, Serialize, JsonSchema)]
#[schemars(example = "RegisterResponse::example")]
pub struct RegisterResponse {
    #[schemars(title = "User ID")]
    pub user_id: i32,

    #[schemars(title = "Register Status")]
    pub status: String,
}

impl RegisterResponse {
    pub fn example() -> Self {
        Self {
            user_id: 123,
            status: "success".to_string(),
        }
    }
}

// Public view of a user row; never exposes the password hash.
#[derive(Debug, Serialize, JsonSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
        }
    }
}
