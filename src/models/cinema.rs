use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, JsonSchema)]
pub struct Cinema {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, JsonSchema)]
pub struct Screen {
    pub id: i32,
    pub cinema_id: i32,
    pub screen_number: i32,
    /// Declared capacity; not reconciled against the seat rows.
    pub total_seats: i32,
    pub screen_type: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CinemaCreateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    pub location: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct ScreenCreateRequest {
    pub cinema_id: i32,
    #[validate(range(min = 1, max = 100))]
    pub screen_number: i32,
    #[validate(range(min = 1, max = 2000))]
    pub total_seats: i32,
    #[validate(length(max = 50))]
    pub screen_type: Option<String>,
}
