use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(type_name = "ENUM", rename_all = "snake_case")]
pub enum MovieStatus {
    NowPlaying,
    ComingSoon,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, JsonSchema)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub synopsis: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub duration: i32,
    pub release_date: NaiveDate,
    pub rating: Decimal,
    pub status: MovieStatus,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct MovieCreateRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub synopsis: Option<String>,
    #[validate(length(max = 100))]
    pub genre: Option<String>,
    #[validate(length(max = 50))]
    pub language: Option<String>,
    /// Runtime in minutes.
    #[validate(range(min = 1, max = 600))]
    pub duration: i32,
    pub release_date: NaiveDate,
    pub status: Option<MovieStatus>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct MovieUpdateRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub synopsis: Option<String>,
    #[validate(length(max = 100))]
    pub genre: Option<String>,
    #[validate(length(max = 50))]
    pub language: Option<String>,
    #[validate(range(min = 1, max = 600))]
    pub duration: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub status: Option<MovieStatus>,
}
