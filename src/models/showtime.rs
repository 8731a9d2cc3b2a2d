use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Showtime {
    pub id: i32,
    pub movie_id: i32,
    pub screen_id: i32,
    pub cinema_id: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub base_price: Decimal,
    pub is_active: bool,
}

/// Showtime as served to clients. `available_seats` is computed from the
/// live seat rows of the screen, never stored.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, JsonSchema)]
pub struct ShowtimeResponse {
    pub id: i32,
    pub movie_id: i32,
    pub screen_id: i32,
    pub cinema_id: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub base_price: Decimal,
    pub available_seats: i64,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ShowtimeCreateRequest {
    pub movie_id: i32,
    pub screen_id: i32,
    pub cinema_id: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub base_price: Decimal,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ShowtimeUpdateRequest {
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub base_price: Option<Decimal>,
    pub is_active: Option<bool>,
}
