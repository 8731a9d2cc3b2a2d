use rust_decimal::Decimal;
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
pub enum SeatCategory {
    Standard,
    Gold,
    Platinum,
    Vip,
    Wheelchair,
}

impl SeatCategory {
    /// Multiplier applied to a showtime's base price for this tier.
    pub fn price_multiplier(self) -> Decimal {
        match self {
            SeatCategory::Standard | SeatCategory::Wheelchair => Decimal::new(100, 2),
            SeatCategory::Gold => Decimal::new(150, 2),
            SeatCategory::Platinum => Decimal::new(200, 2),
            SeatCategory::Vip => Decimal::new(250, 2),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(type_name = "ENUM", rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Reserved,
    Booked,
    Blocked,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, JsonSchema)]
pub struct Seat {
    pub id: i32,
    pub screen_id: i32,
    pub seat_row: String,
    pub seat_number: i32,
    pub category: SeatCategory,
    pub status: SeatStatus,
    pub version: i32,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct SeatCreateRequest {
    pub screen_id: i32,
    #[validate(length(min = 1, max = 5))]
    pub seat_row: String,
    #[validate(range(min = 1, max = 500))]
    pub seat_number: i32,
    pub category: Option<SeatCategory>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct BulkSeatCreateRequest {
    pub screen_id: i32,
    /// Row labels, e.g. ["A", "B", "C"].
    #[validate(length(min = 1, max = 50))]
    pub rows: Vec<String>,
    #[validate(range(min = 1, max = 100))]
    pub seats_per_row: i32,
    pub category: Option<SeatCategory>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SeatStatusUpdateRequest {
    pub status: SeatStatus,
}
