use chrono::NaiveDateTime;
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
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Lifecycle: pending -> confirmed -> completed, with cancellation
    /// allowed from pending and confirmed. Completed and cancelled are
    /// terminal.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Confirmed, Completed) | (Pending, Cancelled) | (Confirmed, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(type_name = "ENUM", rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, next),
            (Pending, Success) | (Pending, Failed) | (Success, Refunded)
        )
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, JsonSchema)]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub showtime_id: i32,
    pub booking_date: NaiveDateTime,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub promo_code_id: Option<i32>,
    pub discount_amount: Decimal,
    pub payment_reference: Option<String>,
}

/// A booking's record of one seat: price actually charged plus a category
/// snapshot, decoupled from the live seat row.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, JsonSchema)]
pub struct Ticket {
    pub id: i32,
    pub booking_id: i32,
    pub seat_id: i32,
    pub category: String,
    pub price: Decimal,
    pub is_used: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct BookingCreateRequest {
    pub showtime_id: i32,
    #[validate(length(min = 1, max = 10))]
    pub seat_ids: Vec<i32>,
    pub promo_code: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingResponse {
    pub booking: Booking,
    pub tickets: Vec<Ticket>,
}
