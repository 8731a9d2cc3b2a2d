use crate::models::booking::{
    Booking, BookingCreateRequest, BookingResponse, BookingStatus, PaymentStatus, Ticket,
};
use crate::models::promo_code::PromoCode;
use crate::models::seat::SeatStatus;
use crate::models::showtime::Showtime;
use crate::services::seat_service::SeatService;
use crate::utils::error::{AppError, AppResult};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};
use validator::Validate;

const BOOKING_COLUMNS: &str = "id, user_id, showtime_id, booking_date, total_price, status, \
                               payment_status, promo_code_id, discount_amount, payment_reference";
const TICKET_COLUMNS: &str = "id, booking_id, seat_id, category, price, is_used";

/// Drives the booking lifecycle. Every mutation runs inside one MySQL
/// transaction together with its seat claim or release, so a booking and its
/// inventory can never diverge: either both commit or neither does.
#[derive(Clone)]
pub struct BookingService {
    pool: MySqlPool,
}

impl BookingService {
    pub fn new(pool: MySqlPool) -> Self {
        BookingService { pool }
    }

    pub async fn create_booking(
        &self,
        user_id: i32,
        request: BookingCreateRequest,
    ) -> AppResult<BookingResponse> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        let showtime = sqlx::query_as::<_, Showtime>(
            "SELECT id, movie_id, screen_id, cinema_id, start_time, end_time, base_price, is_active \
             FROM showtimes WHERE id = ?",
        )
        .bind(request.showtime_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Showtime not found".into()))?;

        if !showtime.is_active {
            return Err(AppError::ValidationError("Showtime is not active".into()));
        }
        if showtime.start_time <= chrono::Utc::now().naive_utc() {
            return Err(AppError::ValidationError("Showtime has already started".into()));
        }

        let promo = match &request.promo_code {
            Some(code) => Some(Self::lock_promo_code(&mut tx, code).await?),
            None => None,
        };

        // All-or-nothing: if any requested seat is taken the whole claim
        // fails and the transaction rolls back untouched.
        let seats =
            SeatService::claim_in_tx(&mut tx, showtime.screen_id, &request.seat_ids, SeatStatus::Booked)
                .await?;

        let prices: Vec<Decimal> = seats
            .iter()
            .map(|seat| (showtime.base_price * seat.category.price_multiplier()).round_dp(2))
            .collect();
        let subtotal: Decimal = prices.iter().copied().sum();

        let discount = match &promo {
            Some(promo) => {
                if subtotal < promo.min_booking_amount {
                    return Err(AppError::ValidationError(format!(
                        "Promo code requires a minimum booking amount of {}",
                        promo.min_booking_amount
                    )));
                }
                promo.discount_for(subtotal)
            }
            None => Decimal::ZERO,
        };
        let total_price = subtotal - discount;

        let result = sqlx::query(
            "INSERT INTO bookings \
             (user_id, showtime_id, total_price, status, payment_status, promo_code_id, discount_amount) \
             VALUES (?, ?, ?, 'pending', 'pending', ?, ?)",
        )
        .bind(user_id)
        .bind(showtime.id)
        .bind(total_price)
        .bind(promo.as_ref().map(|p| p.id))
        .bind(discount)
        .execute(&mut *tx)
        .await?;
        let booking_id = result.last_insert_id() as i32;

        for (seat, price) in seats.iter().zip(&prices) {
            sqlx::query(
                "INSERT INTO tickets (booking_id, seat_id, category, price) VALUES (?, ?, ?, ?)",
            )
            .bind(booking_id)
            .bind(seat.id)
            .bind(seat.category.to_string())
            .bind(price)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(promo) = &promo {
            sqlx::query("UPDATE promo_codes SET usage_count = usage_count + 1 WHERE id = ?")
                .bind(promo.id)
                .execute(&mut *tx)
                .await?;
        }

        let booking = Self::fetch_booking_in_tx(&mut tx, booking_id).await?;
        let tickets = Self::fetch_tickets_in_tx(&mut tx, booking_id).await?;
        tx.commit().await?;

        log::info!(
            "booking {} created for user {} with {} seats",
            booking_id,
            user_id,
            tickets.len()
        );
        Ok(BookingResponse { booking, tickets })
    }

    /// Releases every ticketed seat and marks the booking cancelled.
    /// Idempotent: a cancelled booking is returned as-is with no second
    /// release; a completed booking cannot be cancelled.
    pub async fn cancel_booking(&self, booking_id: i32) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let booking = Self::lock_booking(&mut tx, booking_id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }
        if booking.status == BookingStatus::Completed {
            return Err(AppError::Conflict("Completed bookings cannot be cancelled".into()));
        }

        let seat_ids: Vec<i32> =
            sqlx::query_scalar("SELECT seat_id FROM tickets WHERE booking_id = ?")
                .bind(booking_id)
                .fetch_all(&mut *tx)
                .await?;
        SeatService::release_in_tx(&mut tx, &seat_ids).await?;

        sqlx::query("UPDATE bookings SET status = 'cancelled' WHERE id = ?")
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        let booking = Self::fetch_booking_in_tx(&mut tx, booking_id).await?;
        tx.commit().await?;

        log::info!("booking {} cancelled, {} seats released", booking_id, seat_ids.len());
        Ok(booking)
    }

    /// Admin setter; enforces the lifecycle state machine and never touches
    /// seats (only cancel_booking releases inventory).
    pub async fn update_booking_status(
        &self,
        booking_id: i32,
        next: BookingStatus,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let booking = Self::lock_booking(&mut tx, booking_id).await?;
        if !booking.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Booking status cannot change from {} to {}",
                booking.status, next
            )));
        }

        sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
            .bind(next)
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        let booking = Self::fetch_booking_in_tx(&mut tx, booking_id).await?;
        tx.commit().await?;
        Ok(booking)
    }

    pub async fn update_payment_status(
        &self,
        booking_id: i32,
        next: PaymentStatus,
        payment_reference: Option<String>,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let booking = Self::lock_booking(&mut tx, booking_id).await?;
        if !booking.payment_status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Payment status cannot change from {} to {}",
                booking.payment_status, next
            )));
        }

        sqlx::query(
            "UPDATE bookings SET payment_status = ?, \
             payment_reference = COALESCE(?, payment_reference) WHERE id = ?",
        )
        .bind(next)
        .bind(payment_reference)
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

        let booking = Self::fetch_booking_in_tx(&mut tx, booking_id).await?;
        tx.commit().await?;
        Ok(booking)
    }

    pub async fn get_booking(&self, booking_id: i32) -> AppResult<Booking> {
        let sql = format!("SELECT {} FROM bookings WHERE id = ?", BOOKING_COLUMNS);
        sqlx::query_as::<_, Booking>(&sql)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    pub async fn get_booking_response(&self, booking_id: i32) -> AppResult<BookingResponse> {
        let booking = self.get_booking(booking_id).await?;
        let sql = format!("SELECT {} FROM tickets WHERE booking_id = ?", TICKET_COLUMNS);
        let tickets = sqlx::query_as::<_, Ticket>(&sql)
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(BookingResponse { booking, tickets })
    }

    pub async fn get_user_bookings(&self, user_id: i32, skip: i64, limit: i64) -> AppResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {} FROM bookings WHERE user_id = ? ORDER BY booking_date DESC LIMIT ? OFFSET ?",
            BOOKING_COLUMNS
        );
        Ok(sqlx::query_as::<_, Booking>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_showtime_bookings(
        &self,
        showtime_id: i32,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {} FROM bookings WHERE showtime_id = ? ORDER BY booking_date DESC LIMIT ? OFFSET ?",
            BOOKING_COLUMNS
        );
        Ok(sqlx::query_as::<_, Booking>(&sql)
            .bind(showtime_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_all_bookings(
        &self,
        status: Option<BookingStatus>,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Booking>> {
        let bookings = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM bookings WHERE status = ? ORDER BY booking_date DESC LIMIT ? OFFSET ?",
                    BOOKING_COLUMNS
                );
                sqlx::query_as::<_, Booking>(&sql)
                    .bind(status)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM bookings ORDER BY booking_date DESC LIMIT ? OFFSET ?",
                    BOOKING_COLUMNS
                );
                sqlx::query_as::<_, Booking>(&sql)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(bookings)
    }

    async fn lock_booking(tx: &mut Transaction<'_, MySql>, booking_id: i32) -> AppResult<Booking> {
        let sql = format!("SELECT {} FROM bookings WHERE id = ? FOR UPDATE", BOOKING_COLUMNS);
        sqlx::query_as::<_, Booking>(&sql)
            .bind(booking_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    async fn fetch_booking_in_tx(
        tx: &mut Transaction<'_, MySql>,
        booking_id: i32,
    ) -> AppResult<Booking> {
        let sql = format!("SELECT {} FROM bookings WHERE id = ?", BOOKING_COLUMNS);
        Ok(sqlx::query_as::<_, Booking>(&sql)
            .bind(booking_id)
            .fetch_one(&mut **tx)
            .await?)
    }

    async fn fetch_tickets_in_tx(
        tx: &mut Transaction<'_, MySql>,
        booking_id: i32,
    ) -> AppResult<Vec<Ticket>> {
        let sql = format!("SELECT {} FROM tickets WHERE booking_id = ?", TICKET_COLUMNS);
        Ok(sqlx::query_as::<_, Ticket>(&sql)
            .bind(booking_id)
            .fetch_all(&mut **tx)
            .await?)
    }

    async fn lock_promo_code(tx: &mut Transaction<'_, MySql>, code: &str) -> AppResult<PromoCode> {
        let promo = sqlx::query_as::<_, PromoCode>(
            "SELECT id, code, description, discount_type, discount_value, max_usage, usage_count, \
             min_booking_amount, valid_from, valid_until, is_active \
             FROM promo_codes WHERE code = ? FOR UPDATE",
        )
        .bind(code)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Promo code not found".into()))?;

        let now = chrono::Utc::now().naive_utc();
        if !promo.is_active || now < promo.valid_from || now > promo.valid_until {
            return Err(AppError::ValidationError("Promo code is not valid".into()));
        }
        if promo.usage_exhausted() {
            return Err(AppError::ValidationError("Promo code usage limit reached".into()));
        }
        Ok(promo)
    }
}
