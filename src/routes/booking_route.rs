use crate::models::booking::{Booking, BookingCreateRequest, BookingResponse, BookingStatus, PaymentStatus};
use crate::models::user::UserRole;
use crate::routes::page;
use crate::services::booking_service::BookingService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};
use crate::utils::rate_limit::BookingThrottle;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use std::str::FromStr;

fn ensure_owner_or_admin(booking: &Booking, auth: &AuthenticatedUser) -> Result<(), AppError> {
    if booking.user_id != auth.user.id && auth.user.role != UserRole::Admin {
        return Err(AppError::Forbidden("Not authorized to access this booking".into()));
    }
    Ok(())
}

/// Book seats for a showtime
#[openapi(tag = "Bookings")]
#[post("/bookings", format = "json", data = "<request>")]
pub async fn create_booking(
    request: Json<BookingCreateRequest>,
    auth: AuthenticatedUser,
    _throttle: BookingThrottle,
    booking_service: &State<BookingService>,
) -> Result<(Status, Json<BookingResponse>), AppError> {
    let response = booking_service
        .create_booking(auth.user.id, request.into_inner())
        .await?;
    Ok((Status::Created, Json(response)))
}

/// List all bookings, optionally filtered by status (admin)
#[openapi(tag = "Bookings")]
#[get("/bookings?<status>&<skip>&<limit>")]
pub async fn list_bookings(
    status: Option<String>,
    skip: Option<i64>,
    limit: Option<i64>,
    _admin: AdminUser,
    booking_service: &State<BookingService>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let status = match status {
        Some(raw) => Some(
            BookingStatus::from_str(&raw)
                .map_err(|_| AppError::BadRequest(format!("Unknown booking status '{}'", raw)))?,
        ),
        None => None,
    };
    let (skip, limit) = page(skip, limit);
    Ok(Json(booking_service.get_all_bookings(status, skip, limit).await?))
}

/// Bookings of the authenticated user
#[openapi(tag = "Bookings")]
#[get("/bookings/my-bookings?<skip>&<limit>")]
pub async fn my_bookings(
    skip: Option<i64>,
    limit: Option<i64>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let (skip, limit) = page(skip, limit);
    Ok(Json(booking_service.get_user_bookings(auth.user.id, skip, limit).await?))
}

/// Fetch one booking with its tickets (owner or admin)
#[openapi(tag = "Bookings")]
#[get("/bookings/<booking_id>")]
pub async fn get_booking(
    booking_id: i32,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingResponse>, AppError> {
    let response = booking_service.get_booking_response(booking_id).await?;
    ensure_owner_or_admin(&response.booking, &auth)?;
    Ok(Json(response))
}

/// Cancel a booking and release its seats (owner or admin)
#[openapi(tag = "Bookings")]
#[post("/bookings/<booking_id>/cancel")]
pub async fn cancel_booking(
    booking_id: i32,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<Booking>, AppError> {
    let booking = booking_service.get_booking(booking_id).await?;
    ensure_owner_or_admin(&booking, &auth)?;
    Ok(Json(booking_service.cancel_booking(booking_id).await?))
}

/// Set a booking's lifecycle status (admin)
#[openapi(tag = "Bookings")]
#[put("/bookings/<booking_id>/status?<status>")]
pub async fn update_booking_status(
    booking_id: i32,
    status: String,
    _admin: AdminUser,
    booking_service: &State<BookingService>,
) -> Result<Json<Booking>, AppError> {
    let status = BookingStatus::from_str(&status)
        .map_err(|_| AppError::BadRequest(format!("Unknown booking status '{}'", status)))?;
    Ok(Json(booking_service.update_booking_status(booking_id, status).await?))
}

/// Set a booking's payment status (admin)
#[openapi(tag = "Bookings")]
#[put("/bookings/<booking_id>/payment-status?<payment_status>&<payment_reference>")]
pub async fn update_payment_status(
    booking_id: i32,
    payment_status: String,
    payment_reference: Option<String>,
    _admin: AdminUser,
    booking_service: &State<BookingService>,
) -> Result<Json<Booking>, AppError> {
    let payment_status = PaymentStatus::from_str(&payment_status)
        .map_err(|_| AppError::BadRequest(format!("Unknown payment status '{}'", payment_status)))?;
    Ok(Json(
        booking_service
            .update_payment_status(booking_id, payment_status, payment_reference)
            .await?,
    ))
}
