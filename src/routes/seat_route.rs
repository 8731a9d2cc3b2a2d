use crate::models::seat::{
    BulkSeatCreateRequest, Seat, SeatCreateRequest, SeatStatus, SeatStatusUpdateRequest,
};
use crate::routes::page;
use crate::services::seat_service::SeatService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use std::str::FromStr;

/// List a screen's seats, optionally filtered by status
#[openapi(tag = "Seats")]
#[get("/screens/<screen_id>/seats?<status>&<skip>&<limit>")]
pub async fn list_seats(
    screen_id: i32,
    status: Option<String>,
    skip: Option<i64>,
    limit: Option<i64>,
    seat_service: &State<SeatService>,
) -> Result<Json<Vec<Seat>>, AppError> {
    match status {
        Some(raw) => {
            let status = SeatStatus::from_str(&raw)
                .map_err(|_| AppError::BadRequest(format!("Unknown seat status '{}'", raw)))?;
            Ok(Json(seat_service.seats_by_status(screen_id, status).await?))
        }
        None => {
            let (skip, limit) = page(skip, limit);
            Ok(Json(seat_service.seats_by_screen(screen_id, skip, limit).await?))
        }
    }
}

/// Create a single seat (admin)
#[openapi(tag = "Seats")]
#[post("/seats", format = "json", data = "<request>")]
pub async fn create_seat(
    request: Json<SeatCreateRequest>,
    _admin: AdminUser,
    seat_service: &State<SeatService>,
) -> Result<(Status, Json<Seat>), AppError> {
    let seat = seat_service.create_seat(request.into_inner()).await?;
    Ok((Status::Created, Json(seat)))
}

/// Create a block of seats for a screen (admin)
#[openapi(tag = "Seats")]
#[post("/seats/bulk", format = "json", data = "<request>")]
pub async fn bulk_create_seats(
    request: Json<BulkSeatCreateRequest>,
    _admin: AdminUser,
    seat_service: &State<SeatService>,
) -> Result<(Status, Json<Vec<Seat>>), AppError> {
    let seats = seat_service.bulk_create_seats(request.into_inner()).await?;
    Ok((Status::Created, Json(seats)))
}

/// Maintenance status change for a seat (admin). Booked status is owned by
/// the booking flow and cannot be set here.
#[openapi(tag = "Seats")]
#[put("/seats/<seat_id>/status", format = "json", data = "<request>")]
pub async fn update_seat_status(
    seat_id: i32,
    request: Json<SeatStatusUpdateRequest>,
    _admin: AdminUser,
    seat_service: &State<SeatService>,
) -> Result<Json<Seat>, AppError> {
    Ok(Json(seat_service.update_seat_status(seat_id, request.status).await?))
}

/// Delete a seat (admin); refused while tickets reference it
#[openapi(tag = "Seats")]
#[delete("/seats/<seat_id>")]
pub async fn delete_seat(
    seat_id: i32,
    _admin: AdminUser,
    seat_service: &State<SeatService>,
) -> Result<Status, AppError> {
    seat_service.delete_seat(seat_id).await?;
    Ok(Status::NoContent)
}
