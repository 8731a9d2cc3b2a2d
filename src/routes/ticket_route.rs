use crate::models::booking::Ticket;
use crate::models::user::UserRole;
use crate::services::booking_service::BookingService;
use crate::services::ticket_service::TicketService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Tickets of a booking (owner or admin)
#[openapi(tag = "Tickets")]
#[get("/bookings/<booking_id>/tickets")]
pub async fn booking_tickets(
    booking_id: i32,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
    ticket_service: &State<TicketService>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    let booking = booking_service.get_booking(booking_id).await?;
    if booking.user_id != auth.user.id && auth.user.role != UserRole::Admin {
        return Err(AppError::Forbidden("Not authorized to access this booking".into()));
    }
    Ok(Json(ticket_service.get_booking_tickets(booking_id).await?))
}

/// Fetch one ticket (owner or admin)
#[openapi(tag = "Tickets")]
#[get("/tickets/<ticket_id>")]
pub async fn get_ticket(
    ticket_id: i32,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = ticket_service.get_ticket(ticket_id).await?;
    let booking = booking_service.get_booking(ticket.booking_id).await?;
    if booking.user_id != auth.user.id && auth.user.role != UserRole::Admin {
        return Err(AppError::Forbidden("Not authorized to access this ticket".into()));
    }
    Ok(Json(ticket))
}

/// Admission check-in: one-way flip of is_used (admin). A second call fails
/// with already_used so double admission is detectable.
#[openapi(tag = "Tickets")]
#[post("/tickets/<ticket_id>/use")]
pub async fn mark_ticket_used(
    ticket_id: i32,
    _admin: AdminUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    Ok(Json(ticket_service.mark_ticket_used(ticket_id).await?))
}
