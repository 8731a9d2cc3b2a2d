pub mod booking_route;
pub mod cinema_route;
pub mod movie_route;
pub mod seat_route;
pub mod showtime_route;
pub mod ticket_route;
pub mod user_route;

// Shared skip/limit pagination defaults for list endpoints.
pub(crate) fn page(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(20).clamp(1, 100);
    (skip, limit)
}
