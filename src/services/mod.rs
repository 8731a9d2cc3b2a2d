pub mod booking_service;
pub mod cinema_service;
pub mod movie_service;
pub mod seat_service;
pub mod showtime_service;
pub mod ticket_service;
pub mod user_service;
