pub mod booking;
pub mod cinema;
pub mod movie;
pub mod promo_code;
pub mod seat;
pub mod showtime;
pub mod user;
