use cinema_booking_system::db::Database;
use cinema_booking_system::routes;
use cinema_booking_system::services::booking_service::BookingService;
use cinema_booking_system::services::cinema_service::CinemaService;
use cinema_booking_system::services::movie_service::MovieService;
use cinema_booking_system::services::seat_service::SeatService;
use cinema_booking_system::services::showtime_service::ShowtimeService;
use cinema_booking_system::services::ticket_service::TicketService;
use cinema_booking_system::services::user_service::UserService;
use cinema_booking_system::swagger::swagger_ui;
use cinema_booking_system::utils::rate_limit::ThrottleManager;
use dotenv::dotenv;
use rocket::fairing::AdHoc;
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::make_swagger_ui;

#[rocket::launch]
async fn rocket() -> _ {
    dotenv().ok();

    // Connect to the database
    let database =
        Database::new(&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"))
            .await
            .expect("Failed to connect to database");
    let pool = database.pool;

    // Initialize the services
    let user_service = UserService::new(pool.clone());
    let movie_service = MovieService::new(pool.clone());
    let cinema_service = CinemaService::new(pool.clone());
    let seat_service = SeatService::new(pool.clone());
    let showtime_service = ShowtimeService::new(pool.clone());
    let booking_service = BookingService::new(pool.clone());
    let ticket_service = TicketService::new(pool.clone());

    // Seed the bootstrap admin account
    let admin_email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let admin_password =
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    user_service
        .ensure_admin(&admin_email, &admin_password)
        .await
        .expect("Failed to seed admin account");

    rocket::build()
        .manage(user_service)
        .manage(movie_service)
        .manage(cinema_service)
        .manage(seat_service)
        .manage(showtime_service)
        .manage(booking_service)
        .manage(ticket_service)
        .manage(ThrottleManager::new())
        .mount(
            "/api",
            openapi_get_routes![
                routes::user_route::register,
                routes::user_route::login,
                routes::user_route::me,
                routes::user_route::list_users,
                routes::user_route::set_user_active,
                routes::movie_route::list_movies,
                routes::movie_route::get_movie,
                routes::movie_route::create_movie,
                routes::movie_route::update_movie,
                routes::movie_route::delete_movie,
                routes::cinema_route::list_cinemas,
                routes::cinema_route::get_cinema,
                routes::cinema_route::create_cinema,
                routes::cinema_route::delete_cinema,
                routes::cinema_route::list_screens,
                routes::cinema_route::create_screen,
                routes::seat_route::list_seats,
                routes::seat_route::create_seat,
                routes::seat_route::bulk_create_seats,
                routes::seat_route::update_seat_status,
                routes::seat_route::delete_seat,
                routes::showtime_route::list_showtimes,
                routes::showtime_route::get_showtime,
                routes::showtime_route::list_movie_showtimes,
                routes::showtime_route::list_cinema_showtimes,
                routes::showtime_route::create_showtime,
                routes::showtime_route::update_showtime,
                routes::showtime_route::delete_showtime,
                routes::booking_route::create_booking,
                routes::booking_route::list_bookings,
                routes::booking_route::my_bookings,
                routes::booking_route::get_booking,
                routes::booking_route::cancel_booking,
                routes::booking_route::update_booking_status,
                routes::booking_route::update_payment_status,
                routes::ticket_route::booking_tickets,
                routes::ticket_route::get_ticket,
                routes::ticket_route::mark_ticket_used,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
