use chrono::{Duration, Utc};
use cinema_booking_system::models::booking::BookingCreateRequest;
use cinema_booking_system::models::seat::{BulkSeatCreateRequest, SeatStatus};
use cinema_booking_system::models::showtime::{ShowtimeCreateRequest, ShowtimeUpdateRequest};
use cinema_booking_system::models::user::UserRegistrationRequest;
use cinema_booking_system::services::booking_service::BookingService;
use cinema_booking_system::services::seat_service::SeatService;
use cinema_booking_system::services::showtime_service::ShowtimeService;
use cinema_booking_system::services::user_service::UserService;
use cinema_booking_system::utils::error::AppError;
use ctor::dtor;
use rust_decimal::Decimal;
use sqlx::mysql::MySqlPool as Pool;

mod common {
    pub mod test_utils;
}
use common::test_utils::TestDb;

#[dtor]
fn cleanup() {
    if let Err(e) = TestDb::cleanup_database_sync() {
        eprintln!("Failed to cleanup test database: {}", e);
    }
}

struct Venue {
    movie_id: i32,
    cinema_id: i32,
    screen_id: i32,
}

async fn seed_venue(pool: &Pool, tag: &str) -> anyhow::Result<Venue> {
    let cinema_id = sqlx::query("INSERT INTO cinemas (name, city) VALUES (?, 'Toronto')")
        .bind(format!("Cinema {}", tag))
        .execute(pool)
        .await?
        .last_insert_id() as i32;
    let screen_id = sqlx::query(
        "INSERT INTO screens (cinema_id, screen_number, total_seats) VALUES (?, 1, 10)",
    )
    .bind(cinema_id)
    .execute(pool)
    .await?
    .last_insert_id() as i32;
    let movie_id = sqlx::query(
        "INSERT INTO movies (title, duration, release_date) VALUES (?, 110, '2025-01-01')",
    )
    .bind(format!("Movie {}", tag))
    .execute(pool)
    .await?
    .last_insert_id() as i32;
    Ok(Venue {
        movie_id,
        cinema_id,
        screen_id,
    })
}

fn tomorrow_request(venue: &Venue) -> ShowtimeCreateRequest {
    let start = Utc::now().naive_utc() + Duration::days(1);
    ShowtimeCreateRequest {
        movie_id: venue.movie_id,
        screen_id: venue.screen_id,
        cinema_id: venue.cinema_id,
        start_time: start,
        end_time: start + Duration::hours(2),
        base_price: Decimal::new(1000, 2),
    }
}

#[tokio::test]
async fn available_seats_tracks_the_live_seat_rows() -> anyhow::Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: ADMIN_DATABASE_URL not set");
        return Ok(());
    };
    let showtime_service = ShowtimeService::new(pool.clone());
    let seat_service = SeatService::new(pool.clone());
    let venue = seed_venue(&pool, "derived").await?;

    let seats = seat_service
        .bulk_create_seats(BulkSeatCreateRequest {
            screen_id: venue.screen_id,
            rows: vec!["A".to_string()],
            seats_per_row: 4,
            category: None,
        })
        .await?;
    let showtime = showtime_service.create_showtime(tomorrow_request(&venue)).await?;
    assert_eq!(showtime.available_seats, 4);

    // A booking claim is reflected on the next read without any counter
    // bookkeeping.
    let user_id = UserService::new(pool.clone())
        .register_user(UserRegistrationRequest {
            email: "derived@example.com".to_string(),
            username: "derived".to_string(),
            full_name: None,
            password: "test_password".to_string(),
        })
        .await?;
    let booking = BookingService::new(pool.clone())
        .create_booking(
            user_id,
            BookingCreateRequest {
                showtime_id: showtime.id,
                seat_ids: vec![seats[0].id, seats[1].id],
                promo_code: None,
            },
        )
        .await?;
    assert_eq!(showtime_service.get_showtime(showtime.id).await?.available_seats, 2);

    // Blocking a seat removes it from availability too.
    seat_service
        .update_seat_status(seats[2].id, SeatStatus::Blocked)
        .await?;
    assert_eq!(showtime_service.get_showtime(showtime.id).await?.available_seats, 1);

    BookingService::new(pool.clone()).cancel_booking(booking.booking.id).await?;
    assert_eq!(showtime_service.get_showtime(showtime.id).await?.available_seats, 3);
    Ok(())
}

#[tokio::test]
async fn create_validates_times_venue_and_price() -> anyhow::Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: ADMIN_DATABASE_URL not set");
        return Ok(());
    };
    let service = ShowtimeService::new(pool.clone());
    let venue = seed_venue(&pool, "validate").await?;
    let other = seed_venue(&pool, "validate_other").await?;

    let mut request = tomorrow_request(&venue);
    request.end_time = request.start_time;
    assert!(matches!(
        service.create_showtime(request).await,
        Err(AppError::ValidationError(_))
    ));

    let mut request = tomorrow_request(&venue);
    request.base_price = Decimal::new(-100, 2);
    assert!(matches!(
        service.create_showtime(request).await,
        Err(AppError::ValidationError(_))
    ));

    let mut request = tomorrow_request(&venue);
    request.movie_id = 999_999;
    assert!(matches!(
        service.create_showtime(request).await,
        Err(AppError::NotFound(_))
    ));

    // Screen belongs to a different cinema.
    let mut request = tomorrow_request(&venue);
    request.screen_id = other.screen_id;
    assert!(matches!(
        service.create_showtime(request).await,
        Err(AppError::ValidationError(_))
    ));
    Ok(())
}

#[tokio::test]
async fn update_and_delete_honor_their_guards() -> anyhow::Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: ADMIN_DATABASE_URL not set");
        return Ok(());
    };
    let service = ShowtimeService::new(pool.clone());
    let seat_service = SeatService::new(pool.clone());
    let venue = seed_venue(&pool, "guards").await?;
    let seats = seat_service
        .bulk_create_seats(BulkSeatCreateRequest {
            screen_id: venue.screen_id,
            rows: vec!["A".to_string()],
            seats_per_row: 1,
            category: None,
        })
        .await?;
    let showtime = service.create_showtime(tomorrow_request(&venue)).await?;

    let updated = service
        .update_showtime(
            showtime.id,
            ShowtimeUpdateRequest {
                start_time: None,
                end_time: None,
                base_price: Some(Decimal::new(1250, 2)),
                is_active: None,
            },
        )
        .await?;
    assert_eq!(updated.base_price, Decimal::new(1250, 2));

    // Inverted window on update is rejected.
    let result = service
        .update_showtime(
            showtime.id,
            ShowtimeUpdateRequest {
                start_time: Some(showtime.end_time),
                end_time: Some(showtime.start_time),
                base_price: None,
                is_active: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));

    // Delete is refused while a non-cancelled booking exists.
    let user_id = UserService::new(pool.clone())
        .register_user(UserRegistrationRequest {
            email: "guards@example.com".to_string(),
            username: "guards".to_string(),
            full_name: None,
            password: "test_password".to_string(),
        })
        .await?;
    let booking = BookingService::new(pool.clone())
        .create_booking(
            user_id,
            BookingCreateRequest {
                showtime_id: showtime.id,
                seat_ids: vec![seats[0].id],
                promo_code: None,
            },
        )
        .await?;
    let result = service.delete_showtime(showtime.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    BookingService::new(pool.clone()).cancel_booking(booking.booking.id).await?;
    service.delete_showtime(showtime.id).await?;
    let result = service.get_showtime(showtime.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    Ok(())
}
