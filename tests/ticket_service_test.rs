use chrono::{Duration, Utc};
use cinema_booking_system::models::booking::BookingCreateRequest;
use cinema_booking_system::models::seat::SeatCategory;
use cinema_booking_system::models::user::UserRegistrationRequest;
use cinema_booking_system::services::booking_service::BookingService;
use cinema_booking_system::services::ticket_service::TicketService;
use cinema_booking_system::services::user_service::UserService;
use cinema_booking_system::utils::error::AppError;
use ctor::dtor;
use sqlx::mysql::MySqlPool as Pool;
use tokio::task::JoinSet;

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

// Books two standard seats and returns the ticket ids.
async fn seed_booked_tickets(pool: &Pool, tag: &str) -> anyhow::Result<Vec<i32>> {
    let cinema_id = sqlx::query("INSERT INTO cinemas (name, city) VALUES (?, 'Toronto')")
        .bind(format!("Cinema {}", tag))
        .execute(pool)
        .await?
        .last_insert_id() as i32;
    let screen_id = sqlx::query(
        "INSERT INTO screens (cinema_id, screen_number, total_seats) VALUES (?, 1, 2)",
    )
    .bind(cinema_id)
    .execute(pool)
    .await?
    .last_insert_id() as i32;
    let movie_id = sqlx::query(
        "INSERT INTO movies (title, duration, release_date) VALUES (?, 100, '2025-01-01')",
    )
    .bind(format!("Movie {}", tag))
    .execute(pool)
    .await?
    .last_insert_id() as i32;
    let start = Utc::now().naive_utc() + Duration::days(1);
    let showtime_id = sqlx::query(
        "INSERT INTO showtimes (movie_id, screen_id, cinema_id, start_time, end_time, base_price) \
         VALUES (?, ?, ?, ?, ?, 12.00)",
    )
    .bind(movie_id)
    .bind(screen_id)
    .bind(cinema_id)
    .bind(start)
    .bind(start + Duration::hours(2))
    .execute(pool)
    .await?
    .last_insert_id() as i32;

    let mut seat_ids = Vec::new();
    for number in 1..=2 {
        let seat_id = sqlx::query(
            "INSERT INTO seats (screen_id, seat_row, seat_number, category) VALUES (?, 'A', ?, ?)",
        )
        .bind(screen_id)
        .bind(number)
        .bind(SeatCategory::Standard)
        .execute(pool)
        .await?
        .last_insert_id() as i32;
        seat_ids.push(seat_id);
    }

    let user_service = UserService::new(pool.clone());
    let user_id = user_service
        .register_user(UserRegistrationRequest {
            email: format!("{}@example.com", tag),
            username: tag.to_string(),
            full_name: None,
            password: "test_password".to_string(),
        })
        .await?;

    let response = BookingService::new(pool.clone())
        .create_booking(
            user_id,
            BookingCreateRequest {
                showtime_id,
                seat_ids,
                promo_code: None,
            },
        )
        .await?;
    Ok(response.tickets.iter().map(|t| t.id).collect())
}

#[tokio::test]
async fn mark_used_is_a_one_way_latch() -> anyhow::Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: ADMIN_DATABASE_URL not set");
        return Ok(());
    };
    let service = TicketService::new(pool.clone());
    let ticket_ids = seed_booked_tickets(&pool, "latch").await?;

    let ticket = service.mark_ticket_used(ticket_ids[0]).await?;
    assert!(ticket.is_used);

    let result = service.mark_ticket_used(ticket_ids[0]).await;
    assert!(matches!(result, Err(AppError::AlreadyUsed)));

    // The other ticket of the booking is unaffected.
    let other = service.get_ticket(ticket_ids[1]).await?;
    assert!(!other.is_used);

    let result = service.mark_ticket_used(999_999).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn concurrent_check_ins_admit_exactly_once() -> anyhow::Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: ADMIN_DATABASE_URL not set");
        return Ok(());
    };
    let service = TicketService::new(pool.clone());
    let ticket_ids = seed_booked_tickets(&pool, "gate").await?;
    let ticket_id = ticket_ids[0];

    let mut join_set = JoinSet::new();
    for _ in 0..6 {
        let service = service.clone();
        join_set.spawn(async move { service.mark_ticket_used(ticket_id).await });
    }

    let mut admitted = 0;
    let mut rejected = 0;
    while let Some(result) = join_set.join_next().await {
        match result? {
            Ok(ticket) => {
                assert!(ticket.is_used);
                admitted += 1;
            }
            Err(AppError::AlreadyUsed) => rejected += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
    assert_eq!(admitted, 1);
    assert_eq!(rejected, 5);
    Ok(())
}

#[tokio::test]
async fn booking_tickets_are_listed_together() -> anyhow::Result<()> {
    let Some(pool) = TestDb::try_instance().await else {
        eprintln!("skipping: ADMIN_DATABASE_URL not set");
        return Ok(());
    };
    let service = TicketService::new(pool.clone());
    let ticket_ids = seed_booked_tickets(&pool, "listing").await?;

    let first = service.get_ticket(ticket_ids[0]).await?;
    let tickets = service.get_booking_tickets(first.booking_id).await?;
    assert_eq!(tickets.len(), 2);
    assert!(tickets.iter().all(|t| t.category == "standard"));
    assert!(tickets.iter().all(|t| !t.is_used));
    Ok(())
}
