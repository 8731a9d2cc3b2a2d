use crate::models::showtime::{ShowtimeCreateRequest, ShowtimeResponse, ShowtimeUpdateRequest};
use crate::utils::error::{AppError, AppResult};
use rust_decimal::Decimal;
use sqlx::MySqlPool;

// available_seats is derived from the live seat rows on every read; there is
// no stored counter to drift out of sync with the seat table.
const SHOWTIME_SELECT: &str = "SELECT st.id, st.movie_id, st.screen_id, st.cinema_id, \
    st.start_time, st.end_time, st.base_price, \
    (SELECT COUNT(*) FROM seats s WHERE s.screen_id = st.screen_id AND s.status = 'available') \
        AS available_seats, \
    st.is_active \
    FROM showtimes st";

#[derive(Clone)]
pub struct ShowtimeService {
    pool: MySqlPool,
}

impl ShowtimeService {
    pub fn new(pool: MySqlPool) -> Self {
        ShowtimeService { pool }
    }

    pub async fn create_showtime(&self, request: ShowtimeCreateRequest) -> AppResult<ShowtimeResponse> {
        if request.start_time >= request.end_time {
            return Err(AppError::ValidationError("start_time must precede end_time".into()));
        }
        if request.base_price < Decimal::ZERO {
            return Err(AppError::ValidationError("base_price cannot be negative".into()));
        }

        let movie_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies WHERE id = ?")
            .bind(request.movie_id)
            .fetch_one(&self.pool)
            .await?;
        if movie_exists == 0 {
            return Err(AppError::NotFound("Movie not found".into()));
        }

        // The screen must belong to the named cinema.
        let screen_cinema: Option<i32> =
            sqlx::query_scalar("SELECT cinema_id FROM screens WHERE id = ?")
                .bind(request.screen_id)
                .fetch_optional(&self.pool)
                .await?;
        match screen_cinema {
            None => return Err(AppError::NotFound("Screen not found".into())),
            Some(cinema_id) if cinema_id != request.cinema_id => {
                return Err(AppError::ValidationError(
                    "Screen does not belong to the given cinema".into(),
                ))
            }
            Some(_) => {}
        }

        let result = sqlx::query(
            "INSERT INTO showtimes (movie_id, screen_id, cinema_id, start_time, end_time, base_price) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(request.movie_id)
        .bind(request.screen_id)
        .bind(request.cinema_id)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.base_price)
        .execute(&self.pool)
        .await?;

        self.get_showtime(result.last_insert_id() as i32).await
    }

    pub async fn get_showtime(&self, showtime_id: i32) -> AppResult<ShowtimeResponse> {
        let sql = format!("{} WHERE st.id = ?", SHOWTIME_SELECT);
        sqlx::query_as::<_, ShowtimeResponse>(&sql)
            .bind(showtime_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Showtime not found".into()))
    }

    pub async fn get_all_showtimes(&self, skip: i64, limit: i64) -> AppResult<Vec<ShowtimeResponse>> {
        let sql = format!("{} ORDER BY st.start_time LIMIT ? OFFSET ?", SHOWTIME_SELECT);
        Ok(sqlx::query_as::<_, ShowtimeResponse>(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_showtimes_by_movie(
        &self,
        movie_id: i32,
        upcoming_only: bool,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<ShowtimeResponse>> {
        let showtimes = if upcoming_only {
            let sql = format!(
                "{} WHERE st.movie_id = ? AND st.start_time > ? AND st.is_active = TRUE \
                 ORDER BY st.start_time LIMIT ? OFFSET ?",
                SHOWTIME_SELECT
            );
            sqlx::query_as::<_, ShowtimeResponse>(&sql)
                .bind(movie_id)
                .bind(chrono::Utc::now().naive_utc())
                .bind(limit)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?
        } else {
            let sql = format!(
                "{} WHERE st.movie_id = ? ORDER BY st.start_time LIMIT ? OFFSET ?",
                SHOWTIME_SELECT
            );
            sqlx::query_as::<_, ShowtimeResponse>(&sql)
                .bind(movie_id)
                .bind(limit)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?
        };
        Ok(showtimes)
    }

    pub async fn get_showtimes_by_cinema(
        &self,
        cinema_id: i32,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<ShowtimeResponse>> {
        let sql = format!(
            "{} WHERE st.cinema_id = ? ORDER BY st.start_time LIMIT ? OFFSET ?",
            SHOWTIME_SELECT
        );
        Ok(sqlx::query_as::<_, ShowtimeResponse>(&sql)
            .bind(cinema_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn update_showtime(
        &self,
        showtime_id: i32,
        request: ShowtimeUpdateRequest,
    ) -> AppResult<ShowtimeResponse> {
        let current = self.get_showtime(showtime_id).await?;

        let start_time = request.start_time.unwrap_or(current.start_time);
        let end_time = request.end_time.unwrap_or(current.end_time);
        if start_time >= end_time {
            return Err(AppError::ValidationError("start_time must precede end_time".into()));
        }
        if let Some(price) = request.base_price {
            if price < Decimal::ZERO {
                return Err(AppError::ValidationError("base_price cannot be negative".into()));
            }
        }

        sqlx::query(
            "UPDATE showtimes SET start_time = ?, end_time = ?, \
             base_price = COALESCE(?, base_price), is_active = COALESCE(?, is_active) \
             WHERE id = ?",
        )
        .bind(start_time)
        .bind(end_time)
        .bind(request.base_price)
        .bind(request.is_active)
        .bind(showtime_id)
        .execute(&self.pool)
        .await?;

        self.get_showtime(showtime_id).await
    }

    /// Hard delete, refused while non-cancelled bookings reference the
    /// showtime.
    pub async fn delete_showtime(&self, showtime_id: i32) -> AppResult<()> {
        let active_bookings: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE showtime_id = ? AND status != 'cancelled'",
        )
        .bind(showtime_id)
        .fetch_one(&self.pool)
        .await?;
        if active_bookings > 0 {
            return Err(AppError::Conflict(
                "Showtime has active bookings and cannot be deleted".into(),
            ));
        }

        let result = sqlx::query("DELETE FROM showtimes WHERE id = ?")
            .bind(showtime_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Showtime not found".into()));
        }
        Ok(())
    }
}
