use crate::models::seat::{BulkSeatCreateRequest, Seat, SeatCategory, SeatCreateRequest, SeatStatus};
use crate::utils::error::{AppError, AppResult};
use sqlx::{MySql, MySqlPool, Transaction};
use validator::Validate;

const SEAT_COLUMNS: &str = "id, screen_id, seat_row, seat_number, category, status, version";

/// Sole writer of `seats.status`. Claims and releases run as all-or-nothing
/// batches under row locks so concurrent bookings of the same seat resolve
/// to exactly one winner.
#[derive(Clone)]
pub struct SeatService {
    pool: MySqlPool,
}

impl SeatService {
    pub fn new(pool: MySqlPool) -> Self {
        SeatService { pool }
    }

    /// Transitions every seat in `seat_ids` from `available` to `desired`
    /// inside the caller's transaction. Rows are locked in ascending id
    /// order; if any seat is missing, on the wrong screen, or not available,
    /// nothing is mutated and the error names the offending seats.
    pub async fn claim_in_tx(
        tx: &mut Transaction<'_, MySql>,
        screen_id: i32,
        seat_ids: &[i32],
        desired: SeatStatus,
    ) -> AppResult<Vec<Seat>> {
        if !matches!(desired, SeatStatus::Reserved | SeatStatus::Booked) {
            return Err(AppError::ValidationError(
                "Seats can only be claimed as reserved or booked".into(),
            ));
        }

        let mut ids: Vec<i32> = seat_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != seat_ids.len() {
            return Err(AppError::ValidationError("Duplicate seat ids in claim".into()));
        }
        if ids.is_empty() {
            return Err(AppError::ValidationError("No seats requested".into()));
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let select_sql = format!(
            "SELECT {} FROM seats WHERE id IN ({}) ORDER BY id FOR UPDATE",
            SEAT_COLUMNS, placeholders
        );
        let mut select = sqlx::query_as::<_, Seat>(&select_sql);
        for id in &ids {
            select = select.bind(id);
        }
        let seats = select.fetch_all(&mut **tx).await?;

        if seats.len() != ids.len() {
            let missing: Vec<i32> = ids
                .iter()
                .copied()
                .filter(|id| !seats.iter().any(|s| s.id == *id))
                .collect();
            return Err(AppError::NotFound(format!("Seats not found: {:?}", missing)));
        }

        if let Some(stray) = seats.iter().find(|s| s.screen_id != screen_id) {
            return Err(AppError::ValidationError(format!(
                "Seat {} does not belong to screen {}",
                stray.id, screen_id
            )));
        }

        let unavailable: Vec<i32> = seats
            .iter()
            .filter(|s| s.status != SeatStatus::Available)
            .map(|s| s.id)
            .collect();
        if !unavailable.is_empty() {
            return Err(AppError::SeatConflict { seats: unavailable });
        }

        let update_sql = format!(
            "UPDATE seats SET status = ?, version = version + 1 \
             WHERE id IN ({}) AND status = 'available'",
            placeholders
        );
        let mut update = sqlx::query(&update_sql).bind(desired);
        for id in &ids {
            update = update.bind(id);
        }
        let result = update.execute(&mut **tx).await?;
        if result.rows_affected() != ids.len() as u64 {
            // Rows are locked, so this indicates a broken invariant rather
            // than a lost race.
            return Err(AppError::DatabaseError(
                "Seat claim mutated an unexpected number of rows".into(),
            ));
        }

        Ok(seats
            .into_iter()
            .map(|mut seat| {
                seat.status = desired;
                seat.version += 1;
                seat
            })
            .collect())
    }

    /// Returns seats to `available` inside the caller's transaction.
    /// Idempotent: already-available seats are left untouched.
    pub async fn release_in_tx(tx: &mut Transaction<'_, MySql>, seat_ids: &[i32]) -> AppResult<()> {
        if seat_ids.is_empty() {
            return Ok(());
        }
        let mut ids: Vec<i32> = seat_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "UPDATE seats SET status = 'available', version = version + 1 \
             WHERE id IN ({}) AND status IN ('reserved', 'booked')",
            placeholders
        );
        let mut query = sqlx::query(&sql);
        for id in &ids {
            query = query.bind(id);
        }
        query.execute(&mut **tx).await?;
        Ok(())
    }

    /// Claim as a standalone operation with its own transaction.
    pub async fn claim(
        &self,
        screen_id: i32,
        seat_ids: &[i32],
        desired: SeatStatus,
    ) -> AppResult<Vec<Seat>> {
        let mut tx = self.pool.begin().await?;
        let seats = Self::claim_in_tx(&mut tx, screen_id, seat_ids, desired).await?;
        tx.commit().await?;
        Ok(seats)
    }

    /// Release as a standalone operation with its own transaction.
    pub async fn release(&self, seat_ids: &[i32]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::release_in_tx(&mut tx, seat_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn create_seat(&self, request: SeatCreateRequest) -> AppResult<Seat> {
        request.validate()?;
        self.ensure_screen_exists(request.screen_id).await?;

        let category = request.category.unwrap_or(SeatCategory::Standard);
        let result = sqlx::query(
            "INSERT INTO seats (screen_id, seat_row, seat_number, category) VALUES (?, ?, ?, ?)",
        )
        .bind(request.screen_id)
        .bind(&request.seat_row)
        .bind(request.seat_number)
        .bind(category)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("A seat already exists at that position".into())
            }
            _ => AppError::from(e),
        })?;

        self.get_seat(result.last_insert_id() as i32).await
    }

    /// Creates a rectangular block of seats for a screen in one transaction.
    pub async fn bulk_create_seats(&self, request: BulkSeatCreateRequest) -> AppResult<Vec<Seat>> {
        request.validate()?;
        self.ensure_screen_exists(request.screen_id).await?;

        let category = request.category.unwrap_or(SeatCategory::Standard);
        let mut tx = self.pool.begin().await?;
        for row in &request.rows {
            for number in 1..=request.seats_per_row {
                sqlx::query(
                    "INSERT INTO seats (screen_id, seat_row, seat_number, category) VALUES (?, ?, ?, ?)",
                )
                .bind(request.screen_id)
                .bind(row)
                .bind(number)
                .bind(category)
                .execute(&mut *tx)
                .await
                .map_err(|e| match &e {
                    sqlx::Error::Database(db) if db.is_unique_violation() => {
                        AppError::Conflict(format!("Seat {}{} already exists", row, number))
                    }
                    _ => AppError::from(e),
                })?;
            }
        }
        tx.commit().await?;

        log::info!(
            "created {} seats on screen {}",
            request.rows.len() as i32 * request.seats_per_row,
            request.screen_id
        );
        self.seats_by_screen(request.screen_id, 0, i64::MAX).await
    }

    pub async fn get_seat(&self, seat_id: i32) -> AppResult<Seat> {
        let sql = format!("SELECT {} FROM seats WHERE id = ?", SEAT_COLUMNS);
        sqlx::query_as::<_, Seat>(&sql)
            .bind(seat_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Seat not found".into()))
    }

    pub async fn seats_by_screen(&self, screen_id: i32, skip: i64, limit: i64) -> AppResult<Vec<Seat>> {
        let sql = format!(
            "SELECT {} FROM seats WHERE screen_id = ? ORDER BY seat_row, seat_number LIMIT ? OFFSET ?",
            SEAT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Seat>(&sql)
            .bind(screen_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Read-only status query; no locking.
    pub async fn seats_by_status(&self, screen_id: i32, status: SeatStatus) -> AppResult<Vec<Seat>> {
        let sql = format!(
            "SELECT {} FROM seats WHERE screen_id = ? AND status = ? ORDER BY seat_row, seat_number",
            SEAT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Seat>(&sql)
            .bind(screen_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Admin maintenance transitions only. `booked` is reachable solely
    /// through a booking's claim, never set directly.
    pub async fn update_seat_status(&self, seat_id: i32, status: SeatStatus) -> AppResult<Seat> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {} FROM seats WHERE id = ? FOR UPDATE", SEAT_COLUMNS);
        let seat = sqlx::query_as::<_, Seat>(&sql)
            .bind(seat_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Seat not found".into()))?;

        let allowed = matches!(
            (seat.status, status),
            (SeatStatus::Available, SeatStatus::Blocked)
                | (SeatStatus::Blocked, SeatStatus::Available)
                | (SeatStatus::Reserved, SeatStatus::Available)
        );
        if !allowed {
            return Err(AppError::Conflict(format!(
                "Seat status cannot change from {} to {}",
                seat.status, status
            )));
        }

        sqlx::query("UPDATE seats SET status = ?, version = version + 1 WHERE id = ?")
            .bind(status)
            .bind(seat_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.get_seat(seat_id).await
    }

    /// Deletion is rejected while any ticket references the seat, so booked
    /// history never dangles.
    pub async fn delete_seat(&self, seat_id: i32) -> AppResult<()> {
        let referenced: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE seat_id = ?")
                .bind(seat_id)
                .fetch_one(&self.pool)
                .await?;
        if referenced > 0 {
            return Err(AppError::Conflict(
                "Seat is referenced by tickets and cannot be deleted".into(),
            ));
        }

        let result = sqlx::query("DELETE FROM seats WHERE id = ?")
            .bind(seat_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Seat not found".into()));
        }
        Ok(())
    }

    async fn ensure_screen_exists(&self, screen_id: i32) -> AppResult<()> {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM screens WHERE id = ?")
            .bind(screen_id)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(AppError::NotFound("Screen not found".into()));
        }
        Ok(())
    }
}
