use crate::models::booking::Ticket;
use crate::utils::error::{AppError, AppResult};
use sqlx::MySqlPool;

const TICKET_COLUMNS: &str = "id, booking_id, seat_id, category, price, is_used";

#[derive(Clone)]
pub struct TicketService {
    pool: MySqlPool,
}

impl TicketService {
    pub fn new(pool: MySqlPool) -> Self {
        TicketService { pool }
    }

    pub async fn get_ticket(&self, ticket_id: i32) -> AppResult<Ticket> {
        let sql = format!("SELECT {} FROM tickets WHERE id = ?", TICKET_COLUMNS);
        sqlx::query_as::<_, Ticket>(&sql)
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Ticket not found".into()))
    }

    pub async fn get_booking_tickets(&self, booking_id: i32) -> AppResult<Vec<Ticket>> {
        let sql = format!("SELECT {} FROM tickets WHERE booking_id = ?", TICKET_COLUMNS);
        Ok(sqlx::query_as::<_, Ticket>(&sql)
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await?)
    }

    /// One-way admission latch. The conditional update makes concurrent
    /// check-ins race-free: the second caller sees zero affected rows and
    /// gets `AlreadyUsed` rather than a silent success.
    pub async fn mark_ticket_used(&self, ticket_id: i32) -> AppResult<Ticket> {
        let result = sqlx::query("UPDATE tickets SET is_used = TRUE WHERE id = ? AND is_used = FALSE")
            .bind(ticket_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing ticket from a double check-in.
            let ticket = self.get_ticket(ticket_id).await?;
            if ticket.is_used {
                log::warn!("ticket {} presented twice at admission", ticket_id);
                return Err(AppError::AlreadyUsed);
            }
            return Err(AppError::DatabaseError("Ticket update affected no rows".into()));
        }

        self.get_ticket(ticket_id).await
    }
}
