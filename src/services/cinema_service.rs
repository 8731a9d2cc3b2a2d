use crate::models::cinema::{Cinema, CinemaCreateRequest, Screen, ScreenCreateRequest};
use crate::utils::error::{AppError, AppResult};
use sqlx::MySqlPool;
use validator::Validate;

const CINEMA_COLUMNS: &str = "id, name, city, location, phone, email, is_active";
const SCREEN_COLUMNS: &str = "id, cinema_id, screen_number, total_seats, screen_type, is_active";

#[derive(Clone)]
pub struct CinemaService {
    pool: MySqlPool,
}

impl CinemaService {
    pub fn new(pool: MySqlPool) -> Self {
        CinemaService { pool }
    }

    pub async fn create_cinema(&self, request: CinemaCreateRequest) -> AppResult<Cinema> {
        request.validate()?;

        let result = sqlx::query(
            "INSERT INTO cinemas (name, city, location, phone, email) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(&request.city)
        .bind(&request.location)
        .bind(&request.phone)
        .bind(&request.email)
        .execute(&self.pool)
        .await?;

        self.get_cinema(result.last_insert_id() as i32).await
    }

    pub async fn get_cinema(&self, cinema_id: i32) -> AppResult<Cinema> {
        let sql = format!("SELECT {} FROM cinemas WHERE id = ?", CINEMA_COLUMNS);
        sqlx::query_as::<_, Cinema>(&sql)
            .bind(cinema_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Cinema not found".into()))
    }

    pub async fn get_all_cinemas(
        &self,
        city: Option<String>,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Cinema>> {
        let cinemas = match city {
            Some(city) => {
                let sql = format!(
                    "SELECT {} FROM cinemas WHERE city = ? AND is_active = TRUE ORDER BY name LIMIT ? OFFSET ?",
                    CINEMA_COLUMNS
                );
                sqlx::query_as::<_, Cinema>(&sql)
                    .bind(city)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM cinemas WHERE is_active = TRUE ORDER BY name LIMIT ? OFFSET ?",
                    CINEMA_COLUMNS
                );
                sqlx::query_as::<_, Cinema>(&sql)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(cinemas)
    }

    pub async fn delete_cinema(&self, cinema_id: i32) -> AppResult<()> {
        let result = sqlx::query("UPDATE cinemas SET is_active = FALSE WHERE id = ?")
            .bind(cinema_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            self.get_cinema(cinema_id).await?;
        }
        Ok(())
    }

    pub async fn create_screen(&self, request: ScreenCreateRequest) -> AppResult<Screen> {
        request.validate()?;
        self.get_cinema(request.cinema_id).await?;

        let result = sqlx::query(
            "INSERT INTO screens (cinema_id, screen_number, total_seats, screen_type) VALUES (?, ?, ?, ?)",
        )
        .bind(request.cinema_id)
        .bind(request.screen_number)
        .bind(request.total_seats)
        .bind(&request.screen_type)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Screen number already exists in this cinema".into())
            }
            _ => AppError::from(e),
        })?;

        self.get_screen(result.last_insert_id() as i32).await
    }

    pub async fn get_screen(&self, screen_id: i32) -> AppResult<Screen> {
        let sql = format!("SELECT {} FROM screens WHERE id = ?", SCREEN_COLUMNS);
        sqlx::query_as::<_, Screen>(&sql)
            .bind(screen_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Screen not found".into()))
    }

    pub async fn get_cinema_screens(&self, cinema_id: i32) -> AppResult<Vec<Screen>> {
        let sql = format!(
            "SELECT {} FROM screens WHERE cinema_id = ? ORDER BY screen_number",
            SCREEN_COLUMNS
        );
        Ok(sqlx::query_as::<_, Screen>(&sql)
            .bind(cinema_id)
            .fetch_all(&self.pool)
            .await?)
    }
}
