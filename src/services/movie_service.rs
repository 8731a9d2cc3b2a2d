use crate::models::movie::{Movie, MovieCreateRequest, MovieStatus, MovieUpdateRequest};
use crate::utils::error::{AppError, AppResult};
use sqlx::MySqlPool;
use validator::Validate;

const MOVIE_COLUMNS: &str =
    "id, title, synopsis, genre, language, duration, release_date, rating, status, is_active";

#[derive(Clone)]
pub struct MovieService {
    pool: MySqlPool,
}

impl MovieService {
    pub fn new(pool: MySqlPool) -> Self {
        MovieService { pool }
    }

    pub async fn create_movie(&self, request: MovieCreateRequest) -> AppResult<Movie> {
        request.validate()?;

        let status = request.status.unwrap_or(MovieStatus::NowPlaying);
        let result = sqlx::query(
            "INSERT INTO movies (title, synopsis, genre, language, duration, release_date, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.title)
        .bind(&request.synopsis)
        .bind(&request.genre)
        .bind(&request.language)
        .bind(request.duration)
        .bind(request.release_date)
        .bind(status)
        .execute(&self.pool)
        .await?;

        self.get_movie(result.last_insert_id() as i32).await
    }

    pub async fn get_movie(&self, movie_id: i32) -> AppResult<Movie> {
        let sql = format!("SELECT {} FROM movies WHERE id = ?", MOVIE_COLUMNS);
        sqlx::query_as::<_, Movie>(&sql)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Movie not found".into()))
    }

    pub async fn get_all_movies(
        &self,
        status: Option<MovieStatus>,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<Movie>> {
        let movies = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM movies WHERE status = ? AND is_active = TRUE \
                     ORDER BY release_date DESC LIMIT ? OFFSET ?",
                    MOVIE_COLUMNS
                );
                sqlx::query_as::<_, Movie>(&sql)
                    .bind(status)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM movies WHERE is_active = TRUE \
                     ORDER BY release_date DESC LIMIT ? OFFSET ?",
                    MOVIE_COLUMNS
                );
                sqlx::query_as::<_, Movie>(&sql)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(movies)
    }

    pub async fn update_movie(&self, movie_id: i32, request: MovieUpdateRequest) -> AppResult<Movie> {
        request.validate()?;

        // COALESCE keeps unspecified fields at their current value.
        let result = sqlx::query(
            "UPDATE movies SET \
             title = COALESCE(?, title), \
             synopsis = COALESCE(?, synopsis), \
             genre = COALESCE(?, genre), \
             language = COALESCE(?, language), \
             duration = COALESCE(?, duration), \
             release_date = COALESCE(?, release_date), \
             status = COALESCE(?, status) \
             WHERE id = ?",
        )
        .bind(&request.title)
        .bind(&request.synopsis)
        .bind(&request.genre)
        .bind(&request.language)
        .bind(request.duration)
        .bind(request.release_date)
        .bind(request.status)
        .bind(movie_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Could also be an update to identical values; confirm existence.
            return self.get_movie(movie_id).await;
        }
        self.get_movie(movie_id).await
    }

    /// Soft delete: hides the movie while showtime and booking history stays
    /// intact.
    pub async fn delete_movie(&self, movie_id: i32) -> AppResult<()> {
        let result = sqlx::query("UPDATE movies SET is_active = FALSE WHERE id = ?")
            .bind(movie_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            self.get_movie(movie_id).await?;
        }
        Ok(())
    }
}
