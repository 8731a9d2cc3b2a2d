use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

/// Owns the MySQL connection pool shared by every service.
pub struct Database {
    pub pool: MySqlPool,
}

impl Database {
    // Connects eagerly; a bad DATABASE_URL fails the launch, not the first
    // request.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }
}
