use dotenv::dotenv;
use once_cell::sync::OnceCell;
use sqlx::mysql::MySqlPool as Pool;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::Error;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

static TEST_DB: OnceCell<Mutex<Option<TestDb>>> = OnceCell::new();
static DB_NAME: OnceCell<String> = OnceCell::new();

#[derive(Debug)]
pub struct TestDb {
    pub pool: Pool,
    pub db_name: String,
}

fn admin_url() -> Option<String> {
    dotenv().ok();
    env::var("ADMIN_DATABASE_URL").ok()
}

fn base_url(db_url: &str) -> String {
    db_url.split('/').collect::<Vec<&str>>()[..3].join("/")
}

// Connection pool without a database, used to create the test database
async fn create_connection_pool_without_db(db_url: &str) -> Result<Pool, Error> {
    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(&base_url(db_url))
        .await
}

async fn create_connection_pool_with_db(db_url: &str, db_name: &str) -> Result<Pool, Error> {
    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(&format!("{}/{}", base_url(db_url), db_name))
        .await
}

impl TestDb {
    /// Pool for the shared per-run test database, or None when no MySQL is
    /// configured so the caller can skip.
    pub async fn try_instance() -> Option<Pool> {
        admin_url()?;
        env::set_var("JWT_SECRET", "integration-test-secret");
        Some(
            Self::get_instance()
                .await
                .expect("Failed to get test database instance"),
        )
    }

    async fn get_instance() -> Result<Pool, Error> {
        let test_db = TEST_DB.get_or_init(|| Mutex::new(None));
        let mut guard = test_db.lock().await;

        // One database instance is shared by all tests in a run
        if let Some(db) = guard.as_ref() {
            return Ok(db.pool.clone());
        }

        let db = Self::setup_database().await?;
        let pool = db.pool.clone();
        *guard = Some(db);
        Ok(pool)
    }

    async fn setup_database() -> Result<Self, Error> {
        let db_url = env::var("ADMIN_DATABASE_URL")
            .expect("ADMIN_DATABASE_URL must be set in .env file");

        // Unique database name per run
        let db_name = DB_NAME
            .get_or_init(|| {
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_secs();
                format!("cinema_test_{}", timestamp)
            })
            .clone();

        let admin_pool = create_connection_pool_without_db(&db_url).await?;
        sqlx::query(&format!("CREATE DATABASE IF NOT EXISTS {}", db_name))
            .execute(&admin_pool)
            .await?;

        let pool = create_connection_pool_with_db(&db_url, &db_name).await?;
        Self::create_tables(&pool).await?;

        Ok(Self { pool, db_name })
    }

    async fn create_tables(pool: &Pool) -> Result<(), Error> {
        let tables = vec![
            "CREATE TABLE IF NOT EXISTS users (
                id INT AUTO_INCREMENT PRIMARY KEY,
                email VARCHAR(255) NOT NULL,
                username VARCHAR(100) NOT NULL,
                full_name VARCHAR(255) NULL,
                hashed_password VARCHAR(255) NOT NULL,
                role ENUM('user', 'admin') DEFAULT 'user' NOT NULL,
                is_active BOOLEAN DEFAULT TRUE NOT NULL,
                CONSTRAINT users_email_uindex UNIQUE (email),
                CONSTRAINT users_username_uindex UNIQUE (username)
            )",
            "CREATE TABLE IF NOT EXISTS movies (
                id INT AUTO_INCREMENT PRIMARY KEY,
                title VARCHAR(255) NOT NULL,
                synopsis TEXT NULL,
                genre VARCHAR(100) NULL,
                language VARCHAR(50) NULL,
                duration INT NOT NULL,
                release_date DATE NOT NULL,
                rating DECIMAL(3,1) DEFAULT 0.0 NOT NULL,
                status ENUM('now_playing', 'coming_soon') DEFAULT 'now_playing' NOT NULL,
                is_active BOOLEAN DEFAULT TRUE NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS cinemas (
                id INT AUTO_INCREMENT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                city VARCHAR(100) NOT NULL,
                location TEXT NULL,
                phone VARCHAR(20) NULL,
                email VARCHAR(255) NULL,
                is_active BOOLEAN DEFAULT TRUE NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS screens (
                id INT AUTO_INCREMENT PRIMARY KEY,
                cinema_id INT NOT NULL,
                screen_number INT NOT NULL,
                total_seats INT NOT NULL,
                screen_type VARCHAR(50) NULL,
                is_active BOOLEAN DEFAULT TRUE NOT NULL,
                CONSTRAINT screens_cinema_number_uindex UNIQUE (cinema_id, screen_number),
                CONSTRAINT screens_cinemas_id_fk
                    FOREIGN KEY (cinema_id) REFERENCES cinemas(id)
                    ON DELETE CASCADE
            )",
            "CREATE TABLE IF NOT EXISTS seats (
                id INT AUTO_INCREMENT PRIMARY KEY,
                screen_id INT NOT NULL,
                seat_row VARCHAR(5) NOT NULL,
                seat_number INT NOT NULL,
                category ENUM('standard', 'gold', 'platinum', 'vip', 'wheelchair')
                    DEFAULT 'standard' NOT NULL,
                status ENUM('available', 'reserved', 'booked', 'blocked')
                    DEFAULT 'available' NOT NULL,
                version INT DEFAULT 0 NOT NULL,
                CONSTRAINT seats_screen_row_number_uindex UNIQUE (screen_id, seat_row, seat_number),
                CONSTRAINT seats_screens_id_fk
                    FOREIGN KEY (screen_id) REFERENCES screens(id)
                    ON DELETE CASCADE
            )",
            "CREATE TABLE IF NOT EXISTS showtimes (
                id INT AUTO_INCREMENT PRIMARY KEY,
                movie_id INT NOT NULL,
                screen_id INT NOT NULL,
                cinema_id INT NOT NULL,
                start_time DATETIME NOT NULL,
                end_time DATETIME NOT NULL,
                base_price DECIMAL(8,2) NOT NULL,
                is_active BOOLEAN DEFAULT TRUE NOT NULL,
                CONSTRAINT showtimes_movies_id_fk
                    FOREIGN KEY (movie_id) REFERENCES movies(id)
                    ON DELETE CASCADE,
                CONSTRAINT showtimes_screens_id_fk
                    FOREIGN KEY (screen_id) REFERENCES screens(id)
                    ON DELETE CASCADE,
                CONSTRAINT showtimes_cinemas_id_fk
                    FOREIGN KEY (cinema_id) REFERENCES cinemas(id)
                    ON DELETE CASCADE
            )",
            "CREATE TABLE IF NOT EXISTS promo_codes (
                id INT AUTO_INCREMENT PRIMARY KEY,
                code VARCHAR(50) NOT NULL,
                description VARCHAR(255) NULL,
                discount_type ENUM('percentage', 'fixed') NOT NULL,
                discount_value DECIMAL(8,2) NOT NULL,
                max_usage INT NULL,
                usage_count INT DEFAULT 0 NOT NULL,
                min_booking_amount DECIMAL(8,2) DEFAULT 0.00 NOT NULL,
                valid_from DATETIME NOT NULL,
                valid_until DATETIME NOT NULL,
                is_active BOOLEAN DEFAULT TRUE NOT NULL,
                CONSTRAINT promo_codes_code_uindex UNIQUE (code)
            )",
            "CREATE TABLE IF NOT EXISTS bookings (
                id INT AUTO_INCREMENT PRIMARY KEY,
                user_id INT NOT NULL,
                showtime_id INT NOT NULL,
                booking_date DATETIME DEFAULT CURRENT_TIMESTAMP NOT NULL,
                total_price DECIMAL(8,2) NOT NULL,
                status ENUM('pending', 'confirmed', 'completed', 'cancelled')
                    DEFAULT 'pending' NOT NULL,
                payment_status ENUM('pending', 'success', 'failed', 'refunded')
                    DEFAULT 'pending' NOT NULL,
                promo_code_id INT NULL,
                discount_amount DECIMAL(8,2) DEFAULT 0.00 NOT NULL,
                payment_reference VARCHAR(255) NULL,
                CONSTRAINT bookings_users_id_fk
                    FOREIGN KEY (user_id) REFERENCES users(id)
                    ON DELETE CASCADE,
                CONSTRAINT bookings_showtimes_id_fk
                    FOREIGN KEY (showtime_id) REFERENCES showtimes(id)
                    ON DELETE CASCADE,
                CONSTRAINT bookings_promo_codes_id_fk
                    FOREIGN KEY (promo_code_id) REFERENCES promo_codes(id)
            )",
            "CREATE TABLE IF NOT EXISTS tickets (
                id INT AUTO_INCREMENT PRIMARY KEY,
                booking_id INT NOT NULL,
                seat_id INT NOT NULL,
                category VARCHAR(20) NOT NULL,
                price DECIMAL(8,2) NOT NULL,
                is_used BOOLEAN DEFAULT FALSE NOT NULL,
                CONSTRAINT tickets_bookings_id_fk
                    FOREIGN KEY (booking_id) REFERENCES bookings(id)
                    ON DELETE CASCADE,
                CONSTRAINT tickets_seats_id_fk
                    FOREIGN KEY (seat_id) REFERENCES seats(id)
            )",
        ];

        for create_sql in tables {
            sqlx::query(create_sql).execute(pool).await?;
        }

        Ok(())
    }

    // Drop the per-run database; called from a dtor after all tests finish
    pub fn cleanup_database_sync() -> Result<(), Box<dyn std::error::Error>> {
        let db_name = match DB_NAME.get() {
            Some(name) => name.clone(),
            None => return Ok(()),
        };
        let db_url = match admin_url() {
            Some(url) => url,
            None => return Ok(()),
        };

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let admin_pool = create_connection_pool_without_db(&db_url).await?;
            sqlx::query(&format!("DROP DATABASE IF EXISTS {}", db_name))
                .execute(&admin_pool)
                .await?;
            Ok::<(), Error>(())
        })?;
        Ok(())
    }
}
