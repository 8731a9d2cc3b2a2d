use crate::models::user::{User, UserLoginRequest, UserLoginResponse, UserRegistrationRequest, UserRole};
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::MySqlPool;
use validator::Validate;

const USER_COLUMNS: &str = "id, email, username, full_name, hashed_password, role, is_active";

#[derive(Clone)]
pub struct UserService {
    pool: MySqlPool,
}

impl UserService {
    pub fn new(pool: MySqlPool) -> Self {
        UserService { pool }
    }

    // Register a new user with the default role
    pub async fn register_user(&self, request: UserRegistrationRequest) -> AppResult<i32> {
        self.create_user(request, UserRole::User).await
    }

    pub async fn create_user(&self, request: UserRegistrationRequest, role: UserRole) -> AppResult<i32> {
        request.validate()?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? OR username = ?")
                .bind(&request.email)
                .bind(&request.username)
                .fetch_one(&self.pool)
                .await?;
        if existing > 0 {
            return Err(AppError::Conflict("Email or username already registered".into()));
        }

        let hashed_password = hash(request.password.as_bytes(), DEFAULT_COST)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        // The unique indexes close the check-then-insert window.
        let result = sqlx::query(
            "INSERT INTO users (email, username, full_name, hashed_password, role) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&request.email)
        .bind(&request.username)
        .bind(&request.full_name)
        .bind(&hashed_password)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Email or username already registered".into())
            }
            _ => AppError::from(e),
        })?;

        Ok(result.last_insert_id() as i32)
    }

    // Login with email and password; issues a signed 24h token
    pub async fn login_user(&self, request: UserLoginRequest) -> AppResult<UserLoginResponse> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&request.email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid credentials".into()))?;

        let password_matches = verify(request.password.as_bytes(), &user.hashed_password)
            .map_err(|e| AppError::AuthError(e.to_string()))?;
        if !password_matches {
            return Err(AppError::AuthError("Invalid credentials".into()));
        }

        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".into()));
        }

        let token = jwt::generate_token(&user).map_err(|e| AppError::AuthError(e.to_string()))?;

        Ok(UserLoginResponse {
            token,
            user_id: user.id,
            role: user.role,
        })
    }

    pub async fn get_user_by_id(&self, user_id: i32) -> AppResult<User> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    pub async fn get_all_users(&self, skip: i64, limit: i64) -> AppResult<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY id LIMIT ? OFFSET ?", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Deactivation invalidates every outstanding token for the account;
    /// users are never hard-deleted.
    pub async fn set_user_active(&self, user_id: i32, active: bool) -> AppResult<User> {
        let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(active)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            // The update is a no-op when the flag already matches, so check
            // existence before reporting NotFound.
            return self.get_user_by_id(user_id).await;
        }
        self.get_user_by_id(user_id).await
    }

    /// Seeds the bootstrap admin account at startup if it does not exist.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> AppResult<()> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Ok(());
        }

        let request = UserRegistrationRequest {
            email: email.to_string(),
            username: "admin".to_string(),
            full_name: Some("Administrator".to_string()),
            password: password.to_string(),
        };
        let id = self.create_user(request, UserRole::Admin).await?;
        log::info!("seeded admin account {} ({})", email, id);
        Ok(())
    }
}
