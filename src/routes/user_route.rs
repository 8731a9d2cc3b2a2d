use crate::models::user::{
    RegisterResponse, UserLoginRequest, UserLoginResponse, UserRegistrationRequest, UserResponse,
};
use crate::routes::page;
use crate::services::user_service::UserService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};
use crate::utils::rate_limit::{LoginThrottle, RegisterThrottle};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Register a new user
#[openapi(tag = "Users")]
#[post("/register", format = "json", data = "<request>")]
pub async fn register(
    request: Json<UserRegistrationRequest>,
    _throttle: RegisterThrottle,
    user_service: &State<UserService>,
) -> Result<Json<RegisterResponse>, AppError> {
    let user_id = user_service.register_user(request.into_inner()).await?;
    Ok(Json(RegisterResponse {
        user_id,
        status: "success".to_string(),
    }))
}

/// Login with email and password
#[openapi(tag = "Users")]
#[post("/login", format = "json", data = "<request>")]
pub async fn login(
    request: Json<UserLoginRequest>,
    _throttle: LoginThrottle,
    user_service: &State<UserService>,
) -> Result<Json<UserLoginResponse>, AppError> {
    let response = user_service.login_user(request.into_inner()).await?;
    Ok(Json(response))
}

/// Profile of the authenticated user
#[openapi(tag = "Users")]
#[get("/users/me")]
pub async fn me(auth: AuthenticatedUser) -> Json<UserResponse> {
    Json(auth.user.into())
}

/// List all users (admin)
#[openapi(tag = "Users")]
#[get("/users?<skip>&<limit>")]
pub async fn list_users(
    skip: Option<i64>,
    limit: Option<i64>,
    _admin: AdminUser,
    user_service: &State<UserService>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let (skip, limit) = page(skip, limit);
    let users = user_service.get_all_users(skip, limit).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Activate or deactivate an account (admin)
#[openapi(tag = "Users")]
#[put("/users/<user_id>/active?<active>")]
pub async fn set_user_active(
    user_id: i32,
    active: bool,
    _admin: AdminUser,
    user_service: &State<UserService>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service.set_user_active(user_id, active).await?;
    Ok(Json(user.into()))
}
