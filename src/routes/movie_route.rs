use crate::models::movie::{Movie, MovieCreateRequest, MovieStatus, MovieUpdateRequest};
use crate::routes::page;
use crate::services::movie_service::MovieService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use std::str::FromStr;

/// List movies, optionally filtered by status
#[openapi(tag = "Movies")]
#[get("/movies?<status>&<skip>&<limit>")]
pub async fn list_movies(
    status: Option<String>,
    skip: Option<i64>,
    limit: Option<i64>,
    movie_service: &State<MovieService>,
) -> Result<Json<Vec<Movie>>, AppError> {
    let status = match status {
        Some(raw) => Some(
            MovieStatus::from_str(&raw)
                .map_err(|_| AppError::BadRequest(format!("Unknown movie status '{}'", raw)))?,
        ),
        None => None,
    };
    let (skip, limit) = page(skip, limit);
    Ok(Json(movie_service.get_all_movies(status, skip, limit).await?))
}

/// Fetch one movie
#[openapi(tag = "Movies")]
#[get("/movies/<movie_id>")]
pub async fn get_movie(
    movie_id: i32,
    movie_service: &State<MovieService>,
) -> Result<Json<Movie>, AppError> {
    Ok(Json(movie_service.get_movie(movie_id).await?))
}

/// Create a movie (admin)
#[openapi(tag = "Movies")]
#[post("/movies", format = "json", data = "<request>")]
pub async fn create_movie(
    request: Json<MovieCreateRequest>,
    _admin: AdminUser,
    movie_service: &State<MovieService>,
) -> Result<(Status, Json<Movie>), AppError> {
    let movie = movie_service.create_movie(request.into_inner()).await?;
    Ok((Status::Created, Json(movie)))
}

/// Update a movie (admin)
#[openapi(tag = "Movies")]
#[put("/movies/<movie_id>", format = "json", data = "<request>")]
pub async fn update_movie(
    movie_id: i32,
    request: Json<MovieUpdateRequest>,
    _admin: AdminUser,
    movie_service: &State<MovieService>,
) -> Result<Json<Movie>, AppError> {
    Ok(Json(movie_service.update_movie(movie_id, request.into_inner()).await?))
}

/// Retire a movie from the catalog (admin)
#[openapi(tag = "Movies")]
#[delete("/movies/<movie_id>")]
pub async fn delete_movie(
    movie_id: i32,
    _admin: AdminUser,
    movie_service: &State<MovieService>,
) -> Result<Status, AppError> {
    movie_service.delete_movie(movie_id).await?;
    Ok(Status::NoContent)
}
