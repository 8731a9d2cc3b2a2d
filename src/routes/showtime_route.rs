use crate::models::showtime::{ShowtimeCreateRequest, ShowtimeResponse, ShowtimeUpdateRequest};
use crate::routes::page;
use crate::services::showtime_service::ShowtimeService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// List showtimes
#[openapi(tag = "Showtimes")]
#[get("/showtimes?<skip>&<limit>")]
pub async fn list_showtimes(
    skip: Option<i64>,
    limit: Option<i64>,
    showtime_service: &State<ShowtimeService>,
) -> Result<Json<Vec<ShowtimeResponse>>, AppError> {
    let (skip, limit) = page(skip, limit);
    Ok(Json(showtime_service.get_all_showtimes(skip, limit).await?))
}

/// Fetch one showtime with its live seat availability
#[openapi(tag = "Showtimes")]
#[get("/showtimes/<showtime_id>")]
pub async fn get_showtime(
    showtime_id: i32,
    showtime_service: &State<ShowtimeService>,
) -> Result<Json<ShowtimeResponse>, AppError> {
    Ok(Json(showtime_service.get_showtime(showtime_id).await?))
}

/// List a movie's showtimes
#[openapi(tag = "Showtimes")]
#[get("/movies/<movie_id>/showtimes?<upcoming>&<skip>&<limit>")]
pub async fn list_movie_showtimes(
    movie_id: i32,
    upcoming: Option<bool>,
    skip: Option<i64>,
    limit: Option<i64>,
    showtime_service: &State<ShowtimeService>,
) -> Result<Json<Vec<ShowtimeResponse>>, AppError> {
    let (skip, limit) = page(skip, limit);
    Ok(Json(
        showtime_service
            .get_showtimes_by_movie(movie_id, upcoming.unwrap_or(false), skip, limit)
            .await?,
    ))
}

/// List a cinema's showtimes
#[openapi(tag = "Showtimes")]
#[get("/cinemas/<cinema_id>/showtimes?<skip>&<limit>")]
pub async fn list_cinema_showtimes(
    cinema_id: i32,
    skip: Option<i64>,
    limit: Option<i64>,
    showtime_service: &State<ShowtimeService>,
) -> Result<Json<Vec<ShowtimeResponse>>, AppError> {
    let (skip, limit) = page(skip, limit);
    Ok(Json(
        showtime_service.get_showtimes_by_cinema(cinema_id, skip, limit).await?,
    ))
}

/// Schedule a showtime (admin)
#[openapi(tag = "Showtimes")]
#[post("/showtimes", format = "json", data = "<request>")]
pub async fn create_showtime(
    request: Json<ShowtimeCreateRequest>,
    _admin: AdminUser,
    showtime_service: &State<ShowtimeService>,
) -> Result<(Status, Json<ShowtimeResponse>), AppError> {
    let showtime = showtime_service.create_showtime(request.into_inner()).await?;
    Ok((Status::Created, Json(showtime)))
}

/// Reschedule or reprice a showtime (admin)
#[openapi(tag = "Showtimes")]
#[put("/showtimes/<showtime_id>", format = "json", data = "<request>")]
pub async fn update_showtime(
    showtime_id: i32,
    request: Json<ShowtimeUpdateRequest>,
    _admin: AdminUser,
    showtime_service: &State<ShowtimeService>,
) -> Result<Json<ShowtimeResponse>, AppError> {
    Ok(Json(
        showtime_service.update_showtime(showtime_id, request.into_inner()).await?,
    ))
}

/// Delete a showtime (admin); refused while active bookings exist
#[openapi(tag = "Showtimes")]
#[delete("/showtimes/<showtime_id>")]
pub async fn delete_showtime(
    showtime_id: i32,
    _admin: AdminUser,
    showtime_service: &State<ShowtimeService>,
) -> Result<Status, AppError> {
    showtime_service.delete_showtime(showtime_id).await?;
    Ok(Status::NoContent)
}
