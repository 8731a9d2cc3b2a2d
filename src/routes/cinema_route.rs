use crate::models::cinema::{Cinema, CinemaCreateRequest, Screen, ScreenCreateRequest};
use crate::routes::page;
use crate::services::cinema_service::CinemaService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// List cinemas, optionally filtered by city
#[openapi(tag = "Cinemas")]
#[get("/cinemas?<city>&<skip>&<limit>")]
pub async fn list_cinemas(
    city: Option<String>,
    skip: Option<i64>,
    limit: Option<i64>,
    cinema_service: &State<CinemaService>,
) -> Result<Json<Vec<Cinema>>, AppError> {
    let (skip, limit) = page(skip, limit);
    Ok(Json(cinema_service.get_all_cinemas(city, skip, limit).await?))
}

/// Fetch one cinema
#[openapi(tag = "Cinemas")]
#[get("/cinemas/<cinema_id>")]
pub async fn get_cinema(
    cinema_id: i32,
    cinema_service: &State<CinemaService>,
) -> Result<Json<Cinema>, AppError> {
    Ok(Json(cinema_service.get_cinema(cinema_id).await?))
}

/// Create a cinema (admin)
#[openapi(tag = "Cinemas")]
#[post("/cinemas", format = "json", data = "<request>")]
pub async fn create_cinema(
    request: Json<CinemaCreateRequest>,
    _admin: AdminUser,
    cinema_service: &State<CinemaService>,
) -> Result<(Status, Json<Cinema>), AppError> {
    let cinema = cinema_service.create_cinema(request.into_inner()).await?;
    Ok((Status::Created, Json(cinema)))
}

/// Retire a cinema (admin)
#[openapi(tag = "Cinemas")]
#[delete("/cinemas/<cinema_id>")]
pub async fn delete_cinema(
    cinema_id: i32,
    _admin: AdminUser,
    cinema_service: &State<CinemaService>,
) -> Result<Status, AppError> {
    cinema_service.delete_cinema(cinema_id).await?;
    Ok(Status::NoContent)
}

/// List a cinema's screens
#[openapi(tag = "Screens")]
#[get("/cinemas/<cinema_id>/screens")]
pub async fn list_screens(
    cinema_id: i32,
    cinema_service: &State<CinemaService>,
) -> Result<Json<Vec<Screen>>, AppError> {
    cinema_service.get_cinema(cinema_id).await?;
    Ok(Json(cinema_service.get_cinema_screens(cinema_id).await?))
}

/// Add a screen to a cinema (admin)
#[openapi(tag = "Screens")]
#[post("/screens", format = "json", data = "<request>")]
pub async fn create_screen(
    request: Json<ScreenCreateRequest>,
    _admin: AdminUser,
    cinema_service: &State<CinemaService>,
) -> Result<(Status, Json<Screen>), AppError> {
    let screen = cinema_service.create_screen(request.into_inner()).await?;
    Ok((Status::Created, Json(screen)))
}
