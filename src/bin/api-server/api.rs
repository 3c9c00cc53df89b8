use actix_web::{web, HttpResponse};
use foodie_finds::data::Envelope;
use foodie_finds::db::{DishQueries, RestaurantFlags, RestaurantQueries};

pub(super) struct ApiState {
    pub(super) restaurants: RestaurantQueries,
    pub(super) dishes: DishQueries,
    pub(super) empty_as_not_found: bool,
}

#[derive(serde::Serialize)]
struct ErrJsonResp {
    message: String,
}

/// Maps a service result onto the wire: 200 with the envelope serialized
/// verbatim, 404 only when configured and the envelope is empty, 500 on
/// a store fault.
fn respond<T: Envelope>(data: &ApiState, result: anyhow::Result<T>, what: &str) -> HttpResponse {
    match result {
        Ok(envelope) => {
            if data.empty_as_not_found && envelope.is_empty() {
                HttpResponse::NotFound().json(ErrJsonResp {
                    message: format!("No {what} found"),
                })
            } else {
                HttpResponse::Ok().json(envelope)
            }
        }
        Err(err) => {
            tracing::error!("fail to fetch {what}: {err:#}");
            HttpResponse::InternalServerError().json(ErrJsonResp {
                message: format!("Error fetching {what}"),
            })
        }
    }
}

#[actix_web::get("/restaurants")]
pub(super) async fn restaurants(data: web::Data<ApiState>) -> HttpResponse {
    let result = data.restaurants.list_all().await;
    respond(&data, result, "restaurants")
}

#[derive(serde::Deserialize)]
pub(super) struct CuisinePath {
    cuisine: String,
}

#[actix_web::get("/restaurants/cuisine/{cuisine}")]
pub(super) async fn restaurants_by_cuisine(
    data: web::Data<ApiState>,
    path: web::Path<CuisinePath>,
) -> HttpResponse {
    let result = data.restaurants.by_cuisine(&path.cuisine).await;
    respond(&data, result, "restaurants")
}

#[derive(serde::Deserialize)]
pub(super) struct RestaurantPath {
    id: i64,
}

#[actix_web::get("/restaurants/details/{id}")]
pub(super) async fn restaurant_details(
    data: web::Data<ApiState>,
    path: web::Path<RestaurantPath>,
) -> HttpResponse {
    let result = data.restaurants.by_id(path.id).await;
    respond(&data, result, "restaurants")
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RestaurantFilterQuery {
    is_veg: Option<bool>,
    has_outdoor_seating: Option<bool>,
    is_luxury: Option<bool>,
}

#[actix_web::get("/restaurants/filter")]
pub(super) async fn restaurants_filter(
    data: web::Data<ApiState>,
    query: web::Query<RestaurantFilterQuery>,
) -> HttpResponse {
    let flags = RestaurantFlags {
        is_veg: query.is_veg,
        has_outdoor_seating: query.has_outdoor_seating,
        is_luxury: query.is_luxury,
    };
    let result = data.restaurants.filter(flags).await;
    respond(&data, result, "restaurants")
}

#[actix_web::get("/restaurants/sort-by-rating")]
pub(super) async fn restaurants_sorted_by_rating(data: web::Data<ApiState>) -> HttpResponse {
    let result = data.restaurants.sort_by_rating().await;
    respond(&data, result, "restaurants")
}

#[actix_web::get("/dishes")]
pub(super) async fn dishes(data: web::Data<ApiState>) -> HttpResponse {
    let result = data.dishes.list_all().await;
    respond(&data, result, "dishes")
}

#[derive(serde::Deserialize)]
pub(super) struct DishPath {
    id: i64,
}

#[actix_web::get("/dishes/details/{id}")]
pub(super) async fn dish_details(
    data: web::Data<ApiState>,
    path: web::Path<DishPath>,
) -> HttpResponse {
    let result = data.dishes.by_id(path.id).await;
    respond(&data, result, "dishes")
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DishFilterQuery {
    is_veg: Option<bool>,
}

#[actix_web::get("/dishes/filter")]
pub(super) async fn dishes_filter(
    data: web::Data<ApiState>,
    query: web::Query<DishFilterQuery>,
) -> HttpResponse {
    let result = data.dishes.filter(query.is_veg).await;
    respond(&data, result, "dishes")
}

#[actix_web::get("/dishes/sort-by-price")]
pub(super) async fn dishes_sorted_by_price(data: web::Data<ApiState>) -> HttpResponse {
    let result = data.dishes.sort_by_price().await;
    respond(&data, result, "dishes")
}
