use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use foodie_finds::config::Config;
use foodie_finds::db::{DishQueries, RestaurantQueries, Store};

mod api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(true)
        .with_file(false)
        .pretty()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("fail to setup logging");

    let config = Config::from_env()?;
    let store = Store::connect(&config.database_url).await?;

    let state = web::Data::new(api::ApiState {
        restaurants: RestaurantQueries::new(store.clone(), config.filter_mode),
        dishes: DishQueries::new(store.clone()),
        empty_as_not_found: config.empty_as_not_found,
    });

    tracing::info!("listening on {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::default().allow_any_origin().allow_any_method())
            .app_data(state.clone())
            .service(api::restaurants)
            .service(api::restaurants_by_cuisine)
            .service(api::restaurant_details)
            .service(api::restaurants_filter)
            .service(api::restaurants_sorted_by_rating)
            .service(api::dishes)
            .service(api::dish_details)
            .service(api::dishes_filter)
            .service(api::dishes_sorted_by_price)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await?;

    store.close().await;
    Ok(())
}
