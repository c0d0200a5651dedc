pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::cart_service::CartService;
use application::checkout_service::CheckoutService;
use application::order_service::OrderService;
use domain::ports::SystemClock;
use infrastructure::pg_store::DieselStore;

pub use config::{AppConfig, ConfigError};
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("migration error: {0}")]
    Migration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), StartupError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StartupError::Migration(e.to_string()))?;
    log::info!("applied {} pending migrations", applied.len());
    Ok(())
}

/// Build and return an actix-web `Server` bound to the configured host and port.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(pool: DbPool, config: &AppConfig) -> std::io::Result<actix_web::dev::Server> {
    let store = DieselStore::new(pool);
    let carts = web::Data::new(CartService::new(store.clone()));
    let orders = web::Data::new(OrderService::new(
        store.clone(),
        Arc::new(SystemClock),
        config.schedule_timezone,
    ));
    let checkouts = web::Data::new(CheckoutService::new(store));
    let openapi = handlers::ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(carts.clone())
            .app_data(orders.clone())
            .app_data(checkouts.clone())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(
                web::scope("/cart")
                    .route("", web::delete().to(handlers::cart::empty_cart))
                    .route("/items", web::get().to(handlers::cart::list_cart))
                    .route("/items", web::post().to(handlers::cart::add_cart_item))
                    .route(
                        "/items",
                        web::put().to(handlers::cart::empty_and_add_cart_item),
                    )
                    .route(
                        "/items/by-item/{item_id}",
                        web::delete().to(handlers::cart::delete_cart_item_by_item),
                    )
                    .route(
                        "/items/{id}",
                        web::patch().to(handlers::cart::update_cart_item),
                    )
                    .route(
                        "/items/{id}",
                        web::delete().to(handlers::cart::delete_cart_item),
                    ),
            )
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route(
                        "/{id}/status",
                        web::patch().to(handlers::orders::update_order_status),
                    )
                    .route(
                        "/{id}/lifecycle",
                        web::get().to(handlers::orders::get_order_lifecycle),
                    ),
            )
            .route(
                "/businesses/{id}/checkout-info",
                web::get().to(handlers::checkout::get_checkout_info),
            )
    })
    .bind((config.host.clone(), config.port))?
    .run())
}
