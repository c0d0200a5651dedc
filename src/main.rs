use dotenvy::dotenv;
use marketplace_orders::{build_server, create_pool, run_migrations, AppConfig, StartupError};

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url, config.db_pool_max_size)?;
    run_migrations(&pool)?;

    log::info!(
        "Starting server at http://{}:{} (schedules in {})",
        config.host,
        config.port,
        config.schedule_timezone
    );

    build_server(pool, &config)?.await?;
    Ok(())
}
