use dotenvy::dotenv;
use shopfront_service::{build_server, create_pool, run_migrations, AppConfig, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let pool = create_pool(&config.database_url);
    run_migrations(&pool);

    log::info!(
        "Starting server at http://{}:{} (cart stock check: {:?})",
        config.host,
        config.port,
        config.stock_check
    );

    let state = AppState::from_pool(pool, &config);
    build_server(state, &config.host, config.port)?.await
}
