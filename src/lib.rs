pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;
pub mod validation;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use db::{create_pool, DbPool};
pub use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Register the state, routes and fallbacks of the API on an `App`.
///
/// Used by [`build_server`] and by the HTTP tests, which pair it with
/// in-memory state.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(handlers::json_config())
            .route("/", web::get().to(handlers::index))
            .service(
                web::scope("/api/auth")
                    .route("/register", web::post().to(handlers::auth::register))
                    .route("/login", web::post().to(handlers::auth::login)),
            )
            .service(
                web::scope("/api/products")
                    .service(
                        web::resource("")
                            .route(web::get().to(handlers::products::list_products))
                            .route(web::post().to(handlers::products::create_product)),
                    )
                    .route("/{id}", web::get().to(handlers::products::get_product)),
            )
            .service(
                web::scope("/api/cart")
                    .service(
                        web::resource("")
                            .route(web::get().to(handlers::cart::get_cart))
                            .route(web::post().to(handlers::cart::add_item)),
                    )
                    .service(
                        web::resource("/{product_id}")
                            .route(web::put().to(handlers::cart::update_item))
                            .route(web::delete().to(handlers::cart::remove_item)),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", handlers::ApiDoc::openapi()),
            )
            .default_service(web::to(handlers::not_found));
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(configure(state.clone()))
    })
    .bind((host.to_string(), port))?
    .run())
}
