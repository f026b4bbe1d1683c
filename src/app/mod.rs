use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use color_eyre::Result;
use eyre::WrapErr;
use log::{debug, error};
use r2d2_sqlite::{self, SqliteConnectionManager};
use rate_limiter::BasicRateLimiter;
use refresh::{PopularCache, PopularRefresher};
use std::sync::{Arc, RwLock};
use crate::config::Config;
use crate::db::{self, Pool};
mod dtos;
mod error;
mod handlers;
mod helpers;
mod rate_limiter;
mod refresh;

// Declare app state struct:
pub struct AppState {
  pub pool: Pool,
  pub rate_limiter: RwLock<BasicRateLimiter>,
  pub popular_cache: Arc<PopularCache>
}

impl AppState {

  // True means "blocked". Lock trouble fails open, a broken rate
  // limiter shouldn't take the whole write path down.
  pub fn check_rate_limit(&self) -> bool {
    match self.rate_limiter.write() {
      Ok(mut rl) => rl.update(),
      Err(e) => {
        error!("Could not get a write handle on the \
        rate limiter, SHOULD NEVER HAPPEN - {}", e);
        false
      }
    }
  }

}

// Function to start the server.
// Has to be async because there should be a .await at the end.
pub async fn run() -> Result<()> {
  let config = Config::from_env()
    .expect("Configuration (environment or .env file) is missing");
  debug!("Current config: {:?}", config);
  let manager = SqliteConnectionManager::file(&config.db_path);
  let pool = Pool::new(manager)
    .expect("Database connection failed");
  db::init_schema(&pool)
    .expect("Could not create the database schema");

  // The popular sidebar snapshot and its refresh thread:
  let popular_cache = Arc::new(PopularCache::new());
  let mut refresher = PopularRefresher::start(
    &pool,
    popular_cache.clone(),
    config.popular_refresh_secs
  );

  // Got to save the bind_address before config fields move into
  // the app state:
  let bind_address = config.bind_address.clone();

  let app_state = web::Data::new(
    AppState {
      pool,
      rate_limiter: RwLock::new(
        BasicRateLimiter::new(
          config.rl_max_requests,
          config.rl_max_requests_time,
          config.rl_block_duration
        )
      ),
      popular_cache
    }
  );

  let server_result = HttpServer::new(move || {
    App::new()
      .app_data(app_state.clone())
      .app_data(web::PathConfig::default().error_handler(|_, _| {
        actix_web::error::ErrorBadRequest("Invalid path arguments")
      }))
      .app_data(web::QueryConfig::default().error_handler(|_, _| {
        actix_web::error::ErrorBadRequest("Invalid query string arguments")
      }))
      .app_data(web::JsonConfig::default().error_handler(|_, _| {
        actix_web::error::ErrorBadRequest("Invalid JSON body")
      }))
      // The portal frontend is a static site on another origin:
      .wrap(Cors::permissive())
      .wrap(middleware::Logger::default())
      .configure(base_endpoints_config)
      .default_service(web::route().to(handlers::not_found))
  })
  .bind(bind_address)?
  .run()
  .await;

  // Server's down, wind down the refresh thread too:
  refresher.close();
  server_result.context("Start Actix web server")
}

// Route configuration:
fn base_endpoints_config(cfg: &mut web::ServiceConfig) {
  cfg.route("/", web::get().to(handlers::index))
    // Public read side:
    .route("/articles", web::get().to(handlers::articles))
    .route("/article/{id}", web::get().to(handlers::article))
    .route("/article/{id}/related", web::get().to(handlers::related_articles))
    .route("/popular", web::get().to(handlers::popular_articles))
    .route("/categories", web::get().to(handlers::categories))
    .route("/articles/search", web::post().to(handlers::search_articles))
    // Author dashboard side:
    .route("/articles", web::post().to(handlers::create_article))
    .route("/article/{id}", web::put().to(handlers::update_article))
    .route("/article/{id}", web::delete().to(handlers::delete_article))
    .route("/author/{uid}/articles", web::get().to(handlers::author_articles))
    .route("/user/{username}", web::get().to(handlers::user_profile))
    .route("/user/{uid}", web::put().to(handlers::update_profile));
}
