mod app;
mod config;
mod content;
mod db;
mod utils;

use color_eyre::Result;

#[actix_web::main]
async fn main() -> Result<()> {
  // Default log level when RUST_LOG isn't set, the actix access
  // log is useless otherwise:
  if std::env::var("RUST_LOG").is_err() {
    std::env::set_var("RUST_LOG", "info,actix_web=info");
  }
  env_logger::init();
  // Load the .env file if there is one:
  dotenv::dotenv().ok();

  app::run().await
}
