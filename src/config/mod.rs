// Adding the context method to errors:
use color_eyre::Result;
use eyre::WrapErr;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
  pub db_path: String,
  pub bind_address: String,
  // Rate limiter settings:
  pub rl_max_requests: u32,
  pub rl_max_requests_time: u32,
  pub rl_block_duration: u32,
  // How often the popular-articles snapshot recomputes. The old
  // frontend polled every 30 seconds, same default here:
  pub popular_refresh_secs: u64
}

impl Config {

  pub fn from_env() -> Result<Config> {
    let mut c = config::Config::new();
    // RUST_LOG is already set in main.rs if it was absent.
    // Keys have to be lowercase here compared to what's in the
    // .env file.
    c.set_default("db_path", "./desamedia.db")?;
    c.set_default("bind_address", "127.0.0.1:8080")?;
    // Settings for the basic rate limiter:
    c.set_default("rl_max_requests", 120)?;
    c.set_default("rl_max_requests_time", 60)?;
    c.set_default("rl_block_duration", 60)?;
    c.set_default("popular_refresh_secs", 30)?;

    c.merge(config::Environment::default())?;
    // The error has to be given a context for color_eyre to work
    // here:
    c.try_into()
      .context("Loading configuration from env")
  }

}
