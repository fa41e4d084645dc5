//! Chainquiz · Daily Quiz Backend
//!
//! - Axum HTTP API for the daily-quiz lifecycle (backlog, cron generation,
//!   cached reads)
//! - Redis-backed cache store (daily quiz records + topic backlog)
//! - Optional OpenAI integration (via environment variables)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   REDIS_URL          : default "redis://127.0.0.1:6379"
//!   CRON_SECRET        : gates GET /cron/daily-quiz when set
//!   OPENAI_API_KEY     : enables OpenAI integration if present
//!   OPENAI_BASE_URL    : default "https://api.openai.com/v1"
//!   OPENAI_MODEL       : default "gpt-4o-mini"
//!   QUIZ_CONFIG_PATH   : path to TOML config (generation prompts)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod error;
mod store;
mod topics;
mod openai;
mod backlog;
mod quiz;
mod state;
mod protocol;
mod routes;
#[cfg(test)]
mod test_utils;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{CacheStore, RedisCacheStore};

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let config = Config::from_env();

  // The store client is constructed here and injected; its lifecycle belongs
  // to the entry point, not to the components using it.
  let client = redis::Client::open(config.redis_url.clone())?;
  let store: Arc<dyn CacheStore> = Arc::new(RedisCacheStore::new(client));

  // Build shared application state (backlog manager, orchestrator, prompts).
  let state = Arc::new(AppState::new(&config, store));

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state);

  let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "quiz_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
