use astra::{ConnectionInfo, Request, Server};
use std::sync::Arc;
use std::thread;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::db::init_db;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::state::AppState;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod handlers;
mod notify;
mod pipeline;
mod ratelimit;
mod responses;
mod router;
mod scraper;
mod services;
mod social;
mod state;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("disaster_relief=info")),
        )
        .init();

    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let state = match AppState::from_config(&cfg) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_db(&state.db) {
        tracing::error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    spawn_cache_sweeper(&state, cfg.cache_sweep_interval);

    tracing::info!(addr = %cfg.bind_addr, workers = cfg.max_workers, "starting server");
    let server = Server::bind(&cfg.bind_addr).max_workers(cfg.max_workers);

    let result = server.serve(move |req: Request, info: ConnectionInfo| {
        if let Some(peer) = info.peer_addr() {
            if let Err(e) = state.limiter.check(peer.ip()) {
                return error_to_response(e);
            }
        }
        handle(req, &state)
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down");
}

/// Periodically drops expired cache rows.
fn spawn_cache_sweeper(state: &Arc<AppState>, every: std::time::Duration) {
    let cache = state.cache.clone();
    thread::spawn(move || loop {
        thread::sleep(every);
        if let Some(removed) = cache.cleanup() {
            tracing::info!(removed, "cache sweep");
        }
    });
}
