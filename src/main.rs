use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use movies_api::config::ServiceConfig;
use movies_api::server::HttpServer;
use movies_api::store::InMemoryMovieStore;
use movies_api::{build_service, seed, telemetry};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::parse();
    let _log_guard = telemetry::init_logging(&config.log_config())?;

    may::config().set_stack_size(config.stack_size);

    let movies = seed::initial_movies(config.seed_path.as_deref())
        .context("Failed to load seed movies")?;
    info!(
        movies = movies.len(),
        seed = ?config.seed_path,
        "Seed data loaded"
    );

    let origins = config.origins();
    let service = build_service(Arc::new(InMemoryMovieStore::new(movies)), &origins)
        .context("Invalid CORS configuration")?;

    let addr = config.bind_addr();
    let handle = HttpServer(service)
        .start(addr.as_str())
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        port = config.port,
        addr = %handle.addr(),
        stack_size = config.stack_size,
        allowed_origins = ?origins,
        "Server listening on port {}",
        config.port
    );

    handle
        .join()
        .map_err(|_| anyhow::anyhow!("server coroutine panicked"))?;
    Ok(())
}
