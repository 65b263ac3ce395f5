mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;
mod telemetry;

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use snip_core::{MappingStore, SeedSource};
use snip_engine::{ResolutionEngine, Shortener};
use snip_generator::{CounterSeed, PermutedGenerator, RandomSeed};
use snip_storage::mysql::DEFAULT_SEQUENCE;
use snip_storage::{CachedStore, InMemoryStore, MySqlStore};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::app::App;
use crate::cli::{Config, SeedStrategyArg, StorageBackendArg};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    telemetry::init(config.log_format)?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        seed_strategy = %config.seed_strategy,
        code_length = %config.code_length,
        "starting snip gateway"
    );

    let shortener = build_shortener(&config).await?;
    let router = App::router(AppState::new(shortener, config.public_base_url.clone()));

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = stop_rx.await;
    });
    let mut server = tokio::spawn(server.into_future());

    tokio::select! {
        result = &mut server => {
            result.context("server task panicked")??;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    let drain = config.shutdown_timeout();
    info!(drain_secs = drain.as_secs(), "shutdown signal received, draining connections");
    let _ = stop_tx.send(());

    match tokio::time::timeout(drain, server).await {
        Ok(result) => {
            result.context("server task panicked")??;
            info!("server stopped");
            Ok(())
        }
        Err(_) => {
            error!(drain_secs = drain.as_secs(), "in-flight requests did not finish in time");
            anyhow::bail!("shutdown timed out after {drain:?}")
        }
    }
}

async fn build_shortener(config: &Config) -> anyhow::Result<Arc<dyn Shortener>> {
    let shortener = match (config.storage, config.seed_strategy) {
        (StorageBackendArg::InMemory, SeedStrategyArg::Counter) => {
            assemble(config, InMemoryStore::new(), CounterSeed::new())
        }
        (StorageBackendArg::InMemory, SeedStrategyArg::Random) => {
            assemble(config, InMemoryStore::new(), RandomSeed)
        }
        (StorageBackendArg::Mysql, strategy) => {
            let store = connect_mysql(config).await?;
            match strategy {
                SeedStrategyArg::Counter => {
                    let sequence = store
                        .sequence(DEFAULT_SEQUENCE)
                        .await
                        .context("failed to open seed sequence")?;
                    assemble(config, store, sequence)
                }
                SeedStrategyArg::Random => assemble(config, store, RandomSeed),
            }
        }
    };

    Ok(shortener)
}

async fn connect_mysql(config: &Config) -> anyhow::Result<MySqlStore> {
    let dsn = config
        .mysql_dsn
        .as_deref()
        .context("mysql dsn is required when storage backend is mysql")?;

    let store = MySqlStore::connect(dsn)
        .await
        .context("failed to connect to mysql")?;
    store.migrate().await.context("failed to apply mysql schema")?;

    Ok(store)
}

fn assemble<S, Q>(config: &Config, store: S, seeds: Q) -> Arc<dyn Shortener>
where
    S: MappingStore,
    Q: SeedSource,
{
    let generator = PermutedGenerator::with_length(config.code_length);
    let settings = config.engine_settings();

    if config.cache_capacity == 0 {
        return Arc::new(ResolutionEngine::new(store, seeds, generator, settings));
    }

    let store = CachedStore::new(store, config.cache_capacity);
    Arc::new(ResolutionEngine::new(store, seeds, generator, settings))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
