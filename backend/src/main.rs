//! User Accounts Backend
//!
//! Account registration, lookup, update and deletion behind JWT bearer
//! authentication.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling; protected handlers take a `CurrentUser`
//! - Services: validation, password hashing, token issuance
//! - Repositories: the credential store (PostgreSQL or in-memory)

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_accounts_backend::{
    config::{self, StorageBackend},
    db,
    repositories::{MemoryUserStore, PgUserStore, UserStore},
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let production = config::AppConfig::is_production();
    init_tracing(production);

    let config = config::AppConfig::load()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        production,
        storage = config.storage.backend.as_str(),
        "Starting User Accounts Backend"
    );

    if production {
        refuse_unsafe_config(&config)?;
    }

    let store = open_store(&config, production).await?;
    let recorder = PrometheusBuilder::new().install_recorder()?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = routes::create_router(AppState::new(store, config).with_metrics(recorder));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Accepting connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Stopped");
    Ok(())
}

async fn open_store(config: &config::AppConfig, production: bool) -> Result<Arc<dyn UserStore>> {
    let store: Arc<dyn UserStore> = match config.storage.backend {
        StorageBackend::Memory => {
            warn!("In-memory credential store: accounts vanish on restart");
            Arc::new(MemoryUserStore::new())
        }
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database).await?;
            // Production schema changes go through a separate migration job
            if !production {
                db::run_migrations(&pool).await?;
            }
            Arc::new(PgUserStore::new(pool))
        }
    };
    Ok(store)
}

/// Pretty output in development, one JSON object per line in production
fn init_tracing(production: bool) {
    let default_filter = if production {
        "user_accounts_backend=info,tower_http=info"
    } else {
        "user_accounts_backend=debug,tower_http=debug,sqlx=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if production {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

fn refuse_unsafe_config(config: &config::AppConfig) -> Result<()> {
    let problems = config.production_problems();
    for problem in &problems {
        error!(problem, "Unsafe production configuration");
    }
    if !problems.is_empty() {
        anyhow::bail!("refusing to start: {} configuration problem(s)", problems.len());
    }
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!(signal = "SIGINT", "Shutting down");
        }
        _ = terminate => {
            info!(signal = "SIGTERM", "Shutting down");
        }
    }
}
