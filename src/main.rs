use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use licensing::catalog::FeatureCatalog;
use licensing::config::Config;
use licensing::db::{create_pool, init_db, AppState, SqliteLicenseStore};
use licensing::flagger::{StaticFlagger, USE_SPAN_METRICS};
use licensing::handlers;
use licensing::licensing::Licensing;
use licensing::upstream::{HttpUpstream, StaticUpstream, Upstream};

#[derive(Parser, Debug)]
#[command(name = "licensing")]
#[command(about = "License selection and entitlement service")]
struct Cli {
    /// SQLite database path (overrides DATABASE_PATH)
    #[arg(long)]
    database: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Use the built-in development upstream instead of the entitlement authority
    #[arg(long)]
    dev: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "licensing=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    config.dev_mode |= cli.dev;

    let db_pool = create_pool(&config.database_path).expect("Failed to create database pool");
    {
        let conn = db_pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize database");
    }

    let upstream: Arc<dyn Upstream> = if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode: using static upstream");
        Arc::new(StaticUpstream)
    } else {
        Arc::new(
            HttpUpstream::new(
                &config.upstream_url,
                config.upstream_retry_count,
                config.upstream_timeout,
            )
            .expect("Failed to create upstream client"),
        )
    };

    let flagger = StaticFlagger::new().with_flag(
        USE_SPAN_METRICS,
        config.use_span_metrics,
        config.use_span_metrics_orgs.iter().copied(),
    );

    let licensing = Licensing::new(
        Arc::new(SqliteLicenseStore::new(db_pool.clone())),
        upstream,
        Arc::new(flagger),
        FeatureCatalog::cloud(),
    )
    .with_dot_metrics(config.dot_metrics_enabled);

    let state = AppState {
        db: db_pool,
        licensing: Arc::new(licensing),
    };

    let app = Router::new()
        .merge(handlers::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Licensing server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
