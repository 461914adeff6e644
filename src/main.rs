//! Golf scoring backend entrypoint wiring REST, SSE and the storage backend.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::{Context, bail};
use axum::Router;
use baobab_golf_back::{
    config::AppConfig,
    dao::{golf_store::GolfStore, golf_store::memory::MemoryGolfStore},
    routes,
    services::storage_supervisor,
    state::{AppState, SharedState},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Storage backend selected through `STORAGE_BACKEND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StorageBackend {
    Mongo,
    Memory,
}

impl StorageBackend {
    fn from_env() -> anyhow::Result<Self> {
        match env::var("STORAGE_BACKEND").ok().as_deref().map(str::trim) {
            None | Some("") | Some("mongo") => Ok(Self::Mongo),
            Some("memory") => Ok(Self::Memory),
            Some(other) => bail!("unknown STORAGE_BACKEND `{other}` (expected `mongo` or `memory`)"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);

    match StorageBackend::from_env()? {
        StorageBackend::Memory => {
            warn!("using in-memory storage; data is lost on restart");
            app_state
                .install_store(Arc::new(MemoryGolfStore::new()) as Arc<dyn GolfStore>)
                .await;
        }
        StorageBackend::Mongo => spawn_mongo_supervisor(app_state.clone())?,
    }

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

#[cfg(feature = "mongo-store")]
fn spawn_mongo_supervisor(state: SharedState) -> anyhow::Result<()> {
    use baobab_golf_back::dao::{
        golf_store::mongodb::{MongoConfig, MongoGolfStore},
        storage::StorageError,
    };

    let mongo_uri = env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
    let mongo_db = env::var("MONGO_DB").ok();

    tokio::spawn(storage_supervisor::run(state, move || {
        let uri = mongo_uri.clone();
        let db = mongo_db.clone();
        async move {
            let config = MongoConfig::from_uri(&uri, db.as_deref()).await?;
            let store = MongoGolfStore::connect(config).await?;
            Ok::<_, StorageError>(Arc::new(store) as Arc<dyn GolfStore>)
        }
    }));
    Ok(())
}

#[cfg(not(feature = "mongo-store"))]
fn spawn_mongo_supervisor(_state: SharedState) -> anyhow::Result<()> {
    bail!("STORAGE_BACKEND=mongo requires the `mongo-store` feature")
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
