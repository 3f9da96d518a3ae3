use animeverse_pro::{
    Config, VerseError, bootstrap,
    db::{DocumentStore, JsonFileStore},
    router::{AppState, verse_router},
    service::tracker,
};
use mimalloc::MiMalloc;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config_path = Config::default_path();
    let mut cfg = Config::load(&config_path)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_level.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        config = %config_path.display(),
        port = cfg.server.port,
        data_dir = %cfg.storage.data_dir.display(),
        public_dir = %cfg.storage.public_dir.display(),
        loglevel = %cfg.log_level
    );

    let key = cfg.cookie_key().inspect_err(|e| error!(error = %e, "invalid server config"))?;

    // Storage must be fully provisioned before anything else touches it.
    let store = Arc::new(JsonFileStore::new(&cfg.storage.data_dir));
    let boot_cfg = cfg.clone();
    let boot_store = store.clone();
    let report = tokio::task::spawn_blocking(move || {
        bootstrap::initialize(&boot_cfg, boot_store.as_ref())
    })
    .await
    .map_err(VerseError::from)
    .and_then(|res| res)
    .inspect_err(|e| error!(error = %e, "system initialization failed"))?;
    cfg.initial_admin.discard_password();
    info!(state = ?report.state, admin = ?report.admin, "storage ready");

    let cfg = Arc::new(cfg);
    let store: Arc<dyn DocumentStore> = store;
    let app = verse_router(AppState::new(cfg.clone(), store.clone(), key));

    tracker::spawn(store, &cfg.tracker);

    let port = cfg.server.port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("AnimeVerse-Pro is live at http://localhost:{}", port);
    info!("Admin login: http://localhost:{}/auth/login", port);
    axum::serve(listener, app).await?;
    Ok(())
}
