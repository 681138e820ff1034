use anyhow::Context;
use equus_api::{app, AppState};
use equus_booking::get_default_rules;
use equus_core::{CatalogRepository, ReservationStore, ReservationSubmitter};
use equus_store::{CatalogSeed, Config, DbClient, InMemoryCatalog, InMemoryReservationStore, PgCatalogRepository, PgReservationStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "equus_api=debug,equus_core=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Equus API on port {}", config.server.port);

    let (catalog, store, rules) = match &config.database {
        Some(db_config) => {
            let db = DbClient::new(&db_config.url, db_config.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            let rules = db
                .fetch_validation_rules(get_default_rules())
                .await
                .context("Failed to load validation rules")?;
            (
                Arc::new(PgCatalogRepository::new(db.pool.clone())) as Arc<dyn CatalogRepository>,
                Arc::new(PgReservationStore::new(db.pool.clone())) as Arc<dyn ReservationStore>,
                rules,
            )
        }
        None => {
            tracing::warn!("No database configured, reservations are kept in memory");
            let catalog = match &config.catalog.seed_file {
                Some(path) => {
                    let raw = std::fs::read_to_string(path)
                        .with_context(|| format!("Failed to read catalog seed {}", path))?;
                    let seed: CatalogSeed = serde_json::from_str(&raw)
                        .with_context(|| format!("Invalid catalog seed {}", path))?;
                    tracing::info!("Seeded in-memory catalog with {} services", seed.services.len());
                    InMemoryCatalog::from_seed(seed)
                }
                None => InMemoryCatalog::new(),
            };
            (
                Arc::new(catalog) as Arc<dyn CatalogRepository>,
                Arc::new(InMemoryReservationStore::new()) as Arc<dyn ReservationStore>,
                get_default_rules(),
            )
        }
    };

    let app_state = AppState {
        catalog,
        submitter: Arc::new(ReservationSubmitter::new(store)),
        policy: Arc::new(config.booking.policy(rules)),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
