pub mod app_config;
pub mod catalog_repo;
pub mod database;
pub mod memory;
pub mod reservation_repo;

pub use app_config::Config;
pub use catalog_repo::PgCatalogRepository;
pub use database::DbClient;
pub use memory::{CatalogSeed, InMemoryCatalog, InMemoryReservationStore};
pub use reservation_repo::PgReservationStore;
