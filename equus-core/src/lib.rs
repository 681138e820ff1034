pub mod repository;
pub mod submission;

pub use repository::{CatalogRepository, ReservationStore};
pub use submission::{load_service, ReservationSubmitter, SubmissionReceipt, SubmitError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Service not found: {0}")]
    ServiceNotFound(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
