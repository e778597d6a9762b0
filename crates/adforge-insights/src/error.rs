use adforge_core::LifecycleError;
use adforge_db::DbError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("product {0} not found")]
    ProductNotFound(Uuid),

    #[error(transparent)]
    Access(#[from] LifecycleError),

    #[error("database error: {0}")]
    Db(#[from] DbError),
}
