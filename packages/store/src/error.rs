use thiserror::Error;

/// Failures surfaced by the storage gateway.
///
/// Implementations translate their backend's "no rows" signal into
/// [`StoreError::NotFound`], so the layers above never see backend-specific
/// error shapes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The lookup matched no record.
    #[error("resource not found")]
    NotFound,
    /// Connectivity or constraint failure from the backing database.
    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}
