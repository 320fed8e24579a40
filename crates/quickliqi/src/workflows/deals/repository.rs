use super::domain::{DealId, DealRecord, DealStatus};
use super::settings::Settings;

/// Storage abstraction so the service module can be exercised in isolation.
pub trait DealRepository: Send + Sync {
    fn insert(&self, record: DealRecord) -> Result<DealRecord, RepositoryError>;
    fn update(&self, record: DealRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DealId) -> Result<Option<DealRecord>, RepositoryError>;
    /// All deals, optionally restricted to one pipeline stage. Order is not
    /// significant; the service sorts.
    fn list(&self, status: Option<DealStatus>) -> Result<Vec<DealRecord>, RepositoryError>;
    fn delete(&self, id: &DealId) -> Result<(), RepositoryError>;
}

/// Singleton buyer-criteria storage. `load` returning `None` means nothing
/// has been saved yet and defaults apply.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Option<Settings>, RepositoryError>;
    fn save(&self, settings: &Settings) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
