// ==========================================
// Shipment Import - Import Config Reader Trait
// ==========================================
// Responsibility: read-only access to the settings the pipeline needs
// Implementors: ConfigManager (config_kv table), test mocks
// ==========================================

use crate::repository::RepositoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// Upload size cap in bytes
    ///
    /// # Default
    /// - 10485760 (10 MiB)
    async fn get_max_file_size_bytes(&self) -> RepositoryResult<u64>;

    /// Accepted file extensions, lowercase, without the dot
    ///
    /// # Default
    /// - ["xlsx", "xls", "csv"]
    async fn get_allowed_extensions(&self) -> RepositoryResult<Vec<String>>;

    /// Prefix for tracking numbers generated at submit time
    ///
    /// # Default
    /// - "SHP"
    async fn get_tracking_prefix(&self) -> RepositoryResult<String>;

    /// Row-store table receiving imported shipments
    ///
    /// # Default
    /// - "shipments"
    async fn get_shipment_table(&self) -> RepositoryResult<String>;

    /// Locale of user-facing messages ("ar" or "en")
    ///
    /// # Default
    /// - "ar"
    async fn get_message_locale(&self) -> RepositoryResult<String>;
}
