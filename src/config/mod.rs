// ==========================================
// Shipment Import - Configuration Layer
// ==========================================
// Responsibility: import settings with defaults
// Storage: config_kv table (scope_id = 'global')
// ==========================================

pub mod config_manager;
pub mod import_config_trait;
pub mod import_settings;

pub use config_manager::{config_keys, defaults, ConfigManager};
pub use import_config_trait::ImportConfigReader;
pub use import_settings::ImportSettings;
