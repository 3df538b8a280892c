// ==========================================
// Shipment Import - Import Settings Snapshot
// ==========================================
// Read once per import from an ImportConfigReader, then passed by
// reference to the synchronous pipeline stages.
// ==========================================

use crate::config::config_manager::defaults;
use crate::config::import_config_trait::ImportConfigReader;
use crate::i18n;
use crate::repository::RepositoryResult;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
    pub max_file_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub tracking_prefix: String,
    pub shipment_table: String,
    pub locale: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: defaults::MAX_FILE_SIZE_BYTES,
            allowed_extensions: defaults::ALLOWED_EXTENSIONS
                .split(',')
                .map(str::to_string)
                .collect(),
            tracking_prefix: defaults::TRACKING_PREFIX.to_string(),
            shipment_table: defaults::SHIPMENT_TABLE.to_string(),
            locale: defaults::MESSAGE_LOCALE.to_string(),
        }
    }
}

impl ImportSettings {
    /// Snapshot every setting from a config reader
    pub async fn load<C>(reader: &C) -> RepositoryResult<Self>
    where
        C: ImportConfigReader + ?Sized,
    {
        let locale = reader.get_message_locale().await?;

        Ok(Self {
            max_file_size_bytes: reader.get_max_file_size_bytes().await?,
            allowed_extensions: reader.get_allowed_extensions().await?,
            tracking_prefix: reader.get_tracking_prefix().await?,
            shipment_table: reader.get_shipment_table().await?,
            locale: Self::normalize_locale(&locale),
        })
    }

    /// Override the message locale (unsupported values fall back to the default)
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = Self::normalize_locale(locale);
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size_bytes = bytes;
        self
    }

    pub fn is_extension_allowed(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.allowed_extensions.iter().any(|allowed| *allowed == ext)
    }

    /// ".xlsx, .xls" style list for messages
    pub fn allowed_extensions_display(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn normalize_locale(locale: &str) -> String {
        let trimmed = locale.trim();
        if i18n::is_supported(trimmed) {
            trimmed.to_string()
        } else {
            warn!(locale = %trimmed, "unsupported message locale, using default");
            i18n::DEFAULT_LOCALE.to_string()
        }
    }
}
