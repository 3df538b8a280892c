// ==========================================
// Internationalisation (i18n)
// ==========================================
// rust-i18n, Arabic (default) and English
// Note: the rust_i18n::i18n! macro is initialised in lib.rs
// ==========================================

/// Locales shipped under `locales/`
pub const SUPPORTED_LOCALES: &[&str] = &["ar", "en"];

/// Default locale for user-facing messages
pub const DEFAULT_LOCALE: &str = "ar";

/// Set the process-wide locale
///
/// # Arguments
/// - locale: "ar" or "en"
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

pub fn is_supported(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// Translate a key in an explicit locale
///
/// Pipeline code always passes the locale of its import settings so concurrent
/// imports in different languages never share global state.
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// Translate with `%{name}` placeholders in an explicit locale
///
/// # Example
/// ```no_run
/// use shipment_import::i18n::t_in_with_args;
/// let msg = t_in_with_args("ar", "report.row_line", &[("row", "2"), ("errors", "...")]);
/// ```
pub fn t_in_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t_in(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
