// Pricebook - util/constants.rs
//
// Single source of truth for all named constants and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Pricebook";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "Pricebook";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Catalogue file format
// =============================================================================

/// Number of fields in a catalogue record:
/// code, name, kind, base_price, discount.
pub const CSV_FIELD_COUNT: usize = 5;

/// Field delimiter in catalogue files.
pub const CSV_DELIMITER: u8 = b',';

// =============================================================================
// Configuration
// =============================================================================

/// Name of the optional configuration file in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default logging level when neither RUST_LOG, --debug, nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";
