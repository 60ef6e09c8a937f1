// =============================================================================
// Application Identity
// =============================================================================

/// Crate target used in the default log filter
pub const LOG_TARGET: &str = "cybsuite_table";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".cybsuite";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "cybsuite.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "CYBSUITE_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "CYBSUITE_LOG";

// =============================================================================
// Environment Variables - Record Source
// =============================================================================

/// Environment variable selecting the record source (`file` or `api`)
pub const ENV_SOURCE: &str = "CYBSUITE_SOURCE";

/// Environment variable for the JSON data directory
pub const ENV_DATA_DIR: &str = "CYBSUITE_DATA_DIR";

/// Environment variable for the CRUD API base URL
pub const ENV_API_URL: &str = "CYBSUITE_API_URL";

/// Environment variable for the API request timeout in seconds
pub const ENV_API_TIMEOUT_SECS: &str = "CYBSUITE_API_TIMEOUT_SECS";

/// Environment variable for the session cookie sent to the API
pub const ENV_API_COOKIE: &str = "CYBSUITE_API_COOKIE";

// =============================================================================
// Environment Variables - Table
// =============================================================================

/// Environment variable for rows per page
pub const ENV_PAGE_SIZE: &str = "CYBSUITE_PAGE_SIZE";

// =============================================================================
// Defaults
// =============================================================================

/// Default CRUD API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default API request timeout
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Data directory name under the dotfile folder
pub const DATA_DIR_NAME: &str = "data";
