use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Labscan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default address for `labscan serve`
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Largest accepted report upload, after base64 decoding
pub const MAX_REPORT_BYTES: usize = 2 * 1024 * 1024;

/// Log filter used when `RUST_LOG` is unset
pub fn default_log_filter() -> &'static str {
    "labscan=info,labscan_lib=info"
}

/// Get the application data directory
/// ~/Labscan/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the default marker database path
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("labscan.db")
}
