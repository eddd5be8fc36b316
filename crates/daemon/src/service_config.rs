use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Port for the API HTTP server
    pub port: u16,

    // middleware configuration
    /// The single origin browsers may call the API from
    pub allowed_origin: String,
    /// Directory uploads are written to. Must exist before the
    ///  first upload; relative paths resolve against the
    ///  working directory
    pub upload_dir: PathBuf,
    /// Maximum accepted size of a JSON request body
    pub json_limit_bytes: usize,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}
