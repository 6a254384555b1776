use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SOURCE_PATH: &str = "./context_windows.jsonl";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_OUT_DIR: &str = "./static";
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings injected into the server and the static build at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub source_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub out_dir: PathBuf,
    pub read_timeout: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}
