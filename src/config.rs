use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL including the `/api` prefix,
    /// e.g. `http://localhost:5000/api`.
    pub base_url: String,
    pub request_timeout: Duration,
    /// Where a remembered session is persisted; `None` keeps sessions
    /// in memory only.
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let base_url = env::var("API_BASE_URL")?;
        let request_timeout = env::var("API_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));
        let session_file = env::var("SESSION_FILE").ok().map(PathBuf::from);
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
            session_file,
        })
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(30),
            session_file: None,
        }
    }
}
