use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Base URL of the zero-shot classification endpoint. `None` disables tier 1.
    pub zero_shot_url: Option<String>,
    pub zero_shot_token: Option<String>,
    /// Base URL of the TEI embedding server. `None` disables tier 2.
    pub tei_url: Option<String>,
    pub inference_timeout_ms: u64,
    /// Serialize model calls when the inference backends are not reentrant.
    pub serialize_inference: bool,
    pub batch_concurrency: usize,
    pub max_batch_size: usize,
    pub api_keys: Vec<String>,
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.env == Environment::Development
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("zero_shot_url", &self.zero_shot_url)
            .field(
                "zero_shot_token",
                &self.zero_shot_token.as_ref().map(|_| "[redacted]"),
            )
            .field("tei_url", &self.tei_url)
            .field("inference_timeout_ms", &self.inference_timeout_ms)
            .field("serialize_inference", &self.serialize_inference)
            .field("batch_concurrency", &self.batch_concurrency)
            .field("max_batch_size", &self.max_batch_size)
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .finish()
    }
}
