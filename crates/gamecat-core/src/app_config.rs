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
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Base URL of the product catalog API; query parameters are appended verbatim.
    pub catalog_url: String,
    /// Base URL of storefront game pages; the storefront slug is appended as a path segment.
    pub storefront_url: String,
    /// Multipart upload endpoint of the content backend.
    pub upload_url: String,
    /// Entity type name sent as the `ref` field of every upload.
    pub upload_ref: String,
    pub upload_token: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrency: usize,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("catalog_url", &self.catalog_url)
            .field("storefront_url", &self.storefront_url)
            .field("upload_url", &self.upload_url)
            .field("upload_ref", &self.upload_ref)
            .field(
                "upload_token",
                &self.upload_token.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrency", &self.max_concurrency)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .finish()
    }
}
