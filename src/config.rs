use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

/// Application settings.
///
/// Loaded from `.env` and `BLOGFEED_*` environment variables, with `__`
/// separating nested keys (`BLOGFEED_CACHE__INDEX_TTL_SECS=5`).
/// `JWT_SECRET` is honoured as a shorthand for `BLOGFEED_JWT__SECRET`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub posts: PostsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    /// JSON file with groups to seed at startup.
    #[serde(default)]
    pub fixtures: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostsConfig {
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_index_ttl_secs")]
    pub index_ttl_secs: u64,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_concurrency_limit() -> usize {
    1024
}

fn default_expiry_hours() -> i64 {
    24
}

fn default_per_page() -> usize {
    10
}

fn default_index_ttl_secs() -> u64 {
    20
}

fn default_max_capacity() -> u64 {
    1000
}

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}

fn default_requests_per_minute() -> u32 {
    30
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            index_ttl_secs: default_index_ttl_secs(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("BLOGFEED")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .build()?;

        let config: Config = config.try_deserialize()?;
        if config.jwt.secret.is_empty() {
            anyhow::bail!("JWT_SECRET must be set!");
        }
        Ok(config)
    }

    /// Defaults everywhere except the signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                request_timeout_secs: default_request_timeout_secs(),
                concurrency_limit: default_concurrency_limit(),
            },
            jwt: JwtConfig {
                secret: jwt_secret.into(),
                expiry_hours: default_expiry_hours(),
            },
            posts: PostsConfig::default(),
            cache: CacheConfig::default(),
            media: MediaConfig::default(),
            auth: AuthConfig::default(),
            fixtures: None,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn index_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.index_ttl_secs)
    }
}
