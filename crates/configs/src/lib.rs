use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub image_store: ImageStoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 7000, worker_threads: Some(4) }
    }
}

/// Connection string plus the pool bounds handed to the SeaORM
/// `ConnectOptions` at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

/// Bounds on multipart image payloads. The per-file cap matches the
/// transport-level limit the routes enforce while reading each part.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_files")]
    pub max_files_per_request: usize,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_files_per_request: default_max_files(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

/// External image store endpoint. The URL may also come from the
/// `IMAGE_STORE_URL` environment variable.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageStoreConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_upload_timeout")]
    pub timeout_secs: u64,
}

impl Default for ImageStoreConfig {
    fn default() -> Self {
        Self { endpoint: String::new(), timeout_secs: default_upload_timeout() }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_max_files() -> usize { 6 }
fn default_max_file_bytes() -> usize { 5 * 1024 * 1024 }
fn default_upload_timeout() -> u64 { 30 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.uploads.validate()?;
        self.image_store.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads.unwrap_or(0) == 0 {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // If the TOML file carries no URL, fall back to the environment
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or via DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl UploadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_files_per_request == 0 {
            return Err(anyhow!("uploads.max_files_per_request must be >= 1"));
        }
        if self.max_file_bytes == 0 {
            return Err(anyhow!("uploads.max_file_bytes must be >= 1"));
        }
        Ok(())
    }
}

impl ImageStoreConfig {
    pub fn normalize_from_env(&mut self) {
        if self.endpoint.trim().is_empty() {
            if let Ok(url) = std::env::var("IMAGE_STORE_URL") {
                self.endpoint = url;
            }
        }
    }
}
