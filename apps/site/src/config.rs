use anyhow::{Context, Result};

/// The hosted backend used when `BACKEND_URL` is not set. Only configuration
/// loading knows about it; everything downstream takes an explicit URL.
pub const DEFAULT_BACKEND_URL: &str =
    "https://resumedemobls-a7cja7bchqc7a8em.chilecentral-01.azurewebsites.net";

const DEFAULT_PORT: &str = "8080";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Target of the `/api` reverse proxy.
    pub backend_url: String,
    /// Base URL the API client joins paths onto. Defaults to `backend_url`.
    pub api_base_url: String,
    /// Prebuilt front-end bundle; must contain `index.html`.
    pub static_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend_url = env_or("BACKEND_URL", DEFAULT_BACKEND_URL);
        Ok(Config {
            port: parse_port(&env_or("PORT", DEFAULT_PORT))?,
            api_base_url: env_or("API_BASE_URL", &backend_url),
            backend_url,
            static_dir: env_or("STATIC_DIR", "build"),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse::<u16>()
        .with_context(|| format!("PORT must be a valid port number, got {raw:?}"))
}

/// Unset and blank both mean "use the default".
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
