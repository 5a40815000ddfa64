use std::path::PathBuf;

use reqwest::Client;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Outbound client for the `/api` proxy. No timeout, same as the API client.
    pub http: Client,
    /// Where `/api/*` is forwarded, without a trailing slash.
    pub backend_url: String,
    /// Prebuilt front-end bundle.
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(backend_url: &str, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            http: Client::new(),
            backend_url: backend_url.trim_end_matches('/').to_string(),
            static_dir: static_dir.into(),
        }
    }
}
