use crate::types::{FetchConfig, GeminiConfig, DEFAULT_FEED_URL, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL};
use clap::Parser;

/// Serves arXiv papers by category along with model-generated insights
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address the HTTP server listens on
    #[arg(long, env = "ARXIV_INSIGHTS_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// arXiv query endpoint
    #[arg(long, env = "ARXIV_FEED_URL", default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,

    #[arg(long, env = "ARXIV_MAX_RESULTS", default_value_t = 10)]
    pub max_results: usize,

    #[arg(long, env = "ARXIV_TIMEOUT_SECONDS", default_value_t = 30)]
    pub timeout_seconds: u64,

    /// Minimum gap between two requests to the same feed host
    #[arg(long, env = "ARXIV_MIN_REQUEST_INTERVAL_MS", default_value_t = 1000)]
    pub min_request_interval_ms: u64,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    #[arg(long, env = "GEMINI_API_URL", default_value = DEFAULT_GEMINI_URL)]
    pub gemini_url: String,

    /// Timeout for model requests; unset leaves the client default
    #[arg(long, env = "GEMINI_TIMEOUT_SECONDS")]
    pub gemini_timeout_seconds: Option<u64>,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Args {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            feed_url: self.feed_url.clone(),
            max_results: self.max_results,
            timeout_seconds: self.timeout_seconds,
            min_request_interval_ms: self.min_request_interval_ms,
            ..FetchConfig::default()
        }
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_url.clone(),
            timeout_seconds: self.gemini_timeout_seconds,
        }
    }
}
