// Use the interfaces crate for core types
pub use interfaces::defs::{
    AxisPair, InsightBundle, InsightField, InsightView, Paper, Section, Tab, TopicAnalysis,
};

pub const DEFAULT_FEED_URL: &str = "http://export.arxiv.org/api/query";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub feed_url: String,
    pub max_results: usize,
    pub timeout_seconds: u64,
    pub min_request_interval_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "arxiv-insights/0.1".to_string(),
            feed_url: DEFAULT_FEED_URL.to_string(),
            max_results: 10,
            timeout_seconds: 30,
            min_request_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Request timeout; `None` keeps the HTTP client's default.
    pub timeout_seconds: Option<u64>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rendered as "<status>: <message>" so a rate limit carries its 429 marker.
    #[error("{status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Format(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Model returned no text")]
    EmptyCompletion,

    #[error("Insights unavailable for {paper_id}: {reason}")]
    InsightsUnavailable { paper_id: String, reason: String },

    #[error("LLM error: {0}")]
    Llm(String),
}

pub type Result<T> = std::result::Result<T, InsightError>;
