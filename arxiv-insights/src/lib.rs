pub mod types;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod llm_adapter;
pub mod insights;
pub mod topics;
pub mod retry;
pub mod cache;
pub mod session;
pub mod server;

pub use types::*;
pub use config::Args;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use llm_adapter::{GeminiAdapter, LlmAdapter, MockLlmAdapter};
pub use retry::RetryPolicy;
pub use cache::InsightCache;
pub use session::PaperSession;
pub use server::{router, serve, AppState};
