// Shared fixtures for the integration tests
#![allow(dead_code)]

use arxiv_insights::{FetchConfig, Paper};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const TWO_ENTRY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <link href="http://arxiv.org/api/query?search_query%3Dcat%3Acs.AI" rel="self" type="application/atom+xml"/>
  <title type="html">ArXiv Query: search_query=cat:cs.AI</title>
  <id>http://arxiv.org/api/cHxbiOdZaP56ODnBPIenZhzg5f8</id>
  <updated>2024-05-01T00:00:00-04:00</updated>
  <entry>
    <id>http://arxiv.org/abs/2405.00001v1</id>
    <updated>2024-05-01T17:59:59Z</updated>
    <published>2024-04-30T17:59:59Z</published>
    <title>Learning to Plan with Language Models</title>
    <summary>We study how large language models can be used as planners.</summary>
    <author>
      <name>Ada Lovelace</name>
    </author>
    <author>
      <name>Alan Turing</name>
    </author>
    <link href="http://arxiv.org/abs/2405.00001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2405.00001v1" rel="related" type="application/pdf"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2405.00002v2</id>
    <updated>2024-05-01T12:00:00Z</updated>
    <published>2024-04-29T09:30:00Z</published>
    <title>Robust Reward Models</title>
    <summary>Reward models are brittle; we make them less so.</summary>
    <author>
      <name>Grace Hopper</name>
    </author>
    <link href="http://arxiv.org/abs/2405.00002v2" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2405.00002v2" rel="related" type="application/pdf"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>
"#;

pub const EMPTY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=cat:xx.NONE</title>
  <id>http://arxiv.org/api/empty</id>
  <updated>2024-05-01T00:00:00-04:00</updated>
</feed>
"#;

pub const SIX_SECTION_OUTPUT: &str = "Quick Summary
A planner built from a language model.

Target Audience
Researchers in automated planning.

Key Components
Prompted search over action sequences.

Structure Analysis
Introduction, method, experiments.

Impact & Applications
Household robots and logistics.

Technical Complexity
Intermediate; assumes familiarity with transformers.";

pub const TOPIC_OUTPUT: &str = r#"Here is the analysis:
```json
{
  "topics": {
    "topic1": { "name": "Machine Learning", "score": 0.9 },
    "topic2": { "name": "Planning", "score": 0.8 },
    "topic3": { "name": "Robotics", "score": 0.4 },
    "topic4": { "name": "Language", "score": 0.7 }
  }
}
```"#;

pub fn sample_paper() -> Paper {
    Paper {
        id: "http://arxiv.org/abs/2405.00001v1".to_string(),
        title: "Learning to Plan with Language Models".to_string(),
        summary: "We study how large language models can be used as planners.".to_string(),
        authors: vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
        published: None,
        link: "http://arxiv.org/abs/2405.00001v1".to_string(),
    }
}

pub fn paper_with_id(id: &str) -> Paper {
    Paper {
        id: id.to_string(),
        ..sample_paper()
    }
}

pub fn test_fetch_config(feed_url: String) -> FetchConfig {
    FetchConfig {
        user_agent: "arxiv-insights-test/1.0".to_string(),
        feed_url,
        max_results: 10,
        timeout_seconds: 5,
        min_request_interval_ms: 0,
    }
}

pub type SeenQueries = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Serves `body` with `status` at `/api/query` and records every query string it sees.
pub async fn spawn_mock_feed(status: StatusCode, body: &'static str) -> (String, SeenQueries) {
    let seen: SeenQueries = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let app = Router::new().route(
        "/api/query",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(params);
                (status, [(header::CONTENT_TYPE, "application/atom+xml")], body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/query", addr), seen)
}

/// Binds an ephemeral port and serves `app` on it, returning the base URL.
pub async fn spawn_app(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
