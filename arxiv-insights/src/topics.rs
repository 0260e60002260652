use crate::llm_adapter::LlmAdapter;
use crate::types::{AxisPair, InsightError, Paper, Result, TopicAnalysis};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct TopicEnvelope {
    topics: TopicSet,
}

#[derive(Debug, Deserialize)]
struct TopicSet {
    topic1: Topic,
    topic2: Topic,
    topic3: Topic,
    topic4: Topic,
}

#[derive(Debug, Deserialize)]
struct Topic {
    name: String,
    score: f64,
}

fn json_object_regex() -> &'static Regex {
    static JSON_OBJECT: OnceLock<Regex> = OnceLock::new();
    // Greedy: from the first '{' to the last '}'.
    JSON_OBJECT.get_or_init(|| Regex::new(r"\{[\s\S]*\}").expect("valid regex"))
}

pub fn topic_prompt(paper: &Paper) -> String {
    format!(
        r#"Analyze this paper and identify four distinct main topics it covers.
Title: {}
Abstract: {}

Please respond in this exact JSON format:
{{
  "topics": {{
    "topic1": {{ "name": "First Main Topic", "score": 0.0 }},
    "topic2": {{ "name": "Second Main Topic", "score": 0.0 }},
    "topic3": {{ "name": "Third Main Topic", "score": 0.0 }},
    "topic4": {{ "name": "Fourth Main Topic", "score": 0.0 }}
  }}
}}

Requirements:
- Each topic must be unique and distinct
- Topics should be broad research areas (e.g., Machine Learning, Robotics, Computer Vision)
- Scores should reflect how strongly the paper relates to that topic (0-1)
- Topics should be short (1-3 words maximum)"#,
        paper.title, paper.summary
    )
}

/// Reads the four-topic JSON envelope out of model output.
///
/// Fails with [`InsightError::Format`] when the text holds no `{...}` span and
/// with [`InsightError::Serialization`] when that span is not the expected JSON.
pub fn parse_topic_scores(text: &str) -> Result<TopicAnalysis> {
    let json = json_object_regex()
        .find(text)
        .ok_or_else(|| InsightError::Format("Invalid response format".to_string()))?;

    let envelope: TopicEnvelope = serde_json::from_str(json.as_str())?;
    let TopicSet {
        topic1,
        topic2,
        topic3,
        topic4,
    } = envelope.topics;

    let mut scores = HashMap::new();
    for topic in [&topic1, &topic2, &topic3, &topic4] {
        scores.insert(topic.name.clone(), topic.score);
    }

    Ok(TopicAnalysis {
        scores,
        axes: AxisPair {
            x: [topic1.name, topic2.name],
            y: [topic3.name, topic4.name],
        },
    })
}

pub async fn score_topics(adapter: &dyn LlmAdapter, paper: &Paper) -> Result<TopicAnalysis> {
    info!("Scoring topics for {} with {}", paper.id, adapter.adapter_name());
    let text = adapter.generate(&topic_prompt(paper)).await?;
    let analysis = parse_topic_scores(&text)?;

    for anomaly in analysis.anomalies() {
        warn!("Topic analysis for {}: {}", paper.id, anomaly);
    }

    Ok(analysis)
}
