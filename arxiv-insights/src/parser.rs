use crate::types::{InsightError, Paper, Result};
use feed_rs::parser;
use tracing::{debug, info};

pub struct FeedParser;

impl FeedParser {
    /// Parses an arXiv Atom response into at most `limit` papers, keeping feed order.
    ///
    /// A feed without entries is a valid, empty result.
    pub fn parse_papers(content: &str, limit: usize) -> Result<Vec<Paper>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| InsightError::Parse(format!("Failed to parse feed: {}", e)))?;

        let papers: Vec<Paper> = feed
            .entries
            .into_iter()
            .take(limit)
            .map(Self::parse_entry)
            .collect();

        info!("Parsed feed with {} papers", papers.len());
        Ok(papers)
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> Paper {
        let title = entry
            .title
            .map(|t| t.content.trim().to_string())
            .unwrap_or_default();
        let summary = entry
            .summary
            .map(|s| s.content.trim().to_string())
            .unwrap_or_default();
        let authors = entry.authors.into_iter().map(|a| a.name).collect();

        // arXiv lists the abstract page first, then the PDF.
        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_else(|| entry.id.clone());

        Paper {
            id: entry.id,
            title,
            summary,
            authors,
            published: entry.published.or(entry.updated),
            link,
        }
    }
}
