use crate::insights;
use crate::llm_adapter::LlmAdapter;
use crate::retry::RetryPolicy;
use crate::types::{InsightBundle, InsightError, Paper, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info};

type Outcome = std::result::Result<Arc<InsightBundle>, String>;

enum Entry {
    /// A generation task is running; its outcome is published on the channel.
    Pending(watch::Receiver<Option<Outcome>>),
    Ready(Arc<InsightBundle>),
    /// Permanent failure flag. Only [`InsightCache::retry`] clears it.
    Failed(String),
}

/// Per-session memo of insight bundles keyed by paper id.
///
/// At most one entry exists per paper id, and at most one generation runs per
/// paper id at a time: concurrent callers join the in-flight request. Entries
/// are never evicted; call [`InsightCache::clear`] when the category changes.
pub struct InsightCache {
    adapter: Arc<dyn LlmAdapter>,
    policy: RetryPolicy,
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl InsightCache {
    pub fn new(adapter: Arc<dyn LlmAdapter>, policy: RetryPolicy) -> Self {
        Self {
            adapter,
            policy,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the memoized bundle, joins an in-flight generation, or starts one.
    ///
    /// A paper whose generation already failed is not retried here.
    pub async fn get_or_generate(&self, paper: &Paper) -> Result<Arc<InsightBundle>> {
        let mut receiver = {
            let mut entries = self.entries.lock().await;
            match entries.get(&paper.id) {
                Some(Entry::Ready(bundle)) => return Ok(bundle.clone()),
                Some(Entry::Failed(reason)) => {
                    return Err(InsightError::InsightsUnavailable {
                        paper_id: paper.id.clone(),
                        reason: reason.clone(),
                    })
                }
                Some(Entry::Pending(receiver)) => {
                    debug!("Joining in-flight insight generation for {}", paper.id);
                    receiver.clone()
                }
                None => {
                    let (sender, receiver) = watch::channel(None);
                    entries.insert(paper.id.clone(), Entry::Pending(receiver.clone()));
                    self.spawn_generation(paper.clone(), sender);
                    receiver
                }
            }
        };

        let outcome = receiver
            .wait_for(Option::is_some)
            .await
            .map(|outcome| outcome.clone())
            .ok()
            .flatten()
            .unwrap_or_else(|| Err("generation ended without a result".to_string()));

        outcome.map_err(|reason| InsightError::InsightsUnavailable {
            paper_id: paper.id.clone(),
            reason,
        })
    }

    /// Clears a failure flag for the paper and generates again.
    ///
    /// A pending entry whose generation task died without reporting is cleared too.
    pub async fn retry(&self, paper: &Paper) -> Result<Arc<InsightBundle>> {
        {
            let mut entries = self.entries.lock().await;
            let stale = match entries.get(&paper.id) {
                Some(Entry::Failed(_)) => true,
                Some(Entry::Pending(receiver)) => receiver.has_changed().is_err(),
                _ => false,
            };
            if stale {
                info!("Clearing insight failure for {}", paper.id);
                entries.remove(&paper.id);
            }
        }
        self.get_or_generate(paper).await
    }

    // Spawned so the request runs to completion even if every caller stops waiting.
    fn spawn_generation(&self, paper: Paper, sender: watch::Sender<Option<Outcome>>) {
        let adapter = self.adapter.clone();
        let policy = self.policy.clone();
        let entries = self.entries.clone();

        tokio::spawn(async move {
            let result = policy
                .run(|| insights::generate_insights(adapter.as_ref(), &paper))
                .await;

            let outcome = match result {
                Ok(bundle) => Ok(Arc::new(bundle)),
                Err(e) => {
                    error!("Error generating insights for {}: {}", paper.id, e);
                    Err(e.to_string())
                }
            };

            // Only record into the slot this task was started for; a clear() or a
            // newer generation may have replaced it meanwhile.
            let mut entries = entries.lock().await;
            let owned = matches!(
                entries.get(&paper.id),
                Some(Entry::Pending(receiver)) if receiver.same_channel(&sender.subscribe())
            );
            if owned {
                let entry = match &outcome {
                    Ok(bundle) => Entry::Ready(bundle.clone()),
                    Err(reason) => Entry::Failed(reason.clone()),
                };
                entries.insert(paper.id.clone(), entry);
            } else {
                debug!("Discarding insight outcome for {}: cache was cleared", paper.id);
            }
            drop(entries);

            let _ = sender.send(Some(outcome));
        });
    }

    pub async fn get(&self, paper_id: &str) -> Option<Arc<InsightBundle>> {
        match self.entries.lock().await.get(paper_id) {
            Some(Entry::Ready(bundle)) => Some(bundle.clone()),
            _ => None,
        }
    }

    pub async fn is_failed(&self, paper_id: &str) -> bool {
        matches!(self.entries.lock().await.get(paper_id), Some(Entry::Failed(_)))
    }

    pub async fn is_pending(&self, paper_id: &str) -> bool {
        matches!(self.entries.lock().await.get(paper_id), Some(Entry::Pending(_)))
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
        debug!("Cleared insight cache");
    }
}
