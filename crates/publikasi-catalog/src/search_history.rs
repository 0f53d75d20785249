//! Search history tracker: per-user deduplicated keyword log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use publikasi_core::defaults::SEARCH_HISTORY_LIMIT;
use publikasi_core::{Result, SearchHistoryEntry, SearchHistoryRepository};

#[derive(Clone)]
pub struct SearchHistoryTracker {
    repo: Arc<dyn SearchHistoryRepository>,
}

impl SearchHistoryTracker {
    pub fn new(repo: Arc<dyn SearchHistoryRepository>) -> Self {
        Self { repo }
    }

    /// Record `raw_keyword` for `user_id` at the current time.
    pub async fn record_search(
        &self,
        user_id: Uuid,
        raw_keyword: &str,
    ) -> Result<Option<SearchHistoryEntry>> {
        self.record_search_at(user_id, raw_keyword, Utc::now()).await
    }

    /// Upsert on the trimmed keyword: refresh the timestamp of an existing
    /// entry or insert a new one. Blank keywords are ignored.
    pub async fn record_search_at(
        &self,
        user_id: Uuid,
        raw_keyword: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<SearchHistoryEntry>> {
        let keyword = raw_keyword.trim();
        if keyword.is_empty() {
            return Ok(None);
        }

        let entry = match self.repo.find(user_id, keyword).await? {
            Some(mut existing) => {
                self.repo.touch(existing.id, at).await?;
                existing.searched_at_utc = at;
                existing
            }
            None => self.repo.insert(user_id, keyword, at).await?,
        };

        debug!(
            subsystem = "catalog",
            component = "search_history",
            op = "record",
            user_id = %user_id,
            "Search keyword recorded"
        );
        Ok(Some(entry))
    }

    /// The user's ten most recent keywords, newest first.
    pub async fn list_recent(&self, user_id: Uuid) -> Result<Vec<SearchHistoryEntry>> {
        self.repo.list_recent(user_id, SEARCH_HISTORY_LIMIT).await
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<u64> {
        self.repo.delete_for_user(user_id).await
    }
}
