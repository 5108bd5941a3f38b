use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use crate::remote::ApiError;

use super::fallback::fallback_records;
use super::store::FeedbackStore;
use super::types::{FeedbackRecord, VoteDirection};

/// The remote side of feedback listing and voting.
pub trait FeedbackService {
    fn list_feedback(&self) -> impl Future<Output = Result<Vec<FeedbackRecord>, ApiError>>;

    fn vote_feedback(
        &self,
        feedback_id: &str,
        user_id: &str,
        direction: VoteDirection,
    ) -> impl Future<Output = Result<FeedbackRecord, ApiError>>;
}

/// Where the current store contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Live { count: usize },
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The service confirmed the vote and the record was swapped in.
    Applied,
    /// The service answered, but with a record the store does not hold.
    Ignored,
    /// The id is not in the store; no request was sent.
    NotLoaded,
    Failed,
}

/// Mediates every network interaction for feedback and is the only writer
/// of the [`FeedbackStore`].
///
/// Nothing is optimistic: the store changes only once the service replies.
/// Overlapping `load_all` calls are not sequenced, so the last reply wins.
pub struct FeedbackSync<S> {
    service: S,
    state: Mutex<SyncState>,
}

#[derive(Default)]
struct SyncState {
    store: FeedbackStore,
    last_load: Option<LoadOutcome>,
}

impl<S: FeedbackService> FeedbackSync<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(SyncState::default()),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Refresh the whole list. Failures are logged and replaced by the
    /// fallback sample pair; they never reach the caller.
    pub async fn load_all(&self) -> LoadOutcome {
        let outcome = match self.service.list_feedback().await {
            Ok(records) => {
                let count = records.len();
                log::info!("Loaded {count} feedback records");
                self.lock().store.replace_all(records);
                LoadOutcome::Live { count }
            }
            Err(e) => {
                log::warn!("Feedback list unavailable, showing sample data: {e}");
                self.lock().store.replace_all(fallback_records());
                LoadOutcome::Fallback
            }
        };
        self.lock().last_load = Some(outcome);
        outcome
    }

    /// Cast (or toggle) `user_id`'s vote on a loaded record and swap in the
    /// snapshot the service returns.
    pub async fn vote(&self, feedback_id: &str, user_id: &str, direction: VoteDirection) -> VoteOutcome {
        if !self.lock().store.contains(feedback_id) {
            log::warn!("Vote on feedback {feedback_id} skipped: not loaded");
            return VoteOutcome::NotLoaded;
        }

        match self.service.vote_feedback(feedback_id, user_id, direction).await {
            Ok(record) => {
                if record.id != feedback_id {
                    log::warn!(
                        "Vote on feedback {feedback_id} answered with record {}",
                        record.id
                    );
                }
                if self.lock().store.replace_one(record) {
                    VoteOutcome::Applied
                } else {
                    VoteOutcome::Ignored
                }
            }
            Err(e) => {
                log::warn!("Failed to {direction} feedback {feedback_id}: {e}");
                VoteOutcome::Failed
            }
        }
    }

    pub fn snapshot(&self) -> Vec<FeedbackRecord> {
        self.lock().store.records().to_vec()
    }

    pub fn get(&self, feedback_id: &str) -> Option<FeedbackRecord> {
        self.lock().store.get(feedback_id).cloned()
    }

    /// Outcome of the most recent completed `load_all`, if any.
    pub fn last_load(&self) -> Option<LoadOutcome> {
        self.lock().last_load
    }

    pub fn is_loaded(&self) -> bool {
        self.last_load().is_some()
    }
}
