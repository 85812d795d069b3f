use crate::api::types::SearchResponse;
use crate::event::ApiResult;

/// The lifecycle of the current search. Exactly one variant holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success(SearchResponse),
    Failure(String),
}

/// Inputs to [`SearchModel::update`].
#[derive(Debug, Clone)]
pub enum SearchAction {
    /// The user asked for a search with this raw input.
    Submit(String),
    /// The request issued with sequence number `seq` resolved.
    Completed {
        seq: u64,
        result: ApiResult<SearchResponse>,
    },
}

/// A request accepted by the model that the caller must now send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub seq: u64,
    /// Already trimmed and non-empty.
    pub query: String,
}

/// Search state plus request sequencing.
///
/// Every accepted submission gets a new, strictly increasing sequence
/// number. Only the completion carrying the latest number is applied, so a
/// slow response to an older query can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct SearchModel {
    state: SearchState,
    latest_seq: u64,
}

impl SearchModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SearchState::Loading)
    }

    /// Sequence number of the most recently accepted submission (0 = none).
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Apply one action. Returns the request to dispatch, if any.
    pub fn update(&mut self, action: SearchAction) -> Option<PendingSearch> {
        match action {
            SearchAction::Submit(raw) => {
                let query = raw.trim();
                if query.is_empty() {
                    tracing::debug!("ignoring empty search submission");
                    return None;
                }
                self.latest_seq += 1;
                self.state = SearchState::Loading;
                Some(PendingSearch {
                    seq: self.latest_seq,
                    query: query.to_string(),
                })
            }
            SearchAction::Completed { seq, result } => {
                if !self.accepts(seq) {
                    tracing::debug!(seq, latest = self.latest_seq, "discarding stale search result");
                    return None;
                }
                self.state = match result {
                    Ok(resp) => SearchState::Success(resp),
                    Err(e) => {
                        tracing::warn!(seq, "search failed: {e}");
                        SearchState::Failure(e.to_string())
                    }
                };
                None
            }
        }
    }

    pub fn submit(&mut self, query: &str) -> Option<PendingSearch> {
        self.update(SearchAction::Submit(query.to_string()))
    }

    /// Feeds a finished request back in. Returns `false` when the result
    /// was stale and discarded.
    pub fn complete(&mut self, seq: u64, result: ApiResult<SearchResponse>) -> bool {
        let applied = self.accepts(seq);
        self.update(SearchAction::Completed { seq, result });
        applied
    }

    /// Only the latest request, while it is still in flight, may settle the state.
    fn accepts(&self, seq: u64) -> bool {
        seq == self.latest_seq && self.is_loading()
    }
}
