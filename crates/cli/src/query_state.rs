//! # Query State
//!
//! `RagQuery` runs one query at a time against a `QueryTransport` and
//! publishes every transition through a `tokio::sync::watch` channel:
//!
//! ```text
//! Idle ──submit──▶ Loading ──2xx──────────▶ Success
//!                     │
//!                     └──error / network──▶ Failure
//! ```
//!
//! A new submission re-enters `Loading` from any state and clears the previous
//! error. The last successful response stays visible after a failure.

use crate::api_client::QueryTransport;
use noterag::{QueryRequest, QueryResponse};
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum QueryState {
    #[default]
    Idle,
    Loading,
    Success(QueryResponse),
    /// Holds the user-facing error message, e.g. `API error: 500`.
    Failure(String),
}

/// What an observer sees: the current state plus the response on display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySnapshot {
    pub state: QueryState,
    /// The last successful response. Not replaced by a failed query.
    pub response: Option<QueryResponse>,
}

impl QuerySnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, QueryState::Loading)
    }

    pub fn response(&self) -> Option<&QueryResponse> {
        self.response.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            QueryState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// Leaves `Loading` if the query future is dropped before it settles.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<QuerySnapshot>,
    settled: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.send_modify(|snapshot| {
                if snapshot.is_loading() {
                    snapshot.state = QueryState::Idle;
                }
            });
        }
    }
}

/// Runs queries and tracks their lifecycle.
#[derive(Debug)]
pub struct RagQuery<T> {
    transport: T,
    state: watch::Sender<QuerySnapshot>,
}

impl<T: QueryTransport> RagQuery<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(QuerySnapshot::default());
        Self { transport, state }
    }

    /// Returns a receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> QuerySnapshot {
        self.state.borrow().clone()
    }

    /// Submits `request` and waits for it to settle.
    ///
    /// Never fails: errors end up in the `Failure` state and `None` is
    /// returned.
    pub async fn execute_query(&self, request: &QueryRequest) -> Option<QueryResponse> {
        self.state
            .send_modify(|snapshot| snapshot.state = QueryState::Loading);
        let mut guard = LoadingGuard {
            state: &self.state,
            settled: false,
        };

        let outcome = self.transport.submit_query(request).await;
        guard.settled = true;

        match outcome {
            Ok(response) => {
                info!(
                    web_search_used = response.web_search_used,
                    sources_count = response.sources_count,
                    "Query succeeded"
                );
                self.state.send_modify(|snapshot| {
                    snapshot.response = Some(response.clone());
                    snapshot.state = QueryState::Success(response.clone());
                });
                Some(response)
            }
            Err(e) => {
                warn!("Query failed: {e:?}");
                let message = e.to_string();
                self.state
                    .send_modify(|snapshot| snapshot.state = QueryState::Failure(message));
                None
            }
        }
    }
}
