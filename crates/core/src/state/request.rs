use serde::{Deserialize, Serialize};

use crate::models::query::{Currency, MarketQuery};

/// The two independent fetch pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchKind {
    Markets,
    History,
}

impl std::fmt::Display for FetchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchKind::Markets => write!(f, "markets"),
            FetchKind::History => write!(f, "history"),
        }
    }
}

/// Sequence number of an issued request, unique within its `FetchKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fetch the dashboard state wants performed.
///
/// The executor runs it and hands the result back together with `id`;
/// results carrying an id that is no longer the latest are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Markets {
        id: RequestId,
        query: MarketQuery,
    },
    History {
        id: RequestId,
        asset_id: String,
        currency: Currency,
        days: u32,
    },
}

impl FetchRequest {
    pub fn kind(&self) -> FetchKind {
        match self {
            FetchRequest::Markets { .. } => FetchKind::Markets,
            FetchRequest::History { .. } => FetchKind::History,
        }
    }

    pub fn id(&self) -> RequestId {
        match self {
            FetchRequest::Markets { id, .. } | FetchRequest::History { id, .. } => *id,
        }
    }
}

/// A failed fetch as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub kind: FetchKind,
    pub message: String,
}

/// Monotonic request counter for one fetch kind.
#[derive(Debug, Clone, Default)]
pub(crate) struct SequenceTracker {
    latest: u64,
}

impl SequenceTracker {
    /// Issue the next id; every earlier id becomes stale.
    pub(crate) fn issue(&mut self) -> RequestId {
        self.latest += 1;
        RequestId(self.latest)
    }

    /// Make every issued id stale without issuing a new request.
    pub(crate) fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub(crate) fn is_latest(&self, id: RequestId) -> bool {
        id.0 == self.latest
    }
}
