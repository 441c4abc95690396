use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::models::{AggregateStats, ReviewBatch};
use crate::source::{placeholder_batch, SourceDecision};

/// Issues cancellation tokens, one per resolution cycle. Beginning a new
/// cycle invalidates every token handed out before it; a completed fetch
/// whose token went stale must not touch widget state.
#[derive(Debug, Default)]
pub struct CycleRegistry {
    current: Arc<AtomicU64>,
}

impl CycleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cycle, superseding any in-flight one.
    pub fn begin(&self) -> CycleToken {
        let id = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        CycleToken {
            id,
            current: Arc::clone(&self.current),
        }
    }

    /// Invalidate the current cycle without starting a new one (teardown).
    pub fn cancel(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}

/// Token tied to one fetch cycle; valid until the registry moves on.
#[derive(Debug, Clone)]
pub struct CycleToken {
    id: u64,
    current: Arc<AtomicU64>,
}

impl CycleToken {
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.id
    }
}

/// Everything one successful fetch cycle produced.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub batch: ReviewBatch,
    pub stats: Option<AggregateStats>,
}

/// Run the network side of one fetch cycle.
///
/// `Placeholder` resolves immediately with the sample batch and never
/// touches the network. `ByInstance` follows the primary read with a
/// best-effort stats read whose failure is swallowed; the primary batch is
/// still valid without the overlay. The token is re-checked around every
/// suspension point so a superseded cycle stops doing work early, though
/// the authoritative staleness check happens again at apply time.
pub async fn run(
    client: &ApiClient,
    decision: &SourceDecision,
    token: &CycleToken,
) -> Result<FetchOutcome, FetchError> {
    if !token.is_current() {
        return Err(FetchError::Cancelled);
    }

    match decision {
        SourceDecision::Placeholder => Ok(FetchOutcome {
            batch: placeholder_batch(),
            stats: None,
        }),
        SourceDecision::ByPublicKey(key) => {
            let batch = client.public_reviews(key).await?;
            if !token.is_current() {
                return Err(FetchError::Cancelled);
            }
            Ok(FetchOutcome { batch, stats: None })
        }
        SourceDecision::ByInstance(id) => {
            let batch = client.instance_reviews(id).await?;
            if !token.is_current() {
                return Err(FetchError::Cancelled);
            }

            let stats = match client.instance_stats(id).await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    debug!(error = %e, "Stats fetch failed, continuing without overlay");
                    None
                }
            };

            if !token.is_current() {
                return Err(FetchError::Cancelled);
            }
            Ok(FetchOutcome { batch, stats })
        }
    }
}
