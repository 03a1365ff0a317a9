use async_trait::async_trait;
use dashmap::DashMap;

use super::FailureSwitch;
use crate::domain::{AllocationError, ScopeKey, SequenceAllocator};
use crate::infrastructure::metrics;

/// Counters held in a sharded map. The shard lock makes each
/// increment-and-read atomic per scope.
#[derive(Debug, Default)]
pub struct InMemorySequenceAllocator {
    counters: DashMap<String, i64>,
    failing: FailureSwitch,
}

impl InMemorySequenceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `next` call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.failing.set(unavailable);
    }

    /// Last number handed out for a scope, 0 if none.
    pub fn current(&self, scope: &ScopeKey) -> i64 {
        self.counters.get(scope.as_str()).map(|v| *v).unwrap_or(0)
    }
}

#[async_trait]
impl SequenceAllocator for InMemorySequenceAllocator {
    async fn next(&self, scope: &ScopeKey) -> Result<i64, AllocationError> {
        if self.failing.is_on() {
            metrics::record_allocation(scope.kind().as_str(), "unavailable");
            return Err(AllocationError::Unavailable {
                scope: scope.to_string(),
                message: "sequence store switched off".into(),
            });
        }

        let mut counter = self.counters.entry(scope.as_str().to_string()).or_insert(0);
        *counter += 1;
        metrics::record_allocation(scope.kind().as_str(), "allocated");
        Ok(*counter)
    }
}
