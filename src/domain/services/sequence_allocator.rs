//! Sequence allocation contract.

use async_trait::async_trait;

use crate::domain::errors::AllocationError;
use crate::domain::value_objects::ScopeKey;

/// Issues numbers that are unique per scope.
///
/// Implementations must back each scope with a durable counter and advance
/// it with one atomic increment-and-read. An unseen scope starts at 0, so
/// the first call returns 1. Concurrent callers of the same scope always
/// receive distinct values, in no particular relative order.
///
/// There is no way to give a number back: a caller that fails after
/// allocating leaves a permanent gap.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SequenceAllocator: Send + Sync {
    async fn next(&self, scope: &ScopeKey) -> Result<i64, AllocationError>;
}
