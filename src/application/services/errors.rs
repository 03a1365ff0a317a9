//! Failure causes shared by the creation flows.

use crate::domain::{AllocationError, StoreError};

/// Why a chat or message could not be created.
///
/// An `AllocationUnavailable` failure consumed no number. A `WriteFailure`
/// leaves the allocated number as a permanent gap; it is never retried.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CreationFailure {
    #[error(transparent)]
    AllocationUnavailable(AllocationError),

    #[error(transparent)]
    WriteFailure(StoreError),
}
