//! In-Memory Backends
//!
//! Process-local implementations of every collaborator, selected with
//! `backend = "memory"`. Nothing survives a restart. Each one can be told
//! to fail, which lets the HTTP tests exercise degraded collaborators.

mod events;
mod search;
mod sequence;
mod store;

pub use events::InMemoryEventPublisher;
pub use search::InMemorySearchIndex;
pub use sequence::InMemorySequenceAllocator;
pub use store::{InMemoryChatRepository, InMemoryMessageRepository};

use std::sync::atomic::{AtomicBool, Ordering};

/// Failure switch shared by the in-memory backends.
#[derive(Debug, Default)]
pub(crate) struct FailureSwitch(AtomicBool);

impl FailureSwitch {
    pub(crate) fn set(&self, failing: bool) {
        self.0.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn is_on(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
