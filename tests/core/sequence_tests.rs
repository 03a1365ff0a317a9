//! Sequence allocator properties under concurrency

use std::sync::Arc;

use chat_service::domain::{ScopeKey, SequenceAllocator};
use chat_service::infrastructure::memory::InMemorySequenceAllocator;
use proptest::prelude::*;
use tokio::task::JoinSet;

async fn allocate_concurrently(
    allocator: Arc<InMemorySequenceAllocator>,
    scope: ScopeKey,
    calls: usize,
) -> Vec<i64> {
    let mut tasks = JoinSet::new();
    for _ in 0..calls {
        let allocator = allocator.clone();
        let scope = scope.clone();
        tasks.spawn(async move { allocator.next(&scope).await });
    }

    let mut numbers = Vec::with_capacity(calls);
    while let Some(result) = tasks.join_next().await {
        numbers.push(result.unwrap().unwrap());
    }
    numbers
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn concurrent_calls_return_exactly_one_to_n(calls in 1usize..200, threads in 1usize..8) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(threads)
            .build()
            .unwrap();
        let allocator = Arc::new(InMemorySequenceAllocator::new());

        let mut numbers = runtime.block_on(allocate_concurrently(
            allocator,
            ScopeKey::chats("prop-app"),
            calls,
        ));
        numbers.sort_unstable();

        prop_assert_eq!(numbers, (1..=calls as i64).collect::<Vec<_>>());
    }

    #[test]
    fn interleaved_scopes_do_not_share_numbers(chats in 1usize..50, messages in 1usize..50) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .build()
            .unwrap();
        let allocator = Arc::new(InMemorySequenceAllocator::new());

        let (mut a, mut b) = runtime.block_on(async {
            tokio::join!(
                allocate_concurrently(allocator.clone(), ScopeKey::chats("shared"), chats),
                allocate_concurrently(allocator.clone(), ScopeKey::messages(1), messages),
            )
        });
        a.sort_unstable();
        b.sort_unstable();

        prop_assert_eq!(a, (1..=chats as i64).collect::<Vec<_>>());
        prop_assert_eq!(b, (1..=messages as i64).collect::<Vec<_>>());
    }
}
