//! Background Fan-out
//!
//! Propagates persisted entities to the search index and the event bus
//! after the request that created them has already been answered.
//!
//! ```text
//!  orchestrator --try_send--> [bounded queue] --> dispatcher --spawn--> job (timeout)
//!                                                     |                   |
//!                                              semaphore(workers)   log + metrics
//! ```
//!
//! Submission never waits: a full or closed queue drops the job. Each job
//! is attempted once under its own timeout and runs on a task detached from
//! the request, so a cancelled request does not abort it. Failures go to
//! the log and the `fanout_jobs_total` counter and nowhere else.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::domain::{
    DomainEvent, EventPublisher, EventTopics, IndexError, Message, PublishError, SearchIndex,
};
use crate::infrastructure::metrics;

/// A best-effort side effect of a successful write.
#[derive(Debug, Clone)]
pub enum SideEffect {
    /// Upsert the message into the search index
    IndexMessage(Message),
    /// Publish a created-entity fact
    Publish(DomainEvent),
}

impl SideEffect {
    /// Job name used in logs and metrics.
    pub fn job_name(&self) -> &'static str {
        match self {
            Self::IndexMessage(_) => "index_message",
            Self::Publish(DomainEvent::ChatCreated(_)) => "publish_chat_created",
            Self::Publish(DomainEvent::MessageCreated(_)) => "publish_message_created",
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum SideEffectError {
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Fan-out pool configuration.
#[derive(Debug, Clone)]
pub struct FanoutConfig {
    pub workers: usize,
    pub queue_capacity: usize,
    pub task_timeout: Duration,
    pub collection: String,
    pub topics: EventTopics,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 1024,
            task_timeout: Duration::from_secs(5),
            collection: "messages".to_string(),
            topics: EventTopics::default(),
        }
    }
}

/// Cheap, cloneable submission side of the fan-out queue.
#[derive(Debug, Clone)]
pub struct FanoutHandle {
    tx: mpsc::Sender<SideEffect>,
}

impl FanoutHandle {
    /// Queue a side effect without waiting.
    pub fn submit(&self, effect: SideEffect) {
        let job = effect.job_name();
        match self.tx.try_send(effect) {
            Ok(()) => {
                metrics::set_fanout_queue_depth(self.tx.max_capacity() - self.tx.capacity());
                debug!(job, "Side effect queued");
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                error!(job, "Fan-out queue full, dropping side effect");
                metrics::record_fanout_job(job, "dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(job, "Fan-out queue closed, dropping side effect");
                metrics::record_fanout_job(job, "dropped");
            }
        }
    }
}

/// Shared state of the jobs.
struct JobContext<S: ?Sized, P: ?Sized> {
    index: Arc<S>,
    publisher: Arc<P>,
    collection: String,
    topics: EventTopics,
    task_timeout: Duration,
}

impl<S, P> JobContext<S, P>
where
    S: SearchIndex + ?Sized,
    P: EventPublisher + ?Sized,
{
    async fn perform(&self, effect: &SideEffect) -> Result<(), SideEffectError> {
        match effect {
            SideEffect::IndexMessage(message) => {
                self.index
                    .index(&self.collection, &message.document_id(), message)
                    .await?
            }
            SideEffect::Publish(event) => {
                self.publisher
                    .publish(self.topics.topic_for(event), event)
                    .await?
            }
        }
        Ok(())
    }

    async fn run(&self, effect: SideEffect) {
        let job = effect.job_name();
        let outcome = match tokio::time::timeout(self.task_timeout, self.perform(&effect)).await {
            Ok(Ok(())) => {
                debug!(job, "Side effect completed");
                "succeeded"
            }
            Ok(Err(e)) => {
                error!(job, error = %e, "Side effect failed");
                "failed"
            }
            Err(_) => {
                error!(
                    job,
                    timeout_ms = self.task_timeout.as_millis() as u64,
                    "Side effect timed out"
                );
                "timed_out"
            }
        };
        metrics::record_fanout_job(job, outcome);
    }
}

/// Owner of the fan-out worker pool.
pub struct FanoutDispatcher {
    handle: FanoutHandle,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl FanoutDispatcher {
    /// Start the dispatcher on the current Tokio runtime.
    pub fn start<S, P>(index: Arc<S>, publisher: Arc<P>, config: FanoutConfig) -> Self
    where
        S: SearchIndex + ?Sized + 'static,
        P: EventPublisher + ?Sized + 'static,
    {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let workers = config.workers.max(1);

        let context = Arc::new(JobContext {
            index,
            publisher,
            collection: config.collection,
            topics: config.topics,
            task_timeout: config.task_timeout,
        });

        let task = tokio::spawn(dispatch(rx, shutdown_rx, context, workers));
        info!(
            workers,
            queue_capacity = config.queue_capacity,
            "Fan-out dispatcher started"
        );

        Self {
            handle: FanoutHandle { tx },
            shutdown_tx,
            task,
        }
    }

    /// A submission handle for orchestrators.
    pub fn handle(&self) -> FanoutHandle {
        self.handle.clone()
    }

    /// Stop accepting jobs and wait for accepted ones to finish.
    ///
    /// Returns `false` if the grace period ran out first; remaining jobs are
    /// then abandoned.
    pub async fn shutdown(self, grace: Duration) -> bool {
        let _ = self.shutdown_tx.send(());
        match tokio::time::timeout(grace, self.task).await {
            Ok(Ok(())) => {
                info!("Fan-out dispatcher drained");
                true
            }
            Ok(Err(e)) => {
                error!(error = %e, "Fan-out dispatcher task failed");
                false
            }
            Err(_) => {
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    "Fan-out drain timed out, abandoning remaining side effects"
                );
                false
            }
        }
    }
}

async fn dispatch<S, P>(
    mut rx: mpsc::Receiver<SideEffect>,
    mut shutdown_rx: oneshot::Receiver<()>,
    context: Arc<JobContext<S, P>>,
    workers: usize,
) where
    S: SearchIndex + ?Sized + 'static,
    P: EventPublisher + ?Sized + 'static,
{
    let permits = Arc::new(Semaphore::new(workers));
    let mut jobs = JoinSet::new();
    let mut closing = false;

    loop {
        tokio::select! {
            _ = &mut shutdown_rx, if !closing => {
                // Buffered jobs are still delivered after close.
                closing = true;
                rx.close();
            }
            next = rx.recv() => {
                let Some(effect) = next else { break };
                metrics::set_fanout_queue_depth(rx.len());

                let Ok(permit) = permits.clone().acquire_owned().await else { break };
                let context = context.clone();
                jobs.spawn(async move {
                    context.run(effect).await;
                    drop(permit);
                });
            }
            Some(_) = jobs.join_next(), if !jobs.is_empty() => {}
        }
    }

    while jobs.join_next().await.is_some() {}
}
