//! Application Startup
//!
//! Wires collaborators, services and the fan-out pool once, then serves
//! HTTP until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::application::fanout::{FanoutConfig, FanoutDispatcher};
use crate::application::services::{
    ChatService, ChatServiceImpl, MessageService, MessageServiceImpl, SearchOptions,
};
use crate::config::{Backend, CorsSettings, Settings};
use crate::domain::{
    ChatRepository, EventPublisher, MessageRepository, SearchIndex, SequenceAllocator,
};
use crate::infrastructure::health::{DependencyProbe, PostgresProbe, RedisProbe, SearchProbe};
use crate::infrastructure::memory::{
    InMemoryChatRepository, InMemoryEventPublisher, InMemoryMessageRepository,
    InMemorySearchIndex, InMemorySequenceAllocator,
};
use crate::infrastructure::redis::{
    create_redis_client, RedisSequenceAllocator, RedisStreamPublisher,
};
use crate::infrastructure::repositories::{PgChatRepository, PgMessageRepository};
use crate::infrastructure::search::ElasticsearchIndex;
use crate::infrastructure::database;
use crate::presentation::http::create_router;
use crate::presentation::http::handlers::health::init_server_start;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<dyn ChatService>,
    pub message_service: Arc<dyn MessageService>,
    pub probes: Arc<Vec<Arc<dyn DependencyProbe>>>,
    pub cors: CorsSettings,
}

/// The collaborators the orchestrators run on.
pub struct Collaborators {
    pub allocator: Arc<dyn SequenceAllocator>,
    pub chats: Arc<dyn ChatRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub search_index: Arc<dyn SearchIndex>,
    pub publisher: Arc<dyn EventPublisher>,
    pub probes: Vec<Arc<dyn DependencyProbe>>,
}

impl Collaborators {
    /// Connect to PostgreSQL, Redis and Elasticsearch.
    pub async fn external(settings: &Settings) -> Result<Self> {
        let pool = database::create_pool(&settings.database)
            .await
            .context("failed to connect to PostgreSQL")?;
        info!("Database connection pool created");
        if settings.database.run_migrations {
            database::run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
        }

        let redis = create_redis_client(&settings.redis)
            .await
            .context("failed to connect to Redis")?;
        let allocator = match &settings.redis.key_prefix {
            Some(prefix) => RedisSequenceAllocator::with_prefix(redis.clone(), prefix.as_str()),
            None => RedisSequenceAllocator::new(redis.clone()),
        };
        let publisher = RedisStreamPublisher::new(redis.clone(), settings.events.stream_max_len);

        let search = ElasticsearchIndex::connect(&settings.search)
            .await
            .context("failed to connect to Elasticsearch")?;
        if let Err(e) = search.ensure_collection(&settings.search.collection).await {
            warn!(error = %e, "Could not ensure search collection, relying on dynamic mapping");
        }

        Ok(Self {
            allocator: Arc::new(allocator),
            chats: Arc::new(PgChatRepository::new(pool.clone())),
            messages: Arc::new(PgMessageRepository::new(pool.clone())),
            search_index: Arc::new(search.clone()),
            publisher: Arc::new(publisher),
            probes: vec![
                Arc::new(PostgresProbe::new(pool)),
                Arc::new(RedisProbe::new(redis)),
                Arc::new(SearchProbe::new(search)),
            ],
        })
    }
}

/// Process-local backends, kept by the caller for inspection.
#[derive(Default, Clone)]
pub struct InMemoryBackends {
    pub allocator: Arc<InMemorySequenceAllocator>,
    pub chats: Arc<InMemoryChatRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub search_index: Arc<InMemorySearchIndex>,
    pub publisher: Arc<InMemoryEventPublisher>,
}

impl InMemoryBackends {
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            allocator: self.allocator.clone(),
            chats: self.chats.clone(),
            messages: self.messages.clone(),
            search_index: self.search_index.clone(),
            publisher: self.publisher.clone(),
            probes: Vec::new(),
        }
    }
}

/// Start the fan-out pool and build the services over `collaborators`.
pub fn build_state(collaborators: Collaborators, settings: &Settings) -> (AppState, FanoutDispatcher) {
    let fanout = FanoutDispatcher::start(
        collaborators.search_index.clone(),
        collaborators.publisher.clone(),
        FanoutConfig {
            workers: settings.fanout.workers,
            queue_capacity: settings.fanout.queue_capacity,
            task_timeout: settings.fanout.task_timeout(),
            collection: settings.search.collection.clone(),
            topics: settings.events.topics(),
        },
    );

    let chat_service = ChatServiceImpl::new(
        collaborators.chats.clone(),
        collaborators.allocator.clone(),
        fanout.handle(),
    );
    let message_service = MessageServiceImpl::new(
        collaborators.chats,
        collaborators.messages,
        collaborators.allocator,
        collaborators.search_index,
        fanout.handle(),
        SearchOptions {
            collection: settings.search.collection.clone(),
            max_results: settings.search.max_results,
        },
    );

    let state = AppState {
        chat_service: Arc::new(chat_service),
        message_service: Arc::new(message_service),
        probes: Arc::new(collaborators.probes),
        cors: settings.cors.clone(),
    };
    (state, fanout)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
    fanout: FanoutDispatcher,
    shutdown_timeout: Duration,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        init_server_start();

        let collaborators = match settings.backend {
            Backend::External => Collaborators::external(&settings).await?,
            Backend::Memory => {
                warn!("Using in-memory backends, nothing will be persisted");
                InMemoryBackends::default().collaborators()
            }
        };
        let (state, fanout) = build_state(collaborators, &settings);
        let router = create_router(state);

        let addr = settings.server_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        info!("Listening on {}", addr);

        Ok(Self {
            listener,
            router,
            fanout,
            shutdown_timeout: Duration::from_secs(settings.server.shutdown_timeout_secs),
        })
    }

    /// Serve until Ctrl-C or SIGTERM, then drain queued side effects.
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped, draining side effects");
        self.fanout.shutdown(self.shutdown_timeout).await;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
