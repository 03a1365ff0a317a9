//! Classified collaborator errors.
//!
//! Every infrastructure adapter converts its raw client failure (sqlx,
//! redis, reqwest) into one of these kinds before returning, so nothing
//! above the domain contracts ever sees a transport-level error type.

/// Failure of the sequence counter store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AllocationError {
    #[error("sequence store unavailable for scope {scope}: {message}")]
    Unavailable { scope: String, message: String },
}

/// Failure of the relational entity store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// An insert did not persist.
    #[error("failed to write {entity}: {message}")]
    Write { entity: &'static str, message: String },

    /// A read could not be served (store unreachable, bad row).
    #[error("lookup {operation} failed: {message}")]
    Lookup {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn write(entity: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Write {
            entity,
            message: err.to_string(),
        }
    }

    pub fn lookup(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Lookup {
            operation,
            message: err.to_string(),
        }
    }
}

/// Failure to upsert a document into the search index.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to index document {document_id} into {collection}: {message}")]
pub struct IndexError {
    pub collection: String,
    pub document_id: String,
    pub message: String,
}

/// Failure to execute a search query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    #[error("search engine unavailable for {collection}: {message}")]
    Unavailable { collection: String, message: String },

    #[error("search on {collection} rejected with status {status}: {message}")]
    Rejected {
        collection: String,
        status: u16,
        message: String,
    },

    #[error("malformed search response from {collection}: {message}")]
    Malformed { collection: String, message: String },
}

/// Failure to hand an event to the broker.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PublishError {
    #[error("event bus unavailable for topic {topic}: {message}")]
    Unavailable { topic: String, message: String },

    #[error("event bus rejected payload for topic {topic}: {message}")]
    Rejected { topic: String, message: String },
}
