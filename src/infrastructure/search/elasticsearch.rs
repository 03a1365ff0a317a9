//! Elasticsearch adapter for the `SearchIndex` contract.
//!
//! Documents are the serialized `Message`, stored under the message id, so
//! re-indexing the same message overwrites instead of duplicating.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use crate::config::SearchSettings;
use crate::domain::{IndexError, Message, MessageQuery, SearchError, SearchIndex, SearchSort};

/// Server-side search timeout sent with every query.
const SEARCH_TIMEOUT: &str = "30s";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Message,
}

/// HTTP client for one Elasticsearch cluster.
#[derive(Debug, Clone)]
pub struct ElasticsearchIndex {
    client: reqwest::Client,
    base_url: String,
    refresh_on_index: bool,
}

impl ElasticsearchIndex {
    /// Build a client without contacting the cluster.
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
        refresh_on_index: bool,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            refresh_on_index,
        })
    }

    /// Build a client and wait until the cluster answers.
    ///
    /// A freshly started cluster can take a while to come up, so the ping is
    /// retried `connect_retries` times with a linearly growing delay.
    #[instrument(skip(settings), fields(url = %settings.url))]
    pub async fn connect(settings: &SearchSettings) -> Result<Self, SearchError> {
        let index = Self::new(
            settings.url.as_str(),
            Duration::from_secs(settings.request_timeout_secs),
            settings.refresh_on_index,
        )
        .map_err(|e| SearchError::Unavailable {
            collection: settings.collection.clone(),
            message: format!("failed to build HTTP client: {e}"),
        })?;

        let attempts = settings.connect_retries.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match index.ping().await {
                Ok(()) => {
                    info!(attempt, "Connected to Elasticsearch");
                    return Ok(index);
                }
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "Elasticsearch not reachable yet");
                    last_error = Some(e);
                    if attempt < attempts {
                        let delay = Duration::from_secs(settings.retry_delay_secs * attempt as u64);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SearchError::Unavailable {
            collection: settings.collection.clone(),
            message: "no connection attempt was made".into(),
        }))
    }

    /// Check that the cluster answers its info endpoint.
    pub async fn ping(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| unavailable("", e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SearchError::Rejected {
                collection: String::new(),
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }

    /// Create the collection with an explicit mapping if it does not exist.
    #[instrument(skip(self))]
    pub async fn ensure_collection(&self, collection: &str) -> Result<(), SearchError> {
        let mapping = json!({
            "mappings": {
                "properties": {
                    "id": { "type": "long" },
                    "chat_id": { "type": "long" },
                    "number": { "type": "long" },
                    "body": { "type": "text" },
                    "created_at": { "type": "date" }
                }
            }
        });

        let response = self
            .client
            .put(format!("{}/{}", self.base_url, collection))
            .json(&mapping)
            .send()
            .await
            .map_err(|e| unavailable(collection, e))?;

        let status = response.status();
        if status.is_success() {
            info!(collection, "Search collection created");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 400 && body.contains("resource_already_exists_exception") {
            debug!(collection, "Search collection already exists");
            return Ok(());
        }

        Err(SearchError::Rejected {
            collection: collection.to_string(),
            status: status.as_u16(),
            message: body,
        })
    }
}

fn unavailable(collection: &str, err: reqwest::Error) -> SearchError {
    SearchError::Unavailable {
        collection: collection.to_string(),
        message: err.to_string(),
    }
}

/// Query DSL for a message query: body match AND chat filter.
pub fn build_query_body(query: &MessageQuery) -> Value {
    let sort = match query.sort {
        SearchSort::CreatedAtDesc => json!([{ "created_at": { "order": "desc" } }]),
    };

    json!({
        "size": query.limit,
        "timeout": SEARCH_TIMEOUT,
        "query": {
            "bool": {
                "must": [
                    { "match": { "body": query.text } },
                    { "term": { "chat_id": query.chat_id } }
                ]
            }
        },
        "sort": sort
    })
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    #[instrument(skip(self, document), fields(collection = %collection, document_id = %document_id))]
    async fn index(
        &self,
        collection: &str,
        document_id: &str,
        document: &Message,
    ) -> Result<(), IndexError> {
        let index_error = |message: String| IndexError {
            collection: collection.to_string(),
            document_id: document_id.to_string(),
            message,
        };

        let mut request = self
            .client
            .put(format!("{}/{}/_doc/{}", self.base_url, collection, document_id))
            .json(document);
        if self.refresh_on_index {
            request = request.query(&[("refresh", "true")]);
        }

        let response = request.send().await.map_err(|e| index_error(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(index_error(format!("status {}: {}", status.as_u16(), body)));
        }

        debug!("Document indexed");
        Ok(())
    }

    #[instrument(skip(self, query), fields(collection = %collection, chat_id = query.chat_id))]
    async fn search(
        &self,
        collection: &str,
        query: &MessageQuery,
    ) -> Result<Vec<Message>, SearchError> {
        let response = self
            .client
            .post(format!("{}/{}/_search", self.base_url, collection))
            .json(&build_query_body(query))
            .send()
            .await
            .map_err(|e| unavailable(collection, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Rejected {
                collection: collection.to_string(),
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| SearchError::Malformed {
            collection: collection.to_string(),
            message: e.to_string(),
        })?;

        let hits: Vec<Message> = parsed.hits.hits.into_iter().map(|hit| hit.source).collect();
        debug!(hits = hits.len(), "Search completed");
        Ok(hits)
    }
}
