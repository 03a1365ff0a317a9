use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::FailureSwitch;
use crate::domain::{IndexError, Message, MessageQuery, SearchError, SearchIndex, SearchSort};

/// Term-matching stand-in for the search engine.
///
/// Bodies are split into lowercase alphanumeric terms; a document matches
/// when it shares at least one term with the query text, like a default
/// `match` query.
#[derive(Debug, Default)]
pub struct InMemorySearchIndex {
    collections: RwLock<HashMap<String, HashMap<String, Message>>>,
    failing_index: FailureSwitch,
    failing_search: FailureSwitch,
}

impl InMemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_indexing_failing(&self, failing: bool) {
        self.failing_index.set(failing);
    }

    pub fn set_search_failing(&self, failing: bool) {
        self.failing_search.set(failing);
    }

    /// Number of documents held in a collection.
    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, HashMap::len)
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn index(
        &self,
        collection: &str,
        document_id: &str,
        document: &Message,
    ) -> Result<(), IndexError> {
        if self.failing_index.is_on() {
            return Err(IndexError {
                collection: collection.to_string(),
                document_id: document_id.to_string(),
                message: "search index switched off".into(),
            });
        }

        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(document_id.to_string(), document.clone());
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: &MessageQuery,
    ) -> Result<Vec<Message>, SearchError> {
        if self.failing_search.is_on() {
            return Err(SearchError::Unavailable {
                collection: collection.to_string(),
                message: "search index switched off".into(),
            });
        }

        let wanted = terms(&query.text);
        let mut hits: Vec<Message> = self
            .collections
            .read()
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|m| m.chat_id == query.chat_id)
                    .filter(|m| !terms(&m.body).is_disjoint(&wanted))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        match query.sort {
            SearchSort::CreatedAtDesc => {
                hits.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
            }
        }
        hits.truncate(query.limit);
        Ok(hits)
    }
}
