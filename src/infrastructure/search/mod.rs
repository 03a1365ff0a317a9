//! Search Module
//!
//! Full-text message search backed by Elasticsearch over its REST API.

mod elasticsearch;

pub use elasticsearch::{build_query_body, ElasticsearchIndex};
