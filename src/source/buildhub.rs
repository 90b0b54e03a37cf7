//! Buildhub search source.
//!
//! Posts a fixed aggregation query to `<source>/api/search` and turns the
//! per-product terms buckets into a [`Snapshot`](super::Snapshot).

use reqwest::{Client, Url};
use serde_json::{json, Value};
use tracing::debug;

use super::{DataSource, FetchResponse};
use crate::error::FetchError;

/// Terms aggregation on `source.product` (top 50) plus a cardinality count.
pub fn search_query() -> Value {
    json!({
        "aggs": {
            "products": {
                "filter": { "match_all": {} },
                "aggs": {
                    "source.product": {
                        "terms": { "field": "source.product", "size": 50 }
                    },
                    "source.product_count": {
                        "cardinality": { "field": "source.product" }
                    }
                }
            }
        },
        "size": 0,
        "sort": [{ "download.date": "desc" }],
        "highlight": {
            "fields": {
                "source.product": {},
                "target.channel": {},
                "target.version": {},
                "target.locale": {},
                "target.platform": {},
                "build.id": {}
            }
        }
    })
}

pub struct BuildhubSource {
    /// Full search endpoint, e.g. `https://buildhub2.stage.mozaws.net/api/search`.
    pub endpoint: Url,
    client: Client,
}

impl BuildhubSource {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            client: Client::new(),
        }
    }
}

impl DataSource for BuildhubSource {
    fn name(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn fetch(&self) -> Result<FetchResponse, FetchError> {
        debug!(event = "source.buildhub.fetch_started", url = %self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&search_query())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Server {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Payload(e.to_string()))?;
        FetchResponse::from_body(body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
