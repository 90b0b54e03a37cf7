//! The aggregate snapshot shared by every part of the dashboard.
//!
//! A [`Snapshot`] is the ordered list of per-product build counts taken from
//! one aggregation response.  Two snapshots are equal when they list the same
//! products with the same counts in the same order, which is all the history
//! tracker needs to decide whether anything moved.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

/// Build count for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCount {
    pub name: String,
    pub count: u64,
}

impl ProductCount {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Ordered (product, count) pairs, in the order the server ranked them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot(pub Vec<ProductCount>);

// ---------------------------------------------------------------------------
// Wire shape of `aggregations.products["source.product"].buckets`
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SearchBody {
    aggregations: Aggregations,
}

#[derive(Deserialize)]
struct Aggregations {
    products: ProductsAgg,
}

#[derive(Deserialize)]
struct ProductsAgg {
    #[serde(rename = "source.product")]
    source_product: Terms,
}

#[derive(Deserialize)]
struct Terms {
    buckets: Vec<Bucket>,
}

#[derive(Deserialize)]
struct Bucket {
    key: String,
    doc_count: u64,
}

impl Snapshot {
    /// Extract the snapshot from a full search response body.
    pub fn from_response(body: &Value) -> Result<Self, FetchError> {
        let body = SearchBody::deserialize(body)
            .map_err(|e| FetchError::Payload(format!("unexpected search response: {e}")))?;

        Ok(Self(
            body.aggregations
                .products
                .source_product
                .buckets
                .into_iter()
                .map(|bucket| ProductCount::new(bucket.key, bucket.doc_count))
                .collect(),
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductCount> {
        self.0.iter()
    }
}

impl FromIterator<ProductCount> for Snapshot {
    fn from_iter<I: IntoIterator<Item = ProductCount>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
