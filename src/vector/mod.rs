//! Vector store capability.
//!
//! | Operation | Endpoint | Consistency |
//! |-----------|----------|-------------|
//! | [`VectorStore::create_index`] | `POST /v1/indexes` | fixed settle delay |
//! | [`VectorStore::list_indexes`] | `GET /v1/indexes` | - |
//! | [`VectorStore::get_index`] | `GET /v1/indexes/{name}` | - |
//! | [`VectorStore::delete_index`] | `DELETE /v1/indexes/{name}` | - |
//! | [`VectorStore::add_vectors`] | `POST /v1/indexes/{name}/vectors` | polls vector count |
//! | [`VectorStore::delete_vectors`] | `DELETE /v1/indexes/{name}/vectors` | - |
//! | [`VectorStore::search_vector`] | `POST /v1/indexes/{name}/search` | retries empty results |

mod client;
pub mod consistency;
mod types;

pub use client::VectorStore;
pub use consistency::{Convergence, RetryBudget};
pub use types::{
    AddVectorsResult, ConsistencyOptions, Metric, SearchMatch, Vector, VectorId, VectorIndex,
    VectorOptions, DEFAULT_TOP_K,
};
