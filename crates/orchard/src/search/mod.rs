//! Query resolution over the record store and the embedding index

#[cfg(feature = "ml-features")]
pub mod embedder;
pub mod index;
#[cfg(feature = "ml-features")]
pub mod lancedb;
pub mod resolver;

pub use index::{EmbeddingEntry, EmbeddingIndex, NeighborMatch};
pub use resolver::{QueryResolver, QueryResult, Strategy};
