//! Precomputed sequence embeddings: on-disk store, mean pooling, and
//! alignment to the mutation table.

mod align;
mod pooling;
mod store;

pub use align::align_to_table;
pub use pooling::mean_pool;
pub use store::{decode_embeddings, read_embeddings, write_embeddings, RawEmbeddings};
