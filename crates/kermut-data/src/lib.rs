//! # kermut-data
//!
//! Dataset loading for Kermut. Reads a per-dataset mutation table and,
//! depending on configuration, tokenizes its sequences, merges zero-shot
//! scores and loads precomputed embeddings, all reindexed to the table's
//! row order.

pub mod embeddings;
pub mod preprocess;
pub mod retry;
pub mod table;
pub mod tokenizer;
pub mod zero_shot;

pub use embeddings::{align_to_table, mean_pool, read_embeddings, write_embeddings, RawEmbeddings};
pub use preprocess::{preprocess_data, PreprocessedData, Preprocessor};
pub use retry::{retry_io, RetryPolicy, Sleeper, ThreadSleeper};
pub use table::MutationTable;
pub use tokenizer::{AminoAcidTokenizer, Tokenizer};
