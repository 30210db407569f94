//! Data pipeline errors: tables, zero-shot scores, embeddings, tokens.

use std::path::PathBuf;

use super::error_code::{self, KermutErrorCode};

/// Errors raised while loading and aligning a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("mutation table not found: {path}")]
    TableNotFound { path: PathBuf },

    #[error("zero-shot scores not found: {path}")]
    ZeroShotNotFound { path: PathBuf },

    #[error("embeddings not found at {path}")]
    EmbeddingsNotFound { path: PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("column '{column}' missing from {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("unknown residue '{residue}' in sequence {row} at position {position}")]
    UnknownResidue {
        residue: char,
        row: usize,
        position: usize,
    },

    #[error("sequence {row} has length {actual}, expected {expected}")]
    RaggedSequences {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("tensor '{name}' missing from {path}")]
    MissingTensor { name: String, path: PathBuf },

    #[error("corrupt embedding store {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("unsupported embedding rank {rank}: expected 2 or 3")]
    UnsupportedRank { rank: usize },

    #[error(
        "{} table mutants have no stored embedding: {}",
        .missing.len(),
        .missing.join(", ")
    )]
    MissingEmbeddings { missing: Vec<String> },

    #[error("unknown zero-shot method: {method}")]
    UnknownZeroShotMethod { method: String },

    #[error("zero-shot scores enabled but no zero-shot method configured")]
    MissingZeroShotMethod,
}

impl DataError {
    /// Wrap an `io::Error` with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl KermutErrorCode for DataError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TableNotFound { .. }
            | Self::ZeroShotNotFound { .. }
            | Self::EmbeddingsNotFound { .. } => error_code::DATA_NOT_FOUND,
            Self::Io { .. } => error_code::IO_ERROR,
            _ => error_code::DATA_ERROR,
        }
    }
}
