//! Dataset preprocessing: one call produces the table and every optional
//! input aligned to it.

use std::path::PathBuf;

use kermut_core::config::KermutConfig;
use kermut_core::constants::{EMBEDDING_EXTENSION, TABLE_EXTENSION};
use kermut_core::errors::{DataError, DataResult};
use ndarray::{Array1, Array2};
use tracing::{debug, info, info_span};

use crate::embeddings::{align_to_table, mean_pool, read_embeddings};
use crate::retry::{RetryPolicy, Sleeper, ThreadSleeper};
use crate::table::MutationTable;
use crate::tokenizer::{AminoAcidTokenizer, Tokenizer};
use crate::zero_shot::load_zero_shot;

/// Everything a model needs from one dataset, aligned to `table` row order.
#[derive(Debug, Clone)]
pub struct PreprocessedData {
    pub table: MutationTable,
    /// `None` unless the sequence kernel is enabled.
    pub tokens: Option<Array2<usize>>,
    /// `None` unless the sequence kernel is enabled.
    pub embeddings: Option<Array2<f32>>,
    /// `None` unless zero-shot scores are enabled. Unmatched rows are NaN.
    pub zero_shot: Option<Array1<f32>>,
}

/// Loads datasets according to a configuration.
///
/// The tokenizer and the retry sleeper are injectable; `new` uses the
/// amino-acid tokenizer and the real clock.
pub struct Preprocessor<'a> {
    config: &'a KermutConfig,
    tokenizer: Box<dyn Tokenizer + 'a>,
    sleeper: Box<dyn Sleeper + 'a>,
}

impl<'a> Preprocessor<'a> {
    pub fn new(config: &'a KermutConfig) -> Self {
        Self {
            config,
            tokenizer: Box::new(AminoAcidTokenizer::new()),
            sleeper: Box::new(ThreadSleeper),
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'a) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'a) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Mutation table of a dataset.
    pub fn table_path(&self, dms_id: &str) -> PathBuf {
        self.config
            .data
            .dms_input_folder
            .join(format!("{dms_id}.{TABLE_EXTENSION}"))
    }

    /// Zero-shot score table of a dataset for the configured method.
    pub fn zero_shot_path(&self, dms_id: &str) -> DataResult<PathBuf> {
        let method = self.zero_shot_method()?;
        Ok(self
            .config
            .data
            .zero_shot
            .join(method)
            .join(format!("{dms_id}.{TABLE_EXTENSION}")))
    }

    /// Embedding store of a dataset; the directory depends on the split.
    pub fn embedding_path(&self, dms_id: &str) -> PathBuf {
        let data = &self.config.data;
        let dir = if self.config.split.uses_multiples() {
            &data.embeddings_multiples
        } else {
            &data.embeddings_singles
        };
        dir.join(format!("{dms_id}.{EMBEDDING_EXTENSION}"))
    }

    /// Load one dataset.
    pub fn load(&self, dms_id: &str) -> DataResult<PreprocessedData> {
        let _span = info_span!("preprocess", dms_id).entered();

        let table = MutationTable::from_path(&self.table_path(dms_id))?;
        let tokens = self.tokenize(&table)?;
        let zero_shot = self.zero_shot(&table, dms_id)?;
        let embeddings = self.embeddings(&table, dms_id)?;

        info!(
            rows = table.len(),
            tokens = ?tokens.as_ref().map(|t| t.dim()),
            embeddings = ?embeddings.as_ref().map(|e| e.dim()),
            zero_shot = zero_shot.is_some(),
            "dataset preprocessed"
        );
        Ok(PreprocessedData {
            table,
            tokens,
            embeddings,
            zero_shot,
        })
    }

    fn tokenize(&self, table: &MutationTable) -> DataResult<Option<Array2<usize>>> {
        if !self.config.kernel.use_sequence_kernel {
            return Ok(None);
        }
        let sequences = table.column(&self.config.sequence_col)?;
        self.tokenizer.tokenize(&sequences).map(Some)
    }

    fn zero_shot(&self, table: &MutationTable, dms_id: &str) -> DataResult<Option<Array1<f32>>> {
        if !self.config.kernel.use_zero_shot {
            return Ok(None);
        }
        let column = self.zero_shot_column()?;
        let path = self.zero_shot_path(dms_id)?;
        load_zero_shot(table, &path, column).map(Some)
    }

    fn embeddings(&self, table: &MutationTable, dms_id: &str) -> DataResult<Option<Array2<f32>>> {
        if !self.config.kernel.use_sequence_kernel {
            return Ok(None);
        }
        let path = self.embedding_path(dms_id);
        if !path.exists() {
            return Err(DataError::EmbeddingsNotFound { path });
        }
        debug!(path = %path.display(), "loading embeddings");

        let policy = RetryPolicy::from_config(&self.config.data);
        let raw = read_embeddings(&path, &policy, self.sleeper.as_ref())?;
        let pooled = mean_pool(raw.embeddings)?;
        let aligned = align_to_table(&raw.mutants, &pooled, &table.mutants())?;
        Ok(Some(aligned))
    }

    fn zero_shot_method(&self) -> DataResult<&str> {
        self.config
            .kernel
            .zero_shot_method
            .as_deref()
            .ok_or(DataError::MissingZeroShotMethod)
    }

    fn zero_shot_column(&self) -> DataResult<&'static str> {
        let method = self.zero_shot_method()?;
        self.config
            .kernel
            .zero_shot_column()
            .ok_or_else(|| DataError::UnknownZeroShotMethod {
                method: method.to_string(),
            })
    }
}

/// Load one dataset with the default tokenizer and real-clock retries.
pub fn preprocess_data(config: &KermutConfig, dms_id: &str) -> DataResult<PreprocessedData> {
    Preprocessor::new(config).load(dms_id)
}
