//! Shared constants: zero-shot method lookup, file layout, defaults.

/// Zero-shot method name → score column in the per-method CSV files.
pub const ZERO_SHOT_NAME_TO_COL: &[(&str, &str)] = &[
    ("ProteinMPNN", "pmpnn_ll"),
    ("ESM_IF1", "esmif1_ll"),
    ("ESM2", "esm2_t33_650M_UR50D"),
    ("EVE", "evol_indices_ensemble"),
    ("TranceptEVE", "avg_score"),
    ("GEMME", "GEMME_score"),
    ("VESPA", "VESPA"),
];

/// Look up the score column for a zero-shot method.
pub fn zero_shot_column(method: &str) -> Option<&'static str> {
    ZERO_SHOT_NAME_TO_COL
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, col)| *col)
}

/// Column holding the mutant identifier in every CSV input.
pub const MUTANT_COL: &str = "mutant";

/// Extension of the per-dataset mutation and zero-shot tables.
pub const TABLE_EXTENSION: &str = "csv";

/// Extension of the per-dataset embedding store.
pub const EMBEDDING_EXTENSION: &str = "safetensors";

/// Named array holding the embedding vectors.
pub const EMBEDDINGS_TENSOR: &str = "embeddings";

/// Named array holding the NUL-padded mutant identifiers.
pub const MUTANTS_TENSOR: &str = "mutants";

// --- Defaults ---
pub const DEFAULT_SEQUENCE_COL: &str = "mutated_sequence";
pub const DEFAULT_READ_ATTEMPTS: u32 = 10;
pub const DEFAULT_READ_RETRY_DELAY_SECS: u64 = 10;
pub const DEFAULT_LOG_FILTER: &str = "kermut=info";
