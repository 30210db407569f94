use serde::{Deserialize, Serialize};

/// Cross-validation split scheme of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    #[serde(rename = "fold_random_5")]
    FoldRandom5,
    #[serde(rename = "fold_modulo_5")]
    FoldModulo5,
    #[serde(rename = "fold_contiguous_5")]
    FoldContiguous5,
    FoldRandMultiples,
    Domain,
}

impl Split {
    /// Multi-mutant and domain splits read their embeddings from the
    /// `embeddings_multiples` directory; every other split uses singles.
    pub fn uses_multiples(self) -> bool {
        matches!(self, Self::FoldRandMultiples | Self::Domain)
    }
}
