//! Sequence tokenization.

use kermut_core::errors::{DataError, DataResult};
use ndarray::Array2;

/// The 20 canonical amino acids, in token order.
pub const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// Maps sequence strings to integer token arrays.
pub trait Tokenizer: Send + Sync {
    /// Tokenize equal-length sequences into an (n, length) array,
    /// preserving input order.
    fn tokenize(&self, sequences: &[&str]) -> DataResult<Array2<usize>>;

    /// Number of distinct tokens.
    fn vocab_size(&self) -> usize;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, sequences: &[&str]) -> DataResult<Array2<usize>> {
        (**self).tokenize(sequences)
    }

    fn vocab_size(&self) -> usize {
        (**self).vocab_size()
    }
}

/// One token per canonical residue.
#[derive(Debug, Clone)]
pub struct AminoAcidTokenizer {
    lookup: [Option<usize>; 128],
}

impl Default for AminoAcidTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl AminoAcidTokenizer {
    pub fn new() -> Self {
        let mut lookup = [None; 128];
        for (token, residue) in AMINO_ACIDS.bytes().enumerate() {
            lookup[residue as usize] = Some(token);
        }
        Self { lookup }
    }

    fn token(&self, residue: char) -> Option<usize> {
        if residue.is_ascii() {
            self.lookup[residue as usize]
        } else {
            None
        }
    }
}

impl Tokenizer for AminoAcidTokenizer {
    fn tokenize(&self, sequences: &[&str]) -> DataResult<Array2<usize>> {
        let Some(first) = sequences.first() else {
            return Ok(Array2::zeros((0, 0)));
        };
        let length = first.chars().count();
        let mut tokens = Array2::zeros((sequences.len(), length));

        for (row, sequence) in sequences.iter().enumerate() {
            let actual = sequence.chars().count();
            if actual != length {
                return Err(DataError::RaggedSequences {
                    row,
                    expected: length,
                    actual,
                });
            }
            for (position, residue) in sequence.chars().enumerate() {
                tokens[[row, position]] = self.token(residue).ok_or(DataError::UnknownResidue {
                    residue,
                    row,
                    position,
                })?;
            }
        }
        Ok(tokens)
    }

    fn vocab_size(&self) -> usize {
        AMINO_ACIDS.len()
    }
}
