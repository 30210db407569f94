//! Safetensors embedding store.
//!
//! A store holds two named arrays: `embeddings` (F32 or F64, rank 2 for
//! pooled vectors or rank 3 for per-token vectors) and `mutants` (U8, shape
//! `(n, width)`, one NUL-padded UTF-8 identifier per row). Readers take a
//! shared advisory lock, writers an exclusive one.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use fd_lock::RwLock;
use kermut_core::constants::{EMBEDDINGS_TENSOR, MUTANTS_TENSOR};
use kermut_core::errors::{DataError, DataResult};
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use safetensors::tensor::TensorView;
use safetensors::{Dtype, SafeTensors};
use tracing::debug;

use crate::retry::{retry_io, RetryPolicy, Sleeper};

/// Embeddings exactly as stored, before pooling and alignment.
#[derive(Debug, Clone)]
pub struct RawEmbeddings {
    pub mutants: Vec<String>,
    pub embeddings: ArrayD<f32>,
}

/// Read a store, retrying while a writer holds the lock.
///
/// The caller checks existence first; a file that disappears between the
/// check and the read surfaces as `DataError::Io`.
pub fn read_embeddings(path: &Path, policy: &RetryPolicy, sleeper: &dyn Sleeper) -> DataResult<RawEmbeddings> {
    let bytes = retry_io(policy, sleeper, |attempt| {
        debug!(path = %path.display(), attempt, "opening embedding store");
        read_locked(path)
    })
    .map_err(|e| DataError::io(path, e))?;
    decode_embeddings(&bytes, path)
}

fn read_locked(path: &Path) -> io::Result<Vec<u8>> {
    let lock = RwLock::new(File::open(path)?);
    let guard = lock.try_read()?;
    let mut reader: &File = &guard;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Parse store bytes. `path` is used in error messages only.
pub fn decode_embeddings(bytes: &[u8], path: &Path) -> DataResult<RawEmbeddings> {
    let corrupt = |reason: String| DataError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };
    let tensors = SafeTensors::deserialize(bytes).map_err(|e| corrupt(e.to_string()))?;
    let tensor = |name: &str| {
        tensors.tensor(name).map_err(|_| DataError::MissingTensor {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    };

    let view = tensor(EMBEDDINGS_TENSOR)?;
    let values: Vec<f32> = match view.dtype() {
        Dtype::F32 => view
            .data()
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
        Dtype::F64 => view
            .data()
            .chunks_exact(8)
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f32)
            .collect(),
        other => return Err(corrupt(format!("unsupported embedding dtype {other:?}"))),
    };
    let embeddings = ArrayD::from_shape_vec(IxDyn(view.shape()), values)
        .map_err(|e| corrupt(e.to_string()))?;

    let ids = tensor(MUTANTS_TENSOR)?;
    if ids.dtype() != Dtype::U8 || ids.shape().len() != 2 {
        return Err(corrupt(format!(
            "mutants must be a rank-2 U8 array, got {:?} {:?}",
            ids.dtype(),
            ids.shape()
        )));
    }
    let (count, width) = (ids.shape()[0], ids.shape()[1]);
    let mutants = if width == 0 {
        vec![String::new(); count]
    } else {
        ids.data()
            .chunks_exact(width)
            .map(decode_identifier)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| corrupt(format!("mutant identifier is not UTF-8: {e}")))?
    };

    let rows = embeddings.shape().first().copied().unwrap_or(0);
    if rows != mutants.len() {
        return Err(corrupt(format!(
            "{} embedding rows but {} mutant identifiers",
            rows,
            mutants.len()
        )));
    }
    Ok(RawEmbeddings {
        mutants,
        embeddings,
    })
}

fn decode_identifier(bytes: &[u8]) -> Result<String, std::str::Utf8Error> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..end]).map(str::to_string)
}

/// Write a store under an exclusive lock, replacing any existing file.
///
/// Fails with a `WouldBlock` I/O error if another process holds the lock.
pub fn write_embeddings<S: AsRef<str>>(path: &Path, mutants: &[S], embeddings: ArrayViewD<'_, f32>) -> DataResult<()> {
    let invalid = |reason: String| DataError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };
    let rows = embeddings.shape().first().copied().unwrap_or(0);
    if rows != mutants.len() {
        return Err(invalid(format!(
            "{} embedding rows but {} mutant identifiers",
            rows,
            mutants.len()
        )));
    }

    let values: Vec<u8> = embeddings.iter().flat_map(|v| v.to_le_bytes()).collect();
    let width = mutants
        .iter()
        .map(|m| m.as_ref().len())
        .max()
        .unwrap_or(0)
        .max(1);
    let mut ids = vec![0u8; mutants.len() * width];
    for (row, mutant) in ids.chunks_exact_mut(width).zip(mutants) {
        row[..mutant.as_ref().len()].copy_from_slice(mutant.as_ref().as_bytes());
    }

    let views = vec![
        (
            EMBEDDINGS_TENSOR.to_string(),
            TensorView::new(Dtype::F32, embeddings.shape().to_vec(), &values)
                .map_err(|e| invalid(e.to_string()))?,
        ),
        (
            MUTANTS_TENSOR.to_string(),
            TensorView::new(Dtype::U8, vec![mutants.len(), width], &ids)
                .map_err(|e| invalid(e.to_string()))?,
        ),
    ];
    let bytes = safetensors::serialize(views, &None).map_err(|e| invalid(e.to_string()))?;

    write_locked(path, &bytes).map_err(|e| DataError::io(path, e))?;
    debug!(path = %path.display(), rows, bytes = bytes.len(), "wrote embedding store");
    Ok(())
}

fn write_locked(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)?;
    let mut lock = RwLock::new(file);
    let mut guard = lock.try_write()?;
    guard.set_len(0)?;
    guard.write_all(bytes)?;
    guard.sync_all()
}
