// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A row-major matrix of `f32`s: the shape shared by document vectors,
//! UMAP embeddings, and visualization embeddings. Stage collaborators
//! (`loom_pipeline::stages`) produce and consume these; this crate only
//! carries the value and its on-disk codec.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Row-major `rows x dims` matrix. `data.len()` must equal `rows * dims`;
/// constructors enforce this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVectors {
    pub rows: usize,
    pub dims: usize,
    pub data: Vec<f32>,
}

const MAGIC: &[u8; 4] = b"LMV1";

impl DocumentVectors {
    pub fn new(rows: usize, dims: usize, data: Vec<f32>) -> CoreResult<Self> {
        if data.len() != rows * dims {
            return Err(CoreError::InvalidValueType {
                field: "document_vectors".to_string(),
                reason: format!(
                    "expected {} values for {}x{} but got {}",
                    rows * dims,
                    rows,
                    dims,
                    data.len()
                ),
            });
        }
        Ok(Self { rows, dims, data })
    }

    pub fn row(&self, index: usize) -> &[f32] {
        let start = index * self.dims;
        &self.data[start..start + self.dims]
    }

    /// Copies out the contiguous row range `[start, start + count)` as its
    /// own matrix. Used to split a jointly reduced matrix (documents plus
    /// synthetic rows appended for a joint projection) back apart.
    pub fn slice_rows(&self, start: usize, count: usize) -> CoreResult<Self> {
        let begin = start * self.dims;
        let end = (start + count) * self.dims;
        if end > self.data.len() {
            return Err(CoreError::InvalidValueType {
                field: "document_vectors".to_string(),
                reason: format!("row range {}..{} out of bounds for {} rows", start, start + count, self.rows),
            });
        }
        Ok(Self {
            rows: count,
            dims: self.dims,
            data: self.data[begin..end].to_vec(),
        })
    }

    /// Serializes to this crate's own compact binary layout: a 4-byte
    /// magic, then `rows`/`dims` as little-endian `u64`, then the raw
    /// `f32` row-major payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + 16 + self.data.len() * 4);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&(self.rows as u64).to_le_bytes());
        out.extend_from_slice(&(self.dims as u64).to_le_bytes());
        for v in &self.data {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        if bytes.len() < 20 || &bytes[0..4] != MAGIC {
            return Err(CoreError::CorruptedFile("not a document-vectors file".into()));
        }
        let rows = u64::from_le_bytes(bytes[4..12].try_into().map_err(|_| {
            CoreError::CorruptedFile("truncated document-vectors header".into())
        })?) as usize;
        let dims = u64::from_le_bytes(bytes[12..20].try_into().map_err(|_| {
            CoreError::CorruptedFile("truncated document-vectors header".into())
        })?) as usize;
        let payload = &bytes[20..];
        if payload.len() != rows * dims * 4 {
            return Err(CoreError::CorruptedFile(format!(
                "expected {} bytes of payload for {}x{} but got {}",
                rows * dims * 4,
                rows,
                dims,
                payload.len()
            )));
        }
        let data = payload
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Self::new(rows, dims, data)
    }
}

#[cfg(test)]
#[path = "vectors_tests.rs"]
mod tests;
