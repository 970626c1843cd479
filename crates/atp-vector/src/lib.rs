//! Dense embedding matrix for the match chunks.
//!
//! Row `i` is the embedding of chunk `i`. The matrix lives on the CPU as a
//! candle `Tensor` and is persisted as a NumPy `float32` array of shape
//! `[num_chunks, dim]`.

use anyhow::{Result, ensure};
use candle_core::{DType, Device, Tensor};
use std::path::Path;
use tracing::debug;

pub mod search;

pub struct DenseIndex { matrix: Tensor }

impl DenseIndex {
    pub fn from_rows(rows: &[Vec<f32>], dim: usize) -> Result<Self> {
        let mut flat = Vec::with_capacity(rows.len() * dim);
        for (i, row) in rows.iter().enumerate() {
            ensure!(row.len() == dim, "embedding {} has width {}, expected {}", i, row.len(), dim);
            flat.extend_from_slice(row);
        }
        let matrix = Tensor::from_vec(flat, (rows.len(), dim), &Device::Cpu)?;
        Ok(Self { matrix })
    }

    pub fn from_tensor(matrix: Tensor) -> Result<Self> {
        ensure!(matrix.rank() == 2, "embedding matrix must be 2-D, got {:?}", matrix.dims());
        let matrix = matrix.to_device(&Device::Cpu)?.to_dtype(DType::F32)?;
        Ok(Self { matrix })
    }

    pub fn len(&self) -> usize { self.matrix.dims()[0] }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
    pub fn dim(&self) -> usize { self.matrix.dims()[1] }
    pub fn matrix(&self) -> &Tensor { &self.matrix }

    pub fn row(&self, pos: usize) -> Result<Vec<f32>> {
        ensure!(pos < self.len(), "row {} out of range for {} embeddings", pos, self.len());
        Ok(self.matrix.get(pos)?.to_vec1()?)
    }

    pub fn save_npy(&self, path: &Path) -> Result<()> {
        self.matrix.write_npy(path)?;
        debug!(rows = self.len(), dim = self.dim(), path = %path.display(), "wrote embeddings");
        Ok(())
    }

    pub fn load_npy(path: &Path) -> Result<Self> {
        Self::from_tensor(Tensor::read_npy(path)?)
    }
}
