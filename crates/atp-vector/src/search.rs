use anyhow::{Result, ensure};
use candle_core::{Device, Tensor};

use atp_core::types::ChunkPos;

use crate::DenseIndex;

impl DenseIndex {
	/// Exact nearest neighbours by Euclidean distance, restricted to `candidates`.
	///
	/// Returns at most `k` candidate positions, closest first; equal distances
	/// keep the lower position first. `candidates` must be distinct positions.
	pub fn nearest(&self, query: &[f32], candidates: &[ChunkPos], k: usize) -> Result<Vec<ChunkPos>> {
		ensure!(query.len() == self.dim(), "query width {} does not match index width {}", query.len(), self.dim());
		if candidates.is_empty() || k == 0 { return Ok(Vec::new()); }
		let pool = if candidates.len() == self.len() {
			self.matrix().clone()
		} else {
			let ids: Vec<u32> = candidates.iter().map(|&p| p as u32).collect();
			let ids = Tensor::from_vec(ids, candidates.len(), &Device::Cpu)?;
			self.matrix().index_select(&ids, 0)?
		};
		let q = Tensor::from_slice(query, (1, self.dim()), &Device::Cpu)?;
		let distances: Vec<f32> = pool.broadcast_sub(&q)?.sqr()?.sum(1)?.to_vec1()?;
		let resolve = |slot: usize| if candidates.len() == self.len() { slot } else { candidates[slot] };
		let mut order: Vec<(f32, ChunkPos)> = distances.into_iter().enumerate().map(|(slot, d)| (d, resolve(slot))).collect();
		order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
		Ok(order.into_iter().take(k).map(|(_, pos)| pos).collect())
	}
}
