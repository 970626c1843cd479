use std::collections::HashMap;

use atp_core::types::ChunkPos;

/// Reciprocal rank fusion.
///
/// Each ranking contributes `1 / (k + rank + 1)` (0-based `rank`) to every
/// position it lists. Output is sorted by descending fused score; equal scores
/// keep the order in which positions were first seen.
pub fn reciprocal_rank_fusion(rankings: &[&[ChunkPos]], k: usize) -> Vec<(ChunkPos, f64)> {
    let mut slots: HashMap<ChunkPos, usize> = HashMap::new();
    let mut fused: Vec<(ChunkPos, f64)> = Vec::new();
    for ranking in rankings {
        for (rank, &pos) in ranking.iter().enumerate() {
            let contribution = 1.0 / (k as f64 + rank as f64 + 1.0);
            match slots.get(&pos) {
                Some(&slot) => fused[slot].1 += contribution,
                None => {
                    slots.insert(pos, fused.len());
                    fused.push((pos, contribution));
                }
            }
        }
    }
    fused.sort_by(|a, b| b.1.total_cmp(&a.1));
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_top_outranks_single_list_top() {
        let dense: &[ChunkPos] = &[7, 1, 2];
        let sparse: &[ChunkPos] = &[7, 3, 4];
        let fused = reciprocal_rank_fusion(&[dense, sparse], 60);
        assert_eq!(fused[0].0, 7);
        assert!((fused[0].1 - 2.0 / 61.0).abs() < 1e-12);
    }

    #[test]
    fn first_in_both_beats_first_in_one() {
        let dense: &[ChunkPos] = &[1, 2];
        let sparse: &[ChunkPos] = &[1, 3];
        let only_dense: &[ChunkPos] = &[2, 1];
        let both = reciprocal_rank_fusion(&[dense, sparse], 60);
        let none: &[ChunkPos] = &[];
        let one = reciprocal_rank_fusion(&[only_dense, none], 60);
        assert!(both[0].1 >= one[0].1);
        let score_of = |pos| both.iter().find(|(p, _)| *p == pos).map(|(_, s)| *s).unwrap();
        assert!(score_of(1) > score_of(2) && score_of(1) > score_of(3));
    }

    #[test]
    fn single_list_positions_still_score() {
        let (a, b): (&[ChunkPos], &[ChunkPos]) = (&[5], &[6]);
        let fused = reciprocal_rank_fusion(&[a, b], 60);
        assert_eq!(fused.len(), 2);
        assert!((fused[0].1 - fused[1].1).abs() < 1e-12);
        // equal scores keep first appearance order
        assert_eq!(fused[0].0, 5);
        assert_eq!(fused[1].0, 6);
    }

    #[test]
    fn empty_rankings_fuse_to_nothing() {
        let none: &[ChunkPos] = &[];
        assert!(reciprocal_rank_fusion(&[none, none], 60).is_empty());
    }
}
