// ============================================================
// Data — Lyric Batcher
// ============================================================
// Converts a sampled `Batch` of token ids into device tensors for the
// model forward pass. All rows in a batch share one length, so the
// conversion is flatten-then-reshape:
//   [r1_t1, ..., r1_tS, r2_t1, ..., rN_tS] → [N, S]

use burn::prelude::*;

use crate::data::sampler::Batch;

/// A batch ready for the model: shape [batch_size, seq_len], Int.
#[derive(Debug, Clone)]
pub struct LyricBatch<B: Backend> {
    pub inputs:  Tensor<B, 2, Int>,
    pub targets: Tensor<B, 2, Int>,
}

/// Holds the target device so tensors land on the right backend.
#[derive(Clone, Debug)]
pub struct LyricBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> LyricBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    pub fn batch(&self, batch: &Batch) -> LyricBatch<B> {
        let rows = batch.inputs.len();
        let cols = batch.inputs.first().map_or(0, Vec::len);

        let input_flat: Vec<i32> = batch
            .inputs
            .iter()
            .flat_map(|row| row.iter().map(|&id| id as i32))
            .collect();

        let target_flat: Vec<i32> = batch
            .targets
            .iter()
            .flat_map(|row| row.iter().map(|&id| id as i32))
            .collect();

        let inputs = Tensor::<B, 1, Int>::from_ints(input_flat.as_slice(), &self.device)
            .reshape([rows, cols]);
        let targets = Tensor::<B, 1, Int>::from_ints(target_flat.as_slice(), &self.device)
            .reshape([rows, cols]);

        LyricBatch { inputs, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray<f32>;

    #[test]
    fn test_tensor_shapes_match_batch() {
        let batch = Batch {
            inputs:  vec![vec![0, 1, 2], vec![3, 4, 5]],
            targets: vec![vec![1, 2, 3], vec![4, 5, 6]],
        };
        let batcher = LyricBatcher::<TestBackend>::new(Default::default());
        let tensors = batcher.batch(&batch);

        assert_eq!(tensors.inputs.dims(), [2, 3]);
        assert_eq!(tensors.targets.dims(), [2, 3]);
    }

    #[test]
    fn test_row_order_is_preserved() {
        let batch = Batch {
            inputs:  vec![vec![7, 8], vec![9, 10]],
            targets: vec![vec![8, 9], vec![10, 11]],
        };
        let batcher = LyricBatcher::<TestBackend>::new(Default::default());
        let tensors = batcher.batch(&batch);

        let values: Vec<i64> = tensors.inputs.into_data().to_vec().unwrap();
        assert_eq!(values, vec![7, 8, 9, 10]);
    }
}
