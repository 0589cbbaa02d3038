// ============================================================
// ML — Lyric Sequence Model
// ============================================================
// Embedding → stacked LSTM cells → vocabulary projection.
//
// One parameter set serves two call modes:
//   - training: `forward_loss` over a whole [batch, seq_len] window,
//     fresh zero state per batch (windows are independent)
//   - generation: `step` consumes one token id and an explicit
//     recurrent state, produces logits for the next token plus the
//     updated state
// Mode is a call-time choice on the same Module, never a separate
// model instance.

use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig, LstmState,
    },
    prelude::*,
};

/// Per-layer (cell, hidden) pairs carried between consecutive steps of
/// one sequence. `None` anywhere a fresh zero state is wanted.
pub type RecurrentState<B> = Vec<LstmState<B, 2>>;

#[derive(Config, Debug)]
pub struct LyricModelConfig {
    pub vocab_size: usize,
    #[config(default = 256)]
    pub embed_size: usize,
    #[config(default = 256)]
    pub cell_size:  usize,
    #[config(default = 2)]
    pub num_layers: usize,
}

impl LyricModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LyricModel<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embed_size).init(device);
        let layers: Vec<Lstm<B>> = (0..self.num_layers)
            .map(|i| {
                // First cell reads embeddings, the rest read the cell below.
                let d_input = if i == 0 { self.embed_size } else { self.cell_size };
                LstmConfig::new(d_input, self.cell_size, true).init(device)
            })
            .collect();
        let output = LinearConfig::new(self.cell_size, self.vocab_size).init(device);

        LyricModel { embedding, layers, output }
    }
}

#[derive(Module, Debug)]
pub struct LyricModel<B: Backend> {
    embedding: Embedding<B>,
    layers:    Vec<Lstm<B>>,
    output:    Linear<B>,
}

impl<B: Backend> LyricModel<B> {
    /// ids: [batch, seq_len] → logits: [batch, seq_len, vocab], plus the
    /// final per-layer states. `state: None` starts from zero.
    pub fn forward(
        &self,
        ids:   Tensor<B, 2, Int>,
        state: Option<RecurrentState<B>>,
    ) -> (Tensor<B, 3>, RecurrentState<B>) {
        let mut x = self.embedding.forward(ids);

        let mut carried = state.map(Vec::into_iter);
        let mut next_state = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let layer_state = carried.as_mut().and_then(Iterator::next);
            let (out, new_state) = layer.forward(x, layer_state);
            x = out;
            next_state.push(new_state);
        }

        (self.output.forward(x), next_state)
    }

    /// Training mode: mean cross-entropy between every position's logits
    /// and the teacher-forcing targets. State starts from zero — batches
    /// are independent random windows, so nothing carries across them.
    pub fn forward_loss(
        &self,
        inputs:  Tensor<B, 2, Int>,
        targets: Tensor<B, 2, Int>,
    ) -> Tensor<B, 1> {
        let [batch_size, seq_len] = inputs.dims();
        let (logits, _) = self.forward(inputs, None);
        let [_, _, vocab] = logits.dims();

        let logits  = logits.reshape([batch_size * seq_len, vocab]);
        let targets = targets.reshape([batch_size * seq_len]);

        CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits, targets)
    }

    /// Generation mode: embed one token id, step every layer exactly
    /// once, return next-token logits [vocab] and the updated state.
    pub fn step(
        &self,
        token_id: usize,
        state:    Option<RecurrentState<B>>,
        device:   &B::Device,
    ) -> (Tensor<B, 1>, RecurrentState<B>) {
        let input = Tensor::<B, 1, Int>::from_ints([token_id as i32], device).reshape([1, 1]);
        let (logits, state) = self.forward(input, state);
        let [_, _, vocab] = logits.dims();

        (logits.reshape([vocab]), state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray<f32>;

    fn tiny_model() -> (LyricModel<TestBackend>, <TestBackend as Backend>::Device) {
        let device = Default::default();
        let model = LyricModelConfig::new(6)
            .with_embed_size(8)
            .with_cell_size(8)
            .with_num_layers(2)
            .init::<TestBackend>(&device);
        (model, device)
    }

    #[test]
    fn test_loss_is_finite_and_non_negative() {
        let (model, device) = tiny_model();
        let inputs = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 1, 2, 3, 4, 5, 1, 2].as_slice(),
            &device,
        )
        .reshape([2, 4]);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints(
            [1, 2, 3, 4, 5, 1, 2, 3].as_slice(),
            &device,
        )
        .reshape([2, 4]);

        let loss: f64 = model.forward_loss(inputs, targets).into_scalar().elem();
        assert!(loss.is_finite());
        assert!(loss >= 0.0);
    }

    #[test]
    fn test_step_produces_one_logit_row_and_state() {
        let (model, device) = tiny_model();

        // Fresh state: exactly one token in, one logits vector out.
        let (logits, state) = model.step(3, None, &device);
        assert_eq!(logits.dims(), [6]);
        assert_eq!(state.len(), 2);

        // Threading the returned state back in keeps the shapes stable.
        let (logits, state) = model.step(1, Some(state), &device);
        assert_eq!(logits.dims(), [6]);
        assert_eq!(state.len(), 2);
        for layer_state in &state {
            assert_eq!(layer_state.hidden.dims(), [1, 8]);
            assert_eq!(layer_state.cell.dims(), [1, 8]);
        }
    }

    #[test]
    fn test_state_changes_the_prediction() {
        // The same input id stepped from different states must not be
        // forced to produce identical logits; recurrence has to matter.
        let (model, device) = tiny_model();
        let (fresh, state) = model.step(2, None, &device);
        let (warmed, _) = model.step(2, Some(state), &device);

        let fresh: Vec<f32> = fresh.into_data().to_vec().unwrap();
        let warmed: Vec<f32> = warmed.into_data().to_vec().unwrap();
        assert_ne!(fresh, warmed);
    }
}
