// ============================================================
// ML — Generator
// ============================================================
// Autoregressive sampling. Priming feeds the actual prime ids through
// the model one at a time (never the sampled ones), so the recurrent
// state reproduces the primed context exactly; afterwards each sampled
// token is fed back in until the token budget is spent. There is no
// stop token — the run always uses its full budget.
//
// The random draw is isolated behind a caller-supplied seedable RNG so
// generation can be made deterministic in tests.

use anyhow::Result;
use burn::{prelude::*, tensor::activation::softmax};
use rand::{distributions::WeightedIndex, prelude::Distribution, rngs::StdRng, SeedableRng};

use crate::data::vocabulary::Vocabulary;
use crate::error::LyricError;
use crate::ml::model::LyricModel;

pub struct Generator<B: Backend> {
    model:  LyricModel<B>,
    vocab:  Vocabulary,
    device: B::Device,
    rng:    StdRng,
}

impl<B: Backend> Generator<B> {
    pub fn new(model: LyricModel<B>, vocab: Vocabulary, device: B::Device, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { model, vocab, device, rng }
    }

    /// Produce up to `max_len` tokens of text (prime tokens included in
    /// the budget) and decode them back through the vocabulary.
    pub fn generate(&mut self, prime: Option<&str>, max_len: usize) -> Result<String> {
        if max_len == 0 {
            return Ok(String::new());
        }

        let mut ids: Vec<usize> = match prime {
            Some(text) if !text.trim().is_empty() => self.vocab.encode(text)?,
            // No prime: start a fresh song from a line break.
            _ => vec![self.vocab.line_break_id()],
        };
        ids.truncate(max_len);

        // Warm up the state on the actual prime ids; only the logits
        // after the final prime token are kept for sampling.
        let mut state = None;
        let mut logits = None;
        for &id in &ids {
            let (l, s) = self.model.step(id, state.take(), &self.device);
            logits = Some(l);
            state = Some(s);
        }

        while ids.len() < max_len {
            let Some(current) = logits.take() else { break };
            let next_id = self.sample_token(current)?;
            ids.push(next_id);

            if ids.len() < max_len {
                let (l, s) = self.model.step(next_id, state.take(), &self.device);
                logits = Some(l);
                state = Some(s);
            }
        }

        Ok(self.vocab.decode(&ids))
    }

    /// Stochastic draw from the softmax distribution — not argmax, so
    /// repeated runs diverge and keep their generative diversity.
    fn sample_token(&mut self, logits: Tensor<B, 1>) -> Result<usize, LyricError> {
        let probs: Vec<f32> = softmax(logits, 0)
            .into_data()
            .to_vec()
            .map_err(|e| LyricError::InvalidDistribution(format!("{e:?}")))?;

        let dist = WeightedIndex::new(&probs)
            .map_err(|e| LyricError::InvalidDistribution(e.to_string()))?;
        Ok(dist.sample(&mut self.rng))
    }
}
