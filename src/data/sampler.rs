// ============================================================
// Data — Batch Sampler
// ============================================================
// Draws fixed-length teacher-forcing windows from the encoded corpus.
//
// Sampling policy: each row independently picks a song uniformly at
// random (with replacement) among songs long enough for one window,
// then a start offset uniformly within that song, and slices
// seq_len + 1 consecutive ids into an (input, target) pair. Songs
// shorter than seq_len + 1 tokens are skipped — windows never pad and
// never wrap across song boundaries.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::LyricError;

/// One sampled training batch of token ids, shape [batch_size][seq_len],
/// with `targets[i][t] == inputs[i][t + 1]` inside each window.
#[derive(Debug, Clone)]
pub struct Batch {
    pub inputs:  Vec<Vec<usize>>,
    pub targets: Vec<Vec<usize>>,
}

/// Stateful window sampler over the encoded corpus. Deterministic for a
/// given seed; a fresh entropy seed is drawn when none is supplied.
pub struct BatchSampler {
    songs: Vec<Vec<usize>>,
    rng:   StdRng,
}

impl BatchSampler {
    pub fn new(songs: Vec<Vec<usize>>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { songs, rng }
    }

    /// Sample `batch_size` independent windows of `seq_len` tokens each.
    /// Always returns exactly the requested shape, or fails if the
    /// corpus has no song with seq_len + 1 tokens.
    pub fn next_batch(&mut self, batch_size: usize, seq_len: usize) -> Result<Batch, LyricError> {
        let eligible: Vec<usize> = self
            .songs
            .iter()
            .enumerate()
            .filter(|(_, song)| song.len() > seq_len)
            .map(|(i, _)| i)
            .collect();

        if eligible.is_empty() {
            return Err(LyricError::CorpusTooShort { seq_len, needed: seq_len + 1 });
        }

        let mut inputs  = Vec::with_capacity(batch_size);
        let mut targets = Vec::with_capacity(batch_size);

        for _ in 0..batch_size {
            let song  = &self.songs[eligible[self.rng.gen_range(0..eligible.len())]];
            let start = self.rng.gen_range(0..=song.len() - seq_len - 1);
            let window = &song[start..start + seq_len + 1];

            inputs.push(window[..seq_len].to_vec());
            targets.push(window[1..].to_vec());
        }

        Ok(Batch { inputs, targets })
    }
}
