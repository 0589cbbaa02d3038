//! Error taxonomy for the lyric model pipeline.
//!
//! Configuration mistakes are handled by clap before anything heavy is
//! initialized; everything after that boundary is one of the variants
//! below, converted into `anyhow::Error` as it crosses into the
//! application layer.

/// Errors raised by the data pipeline, the model, and checkpoint I/O.
#[derive(Debug, thiserror::Error)]
pub enum LyricError {
    /// Text to encode contains a token never seen during vocabulary
    /// construction. Should not occur for same-corpus text; surfaced
    /// loudly because it means data skew, not a transient fault.
    #[error("unknown token {token:?} is not in the vocabulary")]
    UnknownToken { token: String },

    /// The artist's corpus directory exists but holds no usable songs.
    #[error("no lyric files found under '{dir}'")]
    EmptyCorpus { dir: String },

    /// No song in the corpus is long enough to cut one training window.
    #[error("no song has the {needed} tokens required for seq_len {seq_len}")]
    CorpusTooShort { seq_len: usize, needed: usize },

    /// Training loss became non-finite. The offending batch is skipped
    /// and the weights are left untouched; the trainer aborts only when
    /// this recurs on consecutive batches.
    #[error("loss became non-finite ({loss}) at step {step}")]
    NumericInstability { step: usize, loss: f64 },

    /// Softmax produced weights the sampler cannot draw from.
    #[error("sampling distribution is invalid: {0}")]
    InvalidDistribution(String),

    /// A checkpoint could not be written, found, or parsed.
    #[error("checkpoint '{path}': {reason}")]
    Checkpoint { path: String, reason: String },
}
