// ============================================================
// ML Layer (Burn)
// ============================================================

/// Stacked-LSTM sequence model: batched loss and single-step modes
pub mod model;

/// Training loop, optimizer state, and the global step counter
pub mod trainer;

/// Autoregressive sampling from a primed recurrent state
pub mod generator;
