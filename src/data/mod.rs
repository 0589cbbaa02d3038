// ============================================================
// Data Pipeline
// ============================================================

/// Loads one .txt lyric file per song from the artist's directory
pub mod loader;

/// Cleans raw lyric text while preserving line and stanza breaks
pub mod preprocessor;

/// Token ↔ id mapping built once from the full corpus
pub mod vocabulary;

/// Draws fixed-length training windows from the encoded corpus
pub mod sampler;

/// Turns sampled id windows into device tensors
pub mod batcher;
