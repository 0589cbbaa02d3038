// ============================================================
// Domain Types
// ============================================================

/// A single song loaded from disk
pub mod song;

/// Traits that decouple the application layer from concrete sources
pub mod traits;
