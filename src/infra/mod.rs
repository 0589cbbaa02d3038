// ============================================================
// Infrastructure
// ============================================================

/// Saves and restores model snapshots tagged with the global step
pub mod checkpoint;

/// Appends per-step training loss to a CSV file
pub mod metrics;
