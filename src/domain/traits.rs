// ============================================================
// Domain — Traits
// ============================================================

use anyhow::Result;
use crate::domain::song::Song;

/// Any component that can produce the ordered collection of raw song
/// texts for one artist.
///
/// Implementations:
///   - LyricsLoader → reads one .txt file per song from a directory
pub trait SongSource {
    /// Load every song from this source, in a deterministic order.
    fn load_all(&self) -> Result<Vec<Song>>;
}
