// ============================================================
// Data — Lyrics Loader
// ============================================================
// One raw UTF-8 text file per song under {data_dir}/{artist_name}/.
// Files are read in sorted filename order so the corpus enumeration —
// and therefore the vocabulary ids derived from it — is identical
// across runs.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::song::Song;
use crate::domain::traits::SongSource;
use crate::error::LyricError;

/// Loads all .txt files from a single artist's lyric directory.
pub struct LyricsLoader {
    /// Path to the per-artist directory, e.g. data/kanye_west
    dir: PathBuf,
}

impl LyricsLoader {
    pub fn new(data_dir: impl Into<PathBuf>, artist_name: &str) -> Self {
        Self { dir: data_dir.into().join(artist_name) }
    }
}

impl SongSource for LyricsLoader {
    fn load_all(&self) -> Result<Vec<Song>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("cannot read lyric directory '{}'", self.dir.display()))?;

        // Collect first, then sort: read_dir order is filesystem-dependent.
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("txt"))
            .collect();
        paths.sort();

        let mut songs = Vec::with_capacity(paths.len());
        for path in &paths {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read song '{}'", path.display()))?;
            let source = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();
            tracing::debug!("Loaded: {} ({} chars)", source, text.len());
            songs.push(Song::new(source, text));
        }

        if songs.is_empty() {
            return Err(LyricError::EmptyCorpus { dir: self.dir.display().to_string() }.into());
        }

        tracing::info!("Loaded {} songs from '{}'", songs.len(), self.dir.display());
        Ok(songs)
    }
}
