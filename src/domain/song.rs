// ============================================================
// Domain — Song
// ============================================================

use serde::{Deserialize, Serialize};

/// One raw song loaded from disk. By the time a `Song` exists the text
/// has already been read as UTF-8; newlines are part of the content and
/// are kept all the way through tokenization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    /// The filename the lyrics came from — kept for traceability
    pub source: String,

    /// The full lyric text, line and stanza breaks included
    pub text: String,
}

impl Song {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text:   text.into(),
        }
    }
}
