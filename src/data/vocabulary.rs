// ============================================================
// Data — Vocabulary
// ============================================================
// Bidirectional token ↔ id mapping over the whole corpus, built once
// at data-load time and immutable afterwards. Tokens are words plus an
// explicit line-break token so stanza structure survives tokenisation.
//
// Ids are assigned in first-seen corpus order, which makes the mapping
// deterministic: the same songs enumerated in the same order always
// produce the same ids, so a vocabulary rebuilt at generation time
// matches the one the checkpoint was trained with.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use crate::error::LyricError;

/// The token that stands for a line break. Always id 0.
pub const LINE_BREAK: &str = "\n";

/// Word-level vocabulary with a reserved line-break token.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// id → token, in assignment order
    tokens: Vec<String>,
    /// token → id
    ids: HashMap<String, usize>,
}

impl Vocabulary {
    /// Scan cleaned song texts in corpus order and assign first-seen ids.
    /// The line-break token is seeded first so it exists even for a
    /// corpus of single-line songs.
    pub fn build<S: AsRef<str>>(texts: &[S]) -> Self {
        let mut vocab = Self {
            tokens: Vec::new(),
            ids:    HashMap::new(),
        };
        vocab.intern(LINE_BREAK);

        for text in texts {
            for token in tokenize(text.as_ref()) {
                vocab.intern(token);
            }
        }

        vocab
    }

    fn intern(&mut self, token: &str) -> usize {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        let id = self.tokens.len();
        self.tokens.push(token.to_string());
        self.ids.insert(token.to_string(), id);
        id
    }

    /// Number of distinct tokens, V. All ids are in [0, V).
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn line_break_id(&self) -> usize {
        0
    }

    /// Map text to token ids. Every token must have been seen during
    /// `build`; anything else is data skew and is reported, not dropped.
    pub fn encode(&self, text: &str) -> Result<Vec<usize>, LyricError> {
        tokenize(text)
            .map(|token| {
                self.ids
                    .get(token)
                    .copied()
                    .ok_or_else(|| LyricError::UnknownToken { token: token.to_string() })
            })
            .collect()
    }

    /// Inverse of `encode`. Ids outside [0, V) are skipped; the model
    /// only ever produces in-range ids.
    pub fn decode(&self, ids: &[usize]) -> String {
        let mut out = String::new();
        let mut need_space = false;
        for &id in ids {
            let Some(token) = self.tokens.get(id) else { continue };
            if token == LINE_BREAK {
                out.push('\n');
                need_space = false;
            } else {
                if need_space {
                    out.push(' ');
                }
                out.push_str(token);
                need_space = true;
            }
        }
        out
    }

    /// Persist the id-ordered token list next to the checkpoints.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.tokens)?;
        std::fs::write(path, json)
            .with_context(|| format!("cannot write vocabulary to '{}'", path.display()))?;
        tracing::debug!("Saved vocabulary ({} tokens) to '{}'", self.len(), path.display());
        Ok(())
    }

    /// Load a vocabulary previously written by `save`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read vocabulary from '{}'", path.display()))?;
        let tokens: Vec<String> = serde_json::from_str(&json)?;
        let ids = tokens
            .iter()
            .enumerate()
            .map(|(id, t)| (t.clone(), id))
            .collect();
        Ok(Self { tokens, ids })
    }
}

/// Word-level tokenisation: each line splits on whitespace, with a
/// line-break token emitted between lines.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').enumerate().flat_map(|(i, line)| {
        let newline = if i > 0 { Some(LINE_BREAK) } else { None };
        newline.into_iter().chain(line.split_whitespace())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_encode_decode() {
        let text = "hello world\nhello again\n\nnew stanza";
        let vocab = Vocabulary::build(&[text]);
        let ids = vocab.encode(text).unwrap();
        assert_eq!(vocab.decode(&ids), text);
    }

    #[test]
    fn test_two_one_line_songs_vocabulary() {
        // Corpus of "hello world" and "hello again" must contain
        // exactly the three words plus the line-break token.
        let vocab = Vocabulary::build(&["hello world", "hello again"]);
        assert_eq!(vocab.len(), 4);
        assert!(vocab.encode("hello world again").is_ok());
        assert_eq!(vocab.encode(LINE_BREAK).unwrap(), vec![0]);
    }

    #[test]
    fn test_ids_are_deterministic_across_builds() {
        let texts = ["one two\nthree", "two four"];
        let a = Vocabulary::build(&texts);
        let b = Vocabulary::build(&texts);
        for token in ["one", "two", "three", "four"] {
            assert_eq!(a.encode(token).unwrap(), b.encode(token).unwrap());
        }
    }

    #[test]
    fn test_unknown_token_is_reported() {
        let vocab = Vocabulary::build(&["hello world"]);
        let err = vocab.encode("goodbye").unwrap_err();
        assert!(matches!(err, LyricError::UnknownToken { .. }));
    }

    #[test]
    fn test_line_break_is_id_zero() {
        let vocab = Vocabulary::build(&["no newline here"]);
        assert_eq!(vocab.line_break_id(), 0);
        assert_eq!(vocab.decode(&[0]), "\n");
    }

    #[test]
    fn test_save_load_round_trip() {
        let vocab = Vocabulary::build(&["hello world\nagain"]);
        let path = std::env::temp_dir()
            .join(format!("lyric-gen-vocab-{}.json", std::process::id()));
        vocab.save(&path).unwrap();
        let loaded = Vocabulary::load(&path).unwrap();
        assert_eq!(loaded.len(), vocab.len());
        assert_eq!(
            loaded.encode("hello again").unwrap(),
            vocab.encode("hello again").unwrap()
        );
        std::fs::remove_file(path).unwrap();
    }
}
