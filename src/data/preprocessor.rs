// ============================================================
// Data — Lyric Preprocessor
// ============================================================
// Normalises raw lyric text before tokenisation. Unlike a prose
// cleaner, this one must PRESERVE newlines: line breaks become tokens
// of their own so the model can learn line and stanza structure.
//
// Cleaning steps, in order:
//   1. Normalise whitespace variants (tab, NBSP, zero-width, BOM) to space
//   2. \r\n and \r → \n
//   3. Drop control characters other than \n
//   4. Collapse runs of spaces within each line, trim line edges
//   5. Drop trailing blank lines (interior blank lines are stanza
//      breaks and are kept)

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one song's text. Output lines contain single-space
    /// separated words with no leading or trailing spaces — the exact
    /// shape the tokenizer round-trips losslessly.
    pub fn clean(&self, text: &str) -> String {
        let step1: String = text
            .chars()
            .map(|c| match c {
                '\t' => ' ',
                '\u{00A0}' => ' ',
                '\u{200B}' => ' ',
                '\u{FEFF}' => ' ',
                '\r' => '\n',
                c if c.is_control() && c != '\n' => ' ',
                c => c,
            })
            .collect();

        // Per-line: collapse space runs, trim edges.
        let mut lines: Vec<String> = step1
            .split('\n')
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();

        // \r\n input produced an empty line after every real one; the
        // general rule of dropping trailing blanks also covers a final
        // newline in the file.
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_collapse_within_lines() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello   world"), "hello world");
    }

    #[test]
    fn test_newlines_survive() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn test_stanza_break_is_kept() {
        let p = Preprocessor::new();
        // One blank line between stanzas must remain
        assert_eq!(p.clean("verse\n\nchorus"), "verse\n\nchorus");
    }

    #[test]
    fn test_crlf_becomes_lf() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("one\r\ntwo\r\n"), "one\ntwo");
    }

    #[test]
    fn test_trailing_newline_dropped() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("last line\n"), "last line");
    }

    #[test]
    fn test_tabs_and_nbsp_become_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("a\tb\u{00A0}c"), "a b c");
    }
}
