//! Cleanup of raw speaker notes text.
//!
//! PowerPoint stores soft line breaks inside a paragraph as a vertical tab
//! (`\x0b`). Those and other control characters are dropped; real line breaks
//! and tabs survive so the segmenter can still see line starts.

/// Returns true for control characters that carry no meaning in notes text.
fn is_stray_control(c: char) -> bool {
    c.is_control() && !matches!(c, '\n' | '\r' | '\t')
}

/// Strip control characters and surrounding whitespace from a note.
pub fn clean_note(text: &str) -> String {
    text.chars()
        .filter(|&c| !is_stray_control(c))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_vertical_tab() {
        assert_eq!(clean_note("《仲條》おはよう\x0bございます"), "《仲條》おはようございます");
    }

    #[test]
    fn test_keeps_line_breaks() {
        assert_eq!(clean_note("line one\nline two\r\n"), "line one\nline two");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(clean_note("  \t hello \n "), "hello");
    }

    #[test]
    fn test_blank_note_becomes_empty() {
        assert_eq!(clean_note("\x0b\x0b  "), "");
    }
}
