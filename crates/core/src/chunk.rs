//! Packing of speaker segments into slide-sized chunks.
//!
//! Segments that fit the character budget stay whole. Longer ones are cut
//! into fragments, preferring to cut just after whitespace or punctuation.
//! Fragments are then packed in order into chunks whose total length stays
//! within the budget.

use crate::error::{Error, Result};
use crate::segment::segment_note;
use crate::types::{Chunk, Fragment, Segment};

/// Default maximum number of characters shown on one slide.
pub const DEFAULT_BUDGET: usize = 150;

/// Punctuation after which a long segment may be cut, in addition to whitespace.
const BOUNDARY_PUNCTUATION: &[char] = &['、', '。', '．', '，', ',', '.', '?', '!'];

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || BOUNDARY_PUNCTUATION.contains(&c)
}

/// Packs segments into chunks of at most `budget` characters.
#[derive(Debug, Clone)]
pub struct Chunker {
    budget: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
        }
    }
}

impl Chunker {
    /// Create a chunker with the given character budget.
    ///
    /// A zero budget cannot hold any text and is rejected.
    pub fn new(budget: usize) -> Result<Self> {
        if budget == 0 {
            return Err(Error::InvalidBudget(budget));
        }
        Ok(Self { budget })
    }

    /// The character budget per chunk.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Cut one segment into fragments of at most `budget` characters.
    ///
    /// Each cut lands just after the last whitespace or punctuation mark in
    /// the current window; a window without any is cut at exactly `budget`.
    pub fn split_segment(&self, segment: &Segment) -> Vec<Fragment> {
        let speaker = segment.speaker.as_deref();
        let chars: Vec<char> = segment.text.chars().collect();

        if chars.len() <= self.budget {
            return vec![Fragment::new(speaker, segment.text.as_str())];
        }

        let mut fragments = Vec::new();
        let mut start = 0;

        while chars.len() - start > self.budget {
            let window = &chars[start..start + self.budget];
            let cut = window
                .iter()
                .rposition(|&c| is_boundary(c))
                .map_or(self.budget, |p| p + 1);

            fragments.push(Fragment::new(
                speaker,
                window[..cut].iter().collect::<String>(),
            ));
            start += cut;
        }

        if start < chars.len() {
            fragments.push(Fragment::new(
                speaker,
                chars[start..].iter().collect::<String>(),
            ));
        }

        log::debug!(
            "Split {}-char segment into {} fragments",
            chars.len(),
            fragments.len()
        );
        fragments
    }

    /// Pack a note's segments into chunks, preserving speaker order.
    pub fn chunk_segments(&self, segments: &[Segment]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current = Chunk::default();
        let mut total = 0;

        for fragment in segments.iter().flat_map(|s| self.split_segment(s)) {
            let len = fragment.len();

            if !current.is_empty() && len > self.budget - total {
                chunks.push(std::mem::take(&mut current));
                total = 0;
            }

            current.fragments.push(fragment);
            total += len;

            if total >= self.budget {
                chunks.push(std::mem::take(&mut current));
                total = 0;
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    /// Segment and pack one note.
    pub fn chunk_note(&self, note: &str) -> Vec<Chunk> {
        self.chunk_segments(&segment_note(note))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lens(fragments: &[Fragment]) -> Vec<usize> {
        fragments.iter().map(Fragment::len).collect()
    }

    fn texts(chunk: &Chunk) -> Vec<&str> {
        chunk.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_zero_budget_rejected() {
        assert!(matches!(Chunker::new(0), Err(Error::InvalidBudget(0))));
        assert_eq!(Chunker::new(1).unwrap().budget(), 1);
    }

    #[test]
    fn test_default_budget() {
        assert_eq!(Chunker::default().budget(), 150);
    }

    #[test]
    fn test_short_segment_is_one_fragment() {
        let chunker = Chunker::new(10).unwrap();
        let fragments = chunker.split_segment(&Segment::new(Some("X"), "abcdefghij"));
        assert_eq!(fragments, vec![Fragment::new(Some("X"), "abcdefghij")]);
    }

    #[test]
    fn test_hard_cut_without_boundary() {
        let chunker = Chunker::new(10).unwrap();
        let segments = vec![Segment::new(Some("X"), "abcdefghijklmno")];

        let fragments = chunker.split_segment(&segments[0]);
        assert_eq!(lens(&fragments), vec![10, 5]);

        let chunks = chunker.chunk_segments(&segments);
        assert_eq!(chunks.len(), 2);
        assert_eq!(texts(&chunks[0]), vec!["abcdefghij"]);
        assert_eq!(texts(&chunks[1]), vec!["klmno"]);
    }

    #[test]
    fn test_cut_after_last_whitespace() {
        let chunker = Chunker::new(10).unwrap();
        let fragments = chunker.split_segment(&Segment::new(None, "hello world again"));
        let pieces: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(pieces, vec!["hello ", "world ", "again"]);
    }

    #[test]
    fn test_cut_after_japanese_punctuation() {
        let chunker = Chunker::new(5).unwrap();
        let fragments = chunker.split_segment(&Segment::new(Some("仲條"), "あいう。えおかき"));
        let pieces: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(pieces, vec!["あいう。", "えおかき"]);
    }

    #[test]
    fn test_cut_after_punctuation_run() {
        let chunker = Chunker::new(8).unwrap();
        let fragments = chunker.split_segment(&Segment::new(None, "what?! reallyyy"));
        let pieces: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(pieces, vec!["what?! ", "reallyyy"]);
    }

    #[test]
    fn test_boundary_near_window_start_gives_small_piece() {
        let chunker = Chunker::new(5).unwrap();
        let fragments = chunker.split_segment(&Segment::new(None, "a bcdefgh"));
        let pieces: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(pieces, vec!["a ", "bcdef", "gh"]);
    }

    #[test]
    fn test_speakers_share_a_chunk_when_they_fit() {
        let chunker = Chunker::new(10).unwrap();
        let segments = vec![
            Segment::new(Some("A"), "abcd"),
            Segment::new(Some("B"), "efgh"),
            Segment::new(Some("C"), "ijk"),
        ];

        let chunks = chunker.chunk_segments(&segments);
        assert_eq!(chunks.len(), 2);
        assert_eq!(texts(&chunks[0]), vec!["abcd", "efgh"]);
        assert_eq!(texts(&chunks[1]), vec!["ijk"]);
        assert_eq!(chunks[1].fragments[0].speaker.as_deref(), Some("C"));
    }

    #[test]
    fn test_full_chunk_closes_immediately() {
        let chunker = Chunker::new(10).unwrap();
        let segments = vec![
            Segment::new(Some("A"), "abcde"),
            Segment::new(Some("B"), "fghij"),
            Segment::new(Some("C"), "k"),
        ];

        let chunks = chunker.chunk_segments(&segments);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].char_len(), 10);
        assert_eq!(texts(&chunks[1]), vec!["k"]);
    }

    #[test]
    fn test_long_segment_fragments_stay_contiguous() {
        let chunker = Chunker::new(6).unwrap();
        let segments = vec![
            Segment::new(Some("A"), "hi"),
            Segment::new(Some("B"), "one two three"),
            Segment::new(Some("A"), "ok"),
        ];

        let chunks = chunker.chunk_segments(&segments);
        let flat: Vec<(Option<&str>, &str)> = chunks
            .iter()
            .flat_map(|c| c.fragments.iter())
            .map(|f| (f.speaker.as_deref(), f.text.as_str()))
            .collect();

        assert_eq!(
            flat,
            vec![
                (Some("A"), "hi"),
                (Some("B"), "one "),
                (Some("B"), "two "),
                (Some("B"), "three"),
                (Some("A"), "ok"),
            ]
        );
        assert_eq!(texts(&chunks[0]), vec!["hi", "one "]);
    }

    #[test]
    fn test_blank_note_has_no_chunks() {
        let chunker = Chunker::default();
        assert!(chunker.chunk_note("").is_empty());
        assert!(chunker.chunk_note(" \n \n").is_empty());
    }

    #[test]
    fn test_chunks_reconstruct_segments_and_respect_budget() {
        let notes = [
            "《仲條》今日はお集まりいただきありがとうございます。これから新しい取り組みについて説明します、よろしくお願いします。\n《三村》はい、お願いします！",
            "《星野》Short.\n《Guest》A much longer line of English text that keeps going, with commas, periods. And questions? Yes!\nplain continuation",
            "intro without speaker\n《A》abcdefghijklmnopqrstuvwxyzabcdefghijklmnopqrstuvwxyz",
        ];

        for budget in [1, 3, 7, 10, 25, 150] {
            let chunker = Chunker::new(budget).unwrap();
            for note in notes {
                let segments = segment_note(note);
                let chunks = chunker.chunk_segments(&segments);

                for chunk in &chunks {
                    assert!(!chunk.is_empty());
                    assert!(chunk.char_len() <= budget, "budget {budget} exceeded");
                }

                let mut rebuilt: Vec<Segment> = Vec::new();
                for fragment in chunks.iter().flat_map(|c| c.fragments.iter()) {
                    match rebuilt.last_mut() {
                        Some(last) if last.speaker == fragment.speaker => {
                            last.text.push_str(&fragment.text)
                        }
                        _ => rebuilt.push(Segment {
                            speaker: fragment.speaker.clone(),
                            text: fragment.text.clone(),
                        }),
                    }
                }
                assert_eq!(rebuilt, segments);
            }
        }
    }
}
