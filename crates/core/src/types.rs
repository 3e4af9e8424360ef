//! Domain types for notes, speaker segments, chunks, and planned slides.

use crate::color::Rgb;
use crate::note::clean_note;
use serde::{Deserialize, Serialize};

/// A source presentation reduced to the speaker notes of its slides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDeck {
    /// Original filename (without path).
    pub filename: String,

    /// Detected format of the source file.
    pub format: PresentationFormat,

    /// Slides in presentation order.
    pub slides: Vec<SourceSlide>,
}

impl SourceDeck {
    /// Create a new deck with the given filename and format.
    pub fn new(filename: impl Into<String>, format: PresentationFormat) -> Self {
        Self {
            filename: filename.into(),
            format,
            slides: Vec::new(),
        }
    }

    /// Add a slide to the deck.
    pub fn add_slide(&mut self, slide: SourceSlide) {
        self.slides.push(slide);
    }

    /// Cleaned notes of every slide that has any, in slide order.
    ///
    /// Slides without notes, or whose notes are blank after cleanup, are skipped.
    pub fn notes(&self) -> Vec<String> {
        self.slides
            .iter()
            .filter_map(|s| s.notes.as_deref())
            .map(clean_note)
            .filter(|n| !n.is_empty())
            .collect()
    }
}

/// The format of the source presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Legacy PPT (OLE/CFB binary). Detected so it can be rejected clearly.
    Ppt,
}

impl PresentationFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        // PPT is an OLE/CFB file (D0 CF 11 E0 A1 B1 1A E1)
        if bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]) {
            return Some(Self::Ppt);
        }

        None
    }
}

/// One slide of the source deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Raw speaker notes, if the slide has a notes page.
    pub notes: Option<String>,
}

impl SourceSlide {
    /// Create a new slide with the given number and no notes.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            notes: None,
        }
    }

    /// Create a slide carrying raw notes text.
    pub fn with_notes(number: usize, notes: impl Into<String>) -> Self {
        Self {
            number,
            notes: Some(notes.into()),
        }
    }
}

/// A contiguous run of text attributed to one speaker (or none).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub speaker: Option<String>,
    pub text: String,
}

impl Segment {
    pub fn new(speaker: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.map(str::to_string),
            text: text.into(),
        }
    }
}

/// A budget-sized slice of one segment's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub speaker: Option<String>,
    pub text: String,
}

impl Fragment {
    pub fn new(speaker: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.map(str::to_string),
            text: text.into(),
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The fragments destined for one output slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub fragments: Vec<Fragment>,
}

impl Chunk {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Total characters across all fragments.
    pub fn char_len(&self) -> usize {
        self.fragments.iter().map(Fragment::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// A colored run of text inside the slide's transcript paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub color: Rgb,
}

/// "index/total" position of a slide among the slides of one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageIndicator {
    pub index: usize,
    pub total: usize,
}

impl PageIndicator {
    /// Display label, e.g. `2/3`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.index, self.total)
    }
}

/// Everything needed to render one output slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDescriptor {
    /// 1-based position among this note's slides.
    pub index: usize,

    /// Number of slides produced for this note.
    pub total: usize,

    /// Transcript runs in display order.
    pub runs: Vec<TextRun>,

    /// Present only when the note spans more than one slide.
    pub page: Option<PageIndicator>,
}

impl SlideDescriptor {
    /// Concatenated display text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_magic() {
        assert_eq!(
            PresentationFormat::from_magic(b"PK\x03\x04rest"),
            Some(PresentationFormat::Pptx)
        );
        assert_eq!(
            PresentationFormat::from_magic(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]),
            Some(PresentationFormat::Ppt)
        );
        assert_eq!(PresentationFormat::from_magic(b"PK"), None);
        assert_eq!(PresentationFormat::from_magic(b"%PDF-1.7"), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            PresentationFormat::from_extension("PPTX"),
            Some(PresentationFormat::Pptx)
        );
        assert_eq!(
            PresentationFormat::from_extension("ppt"),
            Some(PresentationFormat::Ppt)
        );
        assert_eq!(PresentationFormat::from_extension("key"), None);
    }

    #[test]
    fn test_deck_notes_skips_missing_and_blank() {
        let mut deck = SourceDeck::new("talk.pptx", PresentationFormat::Pptx);
        deck.add_slide(SourceSlide::with_notes(1, "  first\x0b note "));
        deck.add_slide(SourceSlide::new(2));
        deck.add_slide(SourceSlide::with_notes(3, " \x0b \n"));
        deck.add_slide(SourceSlide::with_notes(4, "last"));

        assert_eq!(deck.notes(), vec!["first note", "last"]);
    }

    #[test]
    fn test_chunk_char_len_counts_characters() {
        let chunk = Chunk::new(vec![
            Fragment::new(Some("仲條"), "こんにちは"),
            Fragment::new(None, "abc"),
        ]);
        assert_eq!(chunk.char_len(), 8);
    }

    #[test]
    fn test_page_indicator_label() {
        let page = PageIndicator { index: 2, total: 3 };
        assert_eq!(page.label(), "2/3");
    }
}
