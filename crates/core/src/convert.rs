//! End-to-end planning of a script deck from a sequence of notes.

use crate::chunk::Chunker;
use crate::color::{ColorAssigner, SpeakerPalette};
use crate::error::Result;
use crate::layout::LayoutPlanner;
use crate::segment::segment_note;
use crate::types::SlideDescriptor;
use serde::{Deserialize, Serialize};

/// The planned slides of one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePlan {
    /// 1-based position of the note among the notes converted.
    pub note: usize,

    /// Number of speaker segments after merging.
    pub segments: usize,

    pub slides: Vec<SlideDescriptor>,
}

/// All planned slides of a conversion, grouped by note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionPlan {
    pub notes: Vec<NotePlan>,
}

impl ConversionPlan {
    /// Slides in output order across all notes.
    pub fn slides(&self) -> impl Iterator<Item = &SlideDescriptor> {
        self.notes.iter().flat_map(|n| n.slides.iter())
    }

    pub fn slide_count(&self) -> usize {
        self.notes.iter().map(|n| n.slides.len()).sum()
    }
}

/// Converts notes into slide descriptors.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    chunker: Chunker,
    palette: SpeakerPalette,
    planner: LayoutPlanner,
}

impl Converter {
    /// Create a converter with the default budget and palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a chunker with a custom budget.
    pub fn with_chunker(mut self, chunker: Chunker) -> Self {
        self.chunker = chunker;
        self
    }

    /// Use a custom speaker palette.
    pub fn with_palette(mut self, palette: SpeakerPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Plan the slides for `notes`, in order.
    ///
    /// Speaker colors are assigned afresh for every call, so pool colors
    /// follow first appearance within these notes only.
    pub fn convert<S: AsRef<str>>(&self, notes: &[S]) -> Result<ConversionPlan> {
        let mut colors = ColorAssigner::new(self.palette.clone())?;
        let mut plan = ConversionPlan::default();

        for (i, note) in notes.iter().enumerate() {
            let segments = segment_note(note.as_ref());
            let chunks = self.chunker.chunk_segments(&segments);
            let slides = self.planner.plan_note(&chunks, &mut colors);

            if slides.is_empty() {
                log::debug!("Note {} produced no slides", i + 1);
            }

            plan.notes.push(NotePlan {
                note: i + 1,
                segments: segments.len(),
                slides,
            });
        }

        log::debug!(
            "Planned {} slides from {} notes ({} auto-colored speakers)",
            plan.slide_count(),
            notes.len(),
            colors.assigned_count()
        );

        Ok(plan)
    }
}
