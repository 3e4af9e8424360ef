//! Slide layout planning.
//!
//! Turns a note's chunks into slide descriptors, and holds the fixed slide
//! geometry every output slide shares.

use crate::color::{ColorAssigner, Rgb};
use crate::types::{Chunk, PageIndicator, SlideDescriptor, TextRun};
use serde::{Deserialize, Serialize};

/// English Metric Units per centimetre.
pub const EMU_PER_CM: f64 = 360_000.0;

/// EMU per typographic point.
pub const EMU_PER_PT: i64 = 12_700;

/// Convert centimetres to EMU.
pub fn cm_to_emu(cm: f64) -> i64 {
    (cm * EMU_PER_CM).round() as i64
}

/// A rectangle positioned on the slide, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// (x, y, cx, cy) in EMU.
    pub fn emu(&self) -> (i64, i64, i64, i64) {
        (
            cm_to_emu(self.left),
            cm_to_emu(self.top),
            cm_to_emu(self.width),
            cm_to_emu(self.height),
        )
    }
}

/// Font settings for a text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub typeface: String,
    pub size_pt: u32,
    pub bold: bool,
}

/// Fixed look of every generated slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideStyle {
    /// Slide width in centimetres (16:9).
    pub slide_width: f64,
    /// Slide height in centimetres.
    pub slide_height: f64,
    pub background: Rgb,

    /// Transcript text box, clear of the frame in the lower right.
    pub text_box: Rect,
    pub text_font: FontStyle,

    /// Decorative frame in the lower right corner.
    pub frame: Rect,
    pub frame_fill: Rgb,
    pub frame_line: Rgb,
    pub frame_line_pt: u32,

    /// Page indicator box, only drawn for notes that span several slides.
    pub page_box: Rect,
    pub page_font: FontStyle,
    pub page_color: Rgb,
}

impl Default for SlideStyle {
    fn default() -> Self {
        let meiryo = |size_pt| FontStyle {
            typeface: "メイリオ".to_string(),
            size_pt,
            bold: true,
        };

        Self {
            slide_width: 33.867,
            slide_height: 19.05,
            background: Rgb::BLACK,
            text_box: Rect::new(0.79, 0.80, 25.2, 15.6),
            text_font: meiryo(40),
            frame: Rect::new(25.87, 14.55, 8.0, 4.5),
            frame_fill: Rgb(0xF0, 0xF0, 0xF0),
            frame_line: Rgb(0x64, 0x64, 0x64),
            frame_line_pt: 2,
            page_box: Rect::new(21.94, 16.93, 4.0, 1.5),
            page_font: meiryo(32),
            page_color: Rgb(0x00, 0x9D, 0xFF),
        }
    }
}

/// Display text of one fragment: `《name》` prefix when a speaker is set.
fn run_text(speaker: Option<&str>, text: &str) -> String {
    match speaker {
        Some(name) if !name.is_empty() => format!("《{}》{}", name, text),
        _ => text.to_string(),
    }
}

/// Plans one slide per chunk.
#[derive(Debug, Clone, Default)]
pub struct LayoutPlanner;

impl LayoutPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Plan the slides of one note.
    ///
    /// Colors come from `colors`, which must be the assigner shared by every
    /// note of the same conversion.
    pub fn plan_note(&self, chunks: &[Chunk], colors: &mut ColorAssigner) -> Vec<SlideDescriptor> {
        let total = chunks.len();

        chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                let index = i + 1;
                let runs = chunk
                    .fragments
                    .iter()
                    .map(|fragment| {
                        let speaker = fragment.speaker.as_deref();
                        TextRun {
                            text: run_text(speaker, &fragment.text),
                            color: colors.color_for(speaker),
                        }
                    })
                    .collect();

                SlideDescriptor {
                    index,
                    total,
                    runs,
                    page: (total > 1).then_some(PageIndicator { index, total }),
                }
            })
            .collect()
    }
}
