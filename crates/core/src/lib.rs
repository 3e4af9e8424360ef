//! Core domain types, speaker segmentation, chunk packing, color assignment,
//! and slide layout planning for script slides.

pub mod chunk;
pub mod color;
pub mod convert;
pub mod error;
pub mod layout;
pub mod note;
pub mod segment;
pub mod types;

pub use chunk::{Chunker, DEFAULT_BUDGET};
pub use color::{ColorAssigner, Rgb, SpeakerPalette};
pub use convert::{ConversionPlan, Converter, NotePlan};
pub use error::{Error, Result};
pub use layout::{LayoutPlanner, Rect, SlideStyle};
pub use note::clean_note;
pub use segment::segment_note;
pub use types::{
    Chunk, Fragment, PageIndicator, PresentationFormat, Segment, SlideDescriptor, SourceDeck,
    SourceSlide, TextRun,
};
