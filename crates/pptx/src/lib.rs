//! PPTX (OOXML) backend for script slides.
//!
//! Reads speaker notes out of .pptx files, which are ZIP archives of XML
//! parts, and writes planned script slides back out in the same format.

pub mod reader;
mod templates;
pub mod writer;

pub use reader::{NotesReader, DEFAULT_MAX_INPUT_BYTES};
pub use writer::DeckWriter;
