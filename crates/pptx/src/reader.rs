//! Speaker notes reader for PPTX files.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use script_core::{Error, PresentationFormat, Result, SourceDeck, SourceSlide};
use std::io::{Cursor, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

/// Default upper bound on accepted input size (16 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Reads the speaker notes of every slide in a PPTX file.
pub struct NotesReader {
    max_input_bytes: u64,
}

impl NotesReader {
    /// Create a reader with the default size limit.
    pub fn new() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    /// Reject inputs larger than `bytes`.
    pub fn with_max_input_bytes(mut self, bytes: u64) -> Self {
        self.max_input_bytes = bytes;
        self
    }

    /// Check size and format of an uploaded file, then parse it.
    pub fn read_bytes(&self, data: &[u8], filename: &str) -> Result<SourceDeck> {
        let size = data.len() as u64;
        if size > self.max_input_bytes {
            return Err(Error::InputTooLarge {
                size,
                limit: self.max_input_bytes,
            });
        }

        let format = PresentationFormat::from_magic(data)
            .or_else(|| {
                filename
                    .rsplit_once('.')
                    .and_then(|(_, ext)| PresentationFormat::from_extension(ext))
            })
            .ok_or_else(|| Error::UnsupportedFormat(format!("{}: not a PowerPoint file", filename)))?;

        match format {
            PresentationFormat::Pptx => self.parse(Cursor::new(data), filename),
            PresentationFormat::Ppt => Err(Error::UnsupportedFormat(format!(
                "{}: legacy .ppt files are not supported, save it as .pptx",
                filename
            ))),
        }
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<SourceDeck> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut deck = SourceDeck::new(filename, PresentationFormat::Pptx);

        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("Found {} slides in {}", slide_order.len(), filename);

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let notes = self.read_slide_notes(&mut archive, slide_path)?;
            deck.add_slide(SourceSlide {
                number: idx + 1,
                notes,
            });
        }

        Ok(deck)
    }

    /// Get the ordered list of slide paths.
    ///
    /// The slide id list in `presentation.xml` decides the order; when it is
    /// absent, slides are sorted by the number in their relationship id.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = read_file_from_archive(archive, PRESENTATION_RELS_PATH)?;
        let mut slides: Vec<(String, String)> = parse_relationships(&rels_content)?
            .into_iter()
            .filter(|rel| rel.rel_type.ends_with("/slide"))
            .map(|rel| (rel.id, resolve_target("ppt", &rel.target)))
            .collect();

        let presentation = read_file_from_archive(archive, PRESENTATION_PATH)?;
        let listed = parse_slide_id_list(&presentation)?;

        if listed.is_empty() {
            slides.sort_by(|a, b| {
                match (extract_number(&a.0), extract_number(&b.0)) {
                    (Some(na), Some(nb)) => na.cmp(&nb),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => a.1.cmp(&b.1),
                }
            });
            return Ok(slides.into_iter().map(|(_, path)| path).collect());
        }

        let mut ordered = Vec::with_capacity(listed.len());
        for rid in listed {
            match slides.iter().find(|(id, _)| *id == rid) {
                Some((_, path)) => ordered.push(path.clone()),
                None => log::warn!("Slide id list references unknown relationship {}", rid),
            }
        }
        Ok(ordered)
    }

    /// Notes text of one slide, or `None` when it has no notes page.
    fn read_slide_notes<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
    ) -> Result<Option<String>> {
        let (dir, file) = slide_path.rsplit_once('/').unwrap_or(("", slide_path));
        let rels_path = format!("{}/_rels/{}.rels", dir, file);

        let rels_content = match read_optional_file(archive, &rels_path)? {
            Some(content) => content,
            None => return Ok(None),
        };

        let notes_target = parse_relationships(&rels_content)?
            .into_iter()
            .find(|rel| rel.rel_type.ends_with("/notesSlide"))
            .map(|rel| resolve_target(dir, &rel.target));

        let notes_path = match notes_target {
            Some(path) => path,
            None => return Ok(None),
        };

        match read_optional_file(archive, &notes_path)? {
            Some(xml) => extract_notes_text(&xml),
            None => {
                log::warn!("{} points at missing notes part {}", slide_path, notes_path);
                Ok(None)
            }
        }
    }
}

impl Default for NotesReader {
    fn default() -> Self {
        Self::new()
    }
}

/// One `<Relationship>` entry of a `.rels` part.
#[derive(Debug, Default)]
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel = Relationship::default();
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Id" => rel.id = value,
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        _ => {}
                    }
                }
                rels.push(rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Relationship ids of `<p:sldId>` entries, in presentation order.
fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                for attr in e.attributes().flatten() {
                    // r:id, whatever the relationships prefix is called
                    if local_name(attr.key.as_ref()) == b"id" && attr.key.as_ref() != b"id" {
                        ids.push(String::from_utf8_lossy(&attr.value).to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Whether a shape's `<p:ph>` marks it as the notes body placeholder.
fn is_body_placeholder(e: &BytesStart) -> bool {
    e.attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"type" && attr.value.as_ref() == b"body")
}

/// Extract the text of the body placeholder from a notes slide.
///
/// Paragraphs are joined with `\n`; soft line breaks become `\x0b`, the way
/// PowerPoint itself reports them.
fn extract_notes_text(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);

    let mut shape_depth = 0usize;
    let mut is_body = false;
    let mut in_text_body = false;
    let mut in_text = false;
    let mut paragraphs = 0usize;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    shape_depth += 1;
                    if shape_depth == 1 {
                        is_body = false;
                        paragraphs = 0;
                        current_text.clear();
                    }
                }
                b"ph" if shape_depth > 0 => is_body |= is_body_placeholder(e),
                b"txBody" => in_text_body = true,
                b"p" if in_text_body => {
                    if paragraphs > 0 {
                        current_text.push('\n');
                    }
                    paragraphs += 1;
                }
                b"t" if in_text_body => in_text = true,
                b"br" if in_text_body => current_text.push('\x0b'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"ph" if shape_depth > 0 => is_body |= is_body_placeholder(e),
                b"p" if in_text_body => {
                    if paragraphs > 0 {
                        current_text.push('\n');
                    }
                    paragraphs += 1;
                }
                b"br" if in_text_body => current_text.push('\x0b'),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::XmlError(format!("Bad notes text: {}", e)))?;
                    current_text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    shape_depth = shape_depth.saturating_sub(1);
                    if shape_depth == 0 && is_body {
                        return Ok(Some(current_text));
                    }
                }
                b"txBody" => in_text_body = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing notes slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(None)
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    read_optional_file(archive, path)?
        .ok_or_else(|| Error::PptxParseError(format!("File not found in archive '{}'", path)))
}

/// Read a file from the ZIP archive, or `None` if it does not exist.
fn read_optional_file<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<Option<String>> {
    let mut file = match archive.by_name(path) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(Error::ZipError(format!("Failed to open '{}': {}", path, e))),
    };

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(Some(content))
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut parts: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                parts.pop();
            }
            "." | "" => {}
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a trailing number from a string like "rId2" or "slide3.xml".
fn extract_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
