//! PPTX writer for planned script slides.
//!
//! Produces a minimal presentation package: one blank layout, one master and
//! theme, and one slide per descriptor.

use crate::templates::*;
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use script_core::layout::{cm_to_emu, FontStyle, Rect, EMU_PER_PT};
use script_core::{Error, Result, Rgb, SlideDescriptor, SlideStyle, TextRun};
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

type XmlWriter = Writer<Vec<u8>>;
type XmlResult<T> = quick_xml::Result<T>;

/// Relationship id of the first slide in `presentation.xml.rels`; the ids
/// before it are taken by the master, theme, and property parts.
const FIRST_SLIDE_REL: usize = 6;

/// First `<p:sldId>` id allowed by PresentationML.
const FIRST_SLIDE_ID: usize = 256;

/// Writes slide descriptors as a PPTX file.
#[derive(Debug, Clone, Default)]
pub struct DeckWriter {
    style: SlideStyle,
    title: Option<String>,
}

impl DeckWriter {
    /// Create a writer using the default slide style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom slide style.
    pub fn with_style(mut self, style: SlideStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the document title stored in the package properties.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Write a complete PPTX package to `writer`, one slide per descriptor.
    pub fn write<'a, W, I>(&self, slides: I, writer: W) -> Result<W>
    where
        W: Write + Seek,
        I: IntoIterator<Item = &'a SlideDescriptor>,
    {
        let slides: Vec<&SlideDescriptor> = slides.into_iter().collect();
        let mut zip = ZipWriter::new(writer);

        add_part(&mut zip, "[Content_Types].xml", &content_types_xml(slides.len()).map_err(xml_err)?)?;
        add_part(&mut zip, "_rels/.rels", &root_rels_xml().map_err(xml_err)?)?;
        add_part(&mut zip, "docProps/core.xml", &core_xml(self.title.as_deref()).map_err(xml_err)?)?;
        add_part(&mut zip, "docProps/app.xml", &app_xml(slides.len()).map_err(xml_err)?)?;

        add_part(&mut zip, "ppt/presentation.xml", &self.presentation_xml(slides.len()).map_err(xml_err)?)?;
        add_part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            &presentation_rels_xml(slides.len()).map_err(xml_err)?,
        )?;
        add_part(&mut zip, "ppt/presProps.xml", PRES_PROPS.as_bytes())?;
        add_part(&mut zip, "ppt/viewProps.xml", VIEW_PROPS.as_bytes())?;
        add_part(&mut zip, "ppt/tableStyles.xml", TABLE_STYLES.as_bytes())?;
        add_part(&mut zip, "ppt/theme/theme1.xml", THEME.as_bytes())?;
        add_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER.as_bytes())?;
        add_part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            SLIDE_MASTER_RELS.as_bytes(),
        )?;
        add_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes())?;
        add_part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            SLIDE_LAYOUT_RELS.as_bytes(),
        )?;

        for (i, slide) in slides.iter().enumerate() {
            let n = i + 1;
            let xml = self.slide_xml(slide).map_err(xml_err)?;
            add_part(&mut zip, &format!("ppt/slides/slide{}.xml", n), &xml)?;
            add_part(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                SLIDE_RELS.as_bytes(),
            )?;
        }

        log::debug!("Wrote {} slides", slides.len());

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
    }

    /// Write a complete PPTX package into memory.
    pub fn to_bytes<'a, I>(&self, slides: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = &'a SlideDescriptor>,
    {
        Ok(self.write(slides, Cursor::new(Vec::new()))?.into_inner())
    }

    fn presentation_xml(&self, slide_count: usize) -> XmlResult<Vec<u8>> {
        let cx = cm_to_emu(self.style.slide_width).to_string();
        let cy = cm_to_emu(self.style.slide_height).to_string();
        let master_id = SLIDE_MASTER_ID.to_string();

        let mut w = new_document()?;
        w.create_element("p:presentation")
            .with_attribute(("xmlns:a", NS_A))
            .with_attribute(("xmlns:r", NS_R))
            .with_attribute(("xmlns:p", NS_P))
            .with_attribute(("saveSubsetFonts", "1"))
            .write_inner_content(|w| {
                w.create_element("p:sldMasterIdLst").write_inner_content(|w| {
                    w.create_element("p:sldMasterId")
                        .with_attribute(("id", master_id.as_str()))
                        .with_attribute(("r:id", "rId1"))
                        .write_empty()?;
                    Ok::<(), quick_xml::Error>(())
                })?;

                if slide_count > 0 {
                    w.create_element("p:sldIdLst").write_inner_content(|w| {
                        for i in 0..slide_count {
                            let id = (FIRST_SLIDE_ID + i).to_string();
                            let rid = format!("rId{}", FIRST_SLIDE_REL + i);
                            w.create_element("p:sldId")
                                .with_attribute(("id", id.as_str()))
                                .with_attribute(("r:id", rid.as_str()))
                                .write_empty()?;
                        }
                        Ok::<(), quick_xml::Error>(())
                    })?;
                }

                w.create_element("p:sldSz")
                    .with_attribute(("cx", cx.as_str()))
                    .with_attribute(("cy", cy.as_str()))
                    .write_empty()?;
                w.create_element("p:notesSz")
                    .with_attribute(("cx", "6858000"))
                    .with_attribute(("cy", "9144000"))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(w.into_inner())
    }

    fn slide_xml(&self, slide: &SlideDescriptor) -> XmlResult<Vec<u8>> {
        let style = &self.style;

        let mut w = new_document()?;
        w.create_element("p:sld")
            .with_attribute(("xmlns:a", NS_A))
            .with_attribute(("xmlns:r", NS_R))
            .with_attribute(("xmlns:p", NS_P))
            .write_inner_content(|w| {
                w.create_element("p:cSld").write_inner_content(|w| {
                    write_background(w, style.background)?;
                    w.create_element("p:spTree").write_inner_content(|w| {
                        write_group_properties(w)?;
                        write_transcript_box(w, style, &slide.runs)?;
                        write_frame(w, style)?;
                        if let Some(page) = slide.page {
                            write_page_box(w, style, &page.label())?;
                        }
                        Ok::<(), quick_xml::Error>(())
                    })?;
                    Ok::<(), quick_xml::Error>(())
                })?;
                w.create_element("p:clrMapOvr").write_inner_content(|w| {
                    w.create_element("a:masterClrMapping").write_empty()?;
                    Ok::<(), quick_xml::Error>(())
                })?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(w.into_inner())
    }
}

fn xml_err(e: quick_xml::Error) -> Error {
    Error::XmlError(format!("Failed to write XML: {}", e))
}

fn add_part<W: Write + Seek>(zip: &mut ZipWriter<W>, name: &str, content: &[u8]) -> Result<()> {
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(name, options)
        .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
    zip.write_all(content)?;
    Ok(())
}

fn new_document() -> XmlResult<XmlWriter> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(w)
}

fn content_types_xml(slide_count: usize) -> XmlResult<Vec<u8>> {
    let mut overrides: Vec<(String, &str)> = vec![
        ("/ppt/presentation.xml".to_string(), CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), CT_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), CT_SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml".to_string(), CT_THEME),
        ("/ppt/presProps.xml".to_string(), CT_PRES_PROPS),
        ("/ppt/viewProps.xml".to_string(), CT_VIEW_PROPS),
        ("/ppt/tableStyles.xml".to_string(), CT_TABLE_STYLES),
        ("/docProps/core.xml".to_string(), CT_CORE_PROPERTIES),
        ("/docProps/app.xml".to_string(), CT_EXTENDED_PROPERTIES),
    ];
    overrides.extend((1..=slide_count).map(|n| (format!("/ppt/slides/slide{}.xml", n), CT_SLIDE)));

    let mut w = new_document()?;
    w.create_element("Types")
        .with_attribute(("xmlns", NS_CONTENT_TYPES))
        .write_inner_content(|w| {
            w.create_element("Default")
                .with_attribute(("Extension", "rels"))
                .with_attribute(("ContentType", CT_RELATIONSHIPS))
                .write_empty()?;
            w.create_element("Default")
                .with_attribute(("Extension", "xml"))
                .with_attribute(("ContentType", "application/xml"))
                .write_empty()?;
            for (part, content_type) in &overrides {
                w.create_element("Override")
                    .with_attribute(("PartName", part.as_str()))
                    .with_attribute(("ContentType", *content_type))
                    .write_empty()?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
    Ok(w.into_inner())
}

/// A `.rels` part from (id, type, target) triples.
fn relationships_xml(rels: &[(String, &str, String)]) -> XmlResult<Vec<u8>> {
    let mut w = new_document()?;
    w.create_element("Relationships")
        .with_attribute(("xmlns", NS_PACKAGE_RELS))
        .write_inner_content(|w| {
            for (id, rel_type, target) in rels {
                w.create_element("Relationship")
                    .with_attribute(("Id", id.as_str()))
                    .with_attribute(("Type", *rel_type))
                    .with_attribute(("Target", target.as_str()))
                    .write_empty()?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
    Ok(w.into_inner())
}

fn root_rels_xml() -> XmlResult<Vec<u8>> {
    relationships_xml(&[
        ("rId1".to_string(), REL_OFFICE_DOCUMENT, "ppt/presentation.xml".to_string()),
        ("rId2".to_string(), REL_CORE_PROPERTIES, "docProps/core.xml".to_string()),
        ("rId3".to_string(), REL_EXTENDED_PROPERTIES, "docProps/app.xml".to_string()),
    ])
}

fn presentation_rels_xml(slide_count: usize) -> XmlResult<Vec<u8>> {
    let mut rels = vec![
        ("rId1".to_string(), REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string()),
        ("rId2".to_string(), REL_THEME, "theme/theme1.xml".to_string()),
        ("rId3".to_string(), REL_PRES_PROPS, "presProps.xml".to_string()),
        ("rId4".to_string(), REL_VIEW_PROPS, "viewProps.xml".to_string()),
        ("rId5".to_string(), REL_TABLE_STYLES, "tableStyles.xml".to_string()),
    ];
    rels.extend((0..slide_count).map(|i| {
        (
            format!("rId{}", FIRST_SLIDE_REL + i),
            REL_SLIDE,
            format!("slides/slide{}.xml", i + 1),
        )
    }));
    relationships_xml(&rels)
}

fn core_xml(title: Option<&str>) -> XmlResult<Vec<u8>> {
    let mut w = new_document()?;
    w.create_element("cp:coreProperties")
        .with_attribute((
            "xmlns:cp",
            "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
        ))
        .with_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"))
        .with_attribute(("xmlns:dcterms", "http://purl.org/dc/terms/"))
        .with_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"))
        .write_inner_content(|w| {
            if let Some(title) = title {
                w.create_element("dc:title")
                    .write_text_content(BytesText::new(title))?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
    Ok(w.into_inner())
}

fn app_xml(slide_count: usize) -> XmlResult<Vec<u8>> {
    let slides = slide_count.to_string();

    let mut w = new_document()?;
    w.create_element("Properties")
        .with_attribute((
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        ))
        .write_inner_content(|w| {
            w.create_element("Application")
                .write_text_content(BytesText::new("script-slides"))?;
            w.create_element("Slides")
                .write_text_content(BytesText::new(&slides))?;
            Ok::<(), quick_xml::Error>(())
        })?;
    Ok(w.into_inner())
}

fn write_solid_fill(w: &mut XmlWriter, color: Rgb) -> XmlResult<()> {
    let hex = color.hex();
    w.create_element("a:solidFill").write_inner_content(|w| {
        w.create_element("a:srgbClr")
            .with_attribute(("val", hex.as_str()))
            .write_empty()?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_background(w: &mut XmlWriter, color: Rgb) -> XmlResult<()> {
    w.create_element("p:bg").write_inner_content(|w| {
        w.create_element("p:bgPr").write_inner_content(|w| {
            write_solid_fill(w, color)?;
            w.create_element("a:effectLst").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_group_properties(w: &mut XmlWriter) -> XmlResult<()> {
    w.create_element("p:nvGrpSpPr").write_inner_content(|w| {
        w.create_element("p:cNvPr")
            .with_attribute(("id", "1"))
            .with_attribute(("name", ""))
            .write_empty()?;
        w.create_element("p:cNvGrpSpPr").write_empty()?;
        w.create_element("p:nvPr").write_empty()?;
        Ok::<(), quick_xml::Error>(())
    })?;
    w.create_element("p:grpSpPr").write_inner_content(|w| {
        w.create_element("a:xfrm").write_inner_content(|w| {
            for (name, x, y) in [("a:off", "x", "y"), ("a:ext", "cx", "cy"), ("a:chOff", "x", "y"), ("a:chExt", "cx", "cy")] {
                w.create_element(name)
                    .with_attribute((x, "0"))
                    .with_attribute((y, "0"))
                    .write_empty()?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_shape_names(w: &mut XmlWriter, id: u32, name: &str, text_box: bool) -> XmlResult<()> {
    let id = id.to_string();
    w.create_element("p:nvSpPr").write_inner_content(|w| {
        w.create_element("p:cNvPr")
            .with_attribute(("id", id.as_str()))
            .with_attribute(("name", name))
            .write_empty()?;
        if text_box {
            w.create_element("p:cNvSpPr")
                .with_attribute(("txBox", "1"))
                .write_empty()?;
        } else {
            w.create_element("p:cNvSpPr").write_empty()?;
        }
        w.create_element("p:nvPr").write_empty()?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_xfrm(w: &mut XmlWriter, rect: &Rect) -> XmlResult<()> {
    let (x, y, cx, cy) = rect.emu();
    let (x, y, cx, cy) = (x.to_string(), y.to_string(), cx.to_string(), cy.to_string());
    w.create_element("a:xfrm").write_inner_content(|w| {
        w.create_element("a:off")
            .with_attribute(("x", x.as_str()))
            .with_attribute(("y", y.as_str()))
            .write_empty()?;
        w.create_element("a:ext")
            .with_attribute(("cx", cx.as_str()))
            .with_attribute(("cy", cy.as_str()))
            .write_empty()?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_rect_geometry(w: &mut XmlWriter) -> XmlResult<()> {
    w.create_element("a:prstGeom")
        .with_attribute(("prst", "rect"))
        .write_inner_content(|w| {
            w.create_element("a:avLst").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;
    Ok(())
}

fn write_run(w: &mut XmlWriter, text: &str, font: &FontStyle, color: Rgb) -> XmlResult<()> {
    let size = (font.size_pt * 100).to_string();
    let bold = if font.bold { "1" } else { "0" };

    w.create_element("a:r").write_inner_content(|w| {
        w.create_element("a:rPr")
            .with_attribute(("lang", "ja-JP"))
            .with_attribute(("altLang", "en-US"))
            .with_attribute(("sz", size.as_str()))
            .with_attribute(("b", bold))
            .with_attribute(("dirty", "0"))
            .write_inner_content(|w| {
                write_solid_fill(w, color)?;
                w.create_element("a:latin")
                    .with_attribute(("typeface", font.typeface.as_str()))
                    .write_empty()?;
                w.create_element("a:ea")
                    .with_attribute(("typeface", font.typeface.as_str()))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
        w.create_element("a:t").write_text_content(BytesText::new(text))?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

/// Text box with word wrap and a single paragraph holding every run.
fn write_transcript_box(w: &mut XmlWriter, style: &SlideStyle, runs: &[TextRun]) -> XmlResult<()> {
    w.create_element("p:sp").write_inner_content(|w| {
        write_shape_names(w, 2, "TextBox 1", true)?;
        w.create_element("p:spPr").write_inner_content(|w| {
            write_xfrm(w, &style.text_box)?;
            write_rect_geometry(w)?;
            w.create_element("a:noFill").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;
        w.create_element("p:txBody").write_inner_content(|w| {
            w.create_element("a:bodyPr")
                .with_attribute(("wrap", "square"))
                .with_attribute(("rtlCol", "0"))
                .write_empty()?;
            w.create_element("a:lstStyle").write_empty()?;
            w.create_element("a:p").write_inner_content(|w| {
                w.create_element("a:pPr").write_inner_content(|w| {
                    for spacing in ["a:spcBef", "a:spcAft"] {
                        w.create_element(spacing).write_inner_content(|w| {
                            w.create_element("a:spcPts")
                                .with_attribute(("val", "0"))
                                .write_empty()?;
                            Ok::<(), quick_xml::Error>(())
                        })?;
                    }
                    Ok::<(), quick_xml::Error>(())
                })?;
                for run in runs {
                    write_run(w, &run.text, &style.text_font, run.color)?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

/// Filled rectangle in the lower right corner.
fn write_frame(w: &mut XmlWriter, style: &SlideStyle) -> XmlResult<()> {
    let line_width = (i64::from(style.frame_line_pt) * EMU_PER_PT).to_string();

    w.create_element("p:sp").write_inner_content(|w| {
        write_shape_names(w, 3, "Rectangle 2", false)?;
        w.create_element("p:spPr").write_inner_content(|w| {
            write_xfrm(w, &style.frame)?;
            write_rect_geometry(w)?;
            write_solid_fill(w, style.frame_fill)?;
            w.create_element("a:ln")
                .with_attribute(("w", line_width.as_str()))
                .write_inner_content(|w| write_solid_fill(w, style.frame_line))?;
            Ok::<(), quick_xml::Error>(())
        })?;
        w.create_element("p:txBody").write_inner_content(|w| {
            w.create_element("a:bodyPr")
                .with_attribute(("rtlCol", "0"))
                .with_attribute(("anchor", "ctr"))
                .write_empty()?;
            w.create_element("a:lstStyle").write_empty()?;
            w.create_element("a:p").write_inner_content(|w| {
                w.create_element("a:pPr")
                    .with_attribute(("algn", "ctr"))
                    .write_empty()?;
                w.create_element("a:endParaRPr")
                    .with_attribute(("lang", "ja-JP"))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_page_box(w: &mut XmlWriter, style: &SlideStyle, label: &str) -> XmlResult<()> {
    w.create_element("p:sp").write_inner_content(|w| {
        write_shape_names(w, 4, "TextBox 3", true)?;
        w.create_element("p:spPr").write_inner_content(|w| {
            write_xfrm(w, &style.page_box)?;
            write_rect_geometry(w)?;
            w.create_element("a:noFill").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;
        w.create_element("p:txBody").write_inner_content(|w| {
            w.create_element("a:bodyPr")
                .with_attribute(("wrap", "none"))
                .with_attribute(("rtlCol", "0"))
                .write_empty()?;
            w.create_element("a:lstStyle").write_empty()?;
            w.create_element("a:p").write_inner_content(|w| {
                w.create_element("a:pPr")
                    .with_attribute(("algn", "l"))
                    .write_empty()?;
                write_run(w, label, &style.page_font, style.page_color)
            })?;
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NotesReader;
    use script_core::{Converter, PageIndicator};
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn descriptor(text: &str, color: Rgb, page: Option<PageIndicator>) -> SlideDescriptor {
        SlideDescriptor {
            index: page.map_or(1, |p| p.index),
            total: page.map_or(1, |p| p.total),
            runs: vec![TextRun {
                text: text.to_string(),
                color,
            }],
            page,
        }
    }

    #[test]
    fn test_slide_contains_runs_and_decoration() {
        let slides = vec![descriptor("《仲條》A & B", Rgb(0x00, 0xFD, 0xFF), None)];
        let bytes = DeckWriter::new().to_bytes(&slides).unwrap();

        let xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(xml.contains("<a:t>《仲條》A &amp; B</a:t>"));
        assert!(xml.contains(r#"<a:srgbClr val="00FDFF"/>"#));
        assert!(xml.contains(r#"sz="4000""#));
        assert!(xml.contains(r#"typeface="メイリオ""#));
        // black background
        assert!(xml.contains(r#"<p:bgPr><a:solidFill><a:srgbClr val="000000"/>"#));
        // frame rectangle
        assert!(xml.contains(r#"<a:off x="9313200" y="5238000"/>"#));
        assert!(xml.contains(r#"<a:ln w="25400"><a:solidFill><a:srgbClr val="646464"/>"#));
        // no page indicator for a single slide
        assert!(!xml.contains("009DFF"));
    }

    #[test]
    fn test_page_indicator_only_when_present() {
        let slides = vec![
            descriptor("one", Rgb::WHITE, Some(PageIndicator { index: 1, total: 2 })),
            descriptor("two", Rgb::WHITE, Some(PageIndicator { index: 2, total: 2 })),
        ];
        let bytes = DeckWriter::new().to_bytes(&slides).unwrap();

        let second = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(second.contains("<a:t>2/2</a:t>"));
        assert!(second.contains(r#"<a:srgbClr val="009DFF"/>"#));
        assert!(second.contains(r#"sz="3200""#));
    }

    #[test]
    fn test_package_lists_every_slide() {
        let plan = Converter::new()
            .convert(&["《A》one", "《B》two", "《C》three"])
            .unwrap();
        let bytes = DeckWriter::new()
            .with_title("script")
            .to_bytes(plan.slides())
            .unwrap();

        let content_types = read_part(&bytes, "[Content_Types].xml");
        assert!(content_types.contains(r#"PartName="/ppt/slides/slide3.xml""#));

        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains(r#"<p:sldSz cx="12192120" cy="6858000"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="258" r:id="rId8"/>"#));

        assert!(read_part(&bytes, "docProps/core.xml").contains("<dc:title>script</dc:title>"));
    }

    #[test]
    fn test_output_reads_back_in_order() {
        let plan = Converter::new().convert(&["《A》one", "《B》two"]).unwrap();
        let bytes = DeckWriter::new().to_bytes(plan.slides()).unwrap();

        let deck = NotesReader::new().read_bytes(&bytes, "out.pptx").unwrap();
        assert_eq!(deck.slides.len(), 2);
        assert!(deck.notes().is_empty());

        for (i, slide) in plan.slides().enumerate() {
            let xml = read_part(&bytes, &format!("ppt/slides/slide{}.xml", i + 1));
            assert!(xml.contains(&format!("<a:t>{}</a:t>", slide.text())));
        }
        let texts: Vec<String> = plan.slides().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["《A》one", "《B》two"]);
    }

    #[test]
    fn test_empty_deck_is_still_a_package() {
        let bytes = DeckWriter::new().to_bytes(&[]).unwrap();
        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(!presentation.contains("sldIdLst"));
        assert!(read_part(&bytes, "ppt/slideMasters/slideMaster1.xml").contains("sldLayoutId"));
    }
}
