/// Slide types and implementation for PPTX presentations.
use std::fmt::Write as FmtWrite;

use crate::common::unit::Rect;
use crate::common::xml::escape_text;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::backgrounds::{Fill, SlideBackground};

use super::super::format::ImageFormat;
use super::relmap::RelationshipMapper;
use super::shape::{MutableShape, Placeholder, ShapeType, TextParagraph};

/// Slide layouts available in the generated master.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideLayoutKind {
    /// Centered title and subtitle
    TitleSlide,
    /// Title and a single body region
    TitleAndContent,
}

impl SlideLayoutKind {
    /// 1-based number of the layout part (`slideLayoutN.xml`).
    pub fn layout_number(self) -> usize {
        match self {
            SlideLayoutKind::TitleSlide => 1,
            SlideLayoutKind::TitleAndContent => 2,
        }
    }
}

/// A mutable slide in a presentation.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Slide ID (unique identifier, 256 and up)
    pub(crate) slide_id: u32,
    pub(crate) layout: SlideLayoutKind,
    pub(crate) shapes: Vec<MutableShape>,
    /// Speaker notes for the slide
    pub(crate) notes: Option<String>,
    pub(crate) background: Option<SlideBackground>,
    /// Group shape takes id 1; shapes are numbered from 2.
    next_shape_id: u32,
}

impl MutableSlide {
    pub(crate) fn new(slide_id: u32, layout: SlideLayoutKind) -> Self {
        Self {
            slide_id,
            layout,
            shapes: Vec::new(),
            notes: None,
            background: None,
            next_shape_id: 2,
        }
    }

    #[inline]
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    #[inline]
    pub fn layout(&self) -> SlideLayoutKind {
        self.layout
    }

    /// Set the speaker notes. Blank text clears them.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes.to_string())
        };
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    #[inline]
    pub fn has_notes(&self) -> bool {
        self.notes.is_some()
    }

    pub fn set_background(&mut self, background: SlideBackground) {
        self.background = Some(background);
    }

    pub fn background(&self) -> Option<&SlideBackground> {
        self.background.as_ref()
    }

    /// Add a free-floating text box.
    pub fn add_text_box(&mut self, rect: Rect, paragraphs: Vec<TextParagraph>) -> &mut MutableShape {
        self.push_shape(|id| MutableShape::new_text(id, rect, paragraphs, None))
    }

    /// Add a text shape bound to a layout placeholder.
    pub fn add_placeholder(
        &mut self,
        placeholder: Placeholder,
        rect: Rect,
        paragraphs: Vec<TextParagraph>,
    ) -> &mut MutableShape {
        self.push_shape(|id| MutableShape::new_text(id, rect, paragraphs, Some(placeholder)))
    }

    pub fn add_rectangle(&mut self, rect: Rect, fill: Fill) -> &mut MutableShape {
        self.push_shape(|id| MutableShape::new_rectangle(id, rect, fill))
    }

    /// Add a picture whose format was already detected.
    pub fn add_picture(
        &mut self,
        data: Vec<u8>,
        format: ImageFormat,
        rect: Rect,
        description: impl Into<String>,
    ) -> &mut MutableShape {
        let description = description.into();
        self.push_shape(|id| MutableShape::new_picture(id, data, format, rect, description))
    }

    fn push_shape(&mut self, make: impl FnOnce(u32) -> MutableShape) -> &mut MutableShape {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        let index = self.shapes.len();
        self.shapes.push(make(id));
        &mut self.shapes[index]
    }

    pub fn shapes(&self) -> &[MutableShape] {
        &self.shapes
    }

    #[inline]
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Text of the title placeholder, if any.
    pub fn title(&self) -> Option<String> {
        self.shapes
            .iter()
            .find(|s| matches!(s.placeholder(), Some(Placeholder::Title | Placeholder::CenteredTitle)))
            .and_then(MutableShape::text)
    }

    /// Images on this slide, in shape order.
    pub(crate) fn collect_images(&self) -> Vec<(&[u8], ImageFormat)> {
        self.shapes.iter().filter_map(MutableShape::get_image_data).collect()
    }

    /// Generate slide XML content with relationship IDs from the mapper.
    pub(crate) fn to_xml_with_rels(&self, slide_index: usize, rel_mapper: &RelationshipMapper) -> Result<String> {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#);
        xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);

        xml.push_str("<p:cSld>");

        // Background must come before spTree.
        if let Some(ref background) = self.background {
            xml.push_str(&background.to_xml()?);
        }

        xml.push_str("<p:spTree>");
        write_group_properties(&mut xml);

        let mut image_counter = 0;
        for shape in &self.shapes {
            let rel_id = match shape.shape_type {
                ShapeType::Picture { .. } => {
                    let rid = rel_mapper.get_image_id(slide_index, image_counter);
                    image_counter += 1;
                    rid
                },
                _ => None,
            };
            shape.to_xml(&mut xml, rel_id)?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }

    /// Generate notes slide XML content, if the slide has notes.
    pub(crate) fn generate_notes_xml(&self) -> Option<Result<String>> {
        let notes_text = self.notes.as_ref()?;

        let mut xml = String::with_capacity(1024 + notes_text.len());

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:notes xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#);
        xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);

        xml.push_str("<p:cSld>");
        xml.push_str("<p:spTree>");
        write_group_properties(&mut xml);

        // Slide thumbnail
        xml.push_str("<p:sp>");
        xml.push_str(r#"<p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#);
        xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#);
        xml.push_str(r#"<p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr>"#);
        xml.push_str("<p:spPr/>");
        xml.push_str("</p:sp>");

        // Notes text
        xml.push_str("<p:sp>");
        xml.push_str(r#"<p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/>"#);
        xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
        xml.push_str(r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>"#);
        xml.push_str("<p:spPr/>");
        xml.push_str("<p:txBody>");
        xml.push_str("<a:bodyPr/>");
        xml.push_str("<a:lstStyle/>");
        for line in notes_text.lines() {
            if line.trim().is_empty() {
                xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
                continue;
            }
            xml.push_str(r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/>"#);
            if let Err(e) = write!(xml, "<a:t>{}</a:t>", escape_text(line)) {
                return Some(Err(OoxmlError::Xml(e.to_string())));
            }
            xml.push_str("</a:r></a:p>");
        }
        xml.push_str("</p:txBody>");
        xml.push_str("</p:sp>");

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:notes>");

        Some(Ok(xml))
    }
}

/// Write the required group shape properties of a shape tree.
pub(crate) fn write_group_properties(xml: &mut String) {
    xml.push_str("<p:nvGrpSpPr>");
    xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
    xml.push_str("<p:cNvGrpSpPr/>");
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvGrpSpPr>");
    xml.push_str("<p:grpSpPr>");
    xml.push_str("<a:xfrm>");
    xml.push_str(r#"<a:off x="0" y="0"/>"#);
    xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
    xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
    xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
    xml.push_str("</a:xfrm>");
    xml.push_str("</p:grpSpPr>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::format::TextFormat;
    use crate::theme::Rgb;

    fn para(text: &str) -> Vec<TextParagraph> {
        vec![TextParagraph::new(text, TextFormat::new())]
    }

    #[test]
    fn test_shape_ids_are_unique() {
        let mut slide = MutableSlide::new(256, SlideLayoutKind::TitleAndContent);
        let a = slide.add_placeholder(Placeholder::Title, Rect::default(), para("T")).shape_id();
        let b = slide.add_rectangle(Rect::default(), Fill::Solid(Rgb::hex(0))).shape_id();
        let c = slide.add_text_box(Rect::default(), para("badge")).shape_id();
        assert_eq!((a, b, c), (2, 3, 4));
        assert_eq!(slide.shape_count(), 3);
        assert_eq!(slide.title().as_deref(), Some("T"));
    }

    #[test]
    fn test_slide_xml_with_picture() {
        let mut slide = MutableSlide::new(256, SlideLayoutKind::TitleAndContent);
        slide.set_background(SlideBackground::linear_gradient(315.0, Rgb::hex(1), Rgb::hex(2)));
        slide.add_picture(b"\x89PNG\r\n\x1a\n".to_vec(), ImageFormat::Png, Rect::default(), "photo");

        let mut rels = RelationshipMapper::new();
        rels.add_image(0, 0, "rId2".to_string());
        let xml = slide.to_xml_with_rels(0, &rels).unwrap();

        let bg = xml.find("<p:bg>").unwrap();
        let tree = xml.find("<p:spTree>").unwrap();
        assert!(bg < tree);
        assert!(xml.contains(r#"r:embed="rId2""#));
        assert_eq!(slide.collect_images().len(), 1);
    }

    #[test]
    fn test_notes_xml() {
        let mut slide = MutableSlide::new(256, SlideLayoutKind::TitleSlide);
        assert!(slide.generate_notes_xml().is_none());

        slide.set_notes("Welcome everyone.\n\nToday: Q3 & Q4");
        let xml = slide.generate_notes_xml().unwrap().unwrap();
        assert!(xml.contains(r#"<p:ph type="body" idx="1"/>"#));
        assert!(xml.contains("<a:t>Today: Q3 &amp; Q4</a:t>"));

        slide.set_notes("   ");
        assert!(!slide.has_notes());
    }
}
