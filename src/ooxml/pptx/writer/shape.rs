/// Shape types and implementation for PPTX presentations.
use std::fmt::Write as FmtWrite;

use crate::common::unit::{Rect, pt_to_centipoints};
use crate::common::xml::{escape_text, escape_xml};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::backgrounds::Fill;

pub use super::super::format::{Alignment, ImageFormat, TextFormat};

/// Layout placeholder a text shape is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `ctrTitle` of the Title Slide layout
    CenteredTitle,
    /// `subTitle` (idx 1) of the Title Slide layout
    Subtitle,
    /// `title` of the content layout
    Title,
    /// Content body (idx 1)
    Body,
}

impl Placeholder {
    fn ph_xml(self) -> &'static str {
        match self {
            Placeholder::CenteredTitle => r#"<p:ph type="ctrTitle"/>"#,
            Placeholder::Subtitle => r#"<p:ph type="subTitle" idx="1"/>"#,
            Placeholder::Title => r#"<p:ph type="title"/>"#,
            Placeholder::Body => r#"<p:ph idx="1"/>"#,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Placeholder::CenteredTitle | Placeholder::Title => "Title",
            Placeholder::Subtitle => "Subtitle",
            Placeholder::Body => "Content Placeholder",
        }
    }
}

/// How a text body reacts to overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAutofit {
    #[default]
    None,
    /// Shrink text on overflow.
    ShrinkText,
}

/// One paragraph of a text body, drawn as a single run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextParagraph {
    pub text: String,
    pub format: TextFormat,
    pub alignment: Alignment,
    /// Space before, in points
    pub space_before: Option<f64>,
    /// Space after, in points
    pub space_after: Option<f64>,
}

impl TextParagraph {
    pub fn new(text: impl Into<String>, format: TextFormat) -> Self {
        Self {
            text: text.into(),
            format,
            ..Default::default()
        }
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Equal spacing before and after, in points.
    pub fn spacing(mut self, pt: f64) -> Self {
        self.space_before = Some(pt);
        self.space_after = Some(pt);
        self
    }

    fn write_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<a:p>");

        write!(xml, r#"<a:pPr algn="{}">"#, self.alignment.as_attr())
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        if let Some(before) = self.space_before {
            write!(xml, r#"<a:spcBef><a:spcPts val="{}"/></a:spcBef>"#, pt_to_centipoints(before))
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        }
        if let Some(after) = self.space_after {
            write!(xml, r#"<a:spcAft><a:spcPts val="{}"/></a:spcAft>"#, pt_to_centipoints(after))
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        }
        xml.push_str("</a:pPr>");

        xml.push_str("<a:r>");
        write_run_properties(xml, &self.format)?;
        write!(xml, "<a:t>{}</a:t>", escape_text(&self.text))
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        xml.push_str("</a:r>");

        xml.push_str("</a:p>");
        Ok(())
    }
}

fn write_run_properties(xml: &mut String, format: &TextFormat) -> Result<()> {
    xml.push_str(r#"<a:rPr lang="en-US""#);
    if let Some(size) = format.size {
        write!(xml, r#" sz="{}""#, pt_to_centipoints(size)).map_err(|e| OoxmlError::Xml(e.to_string()))?;
    }
    if let Some(bold) = format.bold {
        xml.push_str(if bold { r#" b="1""# } else { r#" b="0""# });
    }
    if let Some(true) = format.italic {
        xml.push_str(r#" i="1""#);
    }
    xml.push_str(r#" dirty="0">"#);

    // Fill must precede the typeface elements.
    if let Some(color) = format.color {
        write!(xml, r#"<a:solidFill><a:srgbClr val="{color}"/></a:solidFill>"#)
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    }
    if let Some(ref font) = format.font {
        let font = escape_xml(font);
        write!(xml, r#"<a:latin typeface="{font}"/><a:cs typeface="{font}"/>"#)
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    }

    xml.push_str("</a:rPr>");
    Ok(())
}

/// A shape on a slide (text box, placeholder, rectangle or picture).
#[derive(Debug, Clone)]
pub struct MutableShape {
    pub(crate) shape_id: u32,
    pub(crate) shape_type: ShapeType,
}

#[derive(Debug, Clone)]
pub(crate) enum ShapeType {
    Text {
        rect: Rect,
        paragraphs: Vec<TextParagraph>,
        placeholder: Option<Placeholder>,
        autofit: TextAutofit,
    },
    Rectangle {
        rect: Rect,
        fill: Fill,
    },
    Picture {
        rect: Rect,
        data: Vec<u8>,
        format: ImageFormat,
        description: String,
    },
}

impl MutableShape {
    pub(crate) fn new_text(
        shape_id: u32,
        rect: Rect,
        paragraphs: Vec<TextParagraph>,
        placeholder: Option<Placeholder>,
    ) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::Text {
                rect,
                paragraphs,
                placeholder,
                autofit: TextAutofit::None,
            },
        }
    }

    pub(crate) fn new_rectangle(shape_id: u32, rect: Rect, fill: Fill) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::Rectangle { rect, fill },
        }
    }

    pub(crate) fn new_picture(
        shape_id: u32,
        data: Vec<u8>,
        format: ImageFormat,
        rect: Rect,
        description: String,
    ) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::Picture {
                rect,
                data,
                format,
                description,
            },
        }
    }

    #[inline]
    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    /// Builder method: set the overflow behavior (text shapes only).
    pub fn autofit(&mut self, value: TextAutofit) -> &mut Self {
        if let ShapeType::Text { ref mut autofit, .. } = self.shape_type {
            *autofit = value;
        }
        self
    }

    /// Bounding rectangle of the shape.
    pub fn rect(&self) -> Rect {
        match &self.shape_type {
            ShapeType::Text { rect, .. } | ShapeType::Rectangle { rect, .. } | ShapeType::Picture { rect, .. } => {
                *rect
            },
        }
    }

    /// Placeholder binding, if this is a placeholder text shape.
    pub fn placeholder(&self) -> Option<Placeholder> {
        match &self.shape_type {
            ShapeType::Text { placeholder, .. } => *placeholder,
            _ => None,
        }
    }

    /// Plain text of a text shape, paragraphs joined by newlines.
    pub fn text(&self) -> Option<String> {
        match &self.shape_type {
            ShapeType::Text { paragraphs, .. } => Some(
                paragraphs
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        }
    }

    /// Get image data if this shape is a picture.
    pub(crate) fn get_image_data(&self) -> Option<(&[u8], ImageFormat)> {
        match &self.shape_type {
            ShapeType::Picture { data, format, .. } => Some((data.as_slice(), *format)),
            _ => None,
        }
    }

    /// Generate XML for this shape.
    ///
    /// Pictures need the relationship id of their embedded image.
    pub(crate) fn to_xml(&self, xml: &mut String, rel_id: Option<&str>) -> Result<()> {
        match &self.shape_type {
            ShapeType::Text {
                rect,
                paragraphs,
                placeholder,
                autofit,
            } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                let name = placeholder.map(Placeholder::name).unwrap_or("TextBox");
                write!(xml, r#"<p:cNvPr id="{}" name="{} {}"/>"#, self.shape_id, name, self.shape_id)
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                match placeholder {
                    Some(ph) => {
                        xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
                        xml.push_str("<p:nvPr>");
                        xml.push_str(ph.ph_xml());
                        xml.push_str("</p:nvPr>");
                    },
                    None => {
                        xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
                        xml.push_str("<p:nvPr/>");
                    },
                }
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, rect)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("<a:noFill/>");
                xml.push_str("</p:spPr>");

                xml.push_str("<p:txBody>");
                xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0">"#);
                match autofit {
                    TextAutofit::None => xml.push_str("<a:noAutofit/>"),
                    TextAutofit::ShrinkText => xml.push_str("<a:normAutofit/>"),
                }
                xml.push_str("</a:bodyPr>");
                xml.push_str("<a:lstStyle/>");
                if paragraphs.is_empty() {
                    xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
                }
                for paragraph in paragraphs {
                    paragraph.write_xml(xml)?;
                }
                xml.push_str("</p:txBody>");

                xml.push_str("</p:sp>");
            },
            ShapeType::Rectangle { rect, fill } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(xml, r#"<p:cNvPr id="{}" name="Rectangle {}"/>"#, self.shape_id, self.shape_id)
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str("<p:cNvSpPr/>");
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, rect)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                fill.write_xml(xml)?;
                xml.push_str("<a:ln><a:noFill/></a:ln>");
                xml.push_str("</p:spPr>");
                xml.push_str("</p:sp>");
            },
            ShapeType::Picture { rect, description, .. } => {
                let rid = rel_id.ok_or_else(|| {
                    OoxmlError::Other(format!("picture {} has no image relationship", self.shape_id))
                })?;

                xml.push_str("<p:pic>");
                xml.push_str("<p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                    self.shape_id,
                    self.shape_id,
                    escape_xml(description)
                )
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{rid}"/>"#).map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, rect)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("</p:spPr>");
                xml.push_str("</p:pic>");
            },
        }

        Ok(())
    }
}

fn write_xfrm(xml: &mut String, rect: &Rect) -> Result<()> {
    let mut buf = itoa::Buffer::new();
    xml.push_str("<a:xfrm>");
    xml.push_str(r#"<a:off x=""#);
    xml.push_str(buf.format(rect.x));
    xml.push_str(r#"" y=""#);
    xml.push_str(buf.format(rect.y));
    xml.push_str(r#""/>"#);
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, rect.width.max(0), rect.height.max(0))
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("</a:xfrm>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Rgb;

    #[test]
    fn test_placeholder_body_xml() {
        let paragraphs = vec![
            TextParagraph::new("  •  first", TextFormat::new().size(16.0).color(Rgb::hex(0xE0E0E0))).spacing(2.0),
            TextParagraph::new("a < b", TextFormat::new().size(16.0)).spacing(4.0),
        ];
        let mut shape = MutableShape::new_text(3, Rect::from_inches(0.8, 1.7, 11.5, 5.0), paragraphs, Some(Placeholder::Body));
        shape.autofit(TextAutofit::ShrinkText);

        let mut xml = String::new();
        shape.to_xml(&mut xml, None).unwrap();
        assert!(xml.contains(r#"<p:ph idx="1"/>"#));
        assert!(xml.contains("<a:normAutofit/>"));
        assert!(xml.contains(r#"<a:spcBef><a:spcPts val="200"/></a:spcBef>"#));
        assert!(xml.contains(r#"sz="1600""#));
        assert!(xml.contains("<a:t>a &lt; b</a:t>"));
        assert!(xml.contains(r#"<a:off x="731520" y="1554480"/>"#));
        assert_eq!(xml.matches("<a:p>").count(), 2);
    }

    #[test]
    fn test_run_fill_precedes_typeface() {
        let format = TextFormat::new().font("Calibri").color(Rgb::hex(0xFFFFFF)).bold(true);
        let mut xml = String::new();
        write_run_properties(&mut xml, &format).unwrap();
        let fill = xml.find("<a:solidFill>").unwrap();
        let latin = xml.find("<a:latin").unwrap();
        assert!(fill < latin);
        assert!(xml.contains(r#" b="1""#));
    }

    #[test]
    fn test_rectangle_fill() {
        let shape = MutableShape::new_rectangle(4, Rect::new(0, 0, 100, 100), Fill::Solid(Rgb::hex(0x7C3AED)));
        let mut xml = String::new();
        shape.to_xml(&mut xml, None).unwrap();
        assert!(xml.contains(r#"<a:srgbClr val="7C3AED"/>"#));
        assert!(xml.contains("<a:ln><a:noFill/></a:ln>"));
    }

    #[test]
    fn test_picture_requires_relationship() {
        let shape = MutableShape::new_picture(5, vec![0x89, b'P', b'N', b'G'], ImageFormat::Png, Rect::default(), "chart".into());
        let mut xml = String::new();
        assert!(shape.to_xml(&mut xml, None).is_err());

        let mut xml = String::new();
        shape.to_xml(&mut xml, Some("rId2")).unwrap();
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
        assert!(shape.get_image_data().is_some());
    }

    #[test]
    fn test_empty_text_body_is_valid() {
        let shape = MutableShape::new_text(2, Rect::default(), Vec::new(), None);
        let mut xml = String::new();
        shape.to_xml(&mut xml, None).unwrap();
        assert!(xml.contains("<a:endParaRPr"));
        assert_eq!(shape.text().as_deref(), Some(""));
    }
}
