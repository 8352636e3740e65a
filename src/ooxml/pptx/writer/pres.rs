/// Presentation writer for PPTX.
use std::fmt::Write as FmtWrite;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::PackageWriter;
use crate::ooxml::pptx::package::build_package;
use crate::theme::Theme;

use super::slide::{MutableSlide, SlideLayoutKind};

/// Slide width of a 16:9 deck (13.333 in).
pub const SLIDE_WIDTH_EMU: i64 = 12_192_000;
/// Slide height of a 16:9 deck (7.5 in).
pub const SLIDE_HEIGHT_EMU: i64 = 6_858_000;

const FIRST_SLIDE_ID: u32 = 256;

/// A PowerPoint presentation being assembled for writing.
#[derive(Debug)]
pub struct MutablePresentation {
    pub(crate) slides: Vec<MutableSlide>,
    title: String,
    /// Slide width in EMUs (914400 EMU = 1 inch)
    slide_width: i64,
    slide_height: i64,
    created: Option<DateTime<Utc>>,
}

impl MutablePresentation {
    /// Create an empty widescreen presentation.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            slides: Vec::new(),
            title: title.into(),
            slide_width: SLIDE_WIDTH_EMU,
            slide_height: SLIDE_HEIGHT_EMU,
            created: None,
        }
    }

    /// Append a slide using `layout` and return it for filling in.
    pub fn add_slide(&mut self, layout: SlideLayoutKind) -> &mut MutableSlide {
        let slide_id = FIRST_SLIDE_ID + self.slides.len() as u32;
        let index = self.slides.len();
        self.slides.push(MutableSlide::new(slide_id, layout));
        &mut self.slides[index]
    }

    #[inline]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[MutableSlide] {
        &self.slides
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    #[inline]
    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Pin the creation timestamp written to the core properties.
    ///
    /// Defaults to the time of serialization.
    pub fn set_created(&mut self, created: DateTime<Utc>) {
        self.created = Some(created);
    }

    /// Generate presentation.xml content with the given relationship IDs.
    ///
    /// `slide_rel_ids` holds one ID per slide, in slide order.
    pub(crate) fn generate_presentation_xml_with_rels(
        &self,
        slide_rel_ids: &[String],
        notes_master_rel_id: &str,
    ) -> Result<String> {
        if slide_rel_ids.len() != self.slides.len() {
            return Err(OoxmlError::Xml(format!(
                "expected {} slide relationship IDs, got {}",
                self.slides.len(),
                slide_rel_ids.len()
            )));
        }

        let mut xml = String::with_capacity(1024 + self.slides.len() * 48);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#);
        xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1">"#);

        xml.push_str("<p:sldMasterIdLst>");
        xml.push_str(r#"<p:sldMasterId id="2147483648" r:id="rId1"/>"#);
        xml.push_str("</p:sldMasterIdLst>");

        write!(
            xml,
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="{notes_master_rel_id}"/></p:notesMasterIdLst>"#
        )
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;

        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (slide, rel_id) in self.slides.iter().zip(slide_rel_ids) {
                write!(xml, r#"<p:sldId id="{}" r:id="{}"/>"#, slide.slide_id(), rel_id)
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.slide_width, self.slide_height
        )
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;

        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");

        Ok(xml)
    }

    /// Serialize the presentation, styled with `theme`, to PPTX bytes.
    pub fn to_bytes(&self, theme: &Theme) -> Result<Vec<u8>> {
        let created = self.created.unwrap_or_else(Utc::now);
        let package = build_package(self, theme, created)?;
        PackageWriter::to_bytes(&package)
    }

    /// Serialize the presentation and write it to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P, theme: &Theme) -> Result<()> {
        let bytes = self.to_bytes(theme)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    #[test]
    fn test_create_presentation() {
        let pres = MutablePresentation::new("Deck");
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_width(), 12_192_000);
        assert_eq!(pres.slide_height(), 6_858_000);
        assert_eq!(pres.title(), "Deck");
    }

    #[test]
    fn test_add_slide_assigns_sequential_ids() {
        let mut pres = MutablePresentation::new("Deck");
        pres.add_slide(SlideLayoutKind::TitleSlide);
        pres.add_slide(SlideLayoutKind::TitleAndContent);
        assert_eq!(pres.slide_count(), 2);
        assert_eq!(pres.slides()[0].slide_id(), 256);
        assert_eq!(pres.slides()[1].slide_id(), 257);
        assert_eq!(pres.slides()[1].layout(), SlideLayoutKind::TitleAndContent);
    }

    #[test]
    fn test_presentation_xml_requires_matching_ids() {
        let mut pres = MutablePresentation::new("Deck");
        pres.add_slide(SlideLayoutKind::TitleSlide);
        assert!(pres.generate_presentation_xml_with_rels(&[], "rId3").is_err());

        let xml = pres
            .generate_presentation_xml_with_rels(&["rId2".to_string()], "rId3")
            .unwrap();
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
        assert!(xml.contains(r#"<p:notesMasterId r:id="rId3"/>"#));
    }

    #[test]
    fn test_to_bytes_is_a_zip_with_all_slides() {
        let mut pres = MutablePresentation::new("Deck");
        pres.add_slide(SlideLayoutKind::TitleSlide);
        pres.add_slide(SlideLayoutKind::TitleAndContent).set_notes("Remember the demo");
        let bytes = pres.to_bytes(theme::default_theme()).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
            "ppt/notesSlides/notesSlide2.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/theme/theme1.xml",
            "docProps/core.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }

        let mut types = String::new();
        archive
            .by_name("[Content_Types].xml")
            .unwrap()
            .read_to_string(&mut types)
            .unwrap();
        assert!(types.contains(r#"<Override PartName="/ppt/slides/slide2.xml""#));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pptx");
        let mut pres = MutablePresentation::new("Deck");
        pres.add_slide(SlideLayoutKind::TitleSlide);
        pres.save(&path, theme::default_theme()).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
