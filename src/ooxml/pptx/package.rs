//! Assembly of a [`MutablePresentation`] into an OPC package.
//!
//! Part layout of the generated package:
//!
//! ```text
//! /ppt/presentation.xml              rId1 master, rId2.. slides, then notes
//!                                    master, presProps, viewProps, theme,
//!                                    tableStyles
//! /ppt/slideMasters/slideMaster1.xml rId1/rId2 layouts, rId3 theme1
//! /ppt/slideLayouts/slideLayout{1,2}.xml
//! /ppt/slides/slideN.xml             rId1 layout, images, notes slide
//! /ppt/notesSlides/notesSlideN.xml   only for slides with notes
//! /ppt/notesMasters/notesMaster1.xml rId1 theme2
//! /ppt/theme/theme{1,2}.xml
//! /ppt/media/imageN.<ext>
//! /docProps/core.xml, /docProps/app.xml
//! ```
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{OpcPackage, Relationships};
use crate::theme::Theme;

use super::template;
use super::writer::MutablePresentation;
use super::writer::relmap::RelationshipMapper;

/// Build every part of `pres` into an in-memory package.
pub(crate) fn build_package(pres: &MutablePresentation, theme: &Theme, created: DateTime<Utc>) -> Result<OpcPackage> {
    let mut pkg = OpcPackage::new();

    pkg.rels_mut().add(rt::OFFICE_DOCUMENT, "ppt/presentation.xml");
    pkg.rels_mut().add(rt::CORE_PROPERTIES, "docProps/core.xml");
    pkg.rels_mut().add(rt::EXTENDED_PROPERTIES, "docProps/app.xml");

    // presentation.xml relationships, in the documented order
    let mut pres_rels = Relationships::new();
    pres_rels.add(rt::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
    let slide_rel_ids: Vec<String> = (1..=pres.slide_count())
        .map(|n| pres_rels.add(rt::SLIDE, format!("slides/slide{n}.xml")))
        .collect();
    let notes_master_rel_id = pres_rels.add(rt::NOTES_MASTER, "notesMasters/notesMaster1.xml");
    pres_rels.add(rt::PRES_PROPS, "presProps.xml");
    pres_rels.add(rt::VIEW_PROPS, "viewProps.xml");
    pres_rels.add(rt::THEME, "theme/theme1.xml");
    pres_rels.add(rt::TABLE_STYLES, "tableStyles.xml");

    let pres_xml = pres.generate_presentation_xml_with_rels(&slide_rel_ids, &notes_master_rel_id)?;
    pkg.add_part("/ppt/presentation.xml", ct::PML_PRESENTATION_MAIN, pres_xml, pres_rels);

    add_master_parts(&mut pkg, theme)?;

    let notes_count = add_slide_parts(&mut pkg, pres)?;

    pkg.add_part(
        "/ppt/presProps.xml",
        ct::PML_PRES_PROPS,
        template::default_pres_props_xml(),
        Relationships::new(),
    );
    pkg.add_part(
        "/ppt/viewProps.xml",
        ct::PML_VIEW_PROPS,
        template::default_view_props_xml(),
        Relationships::new(),
    );
    pkg.add_part(
        "/ppt/tableStyles.xml",
        ct::PML_TABLE_STYLES,
        template::default_table_styles_xml(),
        Relationships::new(),
    );

    pkg.add_part(
        "/docProps/core.xml",
        ct::OPC_CORE_PROPERTIES,
        template::core_props_xml(pres.title(), created)?,
        Relationships::new(),
    );
    pkg.add_part(
        "/docProps/app.xml",
        ct::OFC_EXTENDED_PROPERTIES,
        template::app_props_xml(pres.slide_count(), notes_count)?,
        Relationships::new(),
    );

    debug!(
        parts = pkg.part_count(),
        slides = pres.slide_count(),
        notes = notes_count,
        "presentation package assembled"
    );
    Ok(pkg)
}

/// Master, layouts, notes master and both themes.
fn add_master_parts(pkg: &mut OpcPackage, theme: &Theme) -> Result<()> {
    let mut master_rels = Relationships::new();
    master_rels.add(rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
    master_rels.add(rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml");
    master_rels.add(rt::THEME, "../theme/theme1.xml");
    pkg.add_part(
        "/ppt/slideMasters/slideMaster1.xml",
        ct::PML_SLIDE_MASTER,
        template::default_slide_master_xml()?,
        master_rels,
    );

    for (number, xml) in [(1, template::slide_layout_1_xml()?), (2, template::slide_layout_2_xml()?)] {
        let mut layout_rels = Relationships::new();
        layout_rels.add(rt::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        pkg.add_part(
            format!("/ppt/slideLayouts/slideLayout{number}.xml"),
            ct::PML_SLIDE_LAYOUT,
            xml,
            layout_rels,
        );
    }

    let mut notes_master_rels = Relationships::new();
    notes_master_rels.add(rt::THEME, "../theme/theme2.xml");
    pkg.add_part(
        "/ppt/notesMasters/notesMaster1.xml",
        ct::PML_NOTES_MASTER,
        template::default_notes_master_xml()?,
        notes_master_rels,
    );

    pkg.add_part(
        "/ppt/theme/theme1.xml",
        ct::OFC_THEME,
        template::theme_xml(theme.name, &theme.palette)?,
        Relationships::new(),
    );
    pkg.add_part(
        "/ppt/theme/theme2.xml",
        ct::OFC_THEME,
        template::theme_xml(&format!("{} notes", theme.name), &theme.palette)?,
        Relationships::new(),
    );
    Ok(())
}

/// Slides, their images and notes slides. Returns the number of notes slides.
fn add_slide_parts(pkg: &mut OpcPackage, pres: &MutablePresentation) -> Result<usize> {
    let mut rel_mapper = RelationshipMapper::new();
    let mut image_number = 0usize;
    let mut notes_count = 0usize;

    for (slide_index, slide) in pres.slides().iter().enumerate() {
        let slide_number = slide_index + 1;
        let mut slide_rels = Relationships::new();
        slide_rels.add(
            rt::SLIDE_LAYOUT,
            format!("../slideLayouts/slideLayout{}.xml", slide.layout().layout_number()),
        );

        for (image_index, (data, format)) in slide.collect_images().into_iter().enumerate() {
            image_number += 1;
            let media_name = format!("image{image_number}.{}", format.extension());
            let rel_id = slide_rels.add(rt::IMAGE, format!("../media/{media_name}"));
            rel_mapper.add_image(slide_index, image_index, rel_id);
            pkg.add_part(
                format!("/ppt/media/{media_name}"),
                format.mime_type(),
                data,
                Relationships::new(),
            );
        }

        if let Some(notes_xml) = slide.generate_notes_xml() {
            notes_count += 1;
            slide_rels.add(rt::NOTES_SLIDE, format!("../notesSlides/notesSlide{slide_number}.xml"));

            let mut notes_rels = Relationships::new();
            notes_rels.add(rt::NOTES_MASTER, "../notesMasters/notesMaster1.xml");
            notes_rels.add(rt::SLIDE, format!("../slides/slide{slide_number}.xml"));
            pkg.add_part(
                format!("/ppt/notesSlides/notesSlide{slide_number}.xml"),
                ct::PML_NOTES_SLIDE,
                notes_xml?,
                notes_rels,
            );
        }

        let slide_xml = slide.to_xml_with_rels(slide_index, &rel_mapper)?;
        pkg.add_part(
            format!("/ppt/slides/slide{slide_number}.xml"),
            ct::PML_SLIDE,
            slide_xml,
            slide_rels,
        );
    }

    Ok(notes_count)
}
