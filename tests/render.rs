//! End-to-end rendering: decks in, PPTX packages out.
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::PathBuf;

use deckforge::deck::{Deck, Position, SlideRecord};
use deckforge::render::render;
use deckforge::theme;
use zip::ZipArchive;

/// 11.5 inches, the text column width of a slide without an image.
const FULL_WIDTH_EMU: i64 = 10_515_600;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R'];

fn deck() -> Deck {
    Deck::from_records(vec![
        SlideRecord::new(Position::whole(1), "Field report", "Findings from the spring survey"),
        SlideRecord::new(Position::whole(2), "Method", "- 40 sites\n- 3 seasons")
            .with_narration("We sampled forty sites."),
        SlideRecord::new(Position::whole(3), "Results", "**Growth** was steady.\n\n\n\nSee appendix."),
    ])
}

fn open(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(bytes)).expect("valid zip")
}

fn read(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
    let mut text = String::new();
    archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing {name}"))
        .read_to_string(&mut text)
        .unwrap();
    text
}

fn names(archive: &ZipArchive<Cursor<Vec<u8>>>) -> Vec<String> {
    archive.file_names().map(str::to_string).collect()
}

fn slide_count(archive: &ZipArchive<Cursor<Vec<u8>>>) -> usize {
    names(archive)
        .iter()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count()
}

#[test]
fn renders_one_slide_per_record() {
    let mut archive = open(render(&deck(), &HashMap::new(), "ocean").unwrap());
    assert_eq!(slide_count(&archive), 3);

    let pres = read(&mut archive, "ppt/presentation.xml");
    assert_eq!(pres.matches("<p:sldId ").count(), 3);

    let title = read(&mut archive, "ppt/slides/slide1.xml");
    assert!(title.contains("Field report"));
    assert!(title.contains(r#"<p:ph type="ctrTitle"/>"#));

    let results = read(&mut archive, "ppt/slides/slide3.xml");
    assert!(results.contains("<a:t>Growth was steady.</a:t>"));
    assert!(results.contains(r#"<p:ph idx="1"/>"#));
    assert!(results.contains("<a:normAutofit/>"));
}

#[test]
fn narration_becomes_speaker_notes() {
    let mut archive = open(render(&deck(), &HashMap::new(), "").unwrap());
    let all = names(&archive);
    assert!(all.contains(&"ppt/notesSlides/notesSlide2.xml".to_string()));
    assert!(!all.contains(&"ppt/notesSlides/notesSlide1.xml".to_string()));
    assert!(read(&mut archive, "ppt/notesSlides/notesSlide2.xml").contains("We sampled forty sites."));
    assert!(read(&mut archive, "ppt/slides/_rels/slide2.xml.rels").contains("notesSlide2.xml"));
}

#[test]
fn image_is_embedded_for_its_slide() {
    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(PNG_BYTES).unwrap();
    let images = HashMap::from([(3, file.path().to_path_buf())]);

    let mut archive = open(render(&deck(), &images, "forest").unwrap());
    assert!(names(&archive).contains(&"ppt/media/image1.png".to_string()));
    assert!(read(&mut archive, "ppt/slides/slide3.xml").contains("<p:pic>"));
    assert!(read(&mut archive, "[Content_Types].xml").contains(r#"Extension="png""#));
}

#[test]
fn missing_image_keeps_slide_count_and_skips_media() {
    let images = HashMap::from([(2, PathBuf::from("/definitely/not/here.png"))]);
    let mut with_missing = open(render(&deck(), &images, "forest").unwrap());
    let mut without = open(render(&deck(), &HashMap::new(), "forest").unwrap());

    assert_eq!(slide_count(&with_missing), slide_count(&without));
    assert!(!names(&with_missing).iter().any(|n| n.starts_with("ppt/media/")));

    // Same full-width text column as a slide that never had an image.
    let degraded = read(&mut with_missing, "ppt/slides/slide2.xml");
    assert_eq!(degraded, read(&mut without, "ppt/slides/slide2.xml"));
    assert!(degraded.contains(&format!(r#"cx="{FULL_WIDTH_EMU}""#)));
}

#[test]
fn unknown_theme_falls_back_to_default_palette() {
    let mut fallback = open(render(&deck(), &HashMap::new(), "no such theme").unwrap());
    let theme_xml = read(&mut fallback, "ppt/theme/theme1.xml");
    let default = theme::default_theme();
    assert!(theme_xml.contains(&format!(r#"name="{}""#, default.name)));
    assert!(theme_xml.contains(&format!(r#"<a:accent1><a:srgbClr val="{}"/>"#, default.palette.accent)));
}

#[test]
fn empty_deck_renders_an_empty_presentation() {
    let mut archive = open(render(&Deck::new(), &HashMap::new(), "rose").unwrap());
    assert_eq!(slide_count(&archive), 0);
    assert!(!read(&mut archive, "ppt/presentation.xml").contains("<p:sldIdLst>"));
}
