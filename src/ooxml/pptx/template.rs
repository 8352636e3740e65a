//! Presentation template parts.
//!
//! The fixed parts every generated package carries (master, layouts, notes
//! master, property parts) plus the theme part, which is derived from the
//! active palette.
use std::fmt::Write as FmtWrite;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::theme::Palette;

/// Typeface of titles (theme major font).
pub const FONT_TITLE: &str = "Calibri Light";
/// Typeface of body text (theme minor font).
pub const FONT_BODY: &str = "Calibri";

const NS_DECL: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#,
);

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const GROUP_PROPS: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
);

/// Text level defaults shared by the master's title and body styles.
const MASTER_TX_STYLES: &str = concat!(
    "<p:txStyles>",
    r#"<p:titleStyle><a:lvl1pPr algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
    r#"<a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPct val="0"/></a:spcBef><a:buNone/>"#,
    r#"<a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
    r#"<a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr>"#,
    "</a:lvl1pPr></p:titleStyle>",
    r#"<p:bodyStyle><a:lvl1pPr marL="0" indent="0" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
    r#"<a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPts val="1000"/></a:spcBef><a:buNone/>"#,
    r#"<a:defRPr sz="1600" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
    r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr>"#,
    "</a:lvl1pPr></p:bodyStyle>",
    r#"<p:otherStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr></p:otherStyle>"#,
    "</p:txStyles>",
);

/// Color map of the slide master: dark background, light text.
const MASTER_CLR_MAP: &str = concat!(
    r#"<p:clrMap bg1="dk1" tx1="lt1" bg2="dk2" tx2="lt2" accent1="accent1" accent2="accent2" "#,
    r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" "#,
    r#"hlink="hlink" folHlink="folHlink"/>"#,
);

/// Placeholder shape with an explicit frame, as used by master and layouts.
fn placeholder_sp(xml: &mut String, id: u32, name: &str, ph: &str, frame: [i64; 4], anchor: &str) -> Result<()> {
    write!(
        xml,
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{ph}</p:nvPr></p:nvSpPr>"#,
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
            r#"<p:txBody><a:bodyPr vert="horz" lIns="91440" tIns="45720" rIns="91440" bIns="45720" rtlCol="0" anchor="{anchor}">"#,
            r#"<a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
            r#"<a:p><a:r><a:rPr lang="en-US"/><a:t>{name}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        ),
        id = id,
        name = name,
        ph = ph,
        x = frame[0],
        y = frame[1],
        cx = frame[2],
        cy = frame[3],
        anchor = anchor,
    )
    .map_err(|e| OoxmlError::Xml(e.to_string()))
}

/// Generate slideMaster1.xml.
///
/// Relationships of the master: `rId1`/`rId2` are the two layouts, `rId3`
/// the theme.
pub fn default_slide_master_xml() -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    write!(xml, "<p:sldMaster {NS_DECL}>").map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("<p:cSld>");
    xml.push_str(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str("<p:spTree>");
    xml.push_str(GROUP_PROPS);
    placeholder_sp(
        &mut xml,
        2,
        "Title Placeholder 1",
        r#"<p:ph type="title"/>"#,
        [838_200, 365_125, 10_515_600, 1_325_563],
        "ctr",
    )?;
    placeholder_sp(
        &mut xml,
        3,
        "Text Placeholder 2",
        r#"<p:ph type="body" idx="1"/>"#,
        [838_200, 1_825_625, 10_515_600, 4_351_338],
        "t",
    )?;
    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");
    xml.push_str(MASTER_CLR_MAP);
    xml.push_str("<p:sldLayoutIdLst>");
    xml.push_str(r#"<p:sldLayoutId id="2147483649" r:id="rId1"/>"#);
    xml.push_str(r#"<p:sldLayoutId id="2147483650" r:id="rId2"/>"#);
    xml.push_str("</p:sldLayoutIdLst>");
    xml.push_str(MASTER_TX_STYLES);
    xml.push_str("</p:sldMaster>");
    Ok(xml)
}

fn slide_layout_xml(layout_type: &str, name: &str, shapes: impl FnOnce(&mut String) -> Result<()>) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    write!(xml, r#"<p:sldLayout {NS_DECL} type="{layout_type}" preserve="1">"#)
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    write!(xml, r#"<p:cSld name="{}">"#, escape_xml(name)).map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("<p:spTree>");
    xml.push_str(GROUP_PROPS);
    shapes(&mut xml)?;
    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    Ok(xml)
}

/// Generate slide layout 1 XML (Title Slide).
pub fn slide_layout_1_xml() -> Result<String> {
    slide_layout_xml("title", "Title Slide", |xml| {
        placeholder_sp(
            xml,
            2,
            "Title 1",
            r#"<p:ph type="ctrTitle"/>"#,
            [914_400, 1_828_800, 10_332_720, 1_828_800],
            "b",
        )?;
        placeholder_sp(
            xml,
            3,
            "Subtitle 2",
            r#"<p:ph type="subTitle" idx="1"/>"#,
            [1_828_800, 3_840_480, 8_503_920, 914_400],
            "t",
        )
    })
}

/// Generate slide layout 2 XML (Title and Content).
pub fn slide_layout_2_xml() -> Result<String> {
    slide_layout_xml("obj", "Title and Content", |xml| {
        placeholder_sp(
            xml,
            2,
            "Title 1",
            r#"<p:ph type="title"/>"#,
            [731_520, 457_200, 10_515_600, 914_400],
            "ctr",
        )?;
        placeholder_sp(
            xml,
            3,
            "Content Placeholder 2",
            r#"<p:ph idx="1"/>"#,
            [731_520, 1_554_480, 10_515_600, 4_572_000],
            "t",
        )
    })
}

/// Generate notesMaster1.xml. Its only relationship (`rId1`) is the notes theme.
pub fn default_notes_master_xml() -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    write!(xml, "<p:notesMaster {NS_DECL}>").map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("<p:cSld>");
    xml.push_str(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str("<p:spTree>");
    xml.push_str(GROUP_PROPS);
    placeholder_sp(
        &mut xml,
        2,
        "Slide Image Placeholder 1",
        r#"<p:ph type="sldImg" idx="2"/>"#,
        [685_800, 1_143_000, 5_486_400, 3_086_100],
        "t",
    )?;
    placeholder_sp(
        &mut xml,
        3,
        "Notes Placeholder 2",
        r#"<p:ph type="body" sz="quarter" idx="1"/>"#,
        [685_800, 4_400_550, 5_486_400, 3_600_450],
        "t",
    )?;
    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
        r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" "#,
        r#"hlink="hlink" folHlink="folHlink"/>"#,
    ));
    xml.push_str("</p:notesMaster>");
    Ok(xml)
}

/// Generate a theme part whose color scheme is derived from `palette`.
pub fn theme_xml(name: &str, palette: &Palette) -> Result<String> {
    let mut xml = String::with_capacity(6144);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="{}">"#,
        escape_xml(name)
    )
    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("<a:themeElements>");

    write!(xml, r#"<a:clrScheme name="{}">"#, escape_xml(name)).map_err(|e| OoxmlError::Xml(e.to_string()))?;
    let scheme = [
        ("dk1", palette.background_start),
        ("lt1", palette.title),
        ("dk2", palette.background_end),
        ("lt2", palette.body),
        ("accent1", palette.accent),
        ("accent2", palette.accent_light),
        ("accent3", palette.subtitle),
        ("accent4", palette.muted),
        ("accent5", palette.accent),
        ("accent6", palette.accent_light),
        ("hlink", palette.accent_light),
        ("folHlink", palette.subtitle),
    ];
    for (slot, color) in scheme {
        write!(xml, r#"<a:{slot}><a:srgbClr val="{color}"/></a:{slot}>"#)
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    }
    xml.push_str("</a:clrScheme>");

    write!(
        xml,
        concat!(
            r#"<a:fontScheme name="Office">"#,
            r#"<a:majorFont><a:latin typeface="{major}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
            r#"<a:minorFont><a:latin typeface="{minor}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
            "</a:fontScheme>",
        ),
        major = FONT_TITLE,
        minor = FONT_BODY,
    )
    .map_err(|e| OoxmlError::Xml(e.to_string()))?;

    xml.push_str(THEME_FORMAT_SCHEME);
    xml.push_str("</a:themeElements>");
    xml.push_str("<a:objectDefaults/><a:extraClrSchemeLst/>");
    xml.push_str("</a:theme>");
    Ok(xml)
}

/// Fill, line, effect and background styles: three of each, as required.
const THEME_FORMAT_SCHEME: &str = concat!(
    r#"<a:fmtScheme name="Office">"#,
    "<a:fillStyleLst>",
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:gradFill rotWithShape="1"><a:gsLst>"#,
    r#"<a:gs pos="0"><a:schemeClr val="phClr"><a:tint val="67000"/></a:schemeClr></a:gs>"#,
    r#"<a:gs pos="100000"><a:schemeClr val="phClr"><a:tint val="94000"/></a:schemeClr></a:gs>"#,
    r#"</a:gsLst><a:lin ang="5400000" scaled="0"/></a:gradFill>"#,
    r#"<a:gradFill rotWithShape="1"><a:gsLst>"#,
    r#"<a:gs pos="0"><a:schemeClr val="phClr"><a:shade val="94000"/></a:schemeClr></a:gs>"#,
    r#"<a:gs pos="100000"><a:schemeClr val="phClr"><a:shade val="78000"/></a:schemeClr></a:gs>"#,
    r#"</a:gsLst><a:lin ang="5400000" scaled="0"/></a:gradFill>"#,
    "</a:fillStyleLst>",
    "<a:lnStyleLst>",
    r#"<a:ln w="6350" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/></a:ln>"#,
    r#"<a:ln w="12700" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/></a:ln>"#,
    r#"<a:ln w="19050" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/></a:ln>"#,
    "</a:lnStyleLst>",
    "<a:effectStyleLst>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "</a:effectStyleLst>",
    "<a:bgFillStyleLst>",
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"><a:tint val="95000"/></a:schemeClr></a:solidFill>"#,
    r#"<a:gradFill rotWithShape="1"><a:gsLst>"#,
    r#"<a:gs pos="0"><a:schemeClr val="phClr"><a:tint val="93000"/></a:schemeClr></a:gs>"#,
    r#"<a:gs pos="100000"><a:schemeClr val="phClr"><a:shade val="63000"/></a:schemeClr></a:gs>"#,
    r#"</a:gsLst><a:lin ang="5400000" scaled="0"/></a:gradFill>"#,
    "</a:bgFillStyleLst>",
    "</a:fmtScheme>",
);

/// Generate a minimal valid presProps.xml content.
pub fn default_pres_props_xml() -> String {
    format!("{XML_DECL}<p:presentationPr {NS_DECL}/>")
}

/// Generate a minimal valid viewProps.xml content.
pub fn default_view_props_xml() -> String {
    format!(
        concat!(
            "{decl}<p:viewPr {ns}>",
            r#"<p:normalViewPr horzBarState="maximized"><p:restoredLeft sz="15611"/><p:restoredTop sz="94660"/></p:normalViewPr>"#,
            r#"<p:gridSpacing cx="76200" cy="76200"/>"#,
            "</p:viewPr>",
        ),
        decl = XML_DECL,
        ns = NS_DECL,
    )
}

/// Generate a minimal valid tableStyles.xml content.
pub fn default_table_styles_xml() -> String {
    format!(
        r#"{XML_DECL}<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
    )
}

/// Generate core.xml (core properties).
pub fn core_props_xml(title: &str, created: DateTime<Utc>) -> Result<String> {
    let stamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    ));
    write!(
        xml,
        concat!(
            "<dc:title>{title}</dc:title>",
            "<dc:creator>deckforge</dc:creator>",
            "<cp:lastModifiedBy>deckforge</cp:lastModifiedBy>",
            "<cp:revision>1</cp:revision>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>"#,
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#,
        ),
        title = escape_xml(title),
        stamp = stamp,
    )
    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("</cp:coreProperties>");
    Ok(xml)
}

/// Generate app.xml (extended properties).
pub fn app_props_xml(slides: usize, notes: usize) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
        r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
    ));
    write!(
        xml,
        concat!(
            "<Application>deckforge</Application>",
            "<PresentationFormat>Widescreen</PresentationFormat>",
            "<Slides>{}</Slides><Notes>{}</Notes>",
        ),
        slides, notes
    )
    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("</Properties>");
    Ok(xml)
}
