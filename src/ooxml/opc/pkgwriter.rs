//! Package writer for OPC packages.
//!
//! Serializes an [`OpcPackage`] into a ZIP container: `[Content_Types].xml`
//! first, then the package relationships, then every part followed by its
//! own relationships.
use std::collections::BTreeMap;

use tracing::debug;

use super::constants::{content_type as ct, namespace};
use super::package::OpcPackage;
use super::phys_pkg::PhysPkgWriter;
use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;

const CONTENT_TYPES_PARTNAME: &str = "/[Content_Types].xml";
const PACKAGE_RELS_PARTNAME: &str = "/_rels/.rels";

/// Serializes an OPC package to bytes.
pub struct PackageWriter;

impl PackageWriter {
    /// Serialize `package` to a complete ZIP archive.
    pub fn to_bytes(package: &OpcPackage) -> Result<Vec<u8>> {
        let mut phys_writer = PhysPkgWriter::new();

        let cti = ContentTypesItem::from_package(package);
        phys_writer.write(CONTENT_TYPES_PARTNAME, cti.to_xml().as_bytes())?;

        phys_writer.write(PACKAGE_RELS_PARTNAME, package.rels().to_xml().as_bytes())?;

        for part in package.iter_parts() {
            if is_image(part.content_type()) {
                phys_writer.write_stored(part.partname(), part.blob())?;
            } else {
                phys_writer.write(part.partname(), part.blob())?;
            }

            if !part.rels().is_empty() {
                phys_writer.write(&part.rels_partname(), part.rels().to_xml().as_bytes())?;
            }
        }

        debug!(parts = phys_writer.part_count(), "package serialized");
        phys_writer.finish()
    }
}

fn is_image(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

/// Helper for building [Content_Types].xml content.
///
/// Well-known extensions become `Default` entries; everything else gets an
/// `Override` for its part name.
struct ContentTypesItem {
    defaults: BTreeMap<String, &'static str>,
    overrides: BTreeMap<String, &'static str>,
}

impl ContentTypesItem {
    fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS);
        defaults.insert("xml".to_string(), ct::XML);

        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    fn from_package(package: &OpcPackage) -> Self {
        let mut cti = Self::new();
        for part in package.iter_parts() {
            cti.add_content_type(part.partname(), part.ext(), part.content_type());
        }
        cti
    }

    fn add_content_type(&mut self, partname: &str, ext: &str, content_type: &'static str) {
        if Self::is_default_content_type(ext, content_type) {
            self.defaults.insert(ext.to_ascii_lowercase(), content_type);
        } else {
            self.overrides.insert(partname.to_string(), content_type);
        }
    }

    fn is_default_content_type(ext: &str, content_type: &str) -> bool {
        matches!(
            (ext, content_type),
            ("rels", ct::OPC_RELATIONSHIPS)
                | ("xml", ct::XML)
                | ("png", ct::PNG)
                | ("jpg", ct::JPEG)
                | ("jpeg", ct::JPEG)
                | ("gif", ct::GIF)
                | ("bmp", ct::BMP)
                | ("tiff", ct::TIFF)
        )
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + (self.defaults.len() + self.overrides.len()) * 128);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Types xmlns=""#);
        xml.push_str(namespace::OPC_CONTENT_TYPES);
        xml.push_str(r#"">"#);

        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            ));
        }

        for (partname, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}
