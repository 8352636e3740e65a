//! In-memory OPC package: a set of parts with their relationships.
use super::rel::Relationships;

/// A single part of a package.
#[derive(Debug, Clone)]
pub struct Part {
    partname: String,
    content_type: &'static str,
    blob: Vec<u8>,
    rels: Relationships,
}

impl Part {
    /// Absolute part name, e.g. `/ppt/slides/slide1.xml`.
    #[inline]
    pub fn partname(&self) -> &str {
        &self.partname
    }

    #[inline]
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Extension of the part name, without the dot.
    pub fn ext(&self) -> &str {
        self.partname.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
    }

    /// Part name of this part's `.rels` item: `/a/b.xml` -> `/a/_rels/b.xml.rels`.
    pub fn rels_partname(&self) -> String {
        match self.partname.rsplit_once('/') {
            Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
            None => format!("/_rels/{}.rels", self.partname),
        }
    }
}

/// An OPC package assembled part by part before serialization.
#[derive(Debug, Clone, Default)]
pub struct OpcPackage {
    rels: Relationships,
    parts: Vec<Part>,
}

impl OpcPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Package-level relationships (`/_rels/.rels`).
    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    #[inline]
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// Add a part with its outgoing relationships.
    pub fn add_part(
        &mut self,
        partname: impl Into<String>,
        content_type: &'static str,
        blob: impl Into<Vec<u8>>,
        rels: Relationships,
    ) {
        self.parts.push(Part {
            partname: partname.into(),
            content_type,
            blob: blob.into(),
            rels,
        });
    }

    pub fn iter_parts(&self) -> std::slice::Iter<'_, Part> {
        self.parts.iter()
    }

    pub fn part(&self, partname: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.partname == partname)
    }

    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}
