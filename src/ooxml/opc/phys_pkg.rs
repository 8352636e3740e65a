//! Physical (ZIP) container for an OPC package.
use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::ooxml::error::Result;

/// Writes package parts into an in-memory ZIP archive.
pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
    parts: usize,
}

impl PhysPkgWriter {
    /// Create a new package writer that writes to memory.
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
            parts: 0,
        }
    }

    /// Write a part with Deflate compression.
    ///
    /// `partname` is the absolute part name (`/ppt/slides/slide1.xml`); the
    /// leading slash is dropped to form the ZIP member name.
    pub fn write(&mut self, partname: &str, blob: &[u8]) -> Result<()> {
        self.write_with(partname, blob, CompressionMethod::Deflated)
    }

    /// Write a part without compression, for already-compressed media.
    pub fn write_stored(&mut self, partname: &str, blob: &[u8]) -> Result<()> {
        self.write_with(partname, blob, CompressionMethod::Stored)
    }

    fn write_with(&mut self, partname: &str, blob: &[u8], method: CompressionMethod) -> Result<()> {
        let membername = partname.trim_start_matches('/');
        let options = SimpleFileOptions::default().compression_method(method);
        self.archive.start_file(membername, options)?;
        self.archive.write_all(blob)?;
        self.parts += 1;
        Ok(())
    }

    /// Number of parts written so far.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.archive.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_round_trip() {
        let mut writer = PhysPkgWriter::new();
        writer.write("/[Content_Types].xml", b"<Types/>").unwrap();
        writer.write_stored("/ppt/media/image1.png", &[0x89, b'P', b'N', b'G']).unwrap();
        assert_eq!(writer.part_count(), 2);
        let bytes = writer.finish().unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name("[Content_Types].xml")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<Types/>");
        assert!(archive.by_name("ppt/media/image1.png").is_ok());
    }
}
