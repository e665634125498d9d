use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::error::DocumentError;

pub const DOCUMENT_PART: &str = "word/document.xml";

struct PackagePart {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

/// The OPC zip container of a `.docx`, held fully in memory.
///
/// Parts are kept in archive order so a rewritten package lists its entries
/// in the order they were read.
pub struct DocxPackage {
    parts: Vec<PackagePart>,
}

impl DocxPackage {
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            parts.push(PackagePart {
                name: file.name().to_string(),
                is_dir: file.is_dir(),
                data,
            });
        }

        let package = Self { parts };
        if package.part(DOCUMENT_PART).is_none() {
            return Err(DocumentError::MissingPart(DOCUMENT_PART.to_string()));
        }
        Ok(package)
    }

    fn part(&self, name: &str) -> Option<&PackagePart> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn document_xml(&self) -> Result<&str, DocumentError> {
        let part = self
            .part(DOCUMENT_PART)
            .ok_or_else(|| DocumentError::MissingPart(DOCUMENT_PART.to_string()))?;
        std::str::from_utf8(&part.data).map_err(|_| DocumentError::Encoding(DOCUMENT_PART.into()))
    }

    pub fn set_document_xml(&mut self, xml: String) {
        match self.parts.iter_mut().find(|p| p.name == DOCUMENT_PART) {
            Some(part) => part.data = xml.into_bytes(),
            None => self.parts.push(PackagePart {
                name: DOCUMENT_PART.to_string(),
                data: xml.into_bytes(),
                is_dir: false,
            }),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for part in &self.parts {
            if part.is_dir {
                writer.add_directory(part.name.as_str(), part_options())?;
            } else {
                writer.start_file(part.name.as_str(), part_options())?;
                writer.write_all(&part.data)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn part_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start file");
            writer.write_all(body.as_bytes()).expect("write body");
        }
        writer.finish().expect("finish").into_inner()
    }

    #[test]
    fn rejects_archive_without_main_document() {
        let bytes = archive_with(&[("word/styles.xml", "<w:styles/>")]);
        assert!(matches!(
            DocxPackage::from_bytes(&bytes),
            Err(DocumentError::MissingPart(_))
        ));
    }

    #[test]
    fn rejects_non_zip_input() {
        assert!(matches!(
            DocxPackage::from_bytes(b"not a zip"),
            Err(DocumentError::Archive(_))
        ));
    }

    #[test]
    fn rewrite_keeps_other_parts_and_order() {
        let bytes = archive_with(&[
            ("[Content_Types].xml", "<Types/>"),
            (DOCUMENT_PART, "<w:document/>"),
            ("word/styles.xml", "<w:styles/>"),
        ]);
        let mut package = DocxPackage::from_bytes(&bytes).expect("package");
        package.set_document_xml("<w:document><w:body/></w:document>".into());

        let reopened = DocxPackage::from_bytes(&package.to_bytes().expect("pack")).expect("reopen");
        let names: Vec<&str> = reopened.parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["[Content_Types].xml", DOCUMENT_PART, "word/styles.xml"]);
        assert_eq!(
            reopened.document_xml().expect("xml"),
            "<w:document><w:body/></w:document>"
        );
        assert_eq!(
            reopened.part("word/styles.xml").map(|p| p.data.as_slice()),
            Some(b"<w:styles/>".as_slice())
        );
    }
}
