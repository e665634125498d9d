//! Minimal WordprocessingML support: enough of a `.docx` to read body
//! paragraphs and top-level tables, and to rewrite table cells in place.

pub mod body;
pub mod cursor;
#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;
pub mod package;
pub mod rewrite;

use std::path::Path;

pub use body::{DocumentBody, Table, TableCell, TableRow, VerticalMerge};
pub use cursor::CellAddress;
pub use package::DocxPackage;
pub use rewrite::CellEdits;

use crate::error::DocumentError;

/// A loaded `.docx` package together with its parsed body.
pub struct Document {
    package: DocxPackage,
    body: DocumentBody,
}

impl Document {
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        Self::from_package(DocxPackage::open(path)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        Self::from_package(DocxPackage::from_bytes(bytes)?)
    }

    fn from_package(package: DocxPackage) -> Result<Self, DocumentError> {
        let body = DocumentBody::parse(package.document_xml()?)?;
        Ok(Self { package, body })
    }

    pub fn body(&self) -> &DocumentBody {
        &self.body
    }

    /// Applies cell edits to the package and refreshes the body view.
    pub fn apply_cell_edits(&mut self, edits: &CellEdits) -> Result<(), DocumentError> {
        if edits.is_empty() {
            return Ok(());
        }
        let rewritten = rewrite::rewrite_cells(self.package.document_xml()?, edits)?;
        self.body = DocumentBody::parse(&rewritten)?;
        self.package.set_document_xml(rewritten);
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        self.package.to_bytes()
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        self.package.save(path)
    }
}
