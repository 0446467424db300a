//! PDF source documents

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::types::*;

use super::SourcePageProvider;

/// Parent chain depth after which inheritance lookup gives up
const MAX_INHERITANCE_DEPTH: usize = 32;

/// One resolved source page
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SourcePage {
    pub id: ObjectId,
    /// MediaBox as [x0, y0, x1, y1] in points
    pub media_box: [f64; 4],
    pub size: PageSize,
}

/// A loaded PDF whose page objects and sizes are resolved once
#[derive(Debug)]
pub struct PdfSource {
    document: Document,
    pages: Vec<SourcePage>,
}

impl PdfSource {
    /// Resolve every page of the document up front
    pub fn new(document: Document) -> Result<Self> {
        let pages = document
            .get_pages()
            .into_values()
            .map(|id| resolve_page(&document, id))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Resolved {} source pages", pages.len());
        Ok(Self { document, pages })
    }

    /// Load and resolve a PDF file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let document = load_pdf(path).await?;
        Self::new(document)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Size of a page in points
    pub fn size(&self, index: usize) -> Result<PageSize> {
        Ok(self.page(index)?.size)
    }

    pub(crate) fn page(&self, index: usize) -> Result<&SourcePage> {
        self.pages
            .get(index)
            .ok_or(HandoutError::SourceUnavailable {
                index,
                count: self.pages.len(),
            })
    }
}

impl SourcePageProvider for PdfSource {
    async fn page_count(&self) -> Result<usize> {
        Ok(self.len())
    }

    async fn page_size(&self, index: usize) -> Result<PageSize> {
        self.size(index)
    }
}

fn resolve_page(doc: &Document, id: ObjectId) -> Result<SourcePage> {
    let media_box = inherited_attribute(doc, id, b"MediaBox")?
        .and_then(|obj| parse_box(doc, obj))
        .filter(|b| (b[2] - b[0]).abs() > 0.0 && (b[3] - b[1]).abs() > 0.0)
        .unwrap_or_else(|| {
            log::warn!(
                "Page {:?} has no usable MediaBox, assuming {}x{} pt",
                id,
                DEFAULT_PAGE_DIMENSIONS.0,
                DEFAULT_PAGE_DIMENSIONS.1
            );
            [0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1]
        });

    // Normalize so x0/y0 are the lower-left corner.
    let media_box = [
        media_box[0].min(media_box[2]),
        media_box[1].min(media_box[3]),
        media_box[0].max(media_box[2]),
        media_box[1].max(media_box[3]),
    ];

    Ok(SourcePage {
        id,
        media_box,
        size: PageSize::new(media_box[2] - media_box[0], media_box[3] - media_box[1]),
    })
}

/// Look up a page attribute, following the Parent chain for inheritable keys
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut dict: &Dictionary = doc.get_dictionary(page_id)?;

    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => dict = doc.get_dictionary(parent_id)?,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

fn parse_box(doc: &Document, obj: &Object) -> Option<[f64; 4]> {
    let array = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
        other => other.as_array().ok()?,
    };
    if array.len() != 4 {
        return None;
    }

    let mut values = [0.0; 4];
    for (slot, item) in values.iter_mut().zip(array) {
        *slot = extract_number(item)?;
    }
    Some(values)
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Load a PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    log::info!("Loaded {} ({} pages)", path.display(), doc.get_pages().len());
    Ok(doc)
}

/// Save a document, compressing its streams
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        doc.compress();
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, HandoutError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
