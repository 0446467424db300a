//! Embedding source pages as Form XObjects
//!
//! Each source page becomes one Form XObject in the output document. The
//! same XObject is reused wherever the page appears, and objects shared by
//! several pages (fonts, images) are copied only once.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::source::{PdfSource, inherited_attribute};
use crate::types::Result;

/// XObjects already written to one output document
#[derive(Debug, Default)]
pub struct XObjectCache {
    /// Source page index -> XObject id in the output
    pages: HashMap<usize, ObjectId>,
    /// Source object id -> copied object id in the output
    objects: HashMap<ObjectId, ObjectId>,
}

impl XObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the XObject for a source page, creating it on first use
    pub fn embed(
        &mut self,
        output: &mut Document,
        source: &PdfSource,
        index: usize,
    ) -> Result<ObjectId> {
        if let Some(&id) = self.pages.get(&index) {
            return Ok(id);
        }
        let id = create_page_xobject(output, source, index, &mut self.objects)?;
        self.pages.insert(index, id);
        Ok(id)
    }

    /// Number of distinct pages embedded
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Create a Form XObject from a source page.
///
/// The BBox is the page's resolved MediaBox, so content drawn at the
/// page's own coordinates stays in place.
pub fn create_page_xobject(
    output: &mut Document,
    source: &PdfSource,
    index: usize,
    copies: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page = source.page(index)?;
    let doc = source.document();
    let page_dict = doc.get_dictionary(page.id)?;

    let content_data = get_page_content(doc, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set(
        "BBox",
        Object::Array(
            page.media_box
                .iter()
                .map(|&v| Object::Real(v as f32))
                .collect(),
        ),
    );
    xobject_dict.set("FormType", Object::Integer(1));

    // Resources may live on an ancestor Pages node.
    if let Some(resources) = inherited_attribute(doc, page.id, b"Resources")? {
        xobject_dict.set("Resources", copy_object_deep(output, doc, resources, copies)?);
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(refs) => concatenate_streams(doc, refs),
            other => Ok(stream_bytes(other)),
        },
        Object::Array(refs) => concatenate_streams(doc, refs),
        _ => Ok(Vec::new()),
    }
}

fn stream_bytes(obj: &Object) -> Vec<u8> {
    match obj.as_stream() {
        Ok(stream) => stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone()),
        Err(_) => Vec::new(),
    }
}

fn concatenate_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    for obj in refs {
        if let Object::Reference(id) = obj {
            result.extend_from_slice(&stream_bytes(doc.get_object(*id)?));
            result.push(b'\n');
        }
    }
    Ok(result)
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    copies: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = copies.get(id) {
                return Ok(Object::Reference(new_id));
            }

            // Reserve the id first so reference cycles terminate.
            let new_id = output.new_object_id();
            copies.insert(*id, new_id);

            let copied = copy_object_deep(output, source, source.get_object(*id)?, copies)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, copies,
        )?)),
        Object::Array(arr) => {
            let items: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, copies))
                .collect();
            Ok(Object::Array(items?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, copies)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    copies: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        // Parent links would drag the whole source page tree along.
        if key.as_slice() == b"Parent" {
            continue;
        }
        new_dict.set(key.clone(), copy_object_deep(output, source, value, copies)?);
    }
    Ok(new_dict)
}
