//! In-memory raster pages for the preview

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::Mutex;

use crate::types::*;

use super::RasterPageProvider;

enum RasterPage {
    Encoded(Arc<Vec<u8>>),
    Decoded(Arc<RgbaImage>),
}

/// Page images held in memory.
///
/// Pages can be given decoded or as encoded bytes (PNG). Encoded pages
/// are decoded on first use and kept, so repeated lookups are cheap.
pub struct ImageSource {
    pages: Vec<RasterPage>,
    decoded: Mutex<HashMap<usize, Arc<RgbaImage>>>,
}

impl ImageSource {
    /// Pages that are already decoded
    pub fn from_images(images: impl IntoIterator<Item = RgbaImage>) -> Self {
        Self {
            pages: images
                .into_iter()
                .map(|image| RasterPage::Decoded(Arc::new(image)))
                .collect(),
            decoded: Mutex::new(HashMap::new()),
        }
    }

    /// Pages as encoded image bytes
    pub fn from_encoded(pages: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|bytes| RasterPage::Encoded(Arc::new(bytes)))
                .collect(),
            decoded: Mutex::new(HashMap::new()),
        }
    }

    /// Number of pages decoded so far
    pub async fn decoded_count(&self) -> usize {
        self.decoded.lock().await.len()
    }
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSource")
            .field("pages", &self.pages.len())
            .finish()
    }
}

impl RasterPageProvider for ImageSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn page_image(&self, index: usize) -> Result<Arc<RgbaImage>> {
        let page = self.pages.get(index).ok_or(HandoutError::SourceUnavailable {
            index,
            count: self.pages.len(),
        })?;

        let bytes = match page {
            RasterPage::Decoded(image) => return Ok(Arc::clone(image)),
            RasterPage::Encoded(bytes) => Arc::clone(bytes),
        };

        let mut decoded = self.decoded.lock().await;
        if let Some(image) = decoded.get(&index) {
            return Ok(Arc::clone(image));
        }

        let image = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&bytes).map(|img| img.to_rgba8())
        })
        .await??;
        log::debug!(
            "Decoded preview page {} ({}x{})",
            index,
            image.width(),
            image.height()
        );

        let image = Arc::new(image);
        decoded.insert(index, Arc::clone(&image));
        Ok(image)
    }
}
