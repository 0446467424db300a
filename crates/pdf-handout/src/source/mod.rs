//! Source page providers
//!
//! Consumers ask a provider for page sizes (export) or page images
//! (preview) by 0-based index. Providers must answer repeated lookups
//! without decoding the page again.

mod pdf;
mod raster;

use std::future::Future;
use std::sync::Arc;

use image::RgbaImage;

use crate::types::*;

pub use pdf::{PdfSource, load_pdf, save_pdf};
pub(crate) use pdf::inherited_attribute;
pub use raster::ImageSource;

/// Intrinsic page sizes of a source document
pub trait SourcePageProvider {
    /// Number of pages in the source
    fn page_count(&self) -> impl Future<Output = Result<usize>>;

    /// Intrinsic size of a page in points
    fn page_size(&self, index: usize) -> impl Future<Output = Result<PageSize>>;
}

/// Rasterized source pages for the preview
pub trait RasterPageProvider {
    /// Number of pages in the source
    fn page_count(&self) -> usize;

    /// The rendered page image
    fn page_image(&self, index: usize) -> impl Future<Output = Result<Arc<RgbaImage>>>;
}
