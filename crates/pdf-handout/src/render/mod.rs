//! Handout rendering
//!
//! Two consumers of the same layout plans:
//! - PDF export, which embeds source pages as Form XObjects (bottom-left origin)
//! - Raster preview, which scales page images into an RGBA canvas (top-left origin)

mod export;
mod preview;
mod xobject;

pub use export::HandoutExporter;
pub use preview::{PreviewGeneration, PreviewRenderer};
pub use xobject::{XObjectCache, copy_object_deep, create_page_xobject};
