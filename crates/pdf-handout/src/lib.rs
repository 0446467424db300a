//! N-up handout layout and pagination
//!
//! Plans how source pages are tiled onto output sheets and renders the
//! result as a PDF or as raster previews.

pub mod constants;
pub mod layout;
mod output_plan;
mod presets;
pub mod render;
mod selection;
mod settings;
pub mod source;
mod stats;
#[cfg(feature = "serde")]
mod store;
mod types;

pub use constants::{mm_to_pt, mm_to_px, pt_to_mm};
pub use layout::{LayoutCache, LayoutPlan, Origin, Rect, build_layout_plan};
pub use output_plan::*;
pub use presets::{TemplatePreset, builtin_presets, find_preset};
pub use render::{HandoutExporter, PreviewGeneration, PreviewRenderer};
pub use selection::*;
pub use settings::*;
pub use source::{
    ImageSource, PdfSource, RasterPageProvider, SourcePageProvider, load_pdf, save_pdf,
};
pub use stats::{calculate_statistics, plan_statistics};
#[cfg(feature = "serde")]
pub use store::{JsonFileStore, MemoryStore, SettingsStore};
pub use types::*;
