use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandoutError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error(
        "Degenerate layout: usable area is {usable_width_mm:.2} x {usable_height_mm:.2} mm \
         (margins and spacing exceed the sheet)"
    )]
    DegenerateLayout {
        usable_width_mm: f64,
        usable_height_mm: f64,
    },
    #[error("No pages selected")]
    EmptySelection,
    #[error("Source page {index} is unavailable (source has {count} pages)")]
    SourceUnavailable { index: usize, count: usize },
    #[error("Preview generation {generation} was superseded")]
    Superseded { generation: u64 },
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, HandoutError>;

/// Sheet orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    /// Portrait: height > width
    Portrait,
    /// Landscape: width > height (default for slide decks)
    #[default]
    Landscape,
}

/// Where the ruled notes area sits relative to the slide inside a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NotesPosition {
    /// Horizontal band under the slide
    #[default]
    Bottom,
    /// Vertical band left of the slide
    Left,
    /// Vertical band right of the slide
    Right,
}

impl NotesPosition {
    /// True for the vertical left/right bands
    pub fn is_side(self) -> bool {
        matches!(self, NotesPosition::Left | NotesPosition::Right)
    }
}

/// Number of source pages tiled onto one sheet.
///
/// Only the counts with a grid shape are representable; 3 is rejected
/// rather than silently falling back to a 3x3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub enum SlotsPerSheet {
    One,
    Two,
    #[default]
    Four,
    Six,
    Nine,
}

impl SlotsPerSheet {
    pub const ALL: [SlotsPerSheet; 5] = [
        SlotsPerSheet::One,
        SlotsPerSheet::Two,
        SlotsPerSheet::Four,
        SlotsPerSheet::Six,
        SlotsPerSheet::Nine,
    ];

    /// Number of slots on a sheet
    pub fn count(self) -> usize {
        match self {
            SlotsPerSheet::One => 1,
            SlotsPerSheet::Two => 2,
            SlotsPerSheet::Four => 4,
            SlotsPerSheet::Six => 6,
            SlotsPerSheet::Nine => 9,
        }
    }

    /// Grid shape as (rows, cols) for the given orientation
    pub fn grid_dimensions(self, orientation: Orientation) -> (usize, usize) {
        match (self, orientation) {
            (SlotsPerSheet::One, _) => (1, 1),
            (SlotsPerSheet::Two, Orientation::Portrait) => (2, 1),
            (SlotsPerSheet::Two, Orientation::Landscape) => (1, 2),
            (SlotsPerSheet::Four, _) => (2, 2),
            (SlotsPerSheet::Six, Orientation::Portrait) => (3, 2),
            (SlotsPerSheet::Six, Orientation::Landscape) => (2, 3),
            (SlotsPerSheet::Nine, _) => (3, 3),
        }
    }
}

impl TryFrom<u32> for SlotsPerSheet {
    type Error = HandoutError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(SlotsPerSheet::One),
            2 => Ok(SlotsPerSheet::Two),
            4 => Ok(SlotsPerSheet::Four),
            6 => Ok(SlotsPerSheet::Six),
            9 => Ok(SlotsPerSheet::Nine),
            other => Err(HandoutError::InvalidSettings(format!(
                "{} slots per sheet is not supported (expected 1, 2, 4, 6 or 9)",
                other
            ))),
        }
    }
}

impl From<SlotsPerSheet> for u32 {
    fn from(value: SlotsPerSheet) -> Self {
        value.count() as u32
    }
}

/// Size of a source page in points, as reported by a page provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_pt: f64,
    pub height_pt: f64,
}

impl PageSize {
    pub fn new(width_pt: f64, height_pt: f64) -> Self {
        Self {
            width_pt,
            height_pt,
        }
    }
}

/// Statistics about a planned handout
#[derive(Debug, Clone, PartialEq)]
pub struct HandoutStatistics {
    /// Number of source pages placed
    pub source_pages: usize,
    /// Number of output sheets
    pub output_sheets: usize,
    /// Total slots across all sheets
    pub total_slots: usize,
    /// Slots left empty (short sheets at settings boundaries or at the end)
    pub empty_slots: usize,
    /// Pages whose settings came from the override map
    pub overridden_pages: usize,
    /// Number of distinct sheet layouts used
    pub distinct_layouts: usize,
}
