//! Layout data types for handouts
//!
//! These types carry the planner's geometry to the renderers. Every `y`
//! here is measured from the top edge of the sheet; flipping to a
//! bottom-left origin is the consumer's job (see [`super::Origin`]).

use crate::constants::{mm_to_pt, mm_to_px};
use crate::types::NotesPosition;

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major position of the n-th slot in a grid with `cols` columns
    pub fn from_index(index: usize, cols: usize) -> Self {
        Self {
            row: index / cols,
            col: index % cols,
        }
    }
}

/// Grid geometry of one sheet, in millimeters
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Number of rows of slots
    pub rows: usize,
    /// Number of columns of slots
    pub cols: usize,
    pub sheet_width_mm: f64,
    pub sheet_height_mm: f64,
    pub margin_mm: f64,
    pub spacing_mm: f64,
    /// Width of each slot
    pub slot_width_mm: f64,
    /// Height of each slot
    pub slot_height_mm: f64,
}

impl GridLayout {
    /// Total number of slots in the grid
    pub fn slot_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Grid positions in row-major order (left to right, top to bottom)
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        (0..self.slot_count()).map(|i| GridPosition::from_index(i, self.cols))
    }
}

/// A rectangle with its origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f64,
    /// Y position (top edge, measured down from the sheet top)
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Apply a unit conversion to every component
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Rect {
        Rect::new(f(self.x), f(self.y), f(self.width), f(self.height))
    }

    /// Convert a millimeter rect to points
    pub fn mm_to_pt(&self) -> Rect {
        self.map(mm_to_pt)
    }

    /// Convert a millimeter rect to whole pixels, rounding each component
    pub fn mm_to_px(&self) -> PixelRect {
        PixelRect {
            x: mm_to_px(self.x),
            y: mm_to_px(self.y),
            width: mm_to_px(self.width),
            height: mm_to_px(self.height),
        }
    }
}

/// A rectangle in device pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.x as f64,
            self.y as f64,
            self.width as f64,
            self.height as f64,
        )
    }
}

/// Sheet size and slot geometry in millimeters, points and pixels.
///
/// The mm values are the source of truth; pt values are exact conversions
/// and px values are rounded per component.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub rows: usize,
    pub cols: usize,
    pub sheet_width_mm: f64,
    pub sheet_height_mm: f64,
    pub slots_mm: Vec<Rect>,
    pub sheet_width_pt: f64,
    pub sheet_height_pt: f64,
    pub slots_pt: Vec<Rect>,
    pub sheet_width_px: i64,
    pub sheet_height_px: i64,
    pub slots_px: Vec<PixelRect>,
}

impl LayoutPlan {
    /// Number of slots on the sheet
    pub fn slot_count(&self) -> usize {
        self.slots_mm.len()
    }
}

/// A straight line segment, top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Geometry of the ruled notes area inside one slot, in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotesLayout {
    pub enabled: bool,
    pub position: NotesPosition,
    /// Effective number of ruled lines (after clamping)
    pub line_count: usize,
    /// Effective line spacing (at least 2mm)
    pub line_spacing_mm: f64,
    /// Extent of the ruled lines: line_count * line_spacing_mm
    pub lines_extent_mm: f64,
    /// Width of a left/right band (0 for bottom)
    pub area_width_mm: f64,
    /// Height of a bottom band (0 for left/right)
    pub area_height_mm: f64,
    /// Gap between slide content and the notes area
    pub gap_mm: f64,
}

impl NotesLayout {
    /// A zeroed layout for slots without notes
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            position: NotesPosition::Bottom,
            line_count: 0,
            line_spacing_mm: 0.0,
            lines_extent_mm: 0.0,
            area_width_mm: 0.0,
            area_height_mm: 0.0,
            gap_mm: 0.0,
        }
    }

    /// Horizontal space taken from the slot (band plus gap), in mm
    pub fn reserved_width_mm(&self) -> f64 {
        if self.enabled && self.position.is_side() {
            self.area_width_mm + self.gap_mm
        } else {
            0.0
        }
    }

    /// Vertical space taken from the slot (band plus gap), in mm
    pub fn reserved_height_mm(&self) -> f64 {
        if self.enabled && !self.position.is_side() {
            self.area_height_mm + self.gap_mm
        } else {
            0.0
        }
    }
}
