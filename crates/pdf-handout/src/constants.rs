//! Shared constants for handout layout
//!
//! This module centralizes unit conversion and the magic numbers used by
//! the planner and both renderers.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f64 = 72.0 / 25.4; // ≈ 2.83465

/// Device pixels per millimeter at the 96 dpi reference density
pub const PIXELS_PER_MM: f64 = 3.7795275591;

/// Convert millimeters to points. Exact, never rounded.
#[inline]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f64) -> f64 {
    pt / POINTS_PER_MM
}

/// Convert millimeters to whole device pixels (display approximation)
#[inline]
pub fn mm_to_px(mm: f64) -> i64 {
    (mm * PIXELS_PER_MM).round() as i64
}

// =============================================================================
// Sheet Dimensions
// =============================================================================

/// Reference sheet size in millimeters (A4 portrait)
pub const BASE_SHEET_MM: (f64, f64) = (210.0, 297.0);

/// Fallback source page size in points (US Letter) when a page has no MediaBox
pub const DEFAULT_PAGE_DIMENSIONS: (f64, f64) = (612.0, 792.0);

// =============================================================================
// Settings Limits
// =============================================================================

/// Smallest allowed content scale (percent)
pub const MIN_SCALE_PERCENT: f64 = 80.0;

/// Largest allowed content scale (percent)
pub const MAX_SCALE_PERCENT: f64 = 100.0;

// =============================================================================
// Notes Area
// =============================================================================

/// Smallest effective notes line spacing (mm)
pub const MIN_NOTES_LINE_SPACING_MM: f64 = 2.0;

/// Share of the slot height the notes area may take
pub const NOTES_MAX_EXTENT_RATIO: f64 = 0.45;

/// Largest gap between slide content and notes (mm)
pub const NOTES_MAX_GAP_MM: f64 = 4.0;

/// Share of the slot width a side notes band may take
pub const NOTES_SIDE_WIDTH_RATIO: f64 = 0.38;

/// Absolute cap on the width of a side notes band (mm)
pub const NOTES_SIDE_MAX_WIDTH_MM: f64 = 55.0;

/// Horizontal inset of ruled lines inside the notes area (mm)
pub const NOTES_LINE_INSET_MM: f64 = 1.6;

// =============================================================================
// Decorations (PDF export)
// =============================================================================

/// Slot frame line width (points)
pub const FRAME_LINE_WIDTH: f64 = 0.8;

/// Slot frame stroke color (RGB, 0..1)
pub const FRAME_COLOR: (f64, f64, f64) = (0.55, 0.57, 0.6);

/// Notes rule line width (points)
pub const NOTES_LINE_WIDTH: f64 = 0.5;

/// Notes rule stroke color (RGB, 0..1)
pub const NOTES_LINE_COLOR: (f64, f64, f64) = (0.67, 0.71, 0.75);

/// Slide number fill color (RGB, 0..1)
pub const SLIDE_NUMBER_COLOR: (f64, f64, f64) = (0.25, 0.27, 0.3);

/// Sheet number fill color (RGB, 0..1)
pub const SHEET_NUMBER_COLOR: (f64, f64, f64) = (0.3, 0.32, 0.36);

/// Offset of the slide number from the slot's top-left corner (points)
pub const SLIDE_NUMBER_INSET: f64 = 6.0;

/// Distance of the sheet number baseline from the bottom edge (points)
pub const SHEET_NUMBER_BASELINE: f64 = 18.0;

/// Helvetica advance widths in em, from the standard font metrics
pub const HELVETICA_DIGIT_WIDTH: f64 = 0.556;
pub const HELVETICA_SPACE_WIDTH: f64 = 0.278;
pub const HELVETICA_SLASH_WIDTH: f64 = 0.278;
/// Fallback for characters without a table entry
pub const HELVETICA_DEFAULT_WIDTH: f64 = 0.556;

/// Font size for sheet labels, chosen by sheet width in points
pub fn sheet_font_size(sheet_width_pt: f64) -> f64 {
    if sheet_width_pt >= 700.0 {
        12.0
    } else if sheet_width_pt >= 600.0 {
        11.0
    } else {
        10.0
    }
}

// =============================================================================
// Preview
// =============================================================================

/// Smallest content box in the raster preview (pixels)
pub const PREVIEW_MIN_CONTENT_PX: f64 = 8.0;

/// Smallest preview zoom factor
pub const PREVIEW_MIN_ZOOM: f64 = 0.25;

/// Largest preview zoom factor
pub const PREVIEW_MAX_ZOOM: f64 = 4.0;

/// Slot frame color in the preview (RGBA)
pub const PREVIEW_FRAME_COLOR: [u8; 4] = [60, 70, 90, 179];

/// Notes rule color in the preview (RGBA)
pub const PREVIEW_NOTES_LINE_COLOR: [u8; 4] = [170, 180, 190, 191];
