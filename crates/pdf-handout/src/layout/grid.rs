//! Grid layout calculation
//!
//! This module handles the geometric layout of the slot grid on a sheet:
//! grid shape, slot dimensions and slot origins, all in millimeters.

use crate::constants::BASE_SHEET_MM;
use crate::types::{HandoutError, Orientation, Result, SlotsPerSheet};

use super::{GridLayout, GridPosition, Rect};

// =============================================================================
// Grid Creation
// =============================================================================

/// Sheet dimensions (width, height) in millimeters for an orientation.
///
/// The physical sheet is fixed; landscape swaps the reference width and height.
pub fn sheet_dimensions_mm(orientation: Orientation) -> (f64, f64) {
    let (w, h) = BASE_SHEET_MM;
    match orientation {
        Orientation::Portrait => (w, h),
        Orientation::Landscape => (h, w),
    }
}

/// Create a grid layout for the given slot count and spacing.
///
/// # Arguments
/// * `slots_per_sheet` - Number of slots; selects the grid shape
/// * `orientation` - Sheet orientation; selects sheet size and, for 2 and 6, the shape
/// * `margin_mm` - Outer margin on every side
/// * `spacing_mm` - Gap between neighbouring slots
///
/// # Errors
/// `DegenerateLayout` when margins and spacing leave no usable width or height.
pub fn create_grid_layout(
    slots_per_sheet: SlotsPerSheet,
    orientation: Orientation,
    margin_mm: f64,
    spacing_mm: f64,
) -> Result<GridLayout> {
    let (rows, cols) = slots_per_sheet.grid_dimensions(orientation);
    let (sheet_width_mm, sheet_height_mm) = sheet_dimensions_mm(orientation);

    let usable_width_mm = sheet_width_mm - margin_mm * 2.0 - spacing_mm * (cols - 1) as f64;
    let usable_height_mm = sheet_height_mm - margin_mm * 2.0 - spacing_mm * (rows - 1) as f64;

    if usable_width_mm <= 0.0 || usable_height_mm <= 0.0 {
        return Err(HandoutError::DegenerateLayout {
            usable_width_mm,
            usable_height_mm,
        });
    }

    Ok(GridLayout {
        rows,
        cols,
        sheet_width_mm,
        sheet_height_mm,
        margin_mm,
        spacing_mm,
        slot_width_mm: usable_width_mm / cols as f64,
        slot_height_mm: usable_height_mm / rows as f64,
    })
}

// =============================================================================
// Slot Calculations
// =============================================================================

/// Calculate the bounds of the slot at the given grid position.
///
/// Row 0 is the top row; `y` grows downward from the sheet's top edge.
pub fn slot_bounds(grid: &GridLayout, pos: GridPosition) -> Rect {
    let x = grid.margin_mm + pos.col as f64 * (grid.slot_width_mm + grid.spacing_mm);
    let y = grid.margin_mm + pos.row as f64 * (grid.slot_height_mm + grid.spacing_mm);

    Rect::new(x, y, grid.slot_width_mm, grid.slot_height_mm)
}

/// All slot rectangles in row-major order (left to right, top to bottom)
pub fn slot_rects(grid: &GridLayout) -> Vec<Rect> {
    grid.positions().map(|pos| slot_bounds(grid, pos)).collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_sheet_dimensions() {
        assert_eq!(sheet_dimensions_mm(Orientation::Portrait), (210.0, 297.0));
        assert_eq!(sheet_dimensions_mm(Orientation::Landscape), (297.0, 210.0));
    }

    #[test]
    fn test_single_slot_grid() {
        let grid =
            create_grid_layout(SlotsPerSheet::One, Orientation::Portrait, 10.0, 5.0).unwrap();

        assert_eq!(grid.rows, 1);
        assert_eq!(grid.cols, 1);
        assert_eq!(grid.slot_width_mm, 190.0);
        assert_eq!(grid.slot_height_mm, 277.0);
    }

    #[test]
    fn test_two_up_portrait_stacks_vertically() {
        let grid =
            create_grid_layout(SlotsPerSheet::Two, Orientation::Portrait, 10.0, 6.0).unwrap();

        assert_eq!((grid.rows, grid.cols), (2, 1));
        let slots = slot_rects(&grid);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].x, slots[1].x);
        assert!((slots[1].y - (slots[0].bottom() + 6.0)).abs() < EPS);
    }

    #[test]
    fn test_six_up_landscape_grid() {
        let grid =
            create_grid_layout(SlotsPerSheet::Six, Orientation::Landscape, 8.0, 6.0).unwrap();

        assert_eq!((grid.rows, grid.cols), (2, 3));
        // (297 - 16 - 12) / 3
        assert!((grid.slot_width_mm - 269.0 / 3.0).abs() < EPS);
        // (210 - 16 - 6) / 2
        assert!((grid.slot_height_mm - 94.0).abs() < EPS);
    }

    #[test]
    fn test_slot_bounds_row_major() {
        let grid =
            create_grid_layout(SlotsPerSheet::Four, Orientation::Portrait, 10.0, 10.0).unwrap();
        // (210 - 20 - 10) / 2 = 90, (297 - 20 - 10) / 2 = 133.5
        let slots = slot_rects(&grid);

        assert_eq!(slots[0], Rect::new(10.0, 10.0, 90.0, 133.5));
        assert_eq!(slots[1], Rect::new(110.0, 10.0, 90.0, 133.5));
        assert_eq!(slots[2], Rect::new(10.0, 153.5, 90.0, 133.5));
        assert_eq!(slots[3], Rect::new(110.0, 153.5, 90.0, 133.5));
    }

    #[test]
    fn test_zero_margin_and_spacing_tiles_whole_sheet() {
        let grid =
            create_grid_layout(SlotsPerSheet::Nine, Orientation::Portrait, 0.0, 0.0).unwrap();
        let slots = slot_rects(&grid);

        assert_eq!(slots[0].x, 0.0);
        assert_eq!(slots[0].y, 0.0);
        assert!((slots[8].right() - 210.0).abs() < EPS);
        assert!((slots[8].bottom() - 297.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_width() {
        let result = create_grid_layout(SlotsPerSheet::Nine, Orientation::Portrait, 100.0, 10.0);

        match result {
            Err(HandoutError::DegenerateLayout {
                usable_width_mm, ..
            }) => assert!((usable_width_mm + 10.0).abs() < EPS),
            other => panic!("Expected DegenerateLayout, got {:?}", other),
        }
    }

    #[test]
    fn test_exactly_zero_usable_height_is_degenerate() {
        // Landscape 1-up: height 210 - 2 * 105 = 0
        let result = create_grid_layout(SlotsPerSheet::One, Orientation::Landscape, 105.0, 0.0);
        assert!(matches!(result, Err(HandoutError::DegenerateLayout { .. })));
    }
}
