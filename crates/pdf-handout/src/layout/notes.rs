//! Ruled notes area calculation
//!
//! Derives the notes sub-region of a slot from the slot's size and the
//! notes settings. The line count is clamped silently so the notes never
//! take more than a fixed share of the slot.

use crate::constants::{
    MIN_NOTES_LINE_SPACING_MM, NOTES_LINE_INSET_MM, NOTES_MAX_EXTENT_RATIO, NOTES_MAX_GAP_MM,
    NOTES_SIDE_MAX_WIDTH_MM, NOTES_SIDE_WIDTH_RATIO,
};
use crate::settings::NotesSettings;
use crate::types::NotesPosition;

use super::{LineSegment, NotesLayout, Rect};

/// Calculate the notes layout for a slot.
///
/// # Arguments
/// * `slot_width_mm` - Width of the slot
/// * `slot_height_mm` - Height of the slot
/// * `notes` - Notes settings that apply to the slot
pub fn calculate_notes_layout(
    slot_width_mm: f64,
    slot_height_mm: f64,
    notes: &NotesSettings,
) -> NotesLayout {
    if !notes.enabled {
        return NotesLayout::disabled();
    }

    let requested_lines = notes.line_count.max(1) as usize;
    let line_spacing_mm = notes.line_spacing_mm.max(MIN_NOTES_LINE_SPACING_MM);

    // The cap comes from the slot height for every position, side bands included.
    let max_extent_mm = slot_height_mm * NOTES_MAX_EXTENT_RATIO;
    let max_lines = ((max_extent_mm / line_spacing_mm).floor() as usize).max(1);
    let line_count = requested_lines.min(max_lines);

    let lines_extent_mm = line_count as f64 * line_spacing_mm;
    let gap_mm = NOTES_MAX_GAP_MM.min(line_spacing_mm * 0.5);

    let (area_width_mm, area_height_mm) = match notes.position {
        NotesPosition::Bottom => (0.0, lines_extent_mm),
        NotesPosition::Left | NotesPosition::Right => (
            (slot_width_mm * NOTES_SIDE_WIDTH_RATIO).min(NOTES_SIDE_MAX_WIDTH_MM),
            0.0,
        ),
    };

    NotesLayout {
        enabled: true,
        position: notes.position,
        line_count,
        line_spacing_mm,
        lines_extent_mm,
        area_width_mm,
        area_height_mm,
        gap_mm,
    }
}

/// Ruled line segments for a slot's notes area, in millimeters (top-left origin).
///
/// Lines sit one spacing apart, the first one a full spacing below the
/// top of the band (bottom notes) or below the gap (side notes).
pub fn notes_lines(slot: &Rect, notes: &NotesLayout) -> Vec<LineSegment> {
    let Some(area) = super::notes_area(slot, notes, |mm| mm) else {
        return Vec::new();
    };

    let first_y = match notes.position {
        NotesPosition::Bottom => area.y + notes.line_spacing_mm,
        NotesPosition::Left | NotesPosition::Right => {
            area.y + notes.gap_mm + notes.line_spacing_mm
        }
    };

    let x1 = area.x + NOTES_LINE_INSET_MM;
    let x2 = (area.right() - NOTES_LINE_INSET_MM).max(x1);

    (0..notes.line_count)
        .map(|i| first_y + i as f64 * notes.line_spacing_mm)
        .filter(|&y| y <= slot.bottom() + 1e-9)
        .map(|y| LineSegment { x1, y1: y, x2, y2: y })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(line_count: u32, spacing: f64, position: NotesPosition) -> NotesSettings {
        NotesSettings {
            enabled: true,
            line_count,
            line_spacing_mm: spacing,
            position,
        }
    }

    #[test]
    fn test_disabled_is_zeroed() {
        let layout = calculate_notes_layout(100.0, 100.0, &NotesSettings::default());
        assert_eq!(layout, NotesLayout::disabled());
        assert_eq!(layout.reserved_height_mm(), 0.0);
        assert_eq!(layout.reserved_width_mm(), 0.0);
    }

    #[test]
    fn test_line_count_clamped_to_slot_height() {
        // 45% of 100mm = 45mm, 45 / 6 = 7 lines
        let layout = calculate_notes_layout(80.0, 100.0, &notes(20, 6.0, NotesPosition::Bottom));
        assert_eq!(layout.line_count, 7);
        assert_eq!(layout.area_height_mm, 42.0);
        assert_eq!(layout.area_width_mm, 0.0);
        assert_eq!(layout.gap_mm, 3.0);
    }

    #[test]
    fn test_requested_count_kept_when_it_fits() {
        let layout = calculate_notes_layout(80.0, 100.0, &notes(3, 6.0, NotesPosition::Bottom));
        assert_eq!(layout.line_count, 3);
        assert_eq!(layout.lines_extent_mm, 18.0);
    }

    #[test]
    fn test_minimum_one_line() {
        // 45% of 10mm = 4.5mm < 6mm spacing, still one line
        let layout = calculate_notes_layout(80.0, 10.0, &notes(5, 6.0, NotesPosition::Bottom));
        assert_eq!(layout.line_count, 1);

        let layout = calculate_notes_layout(80.0, 100.0, &notes(0, 6.0, NotesPosition::Bottom));
        assert_eq!(layout.line_count, 1);
    }

    #[test]
    fn test_spacing_raised_to_two_mm() {
        let layout = calculate_notes_layout(80.0, 100.0, &notes(4, 0.5, NotesPosition::Bottom));
        assert_eq!(layout.line_spacing_mm, 2.0);
        assert_eq!(layout.gap_mm, 1.0);
    }

    #[test]
    fn test_gap_capped_at_four_mm() {
        let layout = calculate_notes_layout(80.0, 200.0, &notes(2, 12.0, NotesPosition::Bottom));
        assert_eq!(layout.gap_mm, 4.0);
    }

    #[test]
    fn test_side_band_width() {
        let layout = calculate_notes_layout(100.0, 100.0, &notes(4, 6.0, NotesPosition::Left));
        assert_eq!(layout.area_width_mm, 38.0);
        assert_eq!(layout.area_height_mm, 0.0);
        assert_eq!(layout.reserved_width_mm(), 41.0);
        assert_eq!(layout.reserved_height_mm(), 0.0);

        let layout = calculate_notes_layout(200.0, 100.0, &notes(4, 6.0, NotesPosition::Right));
        assert_eq!(layout.area_width_mm, 55.0);
    }

    #[test]
    fn test_side_cap_uses_slot_height_not_width() {
        // A wide, short slot: width would allow many lines, height allows 45% of 20mm.
        let layout = calculate_notes_layout(300.0, 20.0, &notes(10, 3.0, NotesPosition::Right));
        assert_eq!(layout.line_count, 3);

        // A narrow, tall slot: the cap is still generous because height is large.
        let layout = calculate_notes_layout(20.0, 300.0, &notes(10, 3.0, NotesPosition::Left));
        assert_eq!(layout.line_count, 10);
    }

    #[test]
    fn test_bottom_lines_fill_band() {
        let slot = Rect::new(10.0, 10.0, 80.0, 100.0);
        let layout = calculate_notes_layout(80.0, 100.0, &notes(3, 6.0, NotesPosition::Bottom));
        let lines = notes_lines(&slot, &layout);

        assert_eq!(lines.len(), 3);
        // band starts at 110 - 18 = 92
        assert_eq!(lines[0].y1, 98.0);
        assert_eq!(lines[2].y1, 110.0);
        assert_eq!(lines[0].x1, 10.0 + NOTES_LINE_INSET_MM);
        assert_eq!(lines[0].x2, 90.0 - NOTES_LINE_INSET_MM);
    }

    #[test]
    fn test_right_lines_stay_in_band() {
        let slot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let layout = calculate_notes_layout(100.0, 100.0, &notes(4, 6.0, NotesPosition::Right));
        let lines = notes_lines(&slot, &layout);

        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert!(line.x1 >= 62.0);
            assert!(line.x2 <= 100.0);
        }
    }

    #[test]
    fn test_disabled_has_no_lines() {
        let slot = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(notes_lines(&slot, &NotesLayout::disabled()).is_empty());
    }
}
