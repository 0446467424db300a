//! Content placement within slots
//!
//! This module handles:
//! - Splitting a slot into the slide content box and the notes band
//! - Fitting a source page into the content box (uniform scale, centered)
//! - Mapping top-origin geometry into a consumer's coordinate convention

use crate::types::NotesPosition;

use super::{NotesLayout, Rect};

// =============================================================================
// Coordinate Origins
// =============================================================================

/// Coordinate convention of a rendering surface.
///
/// The planner always emits top-origin geometry. Each consumer picks the
/// variant matching its surface and applies it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Raster surfaces: origin top-left, y grows downward
    TopLeft,
    /// PDF content streams: origin bottom-left, y grows upward
    BottomLeft,
}

impl Origin {
    /// Map the y of a box with the given height into this convention
    pub fn y(self, sheet_height: f64, y: f64, height: f64) -> f64 {
        match self {
            Origin::TopLeft => y,
            Origin::BottomLeft => sheet_height - y - height,
        }
    }

    /// Map a rectangle into this convention; `y` becomes the near edge
    pub fn rect(self, sheet_height: f64, rect: &Rect) -> Rect {
        Rect::new(
            rect.x,
            self.y(sheet_height, rect.y, rect.height),
            rect.width,
            rect.height,
        )
    }

    /// Map a single point's y into this convention
    pub fn point_y(self, sheet_height: f64, y: f64) -> f64 {
        self.y(sheet_height, y, 0.0)
    }
}

// =============================================================================
// Slot Partitioning
// =============================================================================

/// Calculate the content box of a slot: the slot minus the notes reservation.
///
/// `to_unit` converts the notes' millimeter extents into the slot's unit,
/// so the same rule serves mm, pt and px slots.
pub fn content_area(slot: &Rect, notes: &NotesLayout, to_unit: impl Fn(f64) -> f64) -> Rect {
    let reserved_width = to_unit(notes.reserved_width_mm());
    let reserved_height = to_unit(notes.reserved_height_mm());

    let x = if notes.enabled && notes.position == NotesPosition::Left {
        slot.x + reserved_width
    } else {
        slot.x
    };

    Rect::new(
        x,
        slot.y,
        (slot.width - reserved_width).max(0.0),
        (slot.height - reserved_height).max(0.0),
    )
}

/// Calculate the notes band of a slot, or `None` when notes are disabled.
pub fn notes_area(slot: &Rect, notes: &NotesLayout, to_unit: impl Fn(f64) -> f64) -> Option<Rect> {
    if !notes.enabled {
        return None;
    }

    let area = match notes.position {
        NotesPosition::Bottom => {
            let height = to_unit(notes.area_height_mm);
            Rect::new(slot.x, slot.bottom() - height, slot.width, height)
        }
        NotesPosition::Left => {
            Rect::new(slot.x, slot.y, to_unit(notes.area_width_mm), slot.height)
        }
        NotesPosition::Right => {
            let width = to_unit(notes.area_width_mm);
            Rect::new(slot.right() - width, slot.y, width, slot.height)
        }
    };
    Some(area)
}

// =============================================================================
// Page Fitting
// =============================================================================

/// A source page fitted into a content box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedPage {
    /// Where the scaled page lands, same unit and origin as the content box
    pub rect: Rect,
    /// Factor from source units to content-box units
    pub scale: f64,
}

/// Fit a source page into a content box.
///
/// scale = min(content_w / source_w, content_h / source_h) * scale_percent / 100,
/// and the scaled page is centered in the box.
pub fn fit_page(
    content: &Rect,
    source_width: f64,
    source_height: f64,
    scale_percent: f64,
) -> FittedPage {
    let fit = if source_width > 0.0 && source_height > 0.0 {
        (content.width / source_width).min(content.height / source_height)
    } else {
        0.0
    };
    let scale = fit * scale_percent / 100.0;

    let width = source_width * scale;
    let height = source_height * scale;

    FittedPage {
        rect: Rect::new(
            content.x + (content.width - width) / 2.0,
            content.y + (content.height - height) / 2.0,
            width,
            height,
        ),
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::calculate_notes_layout;
    use crate::settings::NotesSettings;

    fn identity(mm: f64) -> f64 {
        mm
    }

    fn notes_at(position: NotesPosition) -> NotesLayout {
        calculate_notes_layout(
            100.0,
            100.0,
            &NotesSettings {
                enabled: true,
                line_count: 3,
                line_spacing_mm: 6.0,
                position,
            },
        )
    }

    #[test]
    fn test_origin_flip() {
        let rect = Rect::new(10.0, 20.0, 50.0, 30.0);
        assert_eq!(Origin::TopLeft.rect(200.0, &rect), rect);
        assert_eq!(Origin::BottomLeft.rect(200.0, &rect).y, 150.0);
        assert_eq!(Origin::BottomLeft.point_y(200.0, 20.0), 180.0);
    }

    #[test]
    fn test_content_area_without_notes() {
        let slot = Rect::new(5.0, 5.0, 100.0, 100.0);
        let content = content_area(&slot, &NotesLayout::disabled(), identity);
        assert_eq!(content, slot);
        assert!(notes_area(&slot, &NotesLayout::disabled(), identity).is_none());
    }

    #[test]
    fn test_content_area_bottom_notes() {
        let slot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let notes = notes_at(NotesPosition::Bottom);
        // 3 lines * 6mm + 3mm gap
        let content = content_area(&slot, &notes, identity);
        assert_eq!(content, Rect::new(0.0, 0.0, 100.0, 79.0));

        let area = notes_area(&slot, &notes, identity).unwrap();
        assert_eq!(area, Rect::new(0.0, 82.0, 100.0, 18.0));
    }

    #[test]
    fn test_content_area_left_notes_shifts_content() {
        let slot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let notes = notes_at(NotesPosition::Left);
        // band 38mm + 3mm gap
        let content = content_area(&slot, &notes, identity);
        assert_eq!(content, Rect::new(41.0, 0.0, 59.0, 100.0));

        let area = notes_area(&slot, &notes, identity).unwrap();
        assert_eq!(area, Rect::new(0.0, 0.0, 38.0, 100.0));
    }

    #[test]
    fn test_content_area_right_notes() {
        let slot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let notes = notes_at(NotesPosition::Right);
        let content = content_area(&slot, &notes, identity);
        assert_eq!(content, Rect::new(0.0, 0.0, 59.0, 100.0));

        let area = notes_area(&slot, &notes, identity).unwrap();
        assert_eq!(area.x, 62.0);
    }

    #[test]
    fn test_fit_page_wide_source() {
        let content = Rect::new(0.0, 0.0, 100.0, 100.0);
        let fitted = fit_page(&content, 200.0, 100.0, 100.0);

        assert_eq!(fitted.scale, 0.5);
        assert_eq!(fitted.rect, Rect::new(0.0, 25.0, 100.0, 50.0));
    }

    #[test]
    fn test_fit_page_applies_user_scale_and_centers() {
        let content = Rect::new(10.0, 10.0, 100.0, 100.0);
        let fitted = fit_page(&content, 100.0, 100.0, 80.0);

        assert_eq!(fitted.scale, 0.8);
        assert!((fitted.rect.x - 20.0).abs() < 1e-9);
        assert!((fitted.rect.y - 20.0).abs() < 1e-9);
        assert!((fitted.rect.width - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_page_degenerate_source() {
        let content = Rect::new(0.0, 0.0, 100.0, 100.0);
        let fitted = fit_page(&content, 0.0, 100.0, 100.0);
        assert_eq!(fitted.scale, 0.0);
        assert_eq!(fitted.rect.width, 0.0);
    }
}
