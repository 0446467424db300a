//! Property-based invariant tests for the sheet grid and the output planner.
//!
//! 1. Partition: sheets concatenated give back the selection, in order.
//! 2. Capacity: no sheet holds more pages than its own slot count.
//! 3. Boundaries: a sheet only holds pages with identical settings, and a
//!    new sheet starts only on a settings change or a full sheet.
//! 4. Geometry: margins, gaps and slots add up to the sheet size.
//! 5. Slots stay on the sheet and never overlap.
//! 6. Origin duality: top-left y + height + bottom-left y == sheet height.
//! 7. Notes never exceed their share of the slot.

use pdf_handout::layout::{calculate_notes_layout, content_area, create_grid_layout, slot_rects};
use pdf_handout::*;
use proptest::prelude::*;

const EPSILON: f64 = 1e-9;

// ── Strategies ──────────────────────────────────────────────────────────

fn slots() -> impl Strategy<Value = SlotsPerSheet> {
    proptest::sample::select(SlotsPerSheet::ALL.to_vec())
}

fn orientation() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Portrait), Just(Orientation::Landscape)]
}

fn notes_position() -> impl Strategy<Value = NotesPosition> {
    prop_oneof![
        Just(NotesPosition::Bottom),
        Just(NotesPosition::Left),
        Just(NotesPosition::Right)
    ]
}

/// Settings that always leave a usable area on the sheet
fn settings() -> impl Strategy<Value = HandoutSettings> {
    (
        slots(),
        orientation(),
        0.0f64..=20.0,
        0.0f64..=12.0,
        80.0f64..=100.0,
        any::<bool>(),
        (any::<bool>(), 0u32..=30, 0.0f64..=15.0, notes_position()),
    )
        .prop_map(
            |(slots_per_sheet, orientation, margin_mm, spacing_mm, scale, show_frame, notes)| {
                HandoutSettings {
                    slots_per_sheet,
                    orientation,
                    margin_mm,
                    spacing_mm,
                    scale,
                    show_frame,
                    notes: NotesSettings {
                        enabled: notes.0,
                        line_count: notes.1,
                        line_spacing_mm: notes.2.max(0.1),
                        position: notes.3,
                    },
                    ..Default::default()
                }
            },
        )
}

/// A selection plus overrides drawn from a small pool, so that equal
/// settings recur and neighbouring overrides can share sheets.
fn selection_with_overrides() -> impl Strategy<Value = (Vec<usize>, HandoutSettings, OverrideMap)>
{
    (
        proptest::collection::vec(0usize..60, 1..40),
        settings(),
        proptest::collection::vec(settings(), 1..4),
        proptest::collection::vec((0usize..60, 0usize..4), 0..20),
    )
        .prop_map(|(pages, global, pool, picks)| {
            let overrides = picks
                .into_iter()
                .map(|(page, pick)| (page, pool[pick % pool.len()]))
                .collect();
            (pages, global, overrides)
        })
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Planner laws
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn plan_partitions_selection((pages, global, overrides) in selection_with_overrides()) {
        let plan = build_output_plan(&pages, &global, &overrides).unwrap();
        prop_assert_eq!(plan.page_indices(), pages);
    }

    #[test]
    fn plan_respects_capacity((pages, global, overrides) in selection_with_overrides()) {
        let plan = build_output_plan(&pages, &global, &overrides).unwrap();
        for sheet in &plan {
            prop_assert!(!sheet.page_indices.is_empty());
            prop_assert!(sheet.page_indices.len() <= sheet.capacity());
        }
    }

    #[test]
    fn plan_breaks_only_at_boundaries((pages, global, overrides) in selection_with_overrides()) {
        let plan = build_output_plan(&pages, &global, &overrides).unwrap();

        for sheet in &plan {
            let signature = SettingsSignature::of(&sheet.settings);
            for &page in &sheet.page_indices {
                let settings = effective_settings(page, &global, &overrides);
                prop_assert_eq!(&SettingsSignature::of(settings), &signature);
            }
        }

        for pair in plan.sheets.windows(2) {
            let changed = SettingsSignature::of(&pair[0].settings)
                != SettingsSignature::of(&pair[1].settings);
            prop_assert!(changed || pair[0].is_full());
        }
    }

    #[test]
    fn statistics_count_slots((pages, global, overrides) in selection_with_overrides()) {
        let stats = calculate_statistics(&pages, &global, &overrides).unwrap();
        prop_assert_eq!(stats.source_pages, pages.len());
        prop_assert_eq!(stats.total_slots, stats.source_pages + stats.empty_slots);
        prop_assert!(stats.distinct_layouts <= stats.output_sheets);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-6. Grid geometry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn grid_adds_up_to_sheet(
        slots in slots(),
        orientation in orientation(),
        margin in 0.0f64..=20.0,
        spacing in 0.0f64..=12.0,
    ) {
        let grid = create_grid_layout(slots, orientation, margin, spacing).unwrap();
        prop_assert_eq!(grid.slot_count(), slots.count());

        let cols = grid.cols as f64;
        let rows = grid.rows as f64;
        let width = 2.0 * margin + spacing * (cols - 1.0) + cols * grid.slot_width_mm;
        let height = 2.0 * margin + spacing * (rows - 1.0) + rows * grid.slot_height_mm;
        prop_assert!((width - grid.sheet_width_mm).abs() < EPSILON);
        prop_assert!((height - grid.sheet_height_mm).abs() < EPSILON);
    }

    #[test]
    fn slots_on_sheet_and_disjoint(
        slots in slots(),
        orientation in orientation(),
        margin in 0.0f64..=20.0,
        spacing in 0.0f64..=12.0,
    ) {
        let grid = create_grid_layout(slots, orientation, margin, spacing).unwrap();
        let rects = slot_rects(&grid);

        for rect in &rects {
            prop_assert!(rect.x >= margin - EPSILON && rect.y >= margin - EPSILON);
            prop_assert!(rect.right() <= grid.sheet_width_mm - margin + EPSILON);
            prop_assert!(rect.bottom() <= grid.sheet_height_mm - margin + EPSILON);
        }

        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let apart = a.right() <= b.x + EPSILON
                    || b.right() <= a.x + EPSILON
                    || a.bottom() <= b.y + EPSILON
                    || b.bottom() <= a.y + EPSILON;
                prop_assert!(apart, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn origin_duality(settings in settings()) {
        let plan = build_layout_plan(&settings).unwrap();
        for slot in &plan.slots_pt {
            let top = Origin::TopLeft.rect(plan.sheet_height_pt, slot);
            let bottom = Origin::BottomLeft.rect(plan.sheet_height_pt, slot);
            prop_assert!((bottom.y + slot.height + top.y - plan.sheet_height_pt).abs() < 1e-6);
        }
    }

    #[test]
    fn point_slots_are_exact_conversions(settings in settings()) {
        let plan = build_layout_plan(&settings).unwrap();
        for (mm, pt) in plan.slots_mm.iter().zip(&plan.slots_pt) {
            prop_assert_eq!(pt.x, mm_to_pt(mm.x));
            prop_assert_eq!(pt.width, mm_to_pt(mm.width));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Notes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn notes_stay_within_share(settings in settings()) {
        let plan = build_layout_plan(&settings).unwrap();
        let slot = plan.slots_mm[0];
        let notes = calculate_notes_layout(slot.width, slot.height, &settings.notes);

        if notes.enabled {
            let max_lines = ((slot.height * 0.45 / notes.line_spacing_mm).floor() as usize).max(1);
            prop_assert!(notes.line_count >= 1);
            prop_assert!(notes.line_count <= max_lines);
            prop_assert!(notes.line_spacing_mm >= 2.0);
            prop_assert!(notes.gap_mm <= 4.0);
        }

        let content = content_area(&slot, &notes, |mm| mm);
        prop_assert!(content.width >= 0.0 && content.height >= 0.0);
        prop_assert!(content.x >= slot.x && content.right() <= slot.right() + EPSILON);
    }
}

// ── Examples ────────────────────────────────────────────────────────────

#[test]
fn settings_boundary_example() {
    let global = HandoutSettings {
        slots_per_sheet: SlotsPerSheet::Two,
        orientation: Orientation::Portrait,
        ..Default::default()
    };
    let overrides: OverrideMap = [(
        1,
        HandoutSettings {
            orientation: Orientation::Landscape,
            ..global
        },
    )]
    .into();

    let plan = build_output_plan(&[0, 1, 2, 3], &global, &overrides).unwrap();
    let groups: Vec<_> = plan.iter().map(|s| s.page_indices.clone()).collect();
    assert_eq!(groups, vec![vec![0], vec![1], vec![2, 3]]);
}

#[test]
fn degenerate_layout_example() {
    let result = create_grid_layout(SlotsPerSheet::Nine, Orientation::Portrait, 100.0, 10.0);
    assert!(matches!(
        result,
        Err(HandoutError::DegenerateLayout { .. })
    ));
}

#[test]
fn unit_conversion_examples() {
    assert_eq!(mm_to_pt(10.0), 10.0 * 72.0 / 25.4);
    assert_eq!(mm_to_px(10.0), 38);
}
