use pdf_handout::*;

fn settings(slots_per_sheet: SlotsPerSheet) -> HandoutSettings {
    HandoutSettings {
        slots_per_sheet,
        ..Default::default()
    }
}

#[test]
fn test_statistics_basic() {
    let pages: Vec<usize> = (0..10).collect();
    let stats =
        calculate_statistics(&pages, &settings(SlotsPerSheet::Four), &OverrideMap::new()).unwrap();

    assert_eq!(stats.source_pages, 10);
    assert_eq!(stats.output_sheets, 3);
    assert_eq!(stats.total_slots, 12);
    assert_eq!(stats.empty_slots, 2);
    assert_eq!(stats.overridden_pages, 0);
    assert_eq!(stats.distinct_layouts, 1);
}

#[test]
fn test_statistics_with_overrides() {
    let global = settings(SlotsPerSheet::Four);
    let single = settings(SlotsPerSheet::One);
    let overrides: OverrideMap = [(2, single), (9, single)].into();

    // Page 9 is overridden but not selected.
    let stats = calculate_statistics(&[0, 1, 2, 3, 4], &global, &overrides).unwrap();

    assert_eq!(stats.output_sheets, 3);
    assert_eq!(stats.total_slots, 4 + 1 + 4);
    assert_eq!(stats.empty_slots, 4);
    assert_eq!(stats.overridden_pages, 1);
    assert_eq!(stats.distinct_layouts, 2);
}

#[test]
fn test_statistics_exact_fit() {
    let pages: Vec<usize> = (0..18).collect();
    let stats =
        calculate_statistics(&pages, &settings(SlotsPerSheet::Nine), &OverrideMap::new()).unwrap();
    assert_eq!(stats.output_sheets, 2);
    assert_eq!(stats.empty_slots, 0);
}

#[test]
fn test_statistics_empty_selection() {
    let result = calculate_statistics(&[], &HandoutSettings::default(), &OverrideMap::new());
    assert!(matches!(result, Err(HandoutError::EmptySelection)));
}
