use std::collections::HashSet;

use crate::output_plan::{OutputPlan, OverrideMap, SettingsSignature, build_output_plan};
use crate::settings::HandoutSettings;
use crate::types::*;

/// Calculate statistics for a handout
pub fn calculate_statistics(
    pages: &[usize],
    global: &HandoutSettings,
    overrides: &OverrideMap,
) -> Result<HandoutStatistics> {
    let plan = build_output_plan(pages, global, overrides)?;
    let overridden_pages = pages.iter().filter(|&&p| overrides.contains_key(&p)).count();
    Ok(plan_statistics(&plan, overridden_pages))
}

/// Statistics for an already built plan
pub fn plan_statistics(plan: &OutputPlan, overridden_pages: usize) -> HandoutStatistics {
    let source_pages = plan.iter().map(|sheet| sheet.page_indices.len()).sum();
    let total_slots = plan.iter().map(|sheet| sheet.capacity()).sum();

    let distinct_layouts = plan
        .iter()
        .map(|sheet| SettingsSignature::of(&sheet.settings))
        .collect::<HashSet<_>>()
        .len();

    HandoutStatistics {
        source_pages,
        output_sheets: plan.len(),
        total_slots,
        empty_slots: total_slots - source_pages,
        overridden_pages,
        distinct_layouts,
    }
}
