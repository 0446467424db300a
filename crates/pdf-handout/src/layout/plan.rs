//! Layout plan assembly
//!
//! Combines the millimeter grid with unit conversion so renderers can read
//! the same slot geometry in mm, pt or px.

use std::collections::HashMap;

use crate::constants::{mm_to_pt, mm_to_px};
use crate::output_plan::SettingsSignature;
use crate::settings::HandoutSettings;
use crate::types::Result;

use super::{LayoutPlan, create_grid_layout, slot_rects};

/// Build the layout plan for one set of sheet settings.
///
/// Settings are validated before any geometry is computed.
pub fn build_layout_plan(settings: &HandoutSettings) -> Result<LayoutPlan> {
    settings.validate()?;

    let grid = create_grid_layout(
        settings.slots_per_sheet,
        settings.orientation,
        settings.margin_mm,
        settings.spacing_mm,
    )?;
    let slots_mm = slot_rects(&grid);

    Ok(LayoutPlan {
        rows: grid.rows,
        cols: grid.cols,
        sheet_width_mm: grid.sheet_width_mm,
        sheet_height_mm: grid.sheet_height_mm,
        sheet_width_pt: mm_to_pt(grid.sheet_width_mm),
        sheet_height_pt: mm_to_pt(grid.sheet_height_mm),
        sheet_width_px: mm_to_px(grid.sheet_width_mm),
        sheet_height_px: mm_to_px(grid.sheet_height_mm),
        slots_pt: slots_mm.iter().map(|slot| slot.mm_to_pt()).collect(),
        slots_px: slots_mm.iter().map(|slot| slot.mm_to_px()).collect(),
        slots_mm,
    })
}

/// Layout plans memoized by settings signature.
///
/// Sheets that share settings share one plan; an override only costs one
/// extra plan per distinct settings record.
#[derive(Debug, Default)]
pub struct LayoutCache {
    plans: HashMap<SettingsSignature, LayoutPlan>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the plan for these settings, building it on first use
    pub fn get_or_build(&mut self, settings: &HandoutSettings) -> Result<&LayoutPlan> {
        let key = SettingsSignature::of(settings);
        if !self.plans.contains_key(&key) {
            let plan = build_layout_plan(settings)?;
            log::debug!(
                "Built {}x{} layout plan for {:?} sheet",
                plan.rows,
                plan.cols,
                settings.orientation
            );
            self.plans.insert(key.clone(), plan);
        }
        Ok(&self.plans[&key])
    }

    /// Number of distinct plans held
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
