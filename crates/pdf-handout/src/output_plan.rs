//! Pagination: grouping an ordered page selection into output sheets
//!
//! Each page may carry its own settings through the override map. Pages
//! share a sheet only while their effective settings are structurally
//! identical and the sheet still has a free slot.

use std::collections::BTreeMap;

use crate::settings::HandoutSettings;
use crate::types::*;

/// Per-page settings overrides, keyed by 0-based source page index
pub type OverrideMap = BTreeMap<usize, HandoutSettings>;

/// Structural fingerprint of a settings record.
///
/// Covers every field that affects layout. Floats are compared by bit
/// pattern with negative zero folded into zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingsSignature {
    slots_per_sheet: SlotsPerSheet,
    orientation: Orientation,
    margin_mm: u64,
    spacing_mm: u64,
    scale: u64,
    show_frame: bool,
    show_sheet_numbers: bool,
    show_slide_numbers: bool,
    notes_enabled: bool,
    notes_line_count: u32,
    notes_line_spacing_mm: u64,
    notes_position: NotesPosition,
}

impl SettingsSignature {
    pub fn of(settings: &HandoutSettings) -> Self {
        Self {
            slots_per_sheet: settings.slots_per_sheet,
            orientation: settings.orientation,
            margin_mm: float_key(settings.margin_mm),
            spacing_mm: float_key(settings.spacing_mm),
            scale: float_key(settings.scale),
            show_frame: settings.show_frame,
            show_sheet_numbers: settings.show_sheet_numbers,
            show_slide_numbers: settings.show_slide_numbers,
            notes_enabled: settings.notes.enabled,
            notes_line_count: settings.notes.line_count,
            notes_line_spacing_mm: float_key(settings.notes.line_spacing_mm),
            notes_position: settings.notes.position,
        }
    }
}

fn float_key(value: f64) -> u64 {
    if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() }
}

/// One output sheet: the settings it uses and the pages placed on it
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPagePlan {
    pub settings: HandoutSettings,
    /// Source page indices, in slot order
    pub page_indices: Vec<usize>,
}

impl OutputPagePlan {
    /// Number of slots this sheet's settings provide
    pub fn capacity(&self) -> usize {
        self.settings.slots_per_sheet.count()
    }

    pub fn is_full(&self) -> bool {
        self.page_indices.len() >= self.capacity()
    }
}

/// Ordered list of output sheets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputPlan {
    pub sheets: Vec<OutputPagePlan>,
}

impl OutputPlan {
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutputPagePlan> {
        self.sheets.iter()
    }

    /// All page indices in sheet order; equals the planned selection
    pub fn page_indices(&self) -> Vec<usize> {
        self.sheets
            .iter()
            .flat_map(|sheet| sheet.page_indices.iter().copied())
            .collect()
    }
}

impl<'a> IntoIterator for &'a OutputPlan {
    type Item = &'a OutputPagePlan;
    type IntoIter = std::slice::Iter<'a, OutputPagePlan>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.iter()
    }
}

/// Effective settings for one page: its override, or the global settings
pub fn effective_settings<'a>(
    page_index: usize,
    global: &'a HandoutSettings,
    overrides: &'a OverrideMap,
) -> &'a HandoutSettings {
    overrides.get(&page_index).unwrap_or(global)
}

/// Partition an ordered page selection into output sheets.
///
/// # Arguments
/// * `pages` - Source page indices in selection order (not necessarily sorted)
/// * `global` - Settings for pages without an override
/// * `overrides` - Sparse per-page settings
///
/// A new sheet starts when there is no current sheet, when the page's
/// signature differs from the current sheet's, or when the current sheet
/// is full under its own settings. A settings change never back-fills the
/// previous sheet's free slots.
pub fn build_output_plan(
    pages: &[usize],
    global: &HandoutSettings,
    overrides: &OverrideMap,
) -> Result<OutputPlan> {
    if pages.is_empty() {
        return Err(HandoutError::EmptySelection);
    }

    global.validate()?;

    let mut sheets: Vec<OutputPagePlan> = Vec::new();
    let mut current_signature: Option<SettingsSignature> = None;

    for &page in pages {
        // Overrides on unselected pages are never looked at.
        if let Some(settings) = overrides.get(&page) {
            settings.validate().map_err(|e| match e {
                HandoutError::InvalidSettings(msg) => HandoutError::InvalidSettings(format!(
                    "override for page {}: {}",
                    page + 1,
                    msg
                )),
                other => other,
            })?;
        }

        let settings = effective_settings(page, global, overrides);
        let signature = SettingsSignature::of(settings);

        let start_new = match (sheets.last(), &current_signature) {
            (Some(sheet), Some(current)) => *current != signature || sheet.is_full(),
            _ => true,
        };

        if start_new {
            sheets.push(OutputPagePlan {
                settings: *settings,
                page_indices: Vec::with_capacity(settings.slots_per_sheet.count()),
            });
            current_signature = Some(signature);
        }

        if let Some(sheet) = sheets.last_mut() {
            sheet.page_indices.push(page);
        }
    }

    log::debug!(
        "Planned {} pages onto {} sheets ({} overrides)",
        pages.len(),
        sheets.len(),
        overrides.len()
    );

    Ok(OutputPlan { sheets })
}
