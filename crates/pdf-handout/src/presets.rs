//! Named settings presets
//!
//! A handful of built-in templates plus user presets that can be exported
//! and imported as JSON.

use crate::settings::{HandoutSettings, NotesSettings};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named settings preset
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TemplatePreset {
    pub id: String,
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub description: Option<String>,
    pub settings: HandoutSettings,
}

impl TemplatePreset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, settings: HandoutSettings) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            settings,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check that the preset is usable: non-empty id and valid settings
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(HandoutError::InvalidSettings(
                "preset id must not be empty".to_string(),
            ));
        }
        self.settings.validate()
    }

    /// Serialize the preset to pretty JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HandoutError::Config(format!("Failed to serialize preset: {}", e)))
    }

    /// Parse and validate a preset from JSON
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let preset: Self =
            serde_json::from_str(json).map_err(crate::settings::settings_json_error)?;
        preset.validate()?;
        Ok(preset)
    }
}

#[allow(clippy::too_many_arguments)]
fn preset(
    id: &str,
    name: &str,
    description: &str,
    slots_per_sheet: SlotsPerSheet,
    orientation: Orientation,
    margin_mm: f64,
    spacing_mm: f64,
    toggles: (bool, bool, bool),
    scale: f64,
) -> TemplatePreset {
    let (show_frame, show_sheet_numbers, show_slide_numbers) = toggles;
    TemplatePreset::new(
        id,
        name,
        HandoutSettings {
            slots_per_sheet,
            orientation,
            margin_mm,
            spacing_mm,
            scale,
            show_frame,
            show_sheet_numbers,
            show_slide_numbers,
            notes: NotesSettings::default(),
        },
    )
    .with_description(description)
}

/// The built-in templates, in display order
pub fn builtin_presets() -> Vec<TemplatePreset> {
    vec![
        preset(
            "2-clean",
            "2 Slides Clean",
            "Wide layout with generous margin and subtle frame.",
            SlotsPerSheet::Two,
            Orientation::Landscape,
            12.0,
            8.0,
            (true, true, true),
            96.0,
        ),
        preset(
            "4-compact",
            "4 Slides Compact",
            "Dense grid, thin spacing, ideal for study notes.",
            SlotsPerSheet::Four,
            Orientation::Landscape,
            8.0,
            4.0,
            (false, true, false),
            92.0,
        ),
        preset(
            "3-space",
            "3 Slides With Space",
            "Two columns plus breathing room for annotations.",
            SlotsPerSheet::Six,
            Orientation::Portrait,
            10.0,
            10.0,
            (true, false, true),
            90.0,
        ),
        preset(
            "minimal-margin",
            "Minimal Margin",
            "Edge-to-edge look with minimal borders.",
            SlotsPerSheet::Two,
            Orientation::Portrait,
            4.0,
            4.0,
            (false, false, false),
            98.0,
        ),
        preset(
            "exam-handout",
            "Exam Handout",
            "Large readable slides with numbering and frame.",
            SlotsPerSheet::One,
            Orientation::Portrait,
            14.0,
            8.0,
            (true, true, true),
            100.0,
        ),
    ]
}

/// Find a preset by id, searching custom presets before the built-in ones
pub fn find_preset(id: &str, custom: &[TemplatePreset]) -> Option<TemplatePreset> {
    custom
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .or_else(|| builtin_presets().into_iter().find(|p| p.id == id))
}
