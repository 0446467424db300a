use crate::constants::{MAX_SCALE_PERCENT, MIN_SCALE_PERCENT};
use crate::layout::create_grid_layout;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ruled note-taking area settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NotesSettings {
    #[cfg_attr(feature = "serde", serde(rename = "notesEnabled"))]
    pub enabled: bool,
    /// Requested number of ruled lines (clamped to what fits)
    #[cfg_attr(feature = "serde", serde(rename = "notesLineCount"))]
    pub line_count: u32,
    /// Requested distance between lines; anything under 2mm is raised to 2mm
    #[cfg_attr(feature = "serde", serde(rename = "notesLineSpacingMm"))]
    pub line_spacing_mm: f64,
    #[cfg_attr(feature = "serde", serde(rename = "notesPosition"))]
    pub position: NotesPosition,
}

impl Default for NotesSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            line_count: 6,
            line_spacing_mm: 6.0,
            position: NotesPosition::Bottom,
        }
    }
}

/// Layout settings for one sheet (or, through the override map, one page)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct HandoutSettings {
    pub slots_per_sheet: SlotsPerSheet,
    pub orientation: Orientation,
    /// Outer sheet margin
    pub margin_mm: f64,
    /// Gap between neighbouring slots
    pub spacing_mm: f64,
    /// Content scale in percent (80-100)
    pub scale: f64,
    pub show_frame: bool,
    #[cfg_attr(feature = "serde", serde(alias = "showPageNumbers"))]
    pub show_sheet_numbers: bool,
    pub show_slide_numbers: bool,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub notes: NotesSettings,
}

impl Default for HandoutSettings {
    fn default() -> Self {
        Self {
            slots_per_sheet: SlotsPerSheet::Four,
            orientation: Orientation::Landscape,
            margin_mm: 8.0,
            spacing_mm: 6.0,
            scale: 95.0,
            show_frame: true,
            show_sheet_numbers: true,
            show_slide_numbers: false,
            notes: NotesSettings::default(),
        }
    }
}

impl HandoutSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        check_length("margin", self.margin_mm)?;
        check_length("spacing", self.spacing_mm)?;

        if !self.scale.is_finite()
            || self.scale < MIN_SCALE_PERCENT
            || self.scale > MAX_SCALE_PERCENT
        {
            return Err(HandoutError::InvalidSettings(format!(
                "scale must be between {}% and {}%, got {}",
                MIN_SCALE_PERCENT, MAX_SCALE_PERCENT, self.scale
            )));
        }

        let spacing = self.notes.line_spacing_mm;
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(HandoutError::InvalidSettings(format!(
                "notes line spacing must be a positive length, got {}",
                spacing
            )));
        }

        Ok(())
    }

    /// Merge a partial update over these settings.
    ///
    /// The merged record is validated and its slot grid is built before it
    /// is returned, so margins or spacing that leave no room for the slots
    /// fail here with `DegenerateLayout` rather than at export time.
    pub fn apply_patch(&self, patch: &SettingsPatch) -> Result<HandoutSettings> {
        let merged = HandoutSettings {
            slots_per_sheet: patch.slots_per_sheet.unwrap_or(self.slots_per_sheet),
            orientation: patch.orientation.unwrap_or(self.orientation),
            margin_mm: patch.margin_mm.unwrap_or(self.margin_mm),
            spacing_mm: patch.spacing_mm.unwrap_or(self.spacing_mm),
            scale: patch.scale.unwrap_or(self.scale),
            show_frame: patch.show_frame.unwrap_or(self.show_frame),
            show_sheet_numbers: patch.show_sheet_numbers.unwrap_or(self.show_sheet_numbers),
            show_slide_numbers: patch.show_slide_numbers.unwrap_or(self.show_slide_numbers),
            notes: NotesSettings {
                enabled: patch.notes_enabled.unwrap_or(self.notes.enabled),
                line_count: patch.notes_line_count.unwrap_or(self.notes.line_count),
                line_spacing_mm: patch
                    .notes_line_spacing_mm
                    .unwrap_or(self.notes.line_spacing_mm),
                position: patch.notes_position.unwrap_or(self.notes.position),
            },
        };
        merged.validate()?;
        create_grid_layout(
            merged.slots_per_sheet,
            merged.orientation,
            merged.margin_mm,
            merged.spacing_mm,
        )?;
        Ok(merged)
    }

    /// Parse settings from JSON. Missing fields take their default values.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json).map_err(settings_json_error)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HandoutError::Config(format!("Failed to serialize settings: {}", e)))
    }

    /// Load settings from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json(&text)
    }

    /// Save settings to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        tokio::fs::write(path, self.to_json()?).await?;
        Ok(())
    }
}

fn check_length(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(HandoutError::InvalidSettings(format!(
            "{} must be a non-negative length, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Map a serde_json error: bad values are invalid settings, bad syntax is a config error
#[cfg(feature = "serde")]
pub(crate) fn settings_json_error(e: serde_json::Error) -> HandoutError {
    match e.classify() {
        serde_json::error::Category::Data => HandoutError::InvalidSettings(e.to_string()),
        _ => HandoutError::Config(format!("Failed to parse settings: {}", e)),
    }
}

/// A partial settings update. Absent fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(default, rename_all = "camelCase", deny_unknown_fields)
)]
pub struct SettingsPatch {
    pub slots_per_sheet: Option<SlotsPerSheet>,
    pub orientation: Option<Orientation>,
    pub margin_mm: Option<f64>,
    pub spacing_mm: Option<f64>,
    pub scale: Option<f64>,
    pub show_frame: Option<bool>,
    pub show_sheet_numbers: Option<bool>,
    pub show_slide_numbers: Option<bool>,
    pub notes_enabled: Option<bool>,
    pub notes_line_count: Option<u32>,
    pub notes_line_spacing_mm: Option<f64>,
    pub notes_position: Option<NotesPosition>,
}

impl SettingsPatch {
    /// Parse a patch from JSON, rejecting unknown fields and unsupported values
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(settings_json_error)
    }

    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}
