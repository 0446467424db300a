mod logger;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use pdf_handout::{
    HandoutExporter, HandoutSettings, JsonFileStore, MemoryStore, OutputPlan, OverrideMap,
    PdfSource, SettingsPatch, SettingsStore, SlotsPerSheet, TemplatePreset,
};
use std::path::PathBuf;

use logger::CliLogger;

#[derive(Parser)]
#[command(name = "pdft", about = "PDF handout tools", version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Directory holding saved settings and custom presets
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tile the pages of a PDF onto N-up handout sheets
    Handout(HandoutArgs),

    /// List, export, import or select settings presets
    Presets(PresetArgs),
}

#[derive(clap::Args)]
struct HandoutArgs {
    /// Input PDF file
    #[arg(short, long)]
    input: PathBuf,

    /// Output PDF file
    #[arg(short, long, required_unless_present = "plan_only")]
    output: Option<PathBuf>,

    /// Settings JSON file to start from
    #[arg(long, conflicts_with = "preset")]
    settings: Option<PathBuf>,

    /// Preset id to start from
    #[arg(long)]
    preset: Option<String>,

    /// Pages to include, 1-based (e.g. "1,3,5-7"); all pages by default
    #[arg(long)]
    pages: Option<String>,

    /// Per-page settings: PAGE=patch.json, applied over the sheet settings
    #[arg(long = "override", value_name = "PAGE=FILE", value_parser = parse_override)]
    overrides: Vec<(usize, PathBuf)>,

    /// Pages per sheet (1, 2, 4, 6 or 9)
    #[arg(long)]
    slots: Option<u32>,

    /// Sheet orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Sheet margin in mm
    #[arg(long)]
    margin: Option<f64>,

    /// Gap between slots in mm
    #[arg(long)]
    spacing: Option<f64>,

    /// Content scale in percent (80-100)
    #[arg(long)]
    scale: Option<f64>,

    /// Draw a frame around each slot
    #[arg(long)]
    frame: Option<bool>,

    /// Print "n / total" at the bottom of each sheet
    #[arg(long)]
    sheet_numbers: Option<bool>,

    /// Print the source page number in each slot
    #[arg(long)]
    slide_numbers: Option<bool>,

    /// Reserve a ruled notes area in each slot
    #[arg(long)]
    notes: Option<bool>,

    /// Number of ruled notes lines
    #[arg(long)]
    notes_lines: Option<u32>,

    /// Distance between notes lines in mm
    #[arg(long)]
    notes_spacing: Option<f64>,

    /// Where the notes area sits
    #[arg(long, value_enum)]
    notes_position: Option<NotesPositionArg>,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Remember the resolved settings in the config directory
    #[arg(long)]
    save_settings: bool,

    /// Print the sheet plan and statistics, don't generate a PDF
    #[arg(long)]
    plan_only: bool,
}

#[derive(clap::Args)]
struct PresetArgs {
    /// Print one preset as JSON
    #[arg(long, value_name = "ID")]
    export: Option<String>,

    /// Add a preset from a JSON file to the custom presets
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Make a preset the default for `handout`
    #[arg(long, value_name = "ID")]
    select: Option<String>,

    /// Clear the selected preset
    #[arg(long, conflicts_with = "select")]
    clear_selection: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum NotesPositionArg {
    Bottom,
    Left,
    Right,
}

impl From<OrientationArg> for pdf_handout::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<NotesPositionArg> for pdf_handout::NotesPosition {
    fn from(arg: NotesPositionArg) -> Self {
        match arg {
            NotesPositionArg::Bottom => Self::Bottom,
            NotesPositionArg::Left => Self::Left,
            NotesPositionArg::Right => Self::Right,
        }
    }
}

fn parse_override(value: &str) -> Result<(usize, PathBuf), String> {
    let (page, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected PAGE=FILE, got '{}'", value))?;
    let page: usize = page
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a page number", page.trim()))?;
    if page == 0 {
        return Err("pages start at 1".to_string());
    }
    Ok((page - 1, PathBuf::from(path.trim())))
}

impl HandoutArgs {
    /// Settings given as individual flags
    fn flag_patch(&self) -> Result<SettingsPatch> {
        Ok(SettingsPatch {
            slots_per_sheet: self.slots.map(SlotsPerSheet::try_from).transpose()?,
            orientation: self.orientation.map(Into::into),
            margin_mm: self.margin,
            spacing_mm: self.spacing,
            scale: self.scale,
            show_frame: self.frame,
            show_sheet_numbers: self.sheet_numbers,
            show_slide_numbers: self.slide_numbers,
            notes_enabled: self.notes,
            notes_line_count: self.notes_lines,
            notes_line_spacing_mm: self.notes_spacing,
            notes_position: self.notes_position.map(Into::into),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::new(CliLogger::level_for(cli.verbose, cli.quiet)).init()?;

    match &cli.config_dir {
        Some(dir) => run(cli.command, &JsonFileStore::new(dir)).await,
        None => {
            if cli.command.needs_config_dir() {
                bail!("--config-dir is required to save settings or presets");
            }
            run(cli.command, &MemoryStore::new()).await
        }
    }
}

impl Commands {
    /// Whether the command writes to the settings store
    fn needs_config_dir(&self) -> bool {
        match self {
            Commands::Handout(args) => args.save_settings,
            Commands::Presets(args) => {
                args.import.is_some() || args.select.is_some() || args.clear_selection
            }
        }
    }
}

async fn run<S: SettingsStore>(command: Commands, store: &S) -> Result<()> {
    match command {
        Commands::Handout(args) => handout(args, store).await,
        Commands::Presets(args) => presets(args, store).await,
    }
}

async fn handout<S: SettingsStore>(args: HandoutArgs, store: &S) -> Result<()> {
    let base = base_settings(&args, store).await?;
    let global = base.apply_patch(&args.flag_patch()?)?;

    let mut overrides = OverrideMap::new();
    for (page, path) in &args.overrides {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading override {}", path.display()))?;
        let patch = SettingsPatch::from_json(&text)
            .with_context(|| format!("parsing override {}", path.display()))?;
        overrides.insert(*page, global.apply_patch(&patch)?);
    }

    let source = PdfSource::open(&args.input).await?;
    let pages = match &args.pages {
        Some(spec) => pdf_handout::parse_page_ranges(spec, source.len())?,
        None => pdf_handout::effective_selection(&[], source.len()),
    };
    pdf_handout::validate_selection(&pages, source.len())?;

    let plan = pdf_handout::build_output_plan(&pages, &global, &overrides)?;
    let overridden = pages.iter().filter(|&&p| overrides.contains_key(&p)).count();
    let stats = pdf_handout::plan_statistics(&plan, overridden);

    println!("Handout Statistics:");
    println!("  Source pages: {}", stats.source_pages);
    println!("  Output sheets: {}", stats.output_sheets);
    println!("  Empty slots: {}", stats.empty_slots);
    println!("  Overridden pages: {}", stats.overridden_pages);
    println!("  Distinct layouts: {}", stats.distinct_layouts);

    if args.save_settings {
        store.save_settings(&global).await?;
    }

    if args.plan_only {
        print_plan(&plan);
        return Ok(());
    }

    let Some(output) = args.output else {
        bail!("--output is required unless --plan-only is given");
    };

    let mut exporter = HandoutExporter::new();
    if let Some(title) = args.title {
        exporter = exporter.with_title(title);
    }
    let (document, _source) = exporter.export(plan, source).await?;
    pdf_handout::save_pdf(document, &output).await?;
    println!("Handout → {}", output.display());

    Ok(())
}

/// Settings before flags: a file, a preset, the selected preset, or the saved settings
async fn base_settings<S: SettingsStore>(args: &HandoutArgs, store: &S) -> Result<HandoutSettings> {
    if let Some(path) = &args.settings {
        return Ok(HandoutSettings::load(path)
            .await
            .with_context(|| format!("loading settings {}", path.display()))?);
    }

    let custom = store.load_presets().await?;
    let preset_id = match &args.preset {
        Some(id) => Some(id.clone()),
        None => store.selected_preset().await?,
    };

    match preset_id {
        Some(id) => match pdf_handout::find_preset(&id, &custom) {
            Some(preset) => {
                log::info!("Using preset '{}'", preset.id);
                Ok(preset.settings)
            }
            None => bail!("unknown preset '{}'", id),
        },
        None => Ok(store.load_settings().await?),
    }
}

fn print_plan(plan: &OutputPlan) {
    for (index, sheet) in plan.iter().enumerate() {
        let pages: Vec<String> = sheet
            .page_indices
            .iter()
            .map(|p| (p + 1).to_string())
            .collect();
        println!(
            "Sheet {}: {}-up {:?}, pages {}",
            index + 1,
            sheet.capacity(),
            sheet.settings.orientation,
            pages.join(", ")
        );
    }
}

async fn presets<S: SettingsStore>(args: PresetArgs, store: &S) -> Result<()> {
    let mut custom = store.load_presets().await?;

    if let Some(path) = &args.import {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading preset {}", path.display()))?;
        let preset = TemplatePreset::from_json(&text)?;
        println!("Imported preset '{}'", preset.id);
        custom.retain(|p| p.id != preset.id);
        custom.push(preset);
        store.save_presets(&custom).await?;
    }

    if let Some(id) = &args.select {
        if pdf_handout::find_preset(id, &custom).is_none() {
            bail!("unknown preset '{}'", id);
        }
        store.select_preset(Some(id)).await?;
        println!("Selected preset '{}'", id);
    }

    if args.clear_selection {
        store.select_preset(None).await?;
    }

    if let Some(id) = &args.export {
        let Some(preset) = pdf_handout::find_preset(id, &custom) else {
            bail!("unknown preset '{}'", id);
        };
        println!("{}", preset.to_json()?);
        return Ok(());
    }

    let selected = store.selected_preset().await?;
    let builtin = pdf_handout::builtin_presets();
    for preset in custom.iter().chain(builtin.iter()) {
        let marker = if selected.as_deref() == Some(preset.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:<16} {:<22} {}",
            marker,
            preset.id,
            preset.name,
            preset.description.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
