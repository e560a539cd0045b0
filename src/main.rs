use clap::{Parser, Subcommand};
use proofsheet::render::OutputFormat;
use proofsheet::settings::SettingsStore;
use proofsheet::{catalog, export, fonts, output, preview, transform};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Flags that override the persisted settings for one invocation.
#[derive(clap::Args, Clone)]
struct SheetArgs {
    /// Header text drawn at the top of every page
    #[arg(long)]
    header: Option<String>,

    /// Watermark text stamped on every page
    #[arg(long)]
    watermark: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Encoding quality, 1-100
    #[arg(long)]
    quality: Option<u8>,

    /// Filename pattern; `{number}` becomes the 3-digit page index
    #[arg(long)]
    pattern: Option<String>,

    /// Font family for header and page numbers
    #[arg(long)]
    font: Option<String>,

    /// Font size in pixels for header and page numbers
    #[arg(long)]
    font_size: Option<u32>,

    /// Skip the capture-date caption line
    #[arg(long)]
    no_metadata: bool,

    /// Output directory for the exported pages
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "proofsheet")]
#[command(about = "Contact sheet generator for photo folders")]
#[command(long_about = "\
Contact sheet generator for photo folders

Scans a folder of photos, sorts them by capture date from EXIF metadata,
and lays them out as paginated thumbnail grids with per-image captions,
an optional header, and an optional watermark. Pages export as numbered
JPEG/PNG files or a single multi-page PDF.

Persistent settings live in settings.json next to presets.json in the
config directory; command-line flags override them for one run.")]
#[command(version)]
struct Cli {
    /// Directory holding settings.json and presets.json
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a folder and list the catalog
    Scan {
        /// Folder of photos
        folder: PathBuf,
    },
    /// Render a folder into contact sheet pages
    Sheet {
        /// Folder of photos
        folder: PathBuf,
        #[command(flatten)]
        args: SheetArgs,
    },
    /// Render one page at preview resolution
    Preview {
        /// Folder of photos
        folder: PathBuf,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Where to write the preview image
        #[arg(long, default_value = "preview.png")]
        out: PathBuf,
    },
    /// Rotate images in place and refresh their thumbnails
    Rotate {
        /// Image files to rotate
        images: Vec<PathBuf>,
        /// Rotation delta in degrees, positive = clockwise
        #[arg(long, default_value_t = 90, allow_negative_numbers = true)]
        degrees: i32,
    },
    /// List fonts available on this system
    Fonts,
    /// Manage named settings presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// Snapshot the current settings under a name
    Save { name: String },
    /// Replace the current settings with a named preset
    Load { name: String },
    /// Delete a named preset
    Delete { name: String },
    /// List preset names
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan { folder } => {
            let mut catalog = catalog::Catalog::new();
            catalog.scan_folder(&folder)?;
            output::print_catalog(&catalog);
        }
        Command::Sheet { folder, args } => {
            let store = SettingsStore::open(&cli.config_dir)?;
            let mut config = store.settings.to_render_config();
            apply_overrides(&mut config, &args);
            if config.save_folder.as_os_str().is_empty() {
                config.save_folder = PathBuf::from(".");
            }

            let mut catalog = catalog::Catalog::new();
            catalog.scan_folder(&folder)?;
            if !export::create_output(&catalog, &config) {
                return Err("export failed".into());
            }
            println!(
                "Exported {} images to {}",
                catalog.len(),
                config.save_folder.display()
            );
        }
        Command::Preview { folder, page, out } => {
            let store = SettingsStore::open(&cli.config_dir)?;
            let config = store.settings.to_render_config();

            let mut catalog = catalog::Catalog::new();
            catalog.scan_folder(&folder)?;
            match preview::render_preview(&catalog, &config, page) {
                Some(canvas) => {
                    canvas.save(&out)?;
                    println!("Preview page {} → {}", page, out.display());
                }
                None => return Err(format!("page {page} is out of range").into()),
            }
        }
        Command::Rotate { images, degrees } => {
            let mut catalog = catalog::Catalog::new();
            for image in &images {
                if let Err(e) = catalog.add_single_image(image) {
                    warn!(path = %image.display(), error = %e, "skipping image");
                }
            }
            let rotated = transform::rotate_batch(catalog.records_mut(), degrees);
            println!("Rotated {} of {} images by {}°", rotated, images.len(), degrees);
        }
        Command::Fonts => {
            output::print_fonts(&fonts::available_fonts());
        }
        Command::Preset { action } => {
            let mut store = SettingsStore::open(&cli.config_dir)?;
            match action {
                PresetAction::Save { name } => {
                    store.save_preset(&name)?;
                    println!("Saved preset '{name}'");
                }
                PresetAction::Load { name } => {
                    store.load_preset(&name)?;
                    store.save_settings()?;
                    println!("Loaded preset '{name}'");
                }
                PresetAction::Delete { name } => {
                    store.delete_preset(&name)?;
                    println!("Deleted preset '{name}'");
                }
                PresetAction::List => {
                    for name in store.preset_names() {
                        println!("{name}");
                    }
                }
            }
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut proofsheet::render::RenderConfig, args: &SheetArgs) {
    if let Some(header) = &args.header {
        config.header_text = header.clone();
    }
    if let Some(watermark) = &args.watermark {
        config.watermark_text = watermark.clone();
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(quality) = args.quality {
        config.quality = proofsheet::render::Quality::new(quality);
    }
    if let Some(pattern) = &args.pattern {
        config.filename_pattern = pattern.clone();
    }
    if let Some(font) = &args.font {
        config.font_name = font.clone();
    }
    if let Some(size) = args.font_size {
        config.font_size = size;
    }
    if args.no_metadata {
        config.include_metadata = false;
    }
    if let Some(out) = &args.out {
        config.save_folder = out.clone();
    }
}
