use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber;

use film_look::{config::Config, session::Session};

#[derive(Parser)]
#[command(
    name = "film-look",
    version,
    about = "Apply a film look to still images and frame sequences",
    long_about = "Film-Look runs images through a fixed chain of analog-inspired stages: color and tone, chromatic aberration, blur, grain, vignette, sepia, highlight sparkle, and mono/color/dust noise. Point it at a single image or at a directory of numbered frames (01_name.png, 02_name.png, ...)."
)]
struct Cli {
    /// Input image file, or directory of numbered frames
    #[arg(short, long)]
    input: PathBuf,

    /// Output image file, or directory for processed frames
    #[arg(short, long)]
    output: PathBuf,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fixed seed for reproducible noise placement
    #[arg(long)]
    seed: Option<u64>,

    /// Brightness offset [-1, 1]
    #[arg(long)]
    brightness: Option<f32>,

    /// Contrast multiplier [0.5, 1.5]
    #[arg(long)]
    contrast: Option<f32>,

    /// Saturation [0, 2]
    #[arg(long)]
    saturation: Option<f32>,

    /// Color temperature shift [-1, 1]
    #[arg(long)]
    temperature: Option<f32>,

    /// Green/magenta tint shift [-1, 1]
    #[arg(long)]
    tint: Option<f32>,

    /// Film grain strength [0, 1]
    #[arg(long)]
    grain: Option<f32>,

    /// Vignette darkening [0, 1]
    #[arg(long)]
    vignette: Option<f32>,

    /// Sepia tone mix [0, 1]
    #[arg(long)]
    sepia: Option<f32>,

    /// Red/blue channel separation in pixels [0, 10]
    #[arg(long)]
    chromatic_aberration: Option<f32>,

    /// Gaussian blur radius [0, 20]
    #[arg(long)]
    blur: Option<f32>,

    /// Highlight sparkle accent [0, 1]
    #[arg(long)]
    sparkle: Option<f32>,

    /// Monochrome static noise [0, 1]
    #[arg(long)]
    mono_noise: Option<f32>,

    /// Colored dot noise [0, 1]
    #[arg(long)]
    color_noise: Option<f32>,

    /// Dust speck overlay [0, 1]
    #[arg(long)]
    dust_noise: Option<f32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Film-Look v{}", env!("CARGO_PKG_VERSION"));
    info!("Input: {:?}", cli.input);
    info!("Output: {:?}", cli.output);

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };

    // Slider flags override the configuration file
    apply_overrides(&mut config, &cli);
    if cli.seed.is_some() {
        config.session.seed = cli.seed;
    }

    let mut session = Session::new(&config)?;

    if cli.input.is_dir() {
        let report = session.process_sequence(&cli.input, &cli.output)?;
        info!(
            "Sequence complete: {} frames written, {} dropped",
            report.processed, report.dropped
        );
    } else {
        session.process_still(&cli.input, &cli.output)?;
        info!("Done! Output saved to: {:?}", cli.output);
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    let p = &mut config.params;
    macro_rules! set {
        ($field:ident) => {
            if let Some(value) = cli.$field {
                p.$field = value;
            }
        };
    }
    set!(brightness);
    set!(contrast);
    set!(saturation);
    set!(temperature);
    set!(tint);
    set!(grain);
    set!(vignette);
    set!(sepia);
    set!(chromatic_aberration);
    set!(blur);
    set!(sparkle);
    set!(mono_noise);
    set!(color_noise);
    set!(dust_noise);
}
