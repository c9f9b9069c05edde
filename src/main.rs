use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tone_palette::color::RECOMMENDATION_NAMES;
use tone_palette::{
    derive_palette, AnalysisSession, MedianCutExtractor, PaletteResult, PipelineConfig, RgbColor,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tone-palette",
    about = "Recommend colors from an image's dominant color",
    version
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an image and print its palette
    Analyze {
        /// Image file (JPEG, PNG, GIF or WEBP)
        image: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Sample every n-th pixel (overrides the configuration)
        #[arg(short, long)]
        quality: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Derive a palette from a color given as #rrggbb or r,g,b
    Derive {
        color: RgbColor,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration to a JSON file
    GenerateConfig {
        /// Output file path
        #[arg(default_value = "tone-palette.json")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli.command) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Analyze {
            image,
            config,
            quality,
            json,
        } => analyze(&image, config.as_deref(), quality, json),
        Commands::Derive { color, json } => print_result(&derive_palette(color), json),
        Commands::GenerateConfig { output } => {
            PipelineConfig::default()
                .to_json_file(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            eprintln!("Configuration written to {}", output.display());
            Ok(())
        }
    }
}

fn analyze(image: &Path, config_path: Option<&Path>, quality: Option<u32>, json: bool) -> Result<()> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(quality) = quality {
        config.extraction.quality = quality;
    }
    config.validate()?;

    let mut session = AnalysisSession::new(
        MedianCutExtractor::from_config(&config.extraction),
        config.upload,
    );

    let outcome = session
        .upload(image)
        .map(|_| ())
        .and_then(|()| session.analyze().cloned());

    match outcome {
        Ok(result) => print_result(&result, json),
        Err(error) => {
            eprintln!("Analysis failed: {}", error);
            if let Some(message) = session.message() {
                eprintln!("Suggestion: {}", message);
            }
            process::exit(1);
        }
    }
}

fn print_result(result: &PaletteResult, json: bool) -> Result<()> {
    if json {
        // JSON to stdout for programmatic use
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let lab = result.base.to_lab();
    println!("Dominant color: {}", result.base);
    println!("  Lab: L*={:.1}, a*={:.1}, b*={:.1}", lab.l, lab.a, lab.b);
    println!();
    println!("Tone: {} ({})", result.tone.family(), result.tone.description());
    println!();
    println!("Recommended colors:");
    for (name, color) in RECOMMENDATION_NAMES.iter().zip(result.recommendations) {
        println!("  {:<9} {}", name, color);
    }
    println!("  {:<9} {}", "codes", result.hex_codes().join(" "));
    println!();
    println!("Combinations:");
    for combo in &result.combinations {
        let codes: Vec<String> = combo.colors.iter().map(|c| c.to_hex()).collect();
        println!("  {:<9} {}  - {}", combo.name, codes.join(" "), combo.description);
    }
    Ok(())
}
