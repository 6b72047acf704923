use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eink_palette::DitherMode;
use inkdex::assets::AssetLoader;
use inkdex::models::{AppConfig, DisplaySpec, RecordKey};
use inkdex::rendering::{Composer, DescriptionChoice, SvgFontLoader};
use inkdex::services::{PngFileDisplay, RenderPipeline};

#[derive(Parser)]
#[command(name = "inkdex")]
#[command(about = "Encyclopedia cards for small e-ink panels")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a card and push it to the display
    Render(RenderArgs),
    /// Extract the embedded default config for customization
    Init {
        /// Overwrite an existing config file
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Dex number or name; a random entry when omitted
    #[arg(short, long)]
    pokemon: Option<String>,

    /// Output PNG file path
    #[arg(short, long, default_value = "inkdex.png")]
    output: PathBuf,

    /// Display preset (phat-yellow, phat-red, what-yellow, what-red, impression-5.7)
    #[arg(short, long)]
    display: Option<String>,

    /// Palette as comma-separated hex RGB (e.g. "#FFFFFF,#000000,#FFFF00")
    #[arg(long)]
    colors: Option<String>,

    /// Seed for the random entry and description
    #[arg(long)]
    seed: Option<u64>,

    /// Render this description candidate instead of a random one
    #[arg(long)]
    description_index: Option<usize>,

    /// Mirror both axes, for panels mounted upside down (default: not mirrored)
    #[arg(long)]
    flip: bool,

    /// Mirror horizontally
    #[arg(long)]
    flip_x: bool,

    /// Mirror vertically
    #[arg(long)]
    flip_y: bool,

    /// Use Floyd-Steinberg error diffusion when reducing colors
    #[arg(long)]
    dither: bool,

    /// Also write one PBM bitplane per palette color
    #[arg(long)]
    bitplanes: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render(args)) => {
            init_tracing();
            run_render_command(args)
        }
        Some(Commands::Init { force }) => run_init_command(force),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkdex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Render one card to the file-backed display
fn run_render_command(args: RenderArgs) -> anyhow::Result<()> {
    let loader = AssetLoader::from_env();
    if let Err(e) = loader.seed_if_configured() {
        tracing::warn!(%e, "Failed to seed config");
    }
    let mut config = AppConfig::load_from_assets(&loader).with_env_overrides();
    if let Some(colors) = &args.colors {
        config.palette = Some(colors.split(',').map(|c| c.trim().to_string()).collect());
    }

    let display_name = args.display.as_deref().unwrap_or(&config.display);
    let spec = DisplaySpec::from_name(display_name)
        .with_context(|| {
            let known: Vec<&str> = DisplaySpec::PRESETS.iter().map(|(name, _)| *name).collect();
            format!("Unknown display '{display_name}' (known: {})", known.join(", "))
        })?
        .with_orientation(args.flip || args.flip_x, args.flip || args.flip_y);

    let loader = loader.with_default_fonts_dir(config.font.dir.clone());
    let fonts = SvgFontLoader::with_fonts(loader.get_fonts(), config.font.family.clone())?;

    let composer =
        Composer::new(fonts, config.layout.clone()).with_dump_dir(config.debug_dump_dir.clone());
    let dither = if args.dither {
        DitherMode::FloydSteinberg
    } else {
        DitherMode::None
    };
    let pipeline = RenderPipeline::for_display(&config, composer, &spec, dither)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let choice = match (args.description_index, args.seed) {
        (Some(index), _) => DescriptionChoice::Index(index),
        (None, Some(seed)) => DescriptionChoice::Seeded(seed),
        (None, None) => DescriptionChoice::Random,
    };

    let key = args.pokemon.as_deref().map(RecordKey::parse);
    let mut display = PngFileDisplay::new(spec, &args.output).with_bitplanes(args.bitplanes);
    let selection = pipeline.run(&mut display, key.as_ref(), choice, &mut rng)?;

    println!(
        "Rendered No. {} {} to {} ({}x{})",
        selection.record.id,
        selection.record.display_name(),
        args.output.display(),
        spec.width,
        spec.height
    );
    Ok(())
}

/// Extract the embedded config
fn run_init_command(force: bool) -> anyhow::Result<()> {
    let loader = AssetLoader::from_env();
    let report = loader.init(force)?;

    for f in &report.written {
        println!("  + {f}");
    }
    if !report.skipped.is_empty() {
        println!(
            "Skipped {} existing file (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }
    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&loader).with_env_overrides();
    let env = |name: &str| std::env::var(name).unwrap_or_else(|_| "(not set)".to_string());

    println!("Inkdex v{VERSION}");
    println!("Encyclopedia cards for small e-ink panels\n");

    println!("Environment Variables:");
    for name in ["CONFIG_FILE", "DATA_DIR", "FONTS_DIR", "DEBUG_DUMP_DIR"] {
        println!("  {name:<14} = {}", env(name));
    }

    println!("\nConfiguration:");
    let config_source = match loader.config_file() {
        Some(path) if path.exists() => path.display().to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:   {config_source}");
    println!("  Data:     {}", config.data_dir.display());
    match config.display_spec() {
        Some(spec) => {
            let colors = config.palette_for(&spec).map(|p| p.len()).unwrap_or(0);
            println!(
                "  Display:  {} ({}x{}, {colors} colors)",
                config.display, spec.width, spec.height
            );
        }
        None => println!("  Display:  {} (unknown preset)", config.display),
    }
    println!("  Font:     {}", config.font.family);

    let dex_entries = std::fs::read_dir(config.dex_dir())
        .map(|entries| entries.flatten().count())
        .unwrap_or(0);
    println!("  Records:  {dex_entries} in {}", config.dex_dir().display());

    println!("\nCommands:");
    println!("  inkdex render   Render a card to a PNG file");
    println!("  inkdex init     Extract the default config");
    println!("\nRun 'inkdex --help' for more details.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn render_args(argv: &[&str]) -> RenderArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Render(args)) => args,
            _ => panic!("Expected render command"),
        }
    }

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_is_unflipped_by_default() {
        let args = render_args(&["inkdex", "render"]);
        assert!(!args.flip && !args.flip_x && !args.flip_y);
        assert_eq!(args.output, PathBuf::from("inkdex.png"));

        let args = render_args(&["inkdex", "render", "--flip", "--pokemon", "25"]);
        assert!(args.flip);
        assert_eq!(args.pokemon.as_deref(), Some("25"));
    }

    #[test]
    fn test_flip_help_states_default() {
        let mut cli = Cli::command();
        let render = cli.find_subcommand_mut("render").unwrap();
        let flip = render
            .get_arguments()
            .find(|a| a.get_id().as_str() == "flip")
            .unwrap();
        let help = flip.get_help().unwrap().to_string();
        assert!(help.contains("default: not mirrored"), "{help}");
    }
}
