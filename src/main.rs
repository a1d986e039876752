use clap::{Parser, Subcommand};
use image_processor::config::{self, ToolConfig};
use image_processor::imaging::{OutputFormat, Quality, ResizeSpec, RustBackend, operations};
use image_processor::output;
use image_processor::pipeline::{self, ConvertRequest};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "image-processor")]
#[command(about = "Resize and convert raster images")]
#[command(long_about = "\
Resize and convert raster images

Reads PNG, JPEG, BMP and GIF. Writes JPEG, PNG, BMP or GIF to
<output-dir>/<name>.<format>. Resizing uses Lanczos3 resampling in both
directions.

Resize by percentage of the original (floor of each side), or by exact
width and height (aspect ratio is not preserved). JPEG cannot store alpha
or palettes, so those images are flattened to RGB first.

Run 'image-processor gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Flags for the convert command.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Image to convert
    source: Option<PathBuf>,

    /// Folder the converted file is written to
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Output file name, without extension
    #[arg(long, short = 'n')]
    name: Option<String>,

    /// Resize to this percentage of the original (1-100)
    #[arg(long, conflicts_with_all = ["width", "height"])]
    percent: Option<u32>,

    /// Exact output width in pixels
    #[arg(long, requires = "height")]
    width: Option<String>,

    /// Exact output height in pixels
    #[arg(long, requires = "width")]
    height: Option<String>,

    /// Output format: jpeg, png, bmp or gif
    #[arg(long, short = 'f')]
    format: Option<OutputFormat>,

    /// JPEG quality (1-100); values outside the range are clamped
    #[arg(long, short = 'q')]
    quality: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Resize and convert one image
    Convert(ConvertArgs),
    /// Show size, color mode and format of an image
    Identify {
        /// Image to inspect
        source: PathBuf,
    },
    /// List readable and writable formats
    Formats,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Convert(args) => {
            let config = config::load_config(&cli.config)?;
            let request = build_request(&args, &config)?;
            let report = pipeline::convert(&request)?;
            output::print_convert_output(&request.source, &report, request.output.quality);
        }
        Command::Identify { source } => {
            let info = operations::identify(&RustBackend::new(), &source)?;
            output::print_identify_output(&source, &info);
        }
        Command::Formats => output::print_formats(),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Turn flags (falling back to config) into a pipeline request.
fn build_request(
    args: &ConvertArgs,
    config: &ToolConfig,
) -> Result<ConvertRequest, pipeline::PipelineError> {
    let requested = args.quality.unwrap_or(config.output.quality);
    let quality = Quality::new(requested);
    if quality.value() != requested {
        log::warn!("quality {requested} is out of range, using {}", quality.value());
    }

    ConvertRequest::from_user_input(
        args.source.as_deref(),
        args.output_dir.as_deref(),
        args.name.as_deref().unwrap_or(""),
        || match (&args.width, &args.height, args.percent) {
            (Some(w), Some(h), _) => ResizeSpec::from_text(w, h),
            (_, _, Some(p)) => ResizeSpec::percentage(p),
            _ => ResizeSpec::percentage(config.resize.percentage),
        },
        args.format.unwrap_or(config.output.format),
        quality,
    )
}

/// Initialize `env_logger` at a level picked by `-v` count.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
