//! img2dds CLI - image to DDS texture converter
//!
//! Converts a single image (or the legacy MBM container) into a DDS
//! texture, with optional S3 compression, mipmap generation, orientation
//! fixes and normal-map swizzles. Also inspects existing DDS files (`-I`)
//! and probes images with the normal-map heuristic (`-N`).
//!
//! The short flags mirror the historical tool, which is why the customary
//! `-h`/`-v` are taken by flop/flip; use `--help` and `--version`.

mod error;

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use error::CliError;
use img2dds::dds::{read_info, BuildFlags, BuildOptions, DdsEncoder};
use img2dds::{loader, ImageFlags};

#[derive(Parser)]
#[command(
    name = "img2dds",
    version = img2dds::VERSION,
    about = "Image to DDS texture converter",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Print DDS file information and exit.
    #[arg(short = 'I')]
    info: bool,

    /// Exit successfully iff the input passes the normal-map heuristic.
    #[arg(short = 'N')]
    detect_normal: bool,

    /// Use S3 texture compression (DXT1, or DXT5 with alpha).
    #[arg(short = 'c')]
    compress: bool,

    /// Generate mipmaps.
    #[arg(short = 'm')]
    mipmaps: bool,

    /// Mark the output as a normal map.
    #[arg(short = 'n')]
    normal_map: bool,

    /// Flip horizontally.
    #[arg(short = 'h')]
    flop: bool,

    /// Flip vertically.
    #[arg(short = 'v')]
    flip: bool,

    /// Swizzle to GGGR for DXT5nm normal maps.
    #[arg(short = 's')]
    yyyx: bool,

    /// Swizzle to BGBR for DXT5nm+z normal maps.
    #[arg(short = 'S')]
    zyzx: bool,

    /// Scale factor for the output dimensions (falls back to 1.0 if
    /// unparsable).
    #[arg(short = 'r', value_name = "SCALE")]
    scale: Option<String>,

    /// Input image (PNG, JPEG, TGA, BMP, ... or MBM).
    input: PathBuf,

    /// Output DDS file (default: input with a .dds extension).
    output: Option<PathBuf>,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Print version.
    #[arg(long, action = ArgAction::Version)]
    version: Option<bool>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if cli.info {
        let info = read_info(&cli.input)?;
        println!("{}", cli.input.display());
        println!("{}", info);
        return Ok(());
    }

    let image = loader::load_image(&cli.input)?;

    if cli.detect_normal {
        process::exit(if image.is_normal_map() { 0 } else { 1 });
    }

    let output = match cli.output {
        Some(path) => path,
        None => {
            if cli.input.extension().is_none() {
                return Err(CliError::MissingExtension(cli.input));
            }
            cli.input.with_extension("dds")
        }
    };

    let mut flags = BuildFlags::empty();
    flags.set(BuildFlags::COMPRESSION, cli.compress);
    flags.set(BuildFlags::MIPMAPS, cli.mipmaps);
    flags.set(BuildFlags::NORMAL_MAP, cli.normal_map);
    flags.set(BuildFlags::FLOP, cli.flop);
    flags.set(BuildFlags::FLIP, cli.flip);
    flags.set(BuildFlags::YYYX, cli.yyyx);
    flags.set(BuildFlags::ZYZX, cli.zyzx);

    // MBM metadata is authoritative: a declared normal map is tagged as
    // such and never re-swizzled.
    if image.flags.contains(ImageFlags::NORMAL) {
        flags.insert(BuildFlags::NORMAL_MAP);
        flags.remove(BuildFlags::YYYX | BuildFlags::ZYZX);
    }

    let scale = match cli.scale.as_deref() {
        Some(text) => text.parse().unwrap_or_else(|_| {
            warn!(scale = text, "unparsable scale, using 1.0");
            1.0
        }),
        None => 1.0,
    };

    let options = BuildOptions::new(flags).with_scale(scale);
    let info = DdsEncoder::new(options).encode_to_file(&[image], &output)?;

    println!("{}", output.display());
    println!("{}", info);
    Ok(())
}
