use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

use blitline::{
    Bitmap, BlitMode, Filter, IRect, Job, JobRunner, MemBitmap, Rect, RotateParams, Vec2, load_png,
    rotated_blit, save_png, scaled_blit,
};

#[derive(Parser, Debug)]
#[command(name = "blitline", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a JSON job and write the canvas as PNG.
    Run(RunArgs),
    /// Resize an image.
    Scale(ScaleArgs),
    /// Rotate an image about its center.
    Rotate(RotateArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Job JSON. Source paths resolve relative to its directory.
    #[arg(long)]
    job: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScaleArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width; negative mirrors horizontally.
    #[arg(long, allow_negative_numbers = true)]
    width: i32,

    /// Output height; negative mirrors vertically.
    #[arg(long, allow_negative_numbers = true)]
    height: i32,

    /// Bilinear filtering instead of nearest sampling.
    #[arg(long, default_value_t = false)]
    bilinear: bool,
}

#[derive(Parser, Debug)]
struct RotateArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Rotation in degrees.
    #[arg(long, allow_negative_numbers = true)]
    degrees: f64,

    /// Output size relative to the input.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Bilinear filtering instead of nearest sampling.
    #[arg(long, default_value_t = false)]
    bilinear: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Scale(args) => cmd_scale(args),
        Command::Rotate(args) => cmd_rotate(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn filter_for(bilinear: bool) -> Filter {
    if bilinear {
        Filter::Bilinear
    } else {
        Filter::Nearest
    }
}

fn read_input(path: &Path) -> anyhow::Result<MemBitmap> {
    load_png(path).with_context(|| format!("load input '{}'", path.display()))
}

fn write_output(bm: &MemBitmap, path: &Path) -> anyhow::Result<()> {
    save_png(bm, path).with_context(|| format!("write png '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let job = Job::from_path(&args.job)
        .with_context(|| format!("read job '{}'", args.job.display()))?;
    let root = args.job.parent().unwrap_or_else(|| Path::new("."));
    let canvas = JobRunner::new(root)
        .run(&job)
        .with_context(|| format!("run job '{}'", args.job.display()))?;
    write_output(&canvas, &args.out)
}

fn cmd_scale(args: ScaleArgs) -> anyhow::Result<()> {
    let src = read_input(&args.in_path)?;
    let mut dst = MemBitmap::new(args.width.unsigned_abs(), args.height.unsigned_abs())?;
    let dst_rect = IRect::from_xywh(
        args.width.min(0).saturating_neg(),
        args.height.min(0).saturating_neg(),
        args.width,
        args.height,
    );
    let src_rect = Rect::new(0.0, 0.0, f64::from(src.width()), f64::from(src.height()));
    let mode = BlitMode::COPY.with_filter(filter_for(args.bilinear));
    scaled_blit(&mut dst, &src, dst_rect, src_rect, 1.0, mode);
    write_output(&dst, &args.out)
}

fn cmd_rotate(args: RotateArgs) -> anyhow::Result<()> {
    if !args.scale.is_finite() || args.scale <= 0.0 {
        anyhow::bail!("--scale must be finite and > 0");
    }
    let src = read_input(&args.in_path)?;
    let width = (f64::from(src.width()) * args.scale).round() as u32;
    let height = (f64::from(src.height()) * args.scale).round() as u32;
    let mut dst = MemBitmap::new(width, height)?;
    let params = RotateParams {
        dst_rect: IRect::from_size(width, height),
        src_rect: Rect::new(0.0, 0.0, f64::from(src.width()), f64::from(src.height())),
        angle: args.degrees.to_radians(),
        pivot_offset: Vec2::ZERO,
        clip_to_source: true,
    };
    let mode = BlitMode::COPY.with_filter(filter_for(args.bilinear));
    rotated_blit(&mut dst, &src, &params, 1.0, mode);
    write_output(&dst, &args.out)
}
