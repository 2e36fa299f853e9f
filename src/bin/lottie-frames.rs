use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lottie_frames::{
    AnimationSource, Compression, ExportKey, ExportRequest, FailurePolicy, LottieEngine,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lottie-frames", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every frame of an animation to numbered PNG files.
    Export(ExportArgs),
    /// Print an animation's frame count, frame rate and size as JSON.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input Lottie JSON.
    input: PathBuf,

    /// Output directory (must exist unless `--create-dir` is given).
    #[arg(long)]
    out_dir: PathBuf,

    /// Output width in pixels.
    #[arg(long)]
    width: u32,

    /// Output height in pixels.
    #[arg(long)]
    height: u32,

    /// Output frame rate (0 keeps the animation's native rate).
    #[arg(long, default_value_t = 0.0)]
    fps: f64,

    /// Worker threads (0 uses all available cores).
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Stop scheduling new frames after the first failure.
    #[arg(long, default_value_t = false)]
    fail_fast: bool,

    /// PNG compression effort.
    #[arg(long, value_enum, default_value_t = Compression::Default)]
    compression: Compression,

    /// Create the output directory if it does not exist.
    #[arg(long, default_value_t = false)]
    create_dir: bool,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Input Lottie JSON.
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let source = AnimationSource::from_path(&args.input)?;

    if args.create_dir {
        std::fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    }

    let mut request = ExportRequest::new(source, args.width, args.height, &args.out_dir)
        .with_target_fps(args.fps)
        .with_workers(args.threads);
    if args.fail_fast {
        request = request.with_policy(FailurePolicy::FailFast);
    }
    request.compression = args.compression;

    let engine = LottieEngine::new();
    let summary = lottie_frames::export(&engine, &request)
        .with_context(|| format!("export '{}'", args.input.display()))?;
    eprintln!(
        "wrote {} frames to {}",
        summary.frames_written,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let source = AnimationSource::from_path(&args.input)?;
    let info = lottie_frames::probe(&LottieEngine::new(), &source, ExportKey::issue())
        .with_context(|| format!("load '{}'", args.input.display()))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&info).context("serialize animation info")?
    );
    Ok(())
}
