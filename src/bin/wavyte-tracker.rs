use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use wavyte_tracker::{Fps, Frame, FrameIndex, TrackStore, Tracker, load_tracking_file};

#[derive(Parser, Debug)]
#[command(name = "wavyte-tracker", version)]
struct Cli {
    /// Log progress to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a tracking data file.
    Inspect(InspectArgs),
    /// Draw the tracked box onto a single image.
    Frame(FrameArgs),
    /// Print the property sheet for a frame as JSON.
    Properties(PropertiesArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Binary tracking data file.
    #[arg(long)]
    tracking: PathBuf,

    /// Rate the tracked frame indices were sampled at (`num/den` or an integer).
    #[arg(long, default_value = "30/1")]
    base_fps: Fps,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Tracker configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Host timeline rate; overrides the configured `TimeScale` with `timeline / BaseFPS`.
    #[arg(long)]
    timeline_fps: Option<Fps>,
}

#[derive(Parser, Debug)]
struct PropertiesArgs {
    /// Tracker configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Host timeline rate; overrides the configured `TimeScale` with `timeline / BaseFPS`.
    #[arg(long)]
    timeline_fps: Option<Fps>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Properties(args) => cmd_properties(args),
    }
}

fn load_tracker(config: &Path, timeline_fps: Option<Fps>) -> anyhow::Result<Tracker> {
    let json = std::fs::read_to_string(config)
        .with_context(|| format!("read config '{}'", config.display()))?;
    let mut tracker = Tracker::new();
    tracker
        .set_json(&json)
        .with_context(|| format!("apply config '{}'", config.display()))?;

    if let Some(timeline) = timeline_fps {
        let time_scale = tracker.base_fps().time_scale_to(timeline);
        // Reloading re-applies the new scale to the raw indices instead of compounding.
        let path = tracker.tracking_data_path().to_string();
        tracker
            .set_json_value(&serde_json::json!({
                "TimeScale": time_scale,
                "protobuf_data_path": path,
            }))
            .with_context(|| format!("apply timeline rate {}/{}", timeline.num, timeline.den))?;
        tracing::info!(time_scale, "time scale derived from timeline rate");
    }
    Ok(tracker)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let mut store = TrackStore::new();
    let summary = load_tracking_file(&args.tracking, &mut store)?;
    store.set_base_fps(args.base_fps);

    println!("records:  {}", summary.records);
    println!("accepted: {}", summary.accepted);
    println!("skipped:  {}", summary.skipped);
    match (store.first_frame(), store.last_frame()) {
        (Some(first), Some(last)) => {
            println!("frames:   {first}..={last}");
            println!(
                "span:     {:.3}s..={:.3}s at {}/{} fps",
                store.time_of(first),
                store.time_of(last),
                args.base_fps.num,
                args.base_fps.den
            );
        }
        _ => println!("frames:   none"),
    }
    if let Some(saved_at) = summary.last_updated {
        println!("saved at: {}", saved_at.to_rfc3339());
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let tracker = load_tracker(&args.config, args.timeline_fps)?;
    let image = image::open(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?
        .to_rgba8();

    let number = FrameIndex(args.frame);
    let mut frame = tracker.render(Frame::new(number, image), number);
    if tracker.tracked_data(number).is_none() {
        tracing::warn!(frame = args.frame, "frame is not tracked; writing input unchanged");
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let image = frame
        .take_image()
        .context("rendered frame has no pixels")?;
    image::save_buffer_with_format(
        &args.out,
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_properties(args: PropertiesArgs) -> anyhow::Result<()> {
    let tracker = load_tracker(&args.config, args.timeline_fps)?;
    println!("{}", tracker.properties_json(FrameIndex(args.frame))?);
    Ok(())
}
