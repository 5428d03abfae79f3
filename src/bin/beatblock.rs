use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "beatblock", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every performer's stage position at a playback time.
    Positions(PositionsArgs),
    /// Print the active group and transition progress at a playback time.
    Timeline(TimelineArgs),
    /// Classify and clean a recorded gesture.
    Path(PathArgs),
}

#[derive(Parser, Debug)]
struct PositionsArgs {
    /// Input project snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Playback time in seconds.
    #[arg(long)]
    time: f64,

    /// Only print this performer.
    #[arg(long)]
    performer: Option<String>,
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    /// Input project snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Playback time in seconds.
    #[arg(long)]
    time: f64,

    /// Also print the per-beat group/transition map.
    #[arg(long)]
    beat_map: bool,
}

#[derive(Parser, Debug)]
struct PathArgs {
    /// Gesture JSON: `{"points": [{"x": .., "y": ..}, ..]}` plus optional `options`.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Treat the gesture as drawn with the constrain modifier held.
    #[arg(long)]
    shift: bool,

    /// Override the path mode.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Scale the straightness tolerance for a display pixel ratio.
    #[arg(long)]
    pixel_ratio: Option<f64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Auto,
    Direct,
    Curved,
}

impl From<ModeChoice> for beatblock::PathMode {
    fn from(choice: ModeChoice) -> Self {
        match choice {
            ModeChoice::Auto => Self::Auto,
            ModeChoice::Direct => Self::Direct,
            ModeChoice::Curved => Self::Curved,
        }
    }
}

#[derive(serde::Deserialize, Debug)]
struct Gesture {
    points: Vec<beatblock::Point>,
    #[serde(default)]
    options: beatblock::PathOptions,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineReport {
    #[serde(flatten)]
    state: beatblock::TimelineState,
    #[serde(skip_serializing_if = "Option::is_none")]
    beat_map: Option<Vec<Option<beatblock::BeatSlot>>>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Positions(args) => cmd_positions(args),
        Command::Timeline(args) => cmd_timeline(args),
        Command::Path(args) => cmd_path(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    serde_json::from_reader(r).with_context(|| format!("parse {what} JSON"))
}

fn read_project(path: &Path) -> anyhow::Result<beatblock::Choreography> {
    let snapshot: beatblock::ChoreographySnapshot = read_json(path, "project")?;
    Ok(snapshot.into_choreography()?)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("write JSON")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_positions(args: PositionsArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let engine = project.engine();

    match args.performer {
        Some(id) => {
            let id = beatblock::PerformerId::new(id);
            let position = engine
                .resolve_position(&id, args.time)
                .with_context(|| format!("unknown performer '{id}'"))?;
            print_json(&beatblock::PerformerPosition { id, position })
        }
        None => print_json(&engine.resolve_all(args.time)),
    }
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let engine = project.engine();
    let report = TimelineReport {
        state: engine.resolve_timeline(args.time),
        beat_map: args.beat_map.then(|| engine.timeline().beat_map()),
    };
    print_json(&report)
}

fn cmd_path(args: PathArgs) -> anyhow::Result<()> {
    let gesture: Gesture = read_json(&args.in_path, "gesture")?;
    let mut options = gesture.options;
    options.shift_held |= args.shift;
    if let Some(mode) = args.mode {
        options.mode = mode.into();
    }
    if let Some(ratio) = args.pixel_ratio {
        options.thresholds = beatblock::PathThresholds::for_pixel_ratio(ratio);
    }

    let derived = beatblock::derive_path(&gesture.points, options);
    eprintln!(
        "derived {:?} path with {} points",
        derived.kind,
        derived.points.len()
    );
    print_json(&derived)
}
