//! Terminal front-end for twinslide.
//!
//! Loads a slider configuration from TOML, replays a script of pointer and
//! keyboard input against it and prints every commit along with the frames
//! the script asks for.

mod script;
mod terminal;

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use anyhow::Context;
use clap::Parser;
use parking_lot::Mutex;
use serde::Deserialize;
use twinslide::{CommitEvent, HostState, RangeSliderController, RawSliderConfig, SliderConfig};

use crate::{script::Player, terminal::TerminalTarget};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Slider configuration in TOML.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Input script; read from stdin when omitted.
    #[arg(short, long)]
    script: Option<PathBuf>,
    /// Width of the slider in columns.
    #[arg(short, long, default_value_t = 60)]
    width: i32,
    /// Free columns on each side of the track.
    #[arg(long, default_value_t = 3)]
    margin: i32,
}

/// A configuration file: slider settings plus optional initial values.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct DemoFile {
    #[serde(flatten)]
    slider: RawSliderConfig,
    low: Option<f64>,
    high: Option<f64>,
}

impl DemoFile {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&source).with_context(|| format!("failed to parse {}", path.display()))
    }

    fn into_host_state(self) -> anyhow::Result<HostState> {
        let config = SliderConfig::from_raw(self.slider).context("invalid slider configuration")?;
        Ok(HostState {
            low: self.low.unwrap_or(config.range_min),
            high: self.high.unwrap_or(config.range_max),
            config,
        })
    }
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("warn,twinslide=info") {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("warn"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

fn read_script(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read script from stdin")?;
            Ok(source)
        }
    }
}

fn print_commits(commits: &Mutex<Vec<CommitEvent>>) {
    for event in commits.lock().drain(..) {
        let kind = if event.immediate { "live" } else { "final" };
        let flush = if event.flush { " (flush)" } else { "" };
        println!("commit {kind}: {} .. {}{flush}", event.values.low, event.values.high);
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let state = match &args.config {
        Some(path) => DemoFile::load(path)?.into_host_state()?,
        None => DemoFile::default().into_host_state()?,
    };
    let commands = script::parse(&read_script(args.script.as_deref())?)?;
    tracing::info!(commands = commands.len(), width = args.width, "starting replay");

    let target = TerminalTarget::new(args.width, args.margin);
    let mut slider = RangeSliderController::new(target);
    slider.sync_from_host(state);

    let commits = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&commits);
    slider.on_commit(move |event: CommitEvent| sink.lock().push(event));

    println!("{}", slider.target().render());
    let mut player = Player::new(Instant::now());
    for command in commands {
        let show = player.apply(&mut slider, command, TerminalTarget::set_width);
        print_commits(&commits);
        if show {
            println!("{}", slider.target().render());
        }
    }

    let values = slider.values();
    println!("{}", slider.target().render());
    println!("final: {} .. {}", values.low, values.high);
    Ok(())
}
