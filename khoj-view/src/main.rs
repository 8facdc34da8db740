//! KhojView - Live grid viewer for the Khoj exploration robot
//!
//! Polls the exploration server's two feeds, composes them into a sparse
//! grid each cycle, and renders the result.
//!
//! ## Cycle
//!
//! - **Fetch**: map feed and robot feed in parallel; a failed feed yields
//!   its default snapshot
//! - **Compose**: visited, planned and robot layers merged into a grid view
//! - **Render**: SVG file (for a browser) and/or text grid on stdout
//!
//! ## Usage
//!
//! ```bash
//! # Poll the local server every 3 seconds
//! khoj-view
//!
//! # One cycle against a remote robot, SVG only
//! khoj-view --base-url http://192.168.1.40:8000 --once --no-terminal --svg grid.svg
//! ```

mod config;
mod error;
mod feed;
mod poller;
mod render;

use config::ViewConfig;
use error::Result;
use feed::{FileFeed, HttpFeed, MapFeed, RobotFeed};
use poller::Poller;
use render::{SvgRenderer, TerminalRenderer};

use clap::Parser;
use khoj_grid::Compositor;
use khoj_grid::io::SvgConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Default configuration file looked up in the working directory
const DEFAULT_CONFIG: &str = "khoj.toml";

/// Live grid viewer for the exploration robot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (default: khoj.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exploration server base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Poll interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// SVG output path (empty string disables SVG output)
    #[arg(long)]
    svg: Option<String>,

    /// Do not print the text grid
    #[arg(long)]
    no_terminal: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("khoj_view=info,khoj_grid=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    apply_args(&mut config, &args);
    config.validate()?;

    info!("KhojView v{}", env!("CARGO_PKG_VERSION"));

    let running = setup_ctrl_c_handler()?;
    let mut poller = build_poller(&config)?;

    let cycles = poller.run(&running);
    info!("KhojView finished after {} cycles", cycles);
    Ok(())
}

/// Explicit path, else `khoj.toml` if present, else defaults.
fn load_config(path: Option<&Path>) -> Result<ViewConfig> {
    if let Some(path) = path {
        info!("Loading configuration from {:?}", path);
        return ViewConfig::load(path);
    }

    let default_path = Path::new(DEFAULT_CONFIG);
    if default_path.exists() {
        info!("Loading configuration from {}", DEFAULT_CONFIG);
        ViewConfig::load(default_path)
    } else {
        info!("Using default configuration");
        Ok(ViewConfig::default())
    }
}

/// Command line flags override the file.
fn apply_args(config: &mut ViewConfig, args: &Args) {
    if let Some(url) = &args.base_url {
        config.feeds.base_url = url.clone();
    }
    if let Some(interval) = args.interval_ms {
        config.poll.interval_ms = interval;
    }
    if args.once {
        config.poll.max_cycles = Some(1);
    }
    if let Some(svg) = &args.svg {
        config.output.svg_path = svg.clone();
    }
    if args.no_terminal {
        config.output.terminal = false;
    }
}

fn build_poller(config: &ViewConfig) -> Result<Poller> {
    let map_feed: Box<dyn MapFeed> = match &config.feeds.map_file {
        Some(path) => Box::new(FileFeed::new(path)),
        None => Box::new(HttpFeed::new(config.map_url(), config.timeout())?),
    };
    let robot_feed: Box<dyn RobotFeed> = match &config.feeds.robot_file {
        Some(path) => Box::new(FileFeed::new(path)),
        None => Box::new(HttpFeed::new(config.robot_url(), config.timeout())?),
    };
    info!(
        "Feeds: map {}, robot {}",
        map_feed.describe(),
        robot_feed.describe()
    );

    let compositor = Compositor::new(config.grid.clone());
    let mut poller = Poller::new(map_feed, robot_feed, compositor, config.interval())
        .with_max_cycles(config.poll.max_cycles);

    match config.svg_path() {
        Some(path) => {
            info!("Writing SVG to {}", path.display());
            let svg_config = SvgConfig {
                image_base: config.output.image_base.clone(),
                ..Default::default()
            };
            poller = poller.with_renderer(Box::new(
                SvgRenderer::new(path, svg_config).with_title(config.output.title.clone()),
            ));
        }
        None => info!("SVG output disabled"),
    }

    if config.output.terminal {
        poller = poller.with_renderer(Box::new(TerminalRenderer::stdout()));
    } else if config.svg_path().is_none() {
        warn!("No renderer enabled; cycles will only be logged");
    }

    Ok(poller)
}

/// Set up a Ctrl-C handler that clears the returned flag.
fn setup_ctrl_c_handler() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;
    Ok(running)
}
