//! quakemap - Render USGS earthquake feeds as an interactive map.
//!
//! Fetches a GeoJSON summary feed, sizes each event by magnitude, colors
//! it by depth, and writes (or serves) a Leaflet page with switchable base
//! layers, per-event popups and a depth legend.

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

mod cli;
mod client;
mod errors;
mod filters;
mod legend;
mod map;
mod marker;
mod models;
mod output;
mod popup;
mod render;
mod scale;
mod server;

use cli::{Cli, Command, FilterArgs, ScaleArgs, SourceArgs};
use map::{MapConfig, MapView, build_map};
use scale::DepthScale;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Render(args) => cmd_render(&args),
        Command::Serve(args) => cmd_serve(args),
        Command::Markers(args) => cmd_markers(&args),
        Command::Legend(args) => cmd_legend(&args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Build the depth scale from the command line.
fn depth_scale(args: &ScaleArgs) -> Result<DepthScale> {
    args.scale().context("invalid depth scale")
}

/// Load the feed once and build the map view from the matching features.
fn load_view(
    source: &SourceArgs,
    filter: &FilterArgs,
    config: &MapConfig,
    scale: &DepthScale,
) -> Result<MapView> {
    let source = source.source();
    let feed = source
        .load()
        .with_context(|| format!("failed to load earthquake feed from {}", source.describe()))?;

    if let Some(meta) = &feed.metadata {
        debug!("{} ({} events)", meta.title, meta.count);
    }

    let filter = filter.filter();
    let total = feed.features.len();
    let features: Vec<_> = feed
        .features
        .into_iter()
        .filter(|f| filter.matches(f))
        .collect();

    if !filter.is_empty() {
        info!("{} of {} events match filters", features.len(), total);
    }

    build_map(&features, config, scale).context("failed to build map")
}

/// Execute the `render` command - one-shot page generation.
fn cmd_render(args: &cli::RenderArgs) -> Result<()> {
    let scale = depth_scale(&args.scale)?;
    let view = load_view(&args.source, &args.filter, &args.view.map_config(), &scale)?;
    let page = render::render_page(&view).context("failed to render page")?;

    if args.output.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(page.as_bytes())?;
        handle.flush()?;
    } else {
        fs::write(&args.output, page)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
        info!(
            "wrote {} markers to {}",
            view.markers().len(),
            args.output.display()
        );
    }

    Ok(())
}

/// Execute the `serve` command - start web server.
fn cmd_serve(args: cli::ServeArgs) -> Result<()> {
    let config = server::ServerConfig {
        port: args.port,
        host: args.host.clone(),
        source: args.source.source(),
        filter: args.filter.filter(),
        map: args.view.map_config(),
        scale: depth_scale(&args.scale)?,
    };

    let url = format!("http://{}:{}", args.host, args.port);
    println!("\x1b[1m🌍 quakemap\x1b[0m");
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("  Local:   \x1b[96m{url}\x1b[0m");
    println!("  Feed:    {}", config.source.describe());
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("\x1b[2mPress Ctrl+C to stop\x1b[0m\n");

    if args.open {
        #[cfg(target_os = "linux")]
        let _ = std::process::Command::new("xdg-open").arg(&url).spawn();
        #[cfg(target_os = "macos")]
        let _ = std::process::Command::new("open").arg(&url).spawn();
        #[cfg(target_os = "windows")]
        let _ = std::process::Command::new("cmd").args(["/c", "start", &url]).spawn();
    }

    tokio::runtime::Runtime::new()
        .context("failed to create tokio runtime")?
        .block_on(server::run_server(config))
}

/// Execute the `markers` command - list what the map would draw.
fn cmd_markers(args: &cli::MarkersArgs) -> Result<()> {
    let scale = depth_scale(&args.scale)?;
    let view = load_view(&args.source, &args.filter, &MapConfig::default(), &scale)?;
    let markers = view.markers();
    let markers = &markers[..args.limit.map_or(markers.len(), |n| n.min(markers.len()))];

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_markers(&mut handle, markers, args.format)?;

    Ok(())
}

/// Execute the `legend` command.
fn cmd_legend(args: &cli::LegendArgs) -> Result<()> {
    let scale = depth_scale(&args.scale)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.html {
        writeln!(handle, "{}", legend::legend_html(&scale))?;
    } else {
        output::write_legend(&mut handle, &legend::legend_labels(&scale), args.format)?;
    }

    Ok(())
}
