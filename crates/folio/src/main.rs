#![forbid(unsafe_code)]

//! Folio demo binary: replays a scripted visit of the portfolio page.

use std::process;
use std::time::Duration;

use folio::cli::Opts;
use folio::tour::{storyboard, Visit};
use folio::{PageConfig, PageLayout, PortfolioApp};
use folio_runtime::state_persistence::{FileStorage, StateRegistry};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn load_layout(opts: &Opts) -> Result<PageLayout, Box<dyn std::error::Error>> {
    match &opts.layout {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(PageLayout::from_json(&json)?)
        }
        None => Ok(PageLayout::portfolio()),
    }
}

fn run(opts: &Opts) -> Result<(), Box<dyn std::error::Error>> {
    let layout = load_layout(opts)?;
    let storage = match &opts.state_path {
        Some(path) => FileStorage::new(path),
        None => FileStorage::default_for_site("demo"),
    };
    info!(path = %storage.path().display(), "theme preference file");
    let registry = StateRegistry::new(Box::new(storage)).shared();

    let page_bottom = layout
        .sections
        .last()
        .map_or(0, |s| s.span.bottom().saturating_sub(opts.height));
    let app = PortfolioApp::new(PageConfig::default(), layout, registry);
    let visit = Visit::new(app, storyboard(page_bottom), opts.width, opts.height);
    let (report, app) = visit.run(
        Duration::from_millis(opts.duration_ms),
        Duration::from_millis(opts.step_ms),
    )?;

    for line in &report.logs {
        println!("{line}");
    }
    info!(
        frames = report.frames,
        renders = report.renders,
        events = report.events,
        timers = report.timers_fired,
        patches = report.patches,
        actions = report.actions.len(),
        theme = %app.theme(),
        active = ?app.scroll().active(),
        messages_sent = app.contact().map_or(0, |c| c.sent()),
        "session summary"
    );
    Ok(())
}

fn main() {
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(&opts) {
        error!(error = %e, "demo failed");
        eprintln!("folio-demo: {e}");
        process::exit(1);
    }
}
