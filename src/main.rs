use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use cursor_gallery_lib::cache::preload::{DirectorySource, Preloader};
use cursor_gallery_lib::cache::{LruImageCache, DEFAULT_CACHE_CAPACITY};
use cursor_gallery_lib::config::trail::{
    get_trail_config, set_edit_mode, set_threshold, set_trail_config,
};
use cursor_gallery_lib::config::TrailConfig;
use cursor_gallery_lib::error::{GalleryResult, ResultExt};
use cursor_gallery_lib::logging::init_logging;
use cursor_gallery_lib::rendering::{project_cached, ProjectionOptions};
use cursor_gallery_lib::trail::{PointerTrace, TrailRevealEngine};
use serde_json::json;

#[derive(Parser)]
#[command(
    name = "trail-replay",
    version,
    about = "Replay a recorded pointer trace through the trail reveal engine"
)]
struct Cli {
    /// Pointer trace JSON (gallery images + events)
    trace: PathBuf,

    /// Trail config JSON (defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the reveal threshold in px
    #[arg(long)]
    threshold: Option<u32>,

    /// Enable tap-to-edit mode
    #[arg(long)]
    edit_mode: bool,

    /// Directory to preload images from; enables draw-command output
    #[arg(long)]
    images: Option<PathBuf>,

    /// Decoded image cache capacity (raised to the number of trace images)
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    cache_size: usize,

    /// Write logs to this directory instead of stderr
    #[arg(long, env = "CURSOR_GALLERY_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_dir.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[REPLAY] {}", e);
            eprintln!("trail-replay: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> GalleryResult<()> {
    let loaded = match &cli.config {
        Some(path) => TrailConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TrailConfig::default(),
    };
    set_trail_config(loaded);
    if let Some(threshold) = cli.threshold {
        set_threshold(threshold);
    }
    if cli.edit_mode {
        set_edit_mode(true);
    }
    let config = get_trail_config();

    let trace = PointerTrace::load_from_file(&cli.trace)
        .with_context(|| format!("Failed to load trace {}", cli.trace.display()))?;

    log::info!(
        "[REPLAY] {} images, {} events, threshold {}px",
        trace.images.len(),
        trace.events.len(),
        config.threshold
    );

    let mut engine = TrailRevealEngine::with_config(trace.images.clone(), &config);
    let reveals = trace
        .events
        .iter()
        .filter_map(|event| engine.handle(event))
        .count();
    let snapshot = engine.snapshot();

    let mut output = json!({
        "reveals": reveals,
        "currentIndex": engine.current_index(),
        "revealed": &*snapshot,
    });

    if let Some(dir) = &cli.images {
        let unique = trace.images.iter().map(|img| &img.id).collect::<HashSet<_>>().len();
        if unique > cli.cache_size {
            log::info!(
                "[REPLAY] Raising cache size from {} to {} to fit the trace",
                cli.cache_size,
                unique
            );
        }
        let cache = Arc::new(LruImageCache::new(cli.cache_size.max(unique)));
        let preloader = Preloader::new(DirectorySource::new(dir), Arc::clone(&cache));

        let cancel = preloader.cancel_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        let mut progress = preloader.subscribe();
        tokio::spawn(async move {
            while progress.changed().await.is_ok() {
                let p = *progress.borrow();
                log::debug!("[REPLAY] Preload {:.0}%", p.fraction() * 100.0);
            }
        });

        let ids: Vec<_> = trace.images.iter().map(|img| img.id.clone()).collect();
        let report = preloader.run(&ids).await?;
        for (id, reason) in &report.failed {
            log::warn!("[REPLAY] {} unavailable: {}", id, reason);
        }

        let frame = project_cached(&snapshot, cache.as_ref(), &ProjectionOptions::from(&config));
        output["drawCommands"] = serde_json::to_value(&frame)?;
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
