//! `contrail replay` — Reconcile a captured notification stream.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use clap::Args;
use contrail_common::config::{BootstrapMode, ContrailConfig, InvalidPhasePolicy};
use contrail_events::cache::{BootstrapOutcome, MetadataCache};
use contrail_events::notification::RawContainerNotification;
use contrail_events::pipeline::{self, PipelineStats};
use contrail_events::translator::EventTranslator;
use contrail_runtime::introspect;
use tokio::sync::mpsc;

/// Exit status used when a second Ctrl-C aborts the replay.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Arguments for the `replay` command.
///
/// The first Ctrl-C stops the replay once the line being read is complete,
/// so on an idle stdin it only takes effect when the next line arrives or
/// the input closes. A second Ctrl-C exits immediately.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON-lines notification file. Reads stdin when omitted.
    pub input: Option<PathBuf>,

    /// Skip notifications with an unrecognized phase instead of aborting.
    #[arg(long)]
    pub skip_invalid: bool,

    /// Enumerate existing containers before reading any notification.
    #[arg(long)]
    pub eager: bool,
}

/// Executes the `replay` command.
///
/// Feeds every notification through the reconciliation pipeline and
/// prints each resulting envelope as one JSON line on stdout.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, if eager
/// bootstrap fails, or if the stream is aborted on an invalid phase.
pub fn execute(args: ReplayArgs, mut config: ContrailConfig) -> anyhow::Result<()> {
    if args.skip_invalid {
        config.invalid_phase = InvalidPhasePolicy::Skip;
    }
    if args.eager {
        config.bootstrap = BootstrapMode::Eager;
    }

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        if note_interrupt(&handler_stop) {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
        eprintln!("stopping after the current line, press Ctrl-C again to exit now");
    })
    .context("failed to install Ctrl-C handler")?;

    let introspector = introspect::from_config(&config);
    let cache = Arc::new(MetadataCache::from_config(&config, introspector)?);
    let translator = EventTranslator::new(Arc::clone(&cache));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let stats = runtime.block_on(run(args.input, &config, translator, stop))?;

    let outcome = cache.bootstrap_outcome();
    if outcome == Some(BootstrapOutcome::Degraded) {
        tracing::warn!("container enumeration failed, metadata came from single lookups only");
    }
    eprintln!("{}", summary(&stats, outcome));
    Ok(())
}

/// Records an interrupt and returns whether one had already been received.
fn note_interrupt(stop: &AtomicBool) -> bool {
    stop.swap(true, Ordering::SeqCst)
}

fn summary(stats: &PipelineStats, outcome: Option<BootstrapOutcome>) -> String {
    let line = format!(
        "replayed {} notifications: {} emitted, {} merged, {} skipped",
        stats.received, stats.emitted, stats.suppressed, stats.skipped
    );
    match outcome {
        Some(BootstrapOutcome::Seeded(n)) => format!("{line} ({n} containers seeded)"),
        Some(BootstrapOutcome::Degraded) => {
            format!("{line} (cache degraded: enumeration failed)")
        }
        None => line,
    }
}

async fn run(
    input: Option<PathBuf>,
    config: &ContrailConfig,
    translator: EventTranslator,
    stop: Arc<AtomicBool>,
) -> anyhow::Result<PipelineStats> {
    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let (out_tx, mut out_rx) = mpsc::channel(config.channel_capacity);

    let stage = pipeline::spawn(translator, rx, out_tx, config.invalid_phase);
    let reader = tokio::task::spawn_blocking(move || read_notifications(input, &tx, &stop));

    while let Some(envelope) = out_rx.recv().await {
        println!("{}", serde_json::to_string(&envelope)?);
    }

    // The stage's error explains why the reader could not send, so report it first.
    let stats = stage.await??;
    let read = reader.await??;
    tracing::debug!(read, "input exhausted");
    Ok(stats)
}

/// Reads JSON-lines notifications into the pipeline until EOF or Ctrl-C.
///
/// Blank lines and lines starting with `#` are ignored.
fn read_notifications(
    input: Option<PathBuf>,
    tx: &mpsc::Sender<RawContainerNotification>,
    stop: &AtomicBool,
) -> anyhow::Result<usize> {
    let reader: Box<dyn BufRead + Send> = match &input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut sent = 0;
    for (index, line) in reader.lines().enumerate() {
        if stop.load(Ordering::SeqCst) {
            tracing::info!(sent, "interrupted, stopping replay");
            break;
        }
        let line = line.context("failed to read input")?;
        let Some(notification) = parse_line(&line)
            .with_context(|| format!("line {}: invalid notification", index + 1))?
        else {
            continue;
        };
        if tx.blocking_send(notification).is_err() {
            break;
        }
        sent += 1;
    }
    Ok(sent)
}

fn parse_line(line: &str) -> serde_json::Result<Option<RawContainerNotification>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}
