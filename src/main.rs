//! Xref command-line entrypoint.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use serde_json::json;

use xref::cache::{ModelPhase, ModelResponseCache, StatisticalPrefilterCache};
use xref::clock::{Clock, SystemClock};
use xref::config::Config;
use xref::relevance::{ConceptSet, RelevanceScorer};
use xref::selection::{SelectionMode, SelectionOrchestrator};
use xref::taxonomy::default_registry;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "xref")]
#[command(about = "Cross-reference selection for technical book chapters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select companion chapters for a source chapter and print the outcome as JSON
    Select {
        /// Chapter number of the source chapter (1-based)
        chapter: u32,

        /// File holding the chapter text
        file: PathBuf,

        /// statistics, hybrid or model (defaults to XREF_MODE)
        #[arg(long)]
        mode: Option<SelectionMode>,
    },

    /// Print the companion books recommended for a set of words
    Recommend {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Delete expired and corrupt records from both cache tiers
    Sweep,

    /// Delete cached records: everything, or one model phase
    Clear {
        /// selection or annotation
        #[arg(long)]
        phase: Option<ModelPhase>,
    },

    /// Print per-tier cache statistics as JSON
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.validate()?;

    match cli.command {
        Commands::Select {
            chapter,
            file,
            mode,
        } => run_select(&config, chapter, &file, mode.unwrap_or(config.mode)),
        Commands::Recommend { words } => run_recommend(&config, &words),
        Commands::Sweep => run_sweep(&config),
        Commands::Clear { phase } => run_clear(&config, phase),
        Commands::Stats => run_stats(&config),
    }
}

fn run_select(
    config: &Config,
    chapter_number: u32,
    file: &Path,
    mode: SelectionMode,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    tracing::info!(
        chapter = chapter_number,
        mode = %mode,
        cache_dir = %config.cache_dir.display(),
        "Selecting cross-references"
    );

    let orchestrator = SelectionOrchestrator::from_config(config)?;
    let outcome = orchestrator.select_and_enhance(chapter_number, &text, mode)?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn run_recommend(config: &Config, words: &[String]) -> anyhow::Result<()> {
    let scorer = RelevanceScorer::new(Arc::new(default_registry()?));
    let concepts = ConceptSet::from_phrases(words);
    let options = config.selection_config().recommend_options();

    for rec in scorer.recommend_detailed(&concepts, &options)? {
        match &rec.cascaded_from {
            Some(origin) => println!(
                "{:<22} {:.3}  {} (via {})",
                rec.entry.tier, rec.score, rec.entry.name, origin
            ),
            None => println!("{:<22} {:.3}  {}", rec.entry.tier, rec.score, rec.entry.name),
        }
    }
    Ok(())
}

fn open_caches(config: &Config) -> (StatisticalPrefilterCache, ModelResponseCache) {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let dir: &Path = &config.cache_dir;
    (
        StatisticalPrefilterCache::open(dir, Arc::clone(&clock), config.prefilter_ttl_secs),
        ModelResponseCache::open(dir, clock, config.model_ttl_secs),
    )
}

fn run_sweep(config: &Config) -> anyhow::Result<()> {
    let (prefilter, model) = open_caches(config);
    let removed_prefilter = prefilter.clear_expired();
    let removed_model = model.clear_expired();

    tracing::info!(removed_prefilter, removed_model, "Cache sweep complete");
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "prefilter": removed_prefilter,
            "modelResponses": removed_model,
        }))?
    );
    Ok(())
}

fn run_clear(config: &Config, phase: Option<ModelPhase>) -> anyhow::Result<()> {
    let (prefilter, model) = open_caches(config);

    let summary = match phase {
        Some(phase) => {
            let removed = model.clear_phase(phase);
            tracing::info!(%phase, removed, "Cleared model phase");
            json!({ "phase": phase.as_str(), "modelResponses": removed })
        }
        None => {
            let removed_prefilter = prefilter.clear();
            let removed_model = model.clear();
            tracing::info!(removed_prefilter, removed_model, "Cleared all cache tiers");
            json!({ "prefilter": removed_prefilter, "modelResponses": removed_model })
        }
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_stats(config: &Config) -> anyhow::Result<()> {
    let (prefilter, model) = open_caches(config);

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "prefilter": prefilter.stats(),
            "modelResponses": {
                "selection": model.phase_stats(ModelPhase::Selection),
                "annotation": model.phase_stats(ModelPhase::Annotation),
                "total": model.stats(),
            },
        }))?
    );
    Ok(())
}
