use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::Colorize;

use title_core::{parse_titles, Config, GenerationOptions, VariationMode};
use title_engine::{Engine, ResultsStore, RunSnapshot};
use title_llm::{GeminiClient, GeminiTitleService, ModelGateway};

#[derive(Parser)]
#[command(name = "titlesmith")]
#[command(about = "Generate strategic variations for a list of titles")]
#[command(version)]
struct Cli {
    /// File with one title per line; reads stdin when omitted
    input: Option<PathBuf>,

    /// Rewriting strategy
    #[arg(long, value_enum, default_value_t = ModeArg::Synonyms)]
    mode: ModeArg,

    /// Niche label to lock same-niche runs to (skips auto-detection)
    #[arg(long)]
    niche: Option<String>,

    /// Destination niche for different-niches runs
    #[arg(long)]
    target_niche: Option<String>,

    /// Override the Gemini API base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Print each title's state transition as chunks settle
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Synonyms,
    SameNiche,
    DifferentNiches,
}

impl From<ModeArg> for VariationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Synonyms => VariationMode::Synonyms,
            ModeArg::SameNiche => VariationMode::SameNiche,
            ModeArg::DifferentNiches => VariationMode::DifferentNiches,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // missing credential must halt before any request is accepted
    let mut config = Config::load()?;
    if let Some(base) = cli.api_base.clone() {
        config.api_base = Some(base);
    }

    let raw = read_input(cli.input.as_deref())?;
    let titles = parse_titles(&raw);

    let mut client = GeminiClient::new(config.api_key.clone());
    if let Some(base) = &config.api_base {
        client = client.with_base_url(base.clone());
    }
    let mut gateway = ModelGateway::new(Arc::new(client));
    if let Some(models) = config.model_priority.clone() {
        gateway = gateway.with_models(models);
    }

    let store = Arc::new(ResultsStore::new());
    let engine = Engine::new(Arc::new(GeminiTitleService::new(gateway)), store.clone());

    let progress = cli.verbose.then(|| spawn_progress_printer(&store));

    let options = GenerationOptions {
        manual_niche: cli.niche.clone(),
        target_niche: cli.target_niche.clone(),
    };
    let outcome = engine.run(titles, cli.mode.into(), options).await;

    if let Some(handle) = progress {
        handle.abort();
    }
    if let Err(err) = outcome {
        anyhow::bail!("{}", err);
    }

    render_report(&store.snapshot());
    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            Ok(raw)
        }
    }
}

/// Report each title once, the moment its chunk settles.
fn spawn_progress_printer(store: &Arc<ResultsStore>) -> tokio::task::JoinHandle<()> {
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        let mut reported: Vec<bool> = Vec::new();
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            if reported.len() != snapshot.results.len() {
                reported = vec![false; snapshot.results.len()];
            }
            for (i, record) in snapshot.results.iter().enumerate() {
                if record.is_loading || reported[i] {
                    continue;
                }
                reported[i] = true;
                match &record.error {
                    None => println!("{} {}", "done".green(), record.original_title),
                    Some(err) => {
                        println!("{} {} ({})", "failed".red(), record.original_title, err)
                    }
                }
            }
        }
    })
}

fn render_report(snapshot: &RunSnapshot) {
    if let Some(error) = &snapshot.fatal_error {
        eprintln!("{} {}", "error:".red().bold(), error);
        return;
    }

    let resolved = snapshot.results.iter().filter(|r| r.error.is_none()).count();
    println!(
        "\n{} {}/{} titles resolved\n",
        "results:".bold(),
        resolved,
        snapshot.results.len()
    );

    for record in &snapshot.results {
        match &record.error {
            Some(error) => {
                println!("{} {}", "x".red(), record.original_title.bold());
                println!("    {}", error.dimmed());
            }
            None => {
                println!("{} {}", "+".green(), record.original_title.bold());
                for variation in &record.variations {
                    println!("    - {}", variation);
                }
            }
        }
    }
}
