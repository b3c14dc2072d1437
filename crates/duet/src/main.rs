//! Command line runner: lets two Ollama models talk and saves the transcript.

#[macro_use]
extern crate tracing;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use duet::Settings;
use duet::core::{DuetBuilder, Speaker, TurnRecord};
use duet::transcript::{TranscriptStore, filename_label};
use duet_ollama_model::{DryRunProvider, OllamaProvider};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

const BAR_CHAR: &str = "▎";

/// Lets two language models hold a conversation through a local Ollama
/// server.
#[derive(Debug, Parser)]
#[command(name = "duet", version)]
struct Args {
    /// Path of the YAML configuration file.
    #[arg(long, default_value = "config.yaml.example")]
    config: PathBuf,
    /// Model name for speaker A.
    #[arg(long)]
    model_a: Option<String>,
    /// Model name for speaker B.
    #[arg(long)]
    model_b: Option<String>,
    /// Number of rounds.
    #[arg(long)]
    turns: Option<u32>,
    /// If >0, the other speaker only sees the last N characters of each
    /// reply (0 = unlimited).
    #[arg(long)]
    history_max_chars: Option<usize>,
    /// Path to save the transcript to (Markdown).
    #[arg(long)]
    transcript: Option<PathBuf>,
    /// Name of the experiment, used in the transcript file name.
    #[arg(long)]
    experiment_name: Option<String>,
    /// Base URL of the Ollama server.
    #[arg(long)]
    host: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Do not contact Ollama, use mock replies.
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn apply(&self, mut settings: Settings) -> Settings {
        let mut run = settings.run;
        if let Some(model) = &self.model_a {
            run = run.with_model_a(model);
        }
        if let Some(model) = &self.model_b {
            run = run.with_model_b(model);
        }
        if let Some(turns) = self.turns {
            run = run.with_turns(turns);
        }
        if let Some(limit) = self.history_max_chars {
            run = run.with_history_max_chars(limit);
        }
        if let Some(name) = &self.experiment_name {
            run = run.with_experiment_name(name);
        }
        settings.run = run;

        if let Some(host) = &self.host {
            settings.ollama.host = Some(host.clone());
        }
        if let Some(secs) = self.timeout_secs {
            settings.ollama.timeout_secs = Some(secs);
        }
        settings
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let settings = Settings::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let settings = args.apply(settings);
    let config = settings.run.build().context("invalid configuration")?;

    let store = TranscriptStore::create(config.transcript_folder())
        .context("cannot prepare the transcript folder")?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {wide_msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.set_message("🤔 Waiting for a reply...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let builder = if args.dry_run {
        info!("dry run, no request will leave this process");
        DuetBuilder::with_model_provider(DryRunProvider, config.clone())
    } else {
        let provider = OllamaProvider::new(settings.ollama.to_config());
        DuetBuilder::with_model_provider(provider, config.clone())
    };
    let duet = builder
        .on_turn({
            let spinner = spinner.clone();
            move |record| spinner.suspend(|| print_turn(record))
        })
        .build();

    let result = duet.run().await;
    spinner.finish_and_clear();
    let records = match result {
        Ok(records) => records,
        Err(err) => {
            warn!(
                "discarding {} turns recorded before the failure",
                err.partial_turns().len()
            );
            return Err(err).context("the conversation was aborted");
        }
    };

    let path = match &args.transcript {
        Some(path) => path.clone(),
        None => store.make_filename(&filename_label(&config)),
    };
    store
        .save(&records, Some(&config), &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Saved transcript to {}", path.display());
    Ok(())
}

fn print_turn(record: &TurnRecord) {
    let label = record.label();
    match record.speaker() {
        Speaker::User => {
            println!("{}{}: {}", BAR_CHAR.bright_yellow(), label.bold(), record.text());
        }
        Speaker::Model(_) => {
            println!(
                "{}🤖 {}: {}",
                BAR_CHAR.bright_cyan(),
                label.bold(),
                record.text().bright_white()
            );
        }
        Speaker::Injection { .. } => {
            println!(
                "{}{}: {}",
                BAR_CHAR.bright_magenta(),
                label.italic(),
                record.text().dimmed()
            );
        }
    }
}
