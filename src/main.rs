use anyhow::{Context, Result};
use audiogist::audio;
use audiogist::config::{Config, OutputFormat};
use audiogist::interactive;
use audiogist::models::ModelRegistry;
use audiogist::pipeline::{self, AnalysisInput, AnalysisOptions};
use audiogist::report::{self, AnalysisReport};
use audiogist::sentiment::parse_aspects;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "audiogist")]
#[command(version, about = "Audio transcript analysis using AI")]
#[command(long_about = "Transcribe audio with OpenAI Whisper, then score sentiment, extract topics, and summarize the transcript. Run without arguments for the interactive wizard.")]
struct Cli {
    /// Input audio/video file (omit to run the interactive wizard)
    input: Option<PathBuf>,

    /// Analyze an existing transcript file instead of audio
    #[arg(short, long, value_name = "FILE")]
    transcript: Option<PathBuf>,

    /// Output report file (defaults to console only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format for --output: text, json
    #[arg(short, long)]
    format: Option<String>,

    /// Transcription model (e.g., whisper-1)
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., en, ja, es)
    #[arg(short, long)]
    language: Option<String>,

    /// Aspects to score, comma-separated (e.g., "battery,screen")
    #[arg(short, long)]
    aspects: Option<String>,

    /// Score per-chunk emotions (needs HF_API_TOKEN)
    #[arg(short, long)]
    emotions: bool,

    /// Reference summary file for BLEU/ROUGE scoring
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn resolve_input(
    audio: Option<PathBuf>,
    transcript: Option<PathBuf>,
) -> Result<Option<AnalysisInput>> {
    match (audio, transcript) {
        (None, None) => Ok(None),
        (Some(_), Some(_)) => {
            anyhow::bail!("Provide either an audio file or --transcript, not both")
        }
        (Some(path), None) => Ok(Some(AnalysisInput::Audio(path))),
        (None, Some(path)) => Ok(Some(AnalysisInput::Transcript(path))),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match resolve_input(cli.input.clone(), cli.transcript.clone())? {
        Some(input) => run_cli(input, cli).await,
        None => run_wizard().await,
    }
}

async fn run_wizard() -> Result<()> {
    let wizard = interactive::run_interactive_wizard()?;

    wizard
        .config
        .validate()
        .context("Configuration validation failed")?;
    let registry = ModelRegistry::from_config(&wizard.config);

    let report = analyze(&wizard.input, wizard.options, &wizard.config, &registry).await?;
    deliver_report(&report, wizard.output)
}

async fn run_cli(input: AnalysisInput, cli: Cli) -> Result<()> {
    // Validate input file exists
    if !input.path().exists() {
        anyhow::bail!("Input file not found: {}", input.path().display());
    }

    // Load configuration, then apply command line overrides
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(model) = cli.model {
        config.whisper_model = model;
    }
    if let Some(language) = cli.language {
        config.language = Some(language);
    }
    config
        .validate()
        .context("Configuration validation failed")?;

    // Parse format, falling back to the output extension, then the config default
    let format: OutputFormat = match cli.format {
        Some(raw) => raw.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => cli
            .output
            .as_deref()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .unwrap_or(config.default_format),
    };
    let output = cli.output.map(|path| (path, format));

    let reference_summary = match cli.reference {
        Some(path) => Some(
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read reference summary: {}", path.display()))?,
        ),
        None => None,
    };

    let options = AnalysisOptions {
        aspects: cli.aspects.as_deref().map(parse_aspects).unwrap_or_default(),
        run_emotions: cli.emotions,
        reference_summary,
        source_label: Some(input.path().display().to_string()),
        audio_duration: None,
        language: config.language.clone(),
        show_progress: true,
    };

    info!("Input:  {}", input.path().display());
    match &output {
        Some((path, format)) => info!("Report: {} ({})", path.display(), format),
        None => info!("Report: console"),
    }

    let registry = ModelRegistry::from_config(&config);

    let report = analyze(&input, options, &config, &registry).await?;
    deliver_report(&report, output)
}

/// Produce a transcript from the chosen input, then run the analysis stages over it.
async fn analyze(
    input: &AnalysisInput,
    mut options: AnalysisOptions,
    config: &Config,
    registry: &ModelRegistry,
) -> Result<AnalysisReport> {
    for note in registry.notes() {
        info!("{}", note);
    }

    let transcript_text = match input {
        AnalysisInput::Transcript(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript: {}", path.display()))?,
        AnalysisInput::Audio(path) => {
            config.require_transcription()?;
            let transcriber = registry
                .transcriber()
                .context("Transcription model not resolved")?;

            let work_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
            let (prepared, metadata) = audio::prepare_audio(path, work_dir.path()).await?;
            options.audio_duration = Some(metadata.duration);
            info!(
                "Audio prepared: {:.1}s at {} Hz",
                metadata.duration.as_secs_f64(),
                metadata.sample_rate
            );

            let spinner = if options.show_progress {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb.set_message(format!("Transcribing with {}...", config.whisper_model));
                pb.enable_steady_tick(Duration::from_millis(100));
                Some(pb)
            } else {
                None
            };

            let result = transcriber.transcribe(&prepared).await;
            if let Some(pb) = &spinner {
                match &result {
                    Ok(t) => pb.finish_with_message(format!(
                        "✓ Transcribed {} words",
                        t.text.split_whitespace().count()
                    )),
                    Err(_) => pb.finish_with_message("✗ Transcription failed"),
                }
            }
            let transcript = result.context("Transcription failed")?;

            if options.language.is_none() {
                options.language = transcript.language.clone();
            }
            transcript.text
        }
    };

    Ok(pipeline::run_analysis(&transcript_text, &options, config, registry).await)
}

fn deliver_report(report: &AnalysisReport, output: Option<(PathBuf, OutputFormat)>) -> Result<()> {
    report::print_summary(report);

    if let Some((path, format)) = output {
        report
            .write_to_file(&path, format)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_input_none() {
        assert!(resolve_input(None, None).unwrap().is_none());
    }

    #[test]
    fn test_resolve_input_audio() {
        let input = resolve_input(Some(PathBuf::from("talk.mp3")), None)
            .unwrap()
            .unwrap();
        assert!(matches!(input, AnalysisInput::Audio(_)));
        assert_eq!(input.path(), PathBuf::from("talk.mp3").as_path());
    }

    #[test]
    fn test_resolve_input_transcript() {
        let input = resolve_input(None, Some(PathBuf::from("notes.txt")))
            .unwrap()
            .unwrap();
        assert!(matches!(input, AnalysisInput::Transcript(_)));
    }

    #[test]
    fn test_resolve_input_rejects_both() {
        let result = resolve_input(
            Some(PathBuf::from("talk.mp3")),
            Some(PathBuf::from("notes.txt")),
        );
        assert!(result.is_err());
    }
}
