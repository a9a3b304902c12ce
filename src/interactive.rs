use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use dialoguer::{Confirm, Input, Select};

use crate::config::{Config, OutputFormat};
use crate::pipeline::{AnalysisInput, AnalysisOptions};
use crate::sentiment::parse_aspects;
use crate::transcribe::KNOWN_MODELS;

const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("ja", "Japanese"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("zh", "Chinese"),
    ("ko", "Korean"),
    ("pt", "Portuguese"),
    ("it", "Italian"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("tr", "Turkish"),
];

pub struct InteractiveResult {
    pub input: AnalysisInput,
    pub output: Option<(PathBuf, OutputFormat)>,
    pub config: Config,
    pub options: AnalysisOptions,
}

pub fn run_interactive_wizard() -> anyhow::Result<InteractiveResult> {
    print_header();

    let mut config = Config::load().unwrap_or_default();

    // Step 1: Select input
    let input = select_input()?;

    // Step 2: Credentials the chosen input needs
    if matches!(input, AnalysisInput::Audio(_)) {
        ensure_openai_key(&mut config)?;
    }
    offer_hf_token(&mut config)?;

    // Step 3: Transcription settings (audio input only)
    let language = if matches!(input, AnalysisInput::Audio(_)) {
        config.whisper_model = select_whisper_model(&config.whisper_model)?;
        select_language()?
    } else {
        None
    };
    if let Some(ref lang) = language {
        config.language = Some(lang.clone());
    }

    // Step 4: Analysis extras
    let aspects = enter_aspects()?;
    let run_emotions = Confirm::new()
        .with_prompt("Score per-chunk emotions? (needs a Hugging Face token)")
        .default(false)
        .interact()?;
    let reference_summary = load_reference_summary()?;

    // Step 5: Report destination
    let output = select_report_output(input.path())?;

    // Step 6: Confirm
    print_summary(&input, &output, &aspects, run_emotions);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    println!();

    let options = AnalysisOptions {
        aspects,
        run_emotions,
        reference_summary,
        source_label: Some(input.path().display().to_string()),
        audio_duration: None,
        language,
        show_progress: true,
    };

    Ok(InteractiveResult {
        input,
        output,
        config,
        options,
    })
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║          audiogist - Transcript Analyzer          ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn select_input() -> anyhow::Result<AnalysisInput> {
    println!("\n{}", style("Select input:").bold());

    let files = scan_media_files(".")?;

    let mut items: Vec<String> = files
        .iter()
        .map(|f| {
            let size = fs::metadata(f)
                .map(|m| format_size(m.len()))
                .unwrap_or_else(|_| "?".to_string());
            format!("{} ({})", f.display(), size)
        })
        .collect();
    items.push("Enter an audio/video path...".to_string());
    items.push("Analyze an existing transcript file...".to_string());

    let selection = Select::new()
        .with_prompt("Choose a file")
        .items(&items)
        .default(0)
        .interact()?;

    if selection < files.len() {
        return Ok(AnalysisInput::Audio(files[selection].clone()));
    }

    if selection == files.len() {
        let path = prompt_existing_path("Enter audio/video path")?;
        Ok(AnalysisInput::Audio(path))
    } else {
        let path = prompt_existing_path("Enter transcript path")?;
        Ok(AnalysisInput::Transcript(path))
    }
}

fn prompt_existing_path(prompt: &str) -> anyhow::Result<PathBuf> {
    let path: String = Input::new().with_prompt(prompt).interact_text()?;
    let path = PathBuf::from(path.trim());
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(path)
}

fn scan_media_files(dir: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && crate::audio::is_supported_input(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn ensure_openai_key(config: &mut Config) -> anyhow::Result<()> {
    if config.openai_api_key.is_some() {
        println!("{} OpenAI API key configured", style("✓").green());
        return Ok(());
    }

    println!("{} OpenAI API key not found", style("!").yellow());
    println!("  Get one at: https://platform.openai.com/api-keys\n");

    let api_key: String = Input::new()
        .with_prompt("Enter your OpenAI API key")
        .interact_text()?;

    if api_key.trim().is_empty() {
        anyhow::bail!("An OpenAI API key is required to transcribe audio");
    }

    config.openai_api_key = Some(api_key.trim().to_string());

    // Offer to save
    if Confirm::new()
        .with_prompt("Save API key to config file?")
        .default(true)
        .interact()?
    {
        save_config(config)?;
        println!("{} API key saved to config\n", style("✓").green());
    }

    Ok(())
}

fn offer_hf_token(config: &mut Config) -> anyhow::Result<()> {
    if config.hf_api_token.is_some() {
        println!("{} Hugging Face token configured", style("✓").green());
        return Ok(());
    }

    println!(
        "{} No Hugging Face token; summaries and emotion scores will be unavailable",
        style("!").yellow()
    );

    if !Confirm::new()
        .with_prompt("Enter a Hugging Face token now?")
        .default(false)
        .interact()?
    {
        return Ok(());
    }

    let token: String = Input::new()
        .with_prompt("Enter your Hugging Face token")
        .interact_text()?;
    if token.trim().is_empty() {
        return Ok(());
    }
    config.hf_api_token = Some(token.trim().to_string());

    if Confirm::new()
        .with_prompt("Save token to config file?")
        .default(true)
        .interact()?
    {
        save_config(config)?;
        println!("{} Token saved to config\n", style("✓").green());
    }

    Ok(())
}

fn save_config(config: &Config) -> anyhow::Result<()> {
    if let Some(config_dir) = dirs::config_dir() {
        let audiogist_dir = config_dir.join("audiogist");
        fs::create_dir_all(&audiogist_dir)?;

        let config_path = audiogist_dir.join("config.toml");
        let toml_content = toml::to_string_pretty(config)?;
        fs::write(config_path, toml_content)?;
    }
    Ok(())
}

fn select_whisper_model(current: &str) -> anyhow::Result<String> {
    let default = KNOWN_MODELS.iter().position(|m| *m == current).unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select transcription model")
        .items(KNOWN_MODELS)
        .default(default)
        .interact()?;

    Ok(KNOWN_MODELS[selection].to_string())
}

fn select_language() -> anyhow::Result<Option<String>> {
    let mut options = vec!["Auto-detect".to_string()];
    options.extend(
        LANGUAGES
            .iter()
            .map(|(code, name)| format!("{} ({})", name, code)),
    );
    options.push("Other (enter code)...".to_string());

    let selection = Select::new()
        .with_prompt("Transcription language")
        .items(&options)
        .default(0)
        .interact()?;

    if selection == 0 {
        return Ok(None);
    }
    if selection == LANGUAGES.len() + 1 {
        let code: String = Input::new()
            .with_prompt("Enter language code (e.g., 'vi' for Vietnamese)")
            .interact_text()?;
        return Ok(Some(code.trim().to_lowercase()));
    }
    Ok(Some(LANGUAGES[selection - 1].0.to_string()))
}

fn enter_aspects() -> anyhow::Result<Vec<String>> {
    let raw: String = Input::new()
        .with_prompt("Aspects to score, comma-separated (leave empty to skip)")
        .allow_empty(true)
        .interact_text()?;

    Ok(parse_aspects(&raw))
}

fn load_reference_summary() -> anyhow::Result<Option<String>> {
    if !Confirm::new()
        .with_prompt("Score the summary against a reference text?")
        .default(false)
        .interact()?
    {
        return Ok(None);
    }

    let path = prompt_existing_path("Enter reference summary path")?;
    let text = fs::read_to_string(&path)?;
    Ok(Some(text))
}

fn select_report_output(input: &Path) -> anyhow::Result<Option<(PathBuf, OutputFormat)>> {
    let choices = ["Console only", "Write a text report", "Write a JSON report"];

    let selection = Select::new()
        .with_prompt("Report destination")
        .items(&choices)
        .default(0)
        .interact()?;

    let format = match selection {
        1 => OutputFormat::Text,
        2 => OutputFormat::Json,
        _ => return Ok(None),
    };

    Ok(Some((derive_output_path(input, &format), format)))
}

fn derive_output_path(input: &Path, format: &OutputFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut output = input.to_path_buf();
    output.set_file_name(format!(
        "{}_analysis.{}",
        stem.to_string_lossy(),
        format.extension()
    ));
    output
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn print_summary(
    input: &AnalysisInput,
    output: &Option<(PathBuf, OutputFormat)>,
    aspects: &[String],
    run_emotions: bool,
) {
    println!("\n{}", style("═══ Summary ═══").bold());
    match input {
        AnalysisInput::Audio(path) => {
            println!("  Input:      {} (audio)", style(path.display()).cyan());
        }
        AnalysisInput::Transcript(path) => {
            println!("  Input:      {} (transcript)", style(path.display()).cyan());
        }
    }
    match output {
        Some((path, format)) => {
            println!(
                "  Report:     {} ({})",
                style(path.display()).cyan(),
                format
            );
        }
        None => println!("  Report:     console only"),
    }
    if !aspects.is_empty() {
        println!("  Aspects:    {}", aspects.join(", "));
    }
    println!("  Emotions:   {}", if run_emotions { "yes" } else { "no" });
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_derive_output_path() {
        let input = PathBuf::from("/path/to/talk.mp3");

        let text = derive_output_path(&input, &OutputFormat::Text);
        assert_eq!(text, PathBuf::from("/path/to/talk_analysis.txt"));

        let json = derive_output_path(&input, &OutputFormat::Json);
        assert_eq!(json, PathBuf::from("/path/to/talk_analysis.json"));
    }

    #[test]
    fn test_derive_output_path_never_clobbers_transcript_input() {
        let input = PathBuf::from("notes.txt");
        let text = derive_output_path(&input, &OutputFormat::Text);
        assert_ne!(text, input);
    }
}
