use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use console::style;
use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::sentiment::{Label, SentimentResult};
use crate::summarize::SummaryOutcome;
use crate::topics::TopicModel;

/// Wall-clock timings for the analysis stages.
#[derive(Debug, Clone, Default)]
pub struct AnalysisStats {
    pub total_time: Duration,
    pub sentiment_time: Duration,
    pub emotion_time: Duration,
    pub topic_time: Duration,
    pub summary_time: Duration,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_duration_secs: Option<f64>,
    pub transcript_words: usize,
}

/// Scores of the generated summary against a user-supplied reference.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceScores {
    pub bleu: f64,
    pub rouge: BTreeMap<String, f64>,
}

/// Everything one analysis run produced.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub sentiment: SentimentResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspects: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotions: Option<BTreeMap<String, f64>>,
    pub topics: TopicModel,
    pub summary: SummaryOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_scores: Option<ReferenceScores>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip)]
    pub stats: AnalysisStats,
}

impl AnalysisReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Transcript Analysis");
        let _ = writeln!(out, "===================");
        let _ = writeln!(out);

        if let Some(ref source) = self.metadata.source_file {
            let _ = writeln!(out, "Source: {}", source);
        }
        if let Some(ref language) = self.metadata.language {
            let _ = writeln!(out, "Language: {}", language);
        }
        if let Some(secs) = self.metadata.audio_duration_secs {
            let _ = writeln!(out, "Audio duration: {:.1}s", secs);
        }
        let _ = writeln!(out, "Transcript words: {}", self.metadata.transcript_words);
        let _ = writeln!(out);

        let _ = writeln!(
            out,
            "Sentiment: {} (polarity {:.3}, subjectivity {:.3}, over {} chunks)",
            self.sentiment.label,
            self.sentiment.polarity,
            self.sentiment.subjectivity,
            self.sentiment.chunk_count
        );

        if let Some(ref aspects) = self.aspects {
            let _ = writeln!(out);
            let _ = writeln!(out, "Aspects:");
            for (aspect, score) in aspects {
                let _ = writeln!(out, "  {:<20} {:+.3}", aspect, score);
            }
        }

        if let Some(ref emotions) = self.emotions {
            let _ = writeln!(out);
            let _ = writeln!(out, "Emotions:");
            if emotions.is_empty() {
                let _ = writeln!(out, "  (no scores reported)");
            }
            for (emotion, score) in emotions {
                let _ = writeln!(out, "  {:<20} {:.3}", emotion, score);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Topics:");
        if let Some(ref warning) = self.topics.warning {
            let _ = writeln!(out, "  (none: {})", warning);
        }
        for topic in &self.topics.topics {
            let terms: Vec<&str> = topic.terms.iter().take(8).map(|t| t.term.as_str()).collect();
            let _ = writeln!(out, "  {}. {}", topic.index + 1, terms.join(", "));
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Summary:");
        match &self.summary {
            SummaryOutcome::Ready { text, .. } if text.is_empty() => {
                let _ = writeln!(out, "  (empty)");
            }
            SummaryOutcome::Ready { text, .. } => {
                let _ = writeln!(out, "  {}", text);
            }
            SummaryOutcome::Unavailable { reason } => {
                let _ = writeln!(out, "  (unavailable: {})", reason);
            }
        }

        if let Some(ref scores) = self.reference_scores {
            let _ = writeln!(out);
            let _ = writeln!(out, "Reference scores:");
            let _ = writeln!(out, "  {:<20} {:.4}", "bleu", scores.bleu);
            for (metric, value) in &scores.rouge {
                let _ = writeln!(out, "  {:<20} {:.4}", metric, value);
            }
        }

        if !self.notes.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Notes:");
            for note in &self.notes {
                let _ = writeln!(out, "  - {}", note);
            }
        }

        out
    }

    pub fn write_to_file(&self, path: &Path, format: OutputFormat) -> Result<()> {
        let content = match format {
            OutputFormat::Text => self.to_plain_text(),
            OutputFormat::Json => self.to_json(),
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Print a summary of the analysis results.
pub fn print_summary(report: &AnalysisReport) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                   Transcript Analysis Complete                 ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    let label = report.sentiment.label.to_string();
    let label = match report.sentiment.label {
        Label::Positive => style(label).green(),
        Label::Negative => style(label).red(),
        Label::Neutral => style(label).yellow(),
    };
    println!(
        "  Sentiment:  {} (polarity {:.3}, subjectivity {:.3}, {} chunks)",
        label, report.sentiment.polarity, report.sentiment.subjectivity, report.sentiment.chunk_count
    );

    if let Some(ref aspects) = report.aspects {
        println!();
        println!("  Aspects:");
        for (aspect, score) in aspects {
            println!("    {:<20} {:+.3}", aspect, score);
        }
    }

    if let Some(ref emotions) = report.emotions {
        println!();
        println!("  Emotions:");
        if emotions.is_empty() {
            println!("    (no scores reported)");
        }
        for (emotion, score) in emotions {
            println!("    {:<20} {:.3}", emotion, score);
        }
    }

    println!();
    println!("  Topics:");
    if let Some(ref warning) = report.topics.warning {
        println!("    {}", style(format!("(none: {})", warning)).dim());
    }
    for topic in &report.topics.topics {
        let terms: Vec<&str> = topic.terms.iter().take(8).map(|t| t.term.as_str()).collect();
        println!("    {}. {}", topic.index + 1, terms.join(", "));
    }

    println!();
    println!("  Summary:");
    match &report.summary {
        SummaryOutcome::Ready { text, .. } if text.is_empty() => {
            println!("    {}", style("(empty)").dim());
        }
        SummaryOutcome::Ready { text, .. } => {
            println!("    {}", text);
        }
        SummaryOutcome::Unavailable { reason } => {
            println!("    {}", style(format!("(unavailable: {})", reason)).dim());
        }
    }

    if let Some(ref scores) = report.reference_scores {
        println!();
        println!("  Reference scores:");
        println!("    {:<10} {:.4}", "bleu", scores.bleu);
        for (metric, value) in &scores.rouge {
            println!("    {:<10} {:.4}", metric, value);
        }
    }

    println!();
    println!("  Timing:");
    println!(
        "    Sentiment:  {:.2}s",
        report.stats.sentiment_time.as_secs_f64()
    );
    if !report.stats.emotion_time.is_zero() {
        println!(
            "    Emotions:   {:.2}s",
            report.stats.emotion_time.as_secs_f64()
        );
    }
    println!(
        "    Topics:     {:.2}s",
        report.stats.topic_time.as_secs_f64()
    );
    println!(
        "    Summary:    {:.2}s",
        report.stats.summary_time.as_secs_f64()
    );
    println!(
        "    Total:      {:.2}s",
        report.stats.total_time.as_secs_f64()
    );

    if !report.notes.is_empty() {
        println!();
        println!("  Notes:");
        for note in &report.notes {
            println!("    - {}", style(note).dim());
        }
    }

    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
