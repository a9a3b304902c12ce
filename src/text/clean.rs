use regex::Regex;
use std::sync::LazyLock;

// Timestamp/confidence junk emitted between utterances: lines made up of
// digits, periods, percent signs, and whitespace only.
static ARTIFACT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.\s%]+$").expect("invalid artifact regex"));

/// Strip transcription artifacts from raw engine output.
///
/// Drops blank lines, numeric timestamp/confidence lines, and diagnostic
/// lines mentioning "probability" (any case). Surviving lines are trimmed
/// and rejoined with single newlines, in their original order.
pub fn clean_transcript(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !ARTIFACT_LINE.is_match(line))
        .filter(|line| !line.to_lowercase().contains("probability"))
        .collect::<Vec<_>>()
        .join("\n")
}
