// Embedded English stopword list. Entries are stored in their
// punctuation-stripped form ("dont", not "don't") because every consumer
// tokenizes after punctuation removal.
use std::collections::HashSet;
use std::sync::LazyLock;

static WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "ain", "all", "am",
    "an", "and", "any", "are", "aren", "arent", "as", "at", "be", "because",
    "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "couldn", "couldnt", "d", "did", "didn", "didnt", "do", "does",
    "doesn", "doesnt", "doing", "don", "dont", "down", "during", "each",
    "few", "for", "from", "further", "had", "hadn", "hadnt", "has", "hasn",
    "hasnt", "have", "haven", "havent", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "i", "if", "in",
    "into", "is", "isn", "isnt", "it", "its", "itself", "just", "ll", "m",
    "ma", "me", "mightn", "mightnt", "more", "most", "mustn", "mustnt",
    "my", "myself", "needn", "neednt", "no", "nor", "not", "now", "o", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "re", "s", "same", "shan", "shant", "she", "shes",
    "should", "shouldn", "shouldnt", "shouldve", "so", "some", "such", "t",
    "than", "that", "thatll", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "ve", "very", "was",
    "wasn", "wasnt", "we", "were", "weren", "werent", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "won",
    "wont", "wouldn", "wouldnt", "y", "you", "youd", "youll", "your",
    "youre", "yours", "yourself", "yourselves", "youve",
];

// Negation markers are kept out of the sentiment-aware stopword set so
// that "not good" still reads as negative after normalization.
static NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nobody", "nothing", "nowhere", "nor",
    "cannot", "cant", "wont", "wouldnt", "shouldnt", "couldnt", "dont",
    "doesnt", "didnt", "isnt", "arent", "wasnt", "werent", "havent",
    "hasnt", "hadnt", "mightnt", "mustnt",
];

static ENGLISH: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| WORDS.iter().copied().collect());

static SENTIMENT_AWARE: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let negations: HashSet<&str> = NEGATIONS.iter().copied().collect();
    WORDS
        .iter()
        .copied()
        .filter(|w| !negations.contains(w))
        .collect()
});

/// Full English stopword set, negations included. Used by the topic
/// vectorizer, where negation words carry no topical signal.
pub fn english() -> &'static HashSet<&'static str> {
    &ENGLISH
}

/// English stopword set minus negation markers. Used by the normalizer so
/// sentiment-bearing negations survive preprocessing.
pub fn sentiment_aware() -> &'static HashSet<&'static str> {
    &SENTIMENT_AWARE
}

/// True for negation markers ("not", "never", "dont", ...).
pub fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token)
}
