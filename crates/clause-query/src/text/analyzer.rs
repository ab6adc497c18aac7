/// English stop words dropped from analyzed text.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
    "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
    "these", "they", "this", "to", "was", "will", "with",
];

/// Splits text into index tokens: runs of alphanumeric characters,
/// lower-cased, with stop words removed.
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    stop_words: &'static [&'static str],
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS,
        }
    }
}

impl TextAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// An analyzer that keeps every token.
    pub fn without_stop_words() -> Self {
        Self { stop_words: &[] }
    }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        text.split(|ch: char| !ch.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .filter(|token| !self.stop_words.contains(&token.as_str()))
            .collect()
    }
}
