use rust_stemmers::{Algorithm, Stemmer};
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};

/// Text analysis pipeline: surface tokenization plus term normalization.
///
/// An index is only valid when queried through the same analyzer that
/// built it.
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    stemmer: Stemmer,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: Box<dyn Tokenizer>, algorithm: Algorithm) -> Self {
        Analyzer {
            tokenizer,
            stemmer: Stemmer::create(algorithm),
            name,
        }
    }

    /// Create standard analyzer for English
    pub fn standard_english() -> Self {
        Analyzer::new(
            "standard_english".to_string(),
            Box::new(StandardTokenizer),
            Algorithm::English,
        )
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.tokenizer.tokenize(text)
    }

    /// Casefolds and stems a surface token into an index term.
    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(&word.to_lowercase()).to_string()
    }
}

/// Checks if a word contains at least one alphanumeric character.
/// Tokens without any are counted for positions but never become terms.
pub fn has_any_alphanumeric(word: &str) -> bool {
    word.chars().any(char::is_alphanumeric)
}
