use unicode_segmentation::UnicodeSegmentation;
use crate::analysis::token::Token;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Standard Unicode tokenizer.
///
/// Splits on Unicode word boundaries and keeps punctuation runs as tokens.
/// Positions count every surface token, punctuation included, so that
/// phrase adjacency is judged against the true token stream: in
/// "a ... b", the words "a" and "b" are two positions apart and never
/// match as a phrase.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTokenizer;

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;

        for piece in text.split_word_bounds() {
            if piece.chars().all(char::is_whitespace) {
                continue;
            }
            tokens.push(Token::new(piece.to_string(), position));
            position += 1;
        }

        tokens
    }

    fn name(&self) -> &str {
        "standard"
    }
}
