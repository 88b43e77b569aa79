use crate::analysis::analyzer::Analyzer;
use crate::core::error::{Error, ErrorKind, Result};

const SINGLE_QUOTE: char = '\'';
const DOUBLE_QUOTE: char = '"';
const AND_OPERATOR: &str = "AND";

/// A parsed query line.
///
/// `free_text` holds the stemmed bare terms, `phrases` the stemmed
/// component terms of each quoted clause. `is_boolean` marks the
/// exact-match syntax (quotes or `AND`); a free-text query only ever
/// fills `free_text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub free_text: Vec<String>,
    pub phrases: Vec<Vec<String>>,
    pub is_boolean: bool,
}

impl Query {
    /// Every clause term flattened into one bag, phrase terms included.
    pub fn flattened_terms(&self) -> Vec<String> {
        let mut terms = self.free_text.clone();
        for phrase in &self.phrases {
            terms.extend(phrase.iter().cloned());
        }
        terms
    }
}

/// Lexed piece of a boolean query line.
enum RawToken {
    Word(String),
    Phrase(String),
}

/// Parses raw query lines into `Query` values.
///
/// A line is boolean when it contains a double quote or a standalone
/// `AND` token; anything else is free text. Boolean lines must follow
/// `clause (AND clause)*` where a clause is one bare word or one quoted
/// phrase.
pub struct QueryParser<'a> {
    pub analyzer: &'a Analyzer,
}

impl<'a> QueryParser<'a> {
    pub fn new(analyzer: &'a Analyzer) -> Self {
        QueryParser { analyzer }
    }

    pub fn parse(&self, line: &str) -> Result<Query> {
        if line.contains(SINGLE_QUOTE) {
            return Err(parse_error("single quotes are not allowed in queries"));
        }
        if line.chars().filter(|c| *c == DOUBLE_QUOTE).count() % 2 != 0 {
            return Err(parse_error("mismatched double quotes"));
        }

        if is_boolean(line) {
            self.parse_boolean(line)
        } else {
            Ok(self.parse_free_text(line))
        }
    }

    fn parse_free_text(&self, line: &str) -> Query {
        Query {
            free_text: line
                .split_whitespace()
                .map(|token| self.analyzer.stem(token))
                .collect(),
            phrases: Vec::new(),
            is_boolean: false,
        }
    }

    fn parse_boolean(&self, line: &str) -> Result<Query> {
        let tokens = lex_boolean(line)?;
        let mut query = Query {
            is_boolean: true,
            ..Query::default()
        };

        // clause (AND clause)*: expect_clause tracks which comes next
        let mut expect_clause = true;
        for token in tokens {
            match token {
                RawToken::Word(word) if word == AND_OPERATOR => {
                    if expect_clause {
                        return Err(parse_error(format!(
                            "{:?} must sit between clauses",
                            AND_OPERATOR
                        )));
                    }
                    expect_clause = true;
                }
                RawToken::Word(word) => {
                    if !expect_clause {
                        return Err(parse_error(format!(
                            "multiple terms must be quoted as a phrase: {:?}",
                            word
                        )));
                    }
                    query.free_text.push(self.analyzer.stem(&word));
                    expect_clause = false;
                }
                RawToken::Phrase(phrase) => {
                    if !expect_clause {
                        return Err(parse_error(format!(
                            "clauses must be separated by {:?}: {:?}",
                            AND_OPERATOR, phrase
                        )));
                    }
                    let terms: Vec<String> = phrase
                        .split_whitespace()
                        .map(|term| self.analyzer.stem(term))
                        .collect();
                    if terms.is_empty() {
                        return Err(parse_error("empty phrase"));
                    }
                    query.phrases.push(terms);
                    expect_clause = false;
                }
            }
        }

        if expect_clause {
            return Err(parse_error(format!(
                "{:?} must sit between clauses",
                AND_OPERATOR
            )));
        }
        Ok(query)
    }
}

fn is_boolean(line: &str) -> bool {
    line.contains(DOUBLE_QUOTE) || line.split_whitespace().any(|token| token == AND_OPERATOR)
}

/// Splits a boolean line into bare words and quoted phrases, enforcing
/// that quotes wrap whole clauses. The caller has already verified that
/// the quote count is even.
fn lex_boolean(line: &str) -> Result<Vec<RawToken>> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut in_phrase = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if in_phrase {
            if c == DOUBLE_QUOTE {
                if chars.peek().is_some_and(|next| !next.is_whitespace()) {
                    return Err(parse_error(format!(
                        "quotes must wrap a whole clause: {:?}",
                        buffer
                    )));
                }
                tokens.push(RawToken::Phrase(std::mem::take(&mut buffer)));
                in_phrase = false;
            } else {
                buffer.push(c);
            }
        } else if c == DOUBLE_QUOTE {
            if !buffer.is_empty() {
                return Err(parse_error(format!(
                    "quotes must wrap a whole clause: {:?}",
                    buffer
                )));
            }
            in_phrase = true;
        } else if c.is_whitespace() {
            if !buffer.is_empty() {
                tokens.push(RawToken::Word(std::mem::take(&mut buffer)));
            }
        } else {
            buffer.push(c);
        }
    }
    if !buffer.is_empty() {
        tokens.push(RawToken::Word(buffer));
    }

    Ok(tokens)
}

fn parse_error(context: impl Into<String>) -> Error {
    Error::new(ErrorKind::Parse, context)
}
