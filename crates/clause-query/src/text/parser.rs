//! Parser and tokenizer for free-text expressions.
//!
//! The syntax is the classic Lucene one with AND as the default operator:
//! - words and `"quoted phrases"`, analyzed into terms or phrases
//! - `+` (required), `-` / `!` / `NOT` (prohibited) modifiers
//! - `AND` / `&&` and `OR` / `||` conjunctions, parenthesized groups
//! - `term~` / `term~0.7` fuzzy terms, `"a phrase"~2` sloppy phrases
//! - `term^2` / `(group)^2` boosts
//! - `abc*` prefixes and `a?c*` wildcards (never leading)

use crate::error::{QueryError, Result};
use crate::lucene::{BooleanClause, BooleanQuery, FuzzyQuery, Occur, PhraseQuery, Query, Term};

use super::analyzer::TextAnalyzer;

const DEFAULT_FUZZY_SIMILARITY: f32 = 0.5;
const MAX_GROUP_DEPTH: usize = 256;

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct TextToken {
    kind: TextTokenKind,
    position: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum TextTokenKind {
    Word(String),
    /// Phrase text plus any `~slop` / `^boost` suffix.
    Phrase { text: String, suffix: String },
    LParen,
    RParen,
    Plus,
    Minus,
    Bang,
    /// `^N` not attached to a term.
    Boost(String),
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conjunction {
    None,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    None,
    Required,
    Prohibited,
}

// ---------------------------------------------------------------------------
// Text query parser
// ---------------------------------------------------------------------------

pub struct TextQueryParser<'a> {
    tokens: Vec<TextToken>,
    index: usize,
    depth: usize,
    field: &'a str,
    analyzer: &'a TextAnalyzer,
}

impl<'a> TextQueryParser<'a> {
    /// Parses `input` into a query against `field`.
    ///
    /// Input that analyzes to no terms at all yields the empty boolean query.
    pub fn parse(field: &'a str, analyzer: &'a TextAnalyzer, input: &str) -> Result<Query> {
        let tokens = tokenize_text_input(input)?;
        if tokens.is_empty() {
            return Ok(Query::empty());
        }

        let mut parser = Self {
            tokens,
            index: 0,
            depth: 0,
            field,
            analyzer,
        };
        let query = parser.parse_query()?;
        if let Some(token) = parser.peek() {
            return Err(QueryError::TextQuery(format!(
                "unexpected token near byte {}",
                token.position
            )));
        }

        Ok(query.unwrap_or_else(Query::empty))
    }

    /// `Clause (Conjunction? Modifier? Clause)*`, up to the end of input or a
    /// closing parenthesis. `None` when every clause analyzed to nothing.
    fn parse_query(&mut self) -> Result<Option<Query>> {
        let mut clauses = Vec::new();

        let modifier = self.consume_modifier();
        let first = self.parse_clause()?;
        let bare_first = if modifier == Modifier::None {
            first.clone()
        } else {
            None
        };
        add_clause(&mut clauses, Conjunction::None, modifier, first);

        while self.next_continues_query() {
            let conjunction = self.consume_conjunction();
            let modifier = self.consume_modifier();
            let query = self.parse_clause()?;
            add_clause(&mut clauses, conjunction, modifier, query);
        }

        if clauses.len() == 1 {
            if let Some(query) = bare_first {
                return Ok(Some(query));
            }
        }
        if clauses.is_empty() {
            return Ok(None);
        }

        let mut boolean = BooleanQuery::new();
        for clause in clauses {
            boolean.add(clause.query, clause.occur);
        }
        Ok(Some(boolean.into()))
    }

    fn parse_clause(&mut self) -> Result<Option<Query>> {
        let Some(token) = self.next() else {
            return Err(QueryError::TextQuery(
                "expected term but reached end of expression".to_string(),
            ));
        };

        match token.kind {
            TextTokenKind::LParen => {
                if self.depth >= MAX_GROUP_DEPTH {
                    return Err(QueryError::TextQuery(format!(
                        "groups nested deeper than {} near byte {}",
                        MAX_GROUP_DEPTH, token.position
                    )));
                }
                self.depth += 1;
                let query = self.parse_query();
                self.depth -= 1;
                let query = query?;
                if !self.consume_group_close() {
                    return Err(QueryError::TextQuery(format!(
                        "missing closing ')' for group opened near byte {}",
                        token.position
                    )));
                }
                let boost = self.consume_boost()?;
                Ok(query.map(|query| apply_boost(query, boost)))
            }
            TextTokenKind::Word(raw) => self.word_query(&raw, token.position),
            TextTokenKind::Phrase { text, suffix } => {
                self.phrase_query(&text, &suffix, token.position)
            }
            TextTokenKind::Boost(_) => Err(QueryError::TextQuery(format!(
                "boost must follow a term near byte {}",
                token.position
            ))),
            _ => Err(QueryError::TextQuery(format!(
                "expected term near byte {}",
                token.position
            ))),
        }
    }

    fn next_continues_query(&self) -> bool {
        !matches!(
            self.peek().map(|token| &token.kind),
            None | Some(TextTokenKind::RParen)
        )
    }

    fn consume_conjunction(&mut self) -> Conjunction {
        let conjunction = match self.peek().map(|token| &token.kind) {
            Some(TextTokenKind::And) => Conjunction::And,
            Some(TextTokenKind::Or) => Conjunction::Or,
            _ => return Conjunction::None,
        };
        self.index += 1;
        conjunction
    }

    fn consume_modifier(&mut self) -> Modifier {
        let modifier = match self.peek().map(|token| &token.kind) {
            Some(TextTokenKind::Plus) => Modifier::Required,
            Some(TextTokenKind::Minus | TextTokenKind::Bang | TextTokenKind::Not) => {
                Modifier::Prohibited
            }
            _ => return Modifier::None,
        };
        self.index += 1;
        modifier
    }

    fn consume_group_close(&mut self) -> bool {
        matches!(
            self.peek().map(|token| &token.kind),
            Some(TextTokenKind::RParen)
        ) && {
            self.index += 1;
            true
        }
    }

    fn consume_boost(&mut self) -> Result<Option<f32>> {
        let Some(TextToken {
            kind: TextTokenKind::Boost(raw),
            position,
        }) = self.peek().cloned()
        else {
            return Ok(None);
        };
        self.index += 1;
        parse_boost(&raw, position).map(Some)
    }

    fn peek(&self) -> Option<&TextToken> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<TextToken> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    // -----------------------------------------------------------------------
    // Leaf queries
    // -----------------------------------------------------------------------

    fn word_query(&self, raw: &str, position: usize) -> Result<Option<Query>> {
        let (body, boost) = match raw.split_once('^') {
            Some((body, boost)) => (body, Some(parse_boost(boost, position)?)),
            None => (raw, None),
        };
        let (body, similarity) = match body.split_once('~') {
            Some((body, similarity)) => (body, Some(parse_similarity(similarity, position)?)),
            None => (body, None),
        };
        if body.is_empty() {
            return Err(QueryError::TextQuery(format!(
                "empty term near byte {position}"
            )));
        }

        let query = if let Some(min_similarity) = similarity {
            Some(Query::Fuzzy(FuzzyQuery {
                term: Term::new(self.field, body.to_lowercase()),
                min_similarity,
            }))
        } else if body.contains(['*', '?']) {
            Some(self.wildcard_query(body, position)?)
        } else {
            self.analyzed_query(body)
        };
        Ok(query.map(|query| apply_boost(query, boost)))
    }

    fn phrase_query(&self, text: &str, suffix: &str, position: usize) -> Result<Option<Query>> {
        let (slop_part, boost) = match suffix.split_once('^') {
            Some((slop_part, boost)) => (slop_part, Some(parse_boost(boost, position)?)),
            None => (suffix, None),
        };
        let slop = match slop_part.strip_prefix('~') {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                QueryError::TextQuery(format!("invalid phrase slop near byte {position}"))
            })?,
            None if slop_part.is_empty() => 0,
            None => {
                return Err(QueryError::TextQuery(format!(
                    "unexpected text after phrase near byte {position}"
                )))
            }
        };

        let query = match self.analyzed_query(text) {
            Some(Query::Phrase(phrase)) => Some(Query::Phrase(PhraseQuery { slop, ..phrase })),
            other => other,
        };
        Ok(query.map(|query| apply_boost(query, boost)))
    }

    fn wildcard_query(&self, body: &str, position: usize) -> Result<Query> {
        if body.starts_with(['*', '?']) {
            return Err(QueryError::TextQuery(format!(
                "leading wildcard is not allowed near byte {position}"
            )));
        }
        let lowered = body.to_lowercase();
        if let Some(prefix) = lowered.strip_suffix('*') {
            if !prefix.contains(['*', '?']) {
                return Ok(Query::Prefix(Term::new(self.field, prefix)));
            }
        }
        Ok(Query::Wildcard(Term::new(self.field, lowered)))
    }

    fn analyzed_query(&self, text: &str) -> Option<Query> {
        let mut tokens = self.analyzer.tokens(text);
        match tokens.len() {
            0 => None,
            1 => Some(Query::term(self.field, tokens.remove(0))),
            _ => Some(Query::Phrase(PhraseQuery::new(self.field, tokens))),
        }
    }
}

/// Adds a clause with Lucene's occurrence rules for the AND default operator.
///
/// A conjunction also rewrites the previous clause (unless prohibited):
/// `AND` makes it required, `OR` makes it optional. Clauses that analyzed
/// to nothing still apply their conjunction.
fn add_clause(
    clauses: &mut Vec<BooleanClause>,
    conjunction: Conjunction,
    modifier: Modifier,
    query: Option<Query>,
) {
    if let Some(previous) = clauses.last_mut() {
        if previous.occur != Occur::MustNot {
            match conjunction {
                Conjunction::And => previous.occur = Occur::Must,
                Conjunction::Or => previous.occur = Occur::Should,
                Conjunction::None => {}
            }
        }
    }

    let Some(query) = query else {
        return;
    };
    let prohibited = modifier == Modifier::Prohibited;
    let required = !prohibited && conjunction != Conjunction::Or;
    let occur = if prohibited {
        Occur::MustNot
    } else if required {
        Occur::Must
    } else {
        Occur::Should
    };
    clauses.push(BooleanClause { query, occur });
}

fn apply_boost(query: Query, boost: Option<f32>) -> Query {
    match boost {
        Some(boost) => Query::Boosted {
            query: Box::new(query),
            boost,
        },
        None => query,
    }
}

fn parse_boost(raw: &str, position: usize) -> Result<f32> {
    raw.parse::<f32>()
        .ok()
        .filter(|boost| boost.is_finite() && *boost >= 0.0)
        .ok_or_else(|| QueryError::TextQuery(format!("invalid boost {raw:?} near byte {position}")))
}

fn parse_similarity(raw: &str, position: usize) -> Result<f32> {
    if raw.is_empty() {
        return Ok(DEFAULT_FUZZY_SIMILARITY);
    }
    let value: f32 = raw.parse().map_err(|_| {
        QueryError::TextQuery(format!("invalid fuzzy similarity {raw:?} near byte {position}"))
    })?;
    if !(0.0..1.0).contains(&value) {
        return Err(QueryError::TextQuery(format!(
            "fuzzy similarity must be >= 0 and < 1 near byte {position}"
        )));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

fn tokenize_text_input(input: &str) -> Result<Vec<TextToken>> {
    let mut tokens = Vec::new();
    let mut cursor = 0usize;

    while let Some(ch) = input[cursor..].chars().next() {
        if ch.is_whitespace() {
            cursor += ch.len_utf8();
            continue;
        }

        let position = cursor;
        let rest = &input[cursor..];
        let (kind, next_cursor) = match ch {
            '(' => (TextTokenKind::LParen, cursor + 1),
            ')' => (TextTokenKind::RParen, cursor + 1),
            '+' => (TextTokenKind::Plus, cursor + 1),
            '-' => (TextTokenKind::Minus, cursor + 1),
            '!' => (TextTokenKind::Bang, cursor + 1),
            '&' if rest.starts_with("&&") => (TextTokenKind::And, cursor + 2),
            '|' if rest.starts_with("||") => (TextTokenKind::Or, cursor + 2),
            '"' => {
                let (text, after) = consume_quoted_phrase(input, cursor)?;
                let end = word_end(input, after);
                let suffix = input[after..end].to_string();
                (TextTokenKind::Phrase { text, suffix }, end)
            }
            '^' => {
                let end = word_end(input, cursor + 1);
                (TextTokenKind::Boost(input[cursor + 1..end].to_string()), end)
            }
            _ => {
                let end = word_end(input, cursor);
                let kind = match &input[cursor..end] {
                    "AND" => TextTokenKind::And,
                    "OR" => TextTokenKind::Or,
                    "NOT" => TextTokenKind::Not,
                    raw => TextTokenKind::Word(raw.to_string()),
                };
                (kind, end)
            }
        };
        tokens.push(TextToken { kind, position });
        cursor = next_cursor;
    }

    Ok(tokens)
}

fn word_end(input: &str, start: usize) -> usize {
    input[start..]
        .find(|ch: char| ch.is_whitespace() || matches!(ch, '(' | ')' | '"'))
        .map_or(input.len(), |offset| start + offset)
}

fn consume_quoted_phrase(input: &str, start: usize) -> Result<(String, usize)> {
    let mut phrase = String::new();
    let mut escaped = false;

    for (offset, ch) in input[start + 1..].char_indices() {
        if escaped {
            phrase.push(ch);
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == '"' {
            return Ok((phrase, start + 1 + offset + 1));
        }

        phrase.push(ch);
    }

    Err(QueryError::TextQuery(format!(
        "missing closing quote near byte {start}"
    )))
}
