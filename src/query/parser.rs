//! Query string parser
//!
//! A regex-driven parser for the claim query language. It is deliberately
//! total: [`parse_query`] always returns a [`ParsedQuery`], and input it
//! cannot use degrades to `Unknown`/empty fields with a [`ParseWarning`]
//! attached. Hard validation belongs to the executor.
//!
//! Structural quirks worth knowing:
//! - the WHERE block ends at the first `}` after `WHERE {`, so nested
//!   braces are not supported;
//! - LIMIT and OFFSET are found anywhere in the raw query, even outside
//!   the clause structure;
//! - statement fragments are split on `.`, so literal dots inside quoted
//!   values will split the statement.

use crate::query::ast::{Namespace, ParseWarning, ParsedQuery, QueryType, Term, TriplePattern};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static QUERY_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(SELECT|CONSTRUCT|ASK|DESCRIBE)").unwrap());

static SELECT_VARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)SELECT(.*?)WHERE").unwrap());

static WHERE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)WHERE\s*\{(.*?)\}").unwrap());

static LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)LIMIT\s+(\d+)").unwrap());

static OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)OFFSET\s+(\d+)").unwrap());

const QUOTE_CHARS: &[char] = &['"', '\''];

/// Parse a raw query string into a [`ParsedQuery`]
///
/// Never fails. Unrecognized query forms, missing WHERE blocks and
/// too-short statement fragments are recorded as warnings and otherwise
/// skipped.
pub fn parse_query(raw: &str) -> ParsedQuery {
    let mut query = ParsedQuery::new();

    query.query_type = extract_query_type(raw);
    if query.query_type == QueryType::Unknown {
        query.warnings.push(ParseWarning::UnknownQueryType);
    }

    if query.query_type == QueryType::Select {
        query.variables = extract_variables(raw);
    }

    match extract_where_block(raw) {
        Some(block) => {
            for fragment in block.split('.') {
                let fragment = fragment.trim();
                if fragment.is_empty() {
                    continue;
                }
                match parse_statement_fragment(fragment) {
                    Some(pattern) => query.where_patterns.push(pattern),
                    None => {
                        debug!("dropping short statement fragment: {}", fragment);
                        query.warnings.push(ParseWarning::IncompleteStatement {
                            fragment: fragment.to_string(),
                        });
                    }
                }
            }
        }
        None => query.warnings.push(ParseWarning::MissingWhereClause),
    }

    query.limit = extract_clause_int(&LIMIT_RE, raw);
    query.offset = extract_clause_int(&OFFSET_RE, raw);

    query
}

fn extract_query_type(raw: &str) -> QueryType {
    match QUERY_TYPE_RE.captures(raw) {
        Some(caps) => match caps[1].to_ascii_uppercase().as_str() {
            "SELECT" => QueryType::Select,
            "CONSTRUCT" => QueryType::Construct,
            "ASK" => QueryType::Ask,
            "DESCRIBE" => QueryType::Describe,
            _ => QueryType::Unknown,
        },
        None => QueryType::Unknown,
    }
}

/// Variables come from the substring between SELECT and WHERE: a lone `*`
/// projects everything, otherwise only `?`-prefixed tokens survive.
fn extract_variables(raw: &str) -> Vec<String> {
    let segment = match SELECT_VARS_RE.captures(raw) {
        Some(caps) => caps.get(1).map(|m| m.as_str().trim().to_string()),
        None => None,
    };
    let segment = match segment {
        Some(s) => s,
        None => return Vec::new(),
    };

    if segment == "*" {
        return vec!["*".to_string()];
    }
    segment
        .split_whitespace()
        .filter(|token| token.starts_with('?'))
        .map(|token| token.to_string())
        .collect()
}

fn extract_where_block(raw: &str) -> Option<&str> {
    WHERE_BLOCK_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse one whitespace-split statement fragment into a triple pattern.
/// Fragments with fewer than three tokens yield `None`; tokens past the
/// third are rejoined into the object so quoted multi-word literals work.
fn parse_statement_fragment(fragment: &str) -> Option<TriplePattern> {
    let tokens: Vec<&str> = fragment.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }

    let subject = parse_term(tokens[0]);
    let predicate = parse_term(tokens[1]);
    let object = parse_object(&tokens[2..].join(" "));

    Some(TriplePattern::new(subject, predicate, object))
}

fn parse_term(token: &str) -> Term {
    if token.starts_with('?') {
        return Term::Variable(token.to_string());
    }
    if let Some((prefix, local)) = token.split_once(':') {
        if let Some(namespace) = Namespace::from_prefix(prefix) {
            return Term::Prefixed {
                namespace,
                local: local.to_string(),
            };
        }
    }
    Term::Literal(token.to_string())
}

/// Objects additionally admit quoted literals. Any stripped quote forces
/// the literal reading, so `"item:Q5"` stays a literal.
fn parse_object(token: &str) -> Term {
    let (stripped, quoted) = strip_quotes(token);
    if quoted {
        return Term::Literal(stripped.to_string());
    }
    parse_term(stripped)
}

/// Remove one leading and one trailing quote character, each matched
/// independently. Mismatched pairs like `"abc'` strip on both ends.
fn strip_quotes(token: &str) -> (&str, bool) {
    let mut out = token;
    let mut stripped = false;
    if let Some(rest) = out.strip_prefix(QUOTE_CHARS) {
        out = rest;
        stripped = true;
    }
    if let Some(rest) = out.strip_suffix(QUOTE_CHARS) {
        out = rest;
        stripped = true;
    }
    (out, stripped)
}

fn extract_clause_int(re: &Regex, raw: &str) -> Option<usize> {
    re.captures(raw).and_then(|caps| caps[1].parse().ok())
}
