//! Abstract syntax for the claim query language
//!
//! A parsed query is a flat structure: a query form, the projected
//! variables, an ordered list of triple patterns and optional LIMIT/OFFSET
//! values. Namespace dispatch is decided once here, at parse time; the
//! executor never re-inspects token prefixes.

use std::fmt;

/// Query form keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// SELECT, the only executable form
    Select,
    /// CONSTRUCT (parsed, rejected at execution)
    Construct,
    /// ASK (parsed, rejected at execution)
    Ask,
    /// DESCRIBE (parsed, rejected at execution)
    Describe,
    /// No recognized keyword at the start of the query
    Unknown,
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            QueryType::Select => "SELECT",
            QueryType::Construct => "CONSTRUCT",
            QueryType::Ask => "ASK",
            QueryType::Describe => "DESCRIBE",
            QueryType::Unknown => "UNKNOWN",
        };
        write!(f, "{}", keyword)
    }
}

/// Recognized namespace prefixes for IRI-like tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `prop:` direct property-value claims
    Property,
    /// `claim:` statement-node claims
    Claim,
    /// `value:` the value of a statement node
    Value,
    /// `qual:` qualifiers attached to a statement
    Qualifier,
    /// `ref:` references attached to a statement
    Reference,
    /// `item:` entity ids
    Item,
}

impl Namespace {
    /// Resolve a prefix string to a namespace, if recognized
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "prop" => Some(Namespace::Property),
            "claim" => Some(Namespace::Claim),
            "value" => Some(Namespace::Value),
            "qual" => Some(Namespace::Qualifier),
            "ref" => Some(Namespace::Reference),
            "item" => Some(Namespace::Item),
            _ => None,
        }
    }

    /// The prefix string as written in query text
    pub fn prefix(&self) -> &'static str {
        match self {
            Namespace::Property => "prop",
            Namespace::Claim => "claim",
            Namespace::Value => "value",
            Namespace::Qualifier => "qual",
            Namespace::Reference => "ref",
            Namespace::Item => "item",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// A single term of a triple pattern
///
/// Tokens with an unrecognized prefix (`foaf:name`) are literals: the
/// engine has no semantics for them, and typing them as prefixed would
/// suggest otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// A variable token as written, including the leading `?`
    Variable(String),
    /// A prefixed IRI-like token, `namespace:localName`
    Prefixed {
        /// Recognized namespace of the token
        namespace: Namespace,
        /// Local name after the colon (may be empty, as in `value:`)
        local: String,
    },
    /// A bare literal, or a quoted literal with its quotes stripped
    Literal(String),
}

impl Term {
    /// Check if this term is a variable
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// The variable token (including the leading `?`), if this is a variable
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// The namespace, if this is a prefixed token
    pub fn namespace(&self) -> Option<Namespace> {
        match self {
            Term::Prefixed { namespace, .. } => Some(*namespace),
            _ => None,
        }
    }

    /// The local name after the prefix, if this is a prefixed token
    pub fn local_name(&self) -> Option<&str> {
        match self {
            Term::Prefixed { local, .. } => Some(local),
            _ => None,
        }
    }

    /// The literal value, if this is a literal
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Term::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) => write!(f, "{}", name),
            Term::Prefixed { namespace, local } => write!(f, "{}:{}", namespace, local),
            Term::Literal(value) => write!(f, "{}", value),
        }
    }
}

/// One subject-predicate-object pattern from the WHERE block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    /// Subject term
    pub subject: Term,
    /// Predicate term
    pub predicate: Term,
    /// Object term
    pub object: Term,
}

impl TriplePattern {
    /// Create a new triple pattern
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

/// Non-fatal degradations recorded while parsing
///
/// The parser never fails; input it cannot use is dropped and noted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// The query does not start with SELECT/CONSTRUCT/ASK/DESCRIBE
    UnknownQueryType,
    /// No `WHERE { ... }` block was found
    MissingWhereClause,
    /// A statement fragment had fewer than three terms and was dropped
    IncompleteStatement {
        /// The dropped fragment, trimmed
        fragment: String,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::UnknownQueryType => {
                write!(f, "query does not start with a recognized query form")
            }
            ParseWarning::MissingWhereClause => write!(f, "no WHERE {{ ... }} block found"),
            ParseWarning::IncompleteStatement { fragment } => {
                write!(f, "statement has fewer than three terms: {}", fragment)
            }
        }
    }
}

/// Structured result of parsing a raw query string
///
/// All fields are always present; absent structure in the input shows up
/// as `Unknown`/empty/`None` values, never as a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Query form
    pub query_type: QueryType,
    /// Projected variables: either exactly `["*"]` or `?`-prefixed tokens.
    /// Duplicates are permitted and overwrite the same output key.
    pub variables: Vec<String>,
    /// Triple patterns in source order
    pub where_patterns: Vec<TriplePattern>,
    /// LIMIT value, if present (carried through, not enforced)
    pub limit: Option<usize>,
    /// OFFSET value, if present (carried through, not enforced)
    pub offset: Option<usize>,
    /// Degradations recorded during parsing
    pub warnings: Vec<ParseWarning>,
}

impl ParsedQuery {
    /// Create a new empty query
    pub fn new() -> Self {
        Self {
            query_type: QueryType::Unknown,
            variables: Vec::new(),
            where_patterns: Vec::new(),
            limit: None,
            offset: None,
            warnings: Vec::new(),
        }
    }

    /// Check if this query can be executed (only SELECT is)
    pub fn is_executable(&self) -> bool {
        self.query_type == QueryType::Select
    }

    /// Check if the query projects the wildcard `*`
    pub fn selects_wildcard(&self) -> bool {
        self.variables.iter().any(|v| v == "*")
    }
}

impl Default for ParsedQuery {
    fn default() -> Self {
        Self::new()
    }
}
