//! ClaimQL
//!
//! A small SPARQL-flavored query engine for entity-claim data: entities
//! carry property claims, claims carry qualifiers and references, and
//! queries match triple patterns over them to produce variable bindings.
//!
//! The pipeline has two stages:
//! - the [`query::parser`] turns raw text into a [`query::ParsedQuery`];
//!   it is total, so malformed input degrades with warnings instead of
//!   failing;
//! - the [`query::executor`] evaluates SELECT queries against any
//!   [`store::StatementStore`] backend, seeding from one anchor pattern
//!   and strictly joining qualifier/reference patterns per candidate.
//!
//! Recognized namespaces: `prop:`, `claim:`, `value:`, `qual:`, `ref:`
//! and `item:`.
//!
//! ## Example Usage
//!
//! ```rust
//! use claimql::query::{parse_query, QueryType};
//!
//! let query = parse_query("SELECT ?item ?label WHERE { ?item prop:P31 item:Q5 } LIMIT 10");
//! assert_eq!(query.query_type, QueryType::Select);
//! assert_eq!(query.variables, vec!["?item", "?label"]);
//! assert_eq!(query.where_patterns.len(), 1);
//! assert_eq!(query.limit, Some(10));
//! ```
//!
//! Execution is async:
//!
//! ```rust
//! use claimql::query::QueryEngine;
//! use claimql::store::{MemoryStatementStore, StatementRecord};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = MemoryStatementStore::new();
//! store.insert_statement(StatementRecord::new("s1", "Q42", "P31", "Q5"))?;
//!
//! let engine = QueryEngine::new(store);
//! let results = engine.run_query("SELECT ?item WHERE { ?item prop:P31 item:Q5 }").await?;
//! assert_eq!(results.len(), 1);
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod query;
pub mod store;

// Re-export main types for convenience
pub use query::{
    parse_query, BindingRow, BindingValue, ExecutionError, ExecutionResult, Namespace,
    ParseWarning, ParsedQuery, QueryEngine, QueryExecutor, QueryResults, QueryType, Term,
    TriplePattern, MAX_CANDIDATE_STATEMENTS,
};

pub use store::{
    MemoryStatementStore, QualifierRecord, ReferenceRecord, StatementRecord, StatementStore,
    StoreError, StoreResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
