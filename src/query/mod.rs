//! Query language support
//!
//! Parsing and execution for a miniature SPARQL-flavored language over
//! entity-claim statement stores. Two stages, usable separately:
//! - [`parser::parse_query`] turns raw text into a [`ParsedQuery`] and
//!   never fails;
//! - [`executor::QueryExecutor`] evaluates SELECT queries against any
//!   [`StatementStore`](crate::store::StatementStore) backend.
//!
//! [`QueryEngine`] glues both stages together for the common case.

pub mod ast;
pub mod executor;
pub mod parser;
pub mod results;

// Re-export main types
pub use ast::{Namespace, ParseWarning, ParsedQuery, QueryType, Term, TriplePattern};
pub use executor::{
    ExecutionError, ExecutionResult, QueryExecutor, MAX_CANDIDATE_STATEMENTS,
};
pub use parser::parse_query;
pub use results::{BindingRow, BindingValue, QueryResults};

use crate::store::StatementStore;
use tracing::debug;

/// High-level interface: parse and execute in one call
pub struct QueryEngine<S: StatementStore> {
    store: S,
}

impl<S: StatementStore> QueryEngine<S> {
    /// Create an engine owning its statement store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Parse and execute a query, returning binding rows in store order.
    ///
    /// Parsing never fails; everything that can go wrong surfaces as an
    /// [`ExecutionError`] from validation or from the anchor lookup.
    pub async fn run_query(&self, raw: &str) -> ExecutionResult<QueryResults> {
        let query = parse_query(raw);
        for warning in &query.warnings {
            debug!("parse degradation: {}", warning);
        }
        QueryExecutor::new(&self.store).execute(&query).await
    }
}
