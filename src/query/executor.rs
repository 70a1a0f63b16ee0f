//! Query executor
//!
//! Evaluates a parsed SELECT query against a [`StatementStore`]. Evaluation
//! is anchored: the first pattern with a `prop:` or `claim:` predicate
//! seeds one candidate-statement lookup, and every remaining pattern about
//! the statement variable joins against each candidate's qualifiers and
//! references. Those joins are strict. A candidate with no match for a
//! required pattern is dropped, never null-filled; only the label lookup
//! degrades to null.
//!
//! Patterns that are neither the anchor, its value companion, nor a
//! qualifier/reference join are inert: they constrain nothing.

use crate::query::ast::{Namespace, ParsedQuery, QueryType, Term, TriplePattern};
use crate::query::results::{BindingRow, BindingValue, QueryResults};
use crate::store::{StatementRecord, StatementStore, StoreError};
use thiserror::Error;
use tracing::debug;

/// Hard cap on candidate statements fetched for the anchor pattern.
/// Anchors matching more statements than this silently lose the tail;
/// there is no pagination.
pub const MAX_CANDIDATE_STATEMENTS: usize = 100;

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// Only SELECT queries execute
    #[error("Unsupported query type: {0}")]
    UnsupportedQueryType(QueryType),

    /// The WHERE block produced no usable triple patterns
    #[error("Query has an empty WHERE clause")]
    EmptyWhereClause,

    /// No pattern with a `prop:` or `claim:` predicate to seed the search
    #[error("No anchor pattern (prop: or claim: predicate) in WHERE clause")]
    MissingAnchorPattern,

    /// The anchor statement lookup failed in the store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// The anchor pattern resolved into one concrete store lookup
struct AnchorLookup<'q> {
    /// Position of the anchor in the pattern list
    index: usize,
    /// Property id taken from the anchor predicate
    property_id: &'q str,
    /// Exact-value constraint for the lookup, if any
    target: Option<String>,
    /// Anchor subject variable, bound to each candidate's subject id
    subject_var: Option<&'q str>,
    /// Statement variable from a claim-shaped anchor
    statement_var: Option<&'q str>,
    /// Variable bound to each candidate's value (variable value companion)
    value_var: Option<&'q str>,
    /// Position of the consumed value companion pattern, if any
    value_index: Option<usize>,
}

/// Outcome of applying one non-anchor pattern to a candidate statement
enum JoinOutcome {
    /// Pattern matched, or does not participate in joins
    Satisfied,
    /// Required qualifier/reference missing, or its lookup failed
    Dropped,
}

/// Executes parsed queries against a borrowed statement store
pub struct QueryExecutor<'a, S: StatementStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: StatementStore + ?Sized> QueryExecutor<'a, S> {
    /// Create an executor over a store
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Execute a parsed query, producing one binding row per surviving
    /// candidate statement, in store order.
    ///
    /// `limit` and `offset` on the parsed query are not applied here; they
    /// ride along for the caller.
    pub async fn execute(&self, query: &ParsedQuery) -> ExecutionResult<QueryResults> {
        if query.query_type != QueryType::Select {
            return Err(ExecutionError::UnsupportedQueryType(query.query_type));
        }
        if query.where_patterns.is_empty() {
            return Err(ExecutionError::EmptyWhereClause);
        }
        let (anchor_index, anchor_pattern) =
            find_anchor(&query.where_patterns).ok_or(ExecutionError::MissingAnchorPattern)?;
        let anchor = resolve_anchor(query, anchor_index, anchor_pattern);

        debug!(
            "anchor pattern {}/{}: property={} target={:?}",
            anchor.index + 1,
            query.where_patterns.len(),
            anchor.property_id,
            anchor.target
        );

        let statements = self
            .store
            .find_statements(
                anchor.property_id,
                anchor.target.as_deref(),
                MAX_CANDIDATE_STATEMENTS,
            )
            .await?;

        let mut results = QueryResults::new();
        for statement in &statements {
            if let Some(row) = self.evaluate_candidate(query, &anchor, statement).await {
                results.push(row);
            }
        }

        debug!(
            "query produced {} row(s) from {} candidate statement(s)",
            results.len(),
            statements.len()
        );
        Ok(results)
    }

    /// Run one candidate statement through the non-anchor patterns.
    /// Returns the finished row, or `None` when a strict join drops it.
    async fn evaluate_candidate(
        &self,
        query: &ParsedQuery,
        anchor: &AnchorLookup<'_>,
        statement: &StatementRecord,
    ) -> Option<BindingRow> {
        let requested = &query.variables;
        let mut row = BindingRow::new();

        if let Some(statement_var) = anchor.statement_var {
            if is_requested(requested, statement_var) {
                row.bind(
                    statement_var.to_string(),
                    BindingValue::Text(statement.id.clone()),
                );
            }
        }
        if let Some(value_var) = anchor.value_var {
            if is_requested(requested, value_var) {
                row.bind(
                    value_var.to_string(),
                    BindingValue::Text(statement.value.clone()),
                );
            }
        }

        for (index, pattern) in query.where_patterns.iter().enumerate() {
            if index == anchor.index || anchor.value_index == Some(index) {
                continue;
            }
            match self
                .join_pattern(pattern, anchor.statement_var, statement, requested, &mut row)
                .await
            {
                JoinOutcome::Satisfied => {}
                JoinOutcome::Dropped => {
                    debug!(
                        "statement {} dropped: no match for pattern {}",
                        statement.id, pattern
                    );
                    return None;
                }
            }
        }

        if is_requested(requested, "?label") {
            let label = match self.store.get_entity_label(&statement.subject_id).await {
                Ok(label) => label,
                Err(err) => {
                    debug!(
                        "label lookup for {} failed, binding null: {}",
                        statement.subject_id, err
                    );
                    None
                }
            };
            row.bind("?label".to_string(), BindingValue::from(label));
        }

        if let Some(subject_var) = anchor.subject_var {
            if is_requested(requested, subject_var) {
                row.bind(
                    subject_var.to_string(),
                    BindingValue::Text(statement.subject_id.clone()),
                );
            }
        }

        for variable in requested {
            if variable != "*" && !row.is_bound(variable) {
                row.bind(variable.clone(), BindingValue::Null);
            }
        }

        Some(row)
    }

    /// Apply one non-anchor pattern to a candidate. Only patterns whose
    /// subject is the statement variable and whose predicate is `qual:` or
    /// `ref:` join; everything else is satisfied vacuously. A store error
    /// on a join reads the same as a missing attachment.
    async fn join_pattern(
        &self,
        pattern: &TriplePattern,
        statement_var: Option<&str>,
        statement: &StatementRecord,
        requested: &[String],
        row: &mut BindingRow,
    ) -> JoinOutcome {
        let statement_var = match statement_var {
            Some(var) => var,
            None => return JoinOutcome::Satisfied,
        };
        if pattern.subject.as_variable() != Some(statement_var) {
            return JoinOutcome::Satisfied;
        }

        let property_id = pattern.predicate.local_name().unwrap_or_default();
        let lookup = match pattern.predicate.namespace() {
            Some(Namespace::Qualifier) => self
                .store
                .find_qualifier(&statement.id, property_id)
                .await
                .map(|found| found.map(|qualifier| qualifier.value)),
            Some(Namespace::Reference) => self
                .store
                .find_reference(&statement.id, property_id)
                .await
                .map(|found| found.map(|reference| reference.value)),
            _ => return JoinOutcome::Satisfied,
        };

        match lookup {
            Ok(Some(value)) => {
                if let Some(object_var) = pattern.object.as_variable() {
                    if is_requested(requested, object_var) {
                        row.bind(object_var.to_string(), BindingValue::Text(value));
                    }
                }
                JoinOutcome::Satisfied
            }
            Ok(None) => JoinOutcome::Dropped,
            Err(err) => {
                debug!(
                    "join lookup failed for statement {}: {}",
                    statement.id, err
                );
                JoinOutcome::Dropped
            }
        }
    }
}

/// First pattern whose predicate carries the `prop:` or `claim:` namespace
fn find_anchor(patterns: &[TriplePattern]) -> Option<(usize, &TriplePattern)> {
    patterns.iter().enumerate().find(|(_, pattern)| {
        matches!(
            pattern.predicate.namespace(),
            Some(Namespace::Property | Namespace::Claim)
        )
    })
}

/// Resolve the anchor pattern into lookup parameters.
///
/// `prop:` anchors constrain the lookup to the object's value directly.
/// `claim:` anchors bind the object as a statement variable and consume
/// the first `<stmt> value: X` companion: a fixed X constrains the lookup,
/// a variable X binds each candidate's value instead.
fn resolve_anchor<'q>(
    query: &'q ParsedQuery,
    index: usize,
    anchor: &'q TriplePattern,
) -> AnchorLookup<'q> {
    let property_id = anchor.predicate.local_name().unwrap_or_default();
    let subject_var = anchor.subject.as_variable();

    if anchor.predicate.namespace() == Some(Namespace::Claim) {
        let statement_var = anchor.object.as_variable();
        let (target, value_var, value_index) = match statement_var {
            Some(var) => find_value_companion(&query.where_patterns, index, var),
            None => (None, None, None),
        };
        return AnchorLookup {
            index,
            property_id,
            target,
            subject_var,
            statement_var,
            value_var,
            value_index,
        };
    }

    AnchorLookup {
        index,
        property_id,
        target: Some(lookup_value(&anchor.object)),
        subject_var,
        statement_var: None,
        value_var: None,
        value_index: None,
    }
}

/// First pattern (anchor excluded) of the form `<stmt> value: X`
fn find_value_companion<'q>(
    patterns: &'q [TriplePattern],
    anchor_index: usize,
    statement_var: &str,
) -> (Option<String>, Option<&'q str>, Option<usize>) {
    for (index, pattern) in patterns.iter().enumerate() {
        if index == anchor_index {
            continue;
        }
        if pattern.subject.as_variable() != Some(statement_var) {
            continue;
        }
        if pattern.predicate.namespace() != Some(Namespace::Value) {
            continue;
        }
        return match pattern.object.as_variable() {
            Some(var) => (None, Some(var), Some(index)),
            None => (Some(lookup_value(&pattern.object)), None, Some(index)),
        };
    }
    (None, None, None)
}

/// A term as an exact-match lookup value: `item:` tokens contribute their
/// local name, everything else its source text.
fn lookup_value(term: &Term) -> String {
    match term {
        Term::Prefixed {
            namespace: Namespace::Item,
            local,
        } => local.clone(),
        other => other.to_string(),
    }
}

fn is_requested(variables: &[String], name: &str) -> bool {
    variables.iter().any(|v| v == "*" || v == name)
}
