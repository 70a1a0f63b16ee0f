//! Statement storage
//!
//! The executor evaluates queries against anything implementing
//! [`StatementStore`]: a narrow, async capability contract over
//! entity-claim data. Statements are the unit of storage; qualifiers and
//! references hang off a statement id, labels off an entity id.
//!
//! Lookup results come back in the backend's natural order and the
//! executor preserves that order, so deterministic backends give
//! deterministic query output.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStatementStore;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend failure (I/O, remote call, corrupt index)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Statement id already present
    #[error("Duplicate statement: {0}")]
    DuplicateStatement(String),

    /// Attachment target does not exist
    #[error("Statement not found: {0}")]
    StatementNotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A property claim about an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRecord {
    /// Statement id, unique across the store
    pub id: String,
    /// Entity the claim is about
    pub subject_id: String,
    /// Property the claim asserts
    pub property_id: String,
    /// Claim value: an entity id or a plain datavalue
    pub value: String,
}

impl StatementRecord {
    /// Create a new statement record
    pub fn new(
        id: impl Into<String>,
        subject_id: impl Into<String>,
        property_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            subject_id: subject_id.into(),
            property_id: property_id.into(),
            value: value.into(),
        }
    }
}

/// A qualifier refining one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifierRecord {
    /// Qualifier property id
    pub property_id: String,
    /// Qualifier value
    pub value: String,
}

impl QualifierRecord {
    /// Create a new qualifier record
    pub fn new(property_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            value: value.into(),
        }
    }
}

/// A reference backing one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Reference property id
    pub property_id: String,
    /// Reference value
    pub value: String,
}

impl ReferenceRecord {
    /// Create a new reference record
    pub fn new(property_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            value: value.into(),
        }
    }
}

/// Capability contract for statement backends
///
/// Qualifier and reference lookups are zero-or-one: a backend holding
/// several matches returns its first. All methods take `&self`; backends
/// handle their own interior mutability if they mutate on read.
#[async_trait]
pub trait StatementStore: Send + Sync {
    /// Find statements with the given property id, optionally constrained
    /// to an exact value, returning at most `max_results` in the backend's
    /// natural order.
    async fn find_statements(
        &self,
        property_id: &str,
        value: Option<&str>,
        max_results: usize,
    ) -> StoreResult<Vec<StatementRecord>>;

    /// Find the qualifier with `qualifier_property_id` on a statement
    async fn find_qualifier(
        &self,
        statement_id: &str,
        qualifier_property_id: &str,
    ) -> StoreResult<Option<QualifierRecord>>;

    /// Find the reference with `reference_property_id` on a statement
    async fn find_reference(
        &self,
        statement_id: &str,
        reference_property_id: &str,
    ) -> StoreResult<Option<ReferenceRecord>>;

    /// Display label for an entity, if it has one
    async fn get_entity_label(&self, entity_id: &str) -> StoreResult<Option<String>>;
}
