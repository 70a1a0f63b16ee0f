//! In-memory statement store
//!
//! The reference [`StatementStore`] backend: hash-indexed by property id,
//! insertion order preserved within each property. Suitable for tests,
//! demos and small datasets; all lookups are synchronous under the hood.

use super::{
    QualifierRecord, ReferenceRecord, StatementRecord, StatementStore, StoreError, StoreResult,
};
use async_trait::async_trait;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// In-memory statement store
#[derive(Debug, Clone)]
pub struct MemoryStatementStore {
    /// Statements grouped by property id, in insertion order
    statements: FxHashMap<String, Vec<StatementRecord>>,
    /// Every statement id, for duplicate and attachment checks
    statement_ids: FxHashSet<String>,
    /// Qualifiers by owning statement id
    qualifiers: FxHashMap<String, Vec<QualifierRecord>>,
    /// References by owning statement id
    references: FxHashMap<String, Vec<ReferenceRecord>>,
    /// Entity display labels
    labels: FxHashMap<String, String>,
}

impl MemoryStatementStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            statements: FxHashMap::default(),
            statement_ids: FxHashSet::default(),
            qualifiers: FxHashMap::default(),
            references: FxHashMap::default(),
            labels: FxHashMap::default(),
        }
    }

    /// Insert a statement; ids must be unique across the store
    pub fn insert_statement(&mut self, statement: StatementRecord) -> StoreResult<()> {
        if !self.statement_ids.insert(statement.id.clone()) {
            return Err(StoreError::DuplicateStatement(statement.id));
        }
        debug!(
            "inserting statement {}: {} {} {}",
            statement.id, statement.subject_id, statement.property_id, statement.value
        );
        self.statements
            .entry(statement.property_id.clone())
            .or_default()
            .push(statement);
        Ok(())
    }

    /// Attach a qualifier to an existing statement
    pub fn insert_qualifier(
        &mut self,
        statement_id: &str,
        property_id: impl Into<String>,
        value: impl Into<String>,
    ) -> StoreResult<()> {
        if !self.statement_ids.contains(statement_id) {
            return Err(StoreError::StatementNotFound(statement_id.to_string()));
        }
        self.qualifiers
            .entry(statement_id.to_string())
            .or_default()
            .push(QualifierRecord::new(property_id, value));
        Ok(())
    }

    /// Attach a reference to an existing statement
    pub fn insert_reference(
        &mut self,
        statement_id: &str,
        property_id: impl Into<String>,
        value: impl Into<String>,
    ) -> StoreResult<()> {
        if !self.statement_ids.contains(statement_id) {
            return Err(StoreError::StatementNotFound(statement_id.to_string()));
        }
        self.references
            .entry(statement_id.to_string())
            .or_default()
            .push(ReferenceRecord::new(property_id, value));
        Ok(())
    }

    /// Set or replace an entity's display label
    pub fn set_label(&mut self, entity_id: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(entity_id.into(), label.into());
    }

    /// Total number of statements
    pub fn len(&self) -> usize {
        self.statement_ids.len()
    }

    /// Check if the store holds no statements
    pub fn is_empty(&self) -> bool {
        self.statement_ids.is_empty()
    }

    /// Remove all statements, attachments and labels
    pub fn clear(&mut self) {
        self.statements.clear();
        self.statement_ids.clear();
        self.qualifiers.clear();
        self.references.clear();
        self.labels.clear();
    }
}

impl Default for MemoryStatementStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatementStore for MemoryStatementStore {
    async fn find_statements(
        &self,
        property_id: &str,
        value: Option<&str>,
        max_results: usize,
    ) -> StoreResult<Vec<StatementRecord>> {
        let matches: Vec<StatementRecord> = self
            .statements
            .get(property_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| value.map_or(true, |v| record.value == v))
                    .take(max_results)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            "find_statements property={} value={:?}: {} match(es)",
            property_id,
            value,
            matches.len()
        );
        Ok(matches)
    }

    async fn find_qualifier(
        &self,
        statement_id: &str,
        qualifier_property_id: &str,
    ) -> StoreResult<Option<QualifierRecord>> {
        Ok(self.qualifiers.get(statement_id).and_then(|qualifiers| {
            qualifiers
                .iter()
                .find(|q| q.property_id == qualifier_property_id)
                .cloned()
        }))
    }

    async fn find_reference(
        &self,
        statement_id: &str,
        reference_property_id: &str,
    ) -> StoreResult<Option<ReferenceRecord>> {
        Ok(self.references.get(statement_id).and_then(|references| {
            references
                .iter()
                .find(|r| r.property_id == reference_property_id)
                .cloned()
        }))
    }

    async fn get_entity_label(&self, entity_id: &str) -> StoreResult<Option<String>> {
        Ok(self.labels.get(entity_id).cloned())
    }
}
