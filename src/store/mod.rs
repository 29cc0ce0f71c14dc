//! Customization schema store
//!
//! One schema per product. Absence of a record is not an error: products
//! that were never configured get the all-disabled default schema.
//! Saves validate first and then replace the stored schema wholesale
//! (last write wins; concurrent admin edits are not merged).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::schema::CustomizationSchema;
use crate::domain::validation::{self, SchemaValidationError};

pub mod postgres;

pub use postgres::PgSchemaStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] SchemaValidationError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A persisted schema with its save timestamp.
#[derive(Clone, Debug)]
pub struct SchemaRecord {
    pub product_id: Uuid,
    pub schema: CustomizationSchema,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// `Ok(None)` when the product was never configured.
    async fn get_schema(&self, product_id: Uuid) -> Result<Option<SchemaRecord>, StoreError>;

    /// Validates the schema, then replaces the product's stored schema
    /// wholesale. Nothing is persisted when validation fails.
    async fn save_schema(&self, product_id: Uuid, schema: &CustomizationSchema) -> Result<SchemaRecord, StoreError>;
}

/// Load a product's schema, substituting the all-disabled default when
/// none was ever saved.
pub async fn load_or_default_schema(store: &dyn SchemaStore, product_id: Uuid) -> Result<CustomizationSchema, StoreError> {
    Ok(store
        .get_schema(product_id)
        .await?
        .map(|record| record.schema)
        .unwrap_or_else(CustomizationSchema::disabled_default))
}

/// In-memory store for tests and local tooling.
#[derive(Default)]
pub struct MemorySchemaStore {
    records: RwLock<HashMap<Uuid, SchemaRecord>>,
}

impl MemorySchemaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SchemaStore for MemorySchemaStore {
    async fn get_schema(&self, product_id: Uuid) -> Result<Option<SchemaRecord>, StoreError> {
        Ok(self.records.read().await.get(&product_id).cloned())
    }

    async fn save_schema(&self, product_id: Uuid, schema: &CustomizationSchema) -> Result<SchemaRecord, StoreError> {
        validation::validate(schema)?;
        let record = SchemaRecord { product_id, schema: schema.clone(), updated_at: Utc::now() };
        self.records.write().await.insert(product_id, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{CustomizationField, FieldKind, FieldOption};
    use rust_decimal::Decimal;

    fn configured_schema(price: i64) -> CustomizationSchema {
        CustomizationSchema {
            fields: vec![CustomizationField::new(
                "woodType",
                true,
                FieldKind::Dropdown { options: vec![FieldOption::new("Oak", Decimal::new(price, 0))] },
            )],
            pricing: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_missing_schema_is_none_not_error() {
        let store = MemorySchemaStore::new();
        assert!(store.get_schema(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_or_default_substitutes_disabled_default() {
        let store = MemorySchemaStore::new();
        let schema = load_or_default_schema(&store, Uuid::new_v4()).await.unwrap();
        assert!(schema.fields.iter().all(|f| !f.enabled));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemorySchemaStore::new();
        let product_id = Uuid::new_v4();
        store.save_schema(product_id, &configured_schema(500)).await.unwrap();
        let loaded = load_or_default_schema(&store, product_id).await.unwrap();
        assert_eq!(loaded.fields.len(), 1);
        assert!(loaded.fields[0].enabled);
    }

    #[tokio::test]
    async fn test_save_is_wholesale_replacement() {
        let store = MemorySchemaStore::new();
        let product_id = Uuid::new_v4();
        store.save_schema(product_id, &configured_schema(500)).await.unwrap();
        store.save_schema(product_id, &configured_schema(900)).await.unwrap();
        let record = store.get_schema(product_id).await.unwrap().unwrap();
        let options = record.schema.fields[0].kind.options().unwrap();
        assert_eq!(options[0].price, Decimal::new(900, 0));
    }

    #[tokio::test]
    async fn test_invalid_schema_is_not_persisted() {
        let store = MemorySchemaStore::new();
        let product_id = Uuid::new_v4();
        let invalid = configured_schema(-500);
        let err = store.save_schema(product_id, &invalid).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(ref e) if e.violations.len() == 1));
        assert!(store.get_schema(product_id).await.unwrap().is_none());
    }
}
