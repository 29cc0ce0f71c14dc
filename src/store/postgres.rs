//! Postgres-backed schema store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{SchemaRecord, SchemaStore, StoreError};
use crate::domain::schema::CustomizationSchema;
use crate::domain::validation;

#[derive(Clone)]
pub struct PgSchemaStore {
    pool: PgPool,
}

impl PgSchemaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SchemaRow {
    product_id: Uuid,
    schema: sqlx::types::Json<CustomizationSchema>,
    updated_at: DateTime<Utc>,
}

impl From<SchemaRow> for SchemaRecord {
    fn from(row: SchemaRow) -> Self {
        Self { product_id: row.product_id, schema: row.schema.0, updated_at: row.updated_at }
    }
}

#[async_trait]
impl SchemaStore for PgSchemaStore {
    async fn get_schema(&self, product_id: Uuid) -> Result<Option<SchemaRecord>, StoreError> {
        let row = sqlx::query_as::<_, SchemaRow>(
            "SELECT product_id, schema, updated_at FROM customization_schemas WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(SchemaRecord::from))
    }

    async fn save_schema(&self, product_id: Uuid, schema: &CustomizationSchema) -> Result<SchemaRecord, StoreError> {
        validation::validate(schema)?;
        let row = sqlx::query_as::<_, SchemaRow>(
            "INSERT INTO customization_schemas (product_id, schema, created_at, updated_at) VALUES ($1, $2, NOW(), NOW()) \
             ON CONFLICT (product_id) DO UPDATE SET schema = EXCLUDED.schema, updated_at = NOW() \
             RETURNING product_id, schema, updated_at",
        )
        .bind(product_id)
        .bind(sqlx::types::Json(schema))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }
}
