//! Furnicraft E-commerce - Furniture Customization Service

use anyhow::Result;
use axum::{extract::{Path, State}, http::StatusCode, routing::{get, post}, Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use validator::Validate;

use furnicraft_ecommerce::domain::events::CustomizationEvent;
use furnicraft_ecommerce::domain::pricing::{self, LineItemCustomization, PriceQuote};
use furnicraft_ecommerce::domain::schema::CustomizationSchema;
use furnicraft_ecommerce::domain::selection::CustomerSelection;
use furnicraft_ecommerce::domain::validation;
use furnicraft_ecommerce::store::{load_or_default_schema, PgSchemaStore, SchemaStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid, pub name: String, pub description: Option<String>,
    pub base_price: Decimal, pub currency: String,
    pub created_at: DateTime<Utc>, pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    pub id: Uuid, pub session_id: String, pub product_id: Uuid, pub quantity: i32,
    pub unit_price: Decimal, pub customization: sqlx::types::Json<LineItemCustomization>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AppState { pub db: sqlx::PgPool, pub store: Arc<dyn SchemaStore>, pub nats: Option<async_nats::Client> }

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let db = PgPoolOptions::new().max_connections(10).connect(&std::env::var("DATABASE_URL")?).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    let nats = match std::env::var("NATS_URL") { Ok(url) => async_nats::connect(&url).await.ok(), Err(_) => None };
    let state = AppState { store: Arc::new(PgSchemaStore::new(db.clone())), db, nats };

    let app = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "furnicraft-ecommerce"})) }))
        .route("/api/v1/products", post(create_product))
        .route("/api/v1/products/:id", get(get_product))
        .route("/api/v1/products/:id/customization", get(get_customization).put(save_customization))
        .route("/api/v1/products/:id/customization/quote", post(quote_customization))
        .route("/api/v1/customization/preview", post(preview_customization))
        .route("/api/v1/cart/:session", get(get_cart).delete(clear_cart))
        .route("/api/v1/cart/:session/items", post(add_to_cart))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8083".to_string());
    tracing::info!("🚀 Furnicraft E-commerce listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn internal(e: impl std::fmt::Display) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({"error": e.to_string()})))
}

fn bad_request(e: impl std::fmt::Display) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": e.to_string()})))
}

fn not_found(message: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": message})))
}

fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::Invalid(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": "schema validation failed", "violations": e.violations})),
        ),
        StoreError::Database(e) => internal(e),
    }
}

async fn publish(s: &AppState, event: CustomizationEvent) {
    let Some(nats) = &s.nats else { return };
    match serde_json::to_vec(&event) {
        Ok(payload) => {
            if let Err(e) = nats.publish(event.subject().to_string(), payload.into()).await {
                tracing::warn!("event publish failed: {}", e);
            }
        }
        Err(e) => tracing::warn!("event serialization failed: {}", e),
    }
}

// ---- Products (minimal: quote and cart need a base price to resolve) ----

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub currency: Option<String>,
}

async fn create_product(State(s): State<AppState>, Json(r): Json<CreateProductRequest>) -> Result<(StatusCode, Json<Product>), ApiError> {
    r.validate().map_err(bad_request)?;
    if r.base_price < Decimal::ZERO { return Err(bad_request("base_price must not be negative")); }
    let p = sqlx::query_as::<_, Product>("INSERT INTO products (id, name, description, base_price, currency, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING *")
        .bind(Uuid::now_v7()).bind(&r.name).bind(&r.description).bind(r.base_price).bind(r.currency.as_deref().unwrap_or("NGN"))
        .fetch_one(&s.db).await.map_err(internal)?;
    Ok((StatusCode::CREATED, Json(p)))
}

async fn get_product(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Product>, ApiError> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(&s.db).await.map_err(internal)?.map(Json).ok_or(not_found("product not found"))
}

async fn fetch_base_price(db: &sqlx::PgPool, product_id: Uuid) -> Result<Decimal, ApiError> {
    let row: Option<(Decimal,)> = sqlx::query_as("SELECT base_price FROM products WHERE id = $1").bind(product_id).fetch_optional(db).await.map_err(internal)?;
    row.map(|r| r.0).ok_or(not_found("product not found"))
}

// ---- Customization schema (admin back office) ----

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub product_id: Uuid,
    pub schema: CustomizationSchema,
    pub updated_at: Option<DateTime<Utc>>,
}

async fn get_customization(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SchemaResponse>, ApiError> {
    let (schema, updated_at) = match s.store.get_schema(id).await.map_err(store_error)? {
        Some(record) => (record.schema, Some(record.updated_at)),
        None => (CustomizationSchema::disabled_default(), None),
    };
    Ok(Json(SchemaResponse { product_id: id, schema, updated_at }))
}

async fn save_customization(State(s): State<AppState>, Path(id): Path<Uuid>, Json(schema): Json<CustomizationSchema>) -> Result<Json<SchemaResponse>, ApiError> {
    for (field, option) in validation::duplicate_option_names(&schema) {
        tracing::warn!(%field, %option, "duplicate option name; pricing uses the first match");
    }
    let record = s.store.save_schema(id, &schema).await.map_err(store_error)?;
    let enabled_count = record.schema.fields.iter().filter(|f| f.enabled).count();
    publish(&s, CustomizationEvent::SchemaSaved { product_id: id, field_count: record.schema.fields.len(), enabled_count }).await;
    Ok(Json(SchemaResponse { product_id: id, schema: record.schema, updated_at: Some(record.updated_at) }))
}

// ---- Pricing (one engine behind both surfaces) ----

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub base_price: Decimal,
    pub schema: CustomizationSchema,
    #[serde(default)]
    pub selection: CustomerSelection,
}

/// Admin preview: prices a draft schema without persisting anything.
async fn preview_customization(Json(r): Json<PreviewRequest>) -> Json<PriceQuote> {
    Json(pricing::price(r.base_price, &r.schema, &r.selection))
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub selection: CustomerSelection,
    pub base_price: Option<Decimal>,
}

/// Storefront quote against the saved schema (or the default when none exists).
async fn quote_customization(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<QuoteRequest>) -> Result<Json<PriceQuote>, ApiError> {
    let schema = load_or_default_schema(s.store.as_ref(), id).await.map_err(store_error)?;
    let base_price = match r.base_price { Some(p) => p, None => fetch_base_price(&s.db, id).await? };
    Ok(Json(pricing::price(base_price, &schema, &r.selection)))
}

// ---- Cart ----

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 100))]
    pub quantity: i32,
    #[serde(default)]
    pub selection: CustomerSelection,
}

async fn add_to_cart(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<AddToCartRequest>) -> Result<(StatusCode, Json<CartLine>), ApiError> {
    r.validate().map_err(bad_request)?;
    let base_price = fetch_base_price(&s.db, r.product_id).await?;
    let schema = load_or_default_schema(s.store.as_ref(), r.product_id).await.map_err(store_error)?;
    let quote = pricing::price(base_price, &schema, &r.selection);
    let customization = LineItemCustomization::new(r.selection, &quote);
    // Customized lines never merge: each configuration is its own line.
    let line = sqlx::query_as::<_, CartLine>("INSERT INTO cart_items (id, session_id, product_id, quantity, unit_price, customization, created_at) VALUES ($1, $2, $3, $4, $5, $6, NOW()) RETURNING *")
        .bind(Uuid::now_v7()).bind(&session).bind(r.product_id).bind(r.quantity).bind(quote.final_price).bind(sqlx::types::Json(&customization))
        .fetch_one(&s.db).await.map_err(internal)?;
    publish(&s, CustomizationEvent::ItemAdded { product_id: r.product_id, session_id: session, final_price: quote.final_price }).await;
    Ok((StatusCode::CREATED, Json(line)))
}

async fn get_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<Json<Vec<CartLine>>, ApiError> {
    let items = sqlx::query_as::<_, CartLine>("SELECT * FROM cart_items WHERE session_id = $1 ORDER BY created_at").bind(&session).fetch_all(&s.db).await.map_err(internal)?;
    Ok(Json(items))
}

async fn clear_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<StatusCode, ApiError> {
    sqlx::query("DELETE FROM cart_items WHERE session_id = $1").bind(&session).execute(&s.db).await.map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}
