//! Furnicraft E-commerce Platform
//!
//! Self-hosted furniture e-commerce with made-to-order customization.
//!
//! ## Features
//! - Per-product customization schemas configured from the admin back office
//! - Rule-driven customization pricing with itemized cost breakdowns
//! - Additive, replacement, and percentage price combination policies
//! - One shared pricing engine for admin preview and storefront cart
//! - Immutable customization cost records on cart line items

pub mod domain;
pub mod store;

pub use domain::pricing::{price, price_with_method, LineItemCustomization, PriceBreakdownItem, PriceQuote};
pub use domain::schema::{CalculationMethod, CustomizationSchema};
pub use domain::selection::{CustomerSelection, FieldValue};
pub use domain::validation::SchemaValidationError;
pub use store::{load_or_default_schema, MemorySchemaStore, PgSchemaStore, SchemaStore, StoreError};
