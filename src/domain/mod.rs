//! Domain model: customization schemas, customer selections, and the
//! pricing engine shared by the admin preview and the storefront cart.

pub mod events;
pub mod pricing;
pub mod schema;
pub mod selection;
pub mod validation;

pub use pricing::{price, price_with_method, LineItemCustomization, PriceBreakdownItem, PriceQuote};
pub use schema::{CalculationMethod, CustomizationField, CustomizationSchema, FieldKind, FieldOption, PricingConfig};
pub use selection::{CustomerSelection, Dimensions, FieldValue};
pub use validation::{validate, SchemaValidationError, Violation};
