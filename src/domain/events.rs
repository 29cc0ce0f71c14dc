//! Domain events
//!
//! Published best-effort to NATS after the corresponding write commits;
//! never part of the request/response contract.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CustomizationEvent {
    SchemaSaved {
        product_id: Uuid,
        field_count: usize,
        enabled_count: usize,
    },
    ItemAdded {
        product_id: Uuid,
        session_id: String,
        final_price: Decimal,
    },
}

impl CustomizationEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::SchemaSaved { .. } => "commerce.customization.schema.saved",
            Self::ItemAdded { .. } => "commerce.cart.item.added",
        }
    }
}
