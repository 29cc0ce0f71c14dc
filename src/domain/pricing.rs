//! Customization pricing engine
//!
//! Pure valuation of a customer selection against a product's
//! customization schema. The admin preview and the storefront cart call
//! the same functions here, so a configured price can never differ
//! between the two.
//!
//! Pricing never fails: disabled fields, unmatched option names, shape
//! mismatches, and negative inputs all resolve to zero-cost
//! contributions. A stale or half-migrated schema must still produce a
//! best-effort price instead of blocking checkout.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::schema::{CalculationMethod, CustomizationField, CustomizationSchema, FieldKind, FieldOption};
use crate::domain::selection::{CustomerSelection, FieldValue};

/// The engine's full output for one pricing request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base_price: Decimal,
    pub total_additional_cost: Decimal,
    pub breakdown: Vec<PriceBreakdownItem>,
    pub pricing_method: CalculationMethod,
    /// Rounded to whole currency units; everything above stays exact.
    pub final_price: Decimal,
}

/// One itemized cost line. Multi-select fields expand to one item per
/// selected option rather than a single grouped line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdownItem {
    pub field_name: String,
    pub field_label: String,
    pub selected_value: String,
    pub cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BreakdownDetail>,
}

/// Type-specific descriptive metadata attached to a breakdown item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BreakdownDetail {
    Option { option: FieldOption },
    Engraving { characters: usize, base_price: Decimal, price_per_letter: Decimal },
    Dimensions { width: Decimal, height: Decimal, depth: Decimal, price_per_unit: Decimal },
}

/// The customization payload embedded into a cart line item at the point
/// of purchase. Once written into an order it is a historical price
/// record and is never recomputed, even if the schema changes later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItemCustomization {
    pub fields: CustomerSelection,
    pub total_customization_cost: Decimal,
    pub breakdown: Vec<PriceBreakdownItem>,
    pub pricing_method: CalculationMethod,
    pub base_price: Decimal,
}

impl LineItemCustomization {
    pub fn new(fields: CustomerSelection, quote: &PriceQuote) -> Self {
        Self {
            fields,
            total_customization_cost: quote.total_additional_cost,
            breakdown: quote.breakdown.clone(),
            pricing_method: quote.pricing_method,
            base_price: quote.base_price,
        }
    }
}

/// Price a selection using the schema's configured calculation method.
pub fn price(base_price: Decimal, schema: &CustomizationSchema, selection: &CustomerSelection) -> PriceQuote {
    price_with_method(base_price, schema, selection, schema.pricing.calculation_method)
}

/// Price a selection under an explicit calculation method. The admin
/// editor uses this to preview a policy change before saving it.
pub fn price_with_method(
    base_price: Decimal,
    schema: &CustomizationSchema,
    selection: &CustomerSelection,
    method: CalculationMethod,
) -> PriceQuote {
    let mut breakdown = Vec::new();
    for field in schema.enabled_fields() {
        let Some(value) = selection.get(&field.field_name) else { continue };
        if value.is_blank() {
            continue;
        }
        appraise(field, value, &mut breakdown);
    }

    let total: Decimal = breakdown.iter().map(|item| item.cost).sum();
    let final_price = match method {
        CalculationMethod::Additive => base_price + total,
        CalculationMethod::Replacement => {
            if total > Decimal::ZERO {
                total
            } else {
                base_price
            }
        }
        CalculationMethod::Percentage => base_price * (Decimal::ONE + total / Decimal::ONE_HUNDRED),
    };

    PriceQuote {
        base_price,
        total_additional_cost: total,
        breakdown,
        pricing_method: method,
        final_price: round_to_minor_unit(final_price),
    }
}

/// Round half away from zero to whole currency units. Applied once, to
/// the final price only, so rounding error cannot compound across items.
pub fn round_to_minor_unit(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Append this field's cost contribution(s) to the breakdown.
///
/// Items are appended only when they carry a cost or descriptive detail;
/// an unmatched option name or a mismatched value shape appends nothing.
fn appraise(field: &CustomizationField, value: &FieldValue, out: &mut Vec<PriceBreakdownItem>) {
    match (&field.kind, value) {
        (
            FieldKind::Dropdown { options } | FieldKind::Color { options } | FieldKind::Design { options },
            FieldValue::Text(name),
        ) => {
            if let Some(option) = find_option(options, name) {
                out.push(item(field, name.clone(), floor_zero(option.price), Some(BreakdownDetail::Option { option: option.clone() })));
            }
        }
        (FieldKind::MultiSelect { options }, FieldValue::Choices(names)) => {
            for name in names {
                if let Some(option) = find_option(options, name) {
                    out.push(item(field, name.clone(), floor_zero(option.price), Some(BreakdownDetail::Option { option: option.clone() })));
                }
            }
        }
        (FieldKind::Dimensions { pricing_impact }, FieldValue::Dimensions(dims)) => {
            // Flat pieces price by area: depth counts as at least one unit.
            let cost = floor_zero(dims.width * dims.height * dims.depth.max(Decimal::ONE) * pricing_impact.price_per_unit);
            out.push(item(
                field,
                format!("{}x{}x{} cm", dims.width, dims.height, dims.depth),
                cost,
                Some(BreakdownDetail::Dimensions {
                    width: dims.width,
                    height: dims.height,
                    depth: dims.depth,
                    price_per_unit: pricing_impact.price_per_unit,
                }),
            ));
        }
        (FieldKind::Text { pricing_impact }, FieldValue::Text(text)) => {
            let characters = text.chars().count();
            let cost = floor_zero(pricing_impact.base_price + Decimal::from(characters) * pricing_impact.price_per_letter);
            out.push(item(
                field,
                text.clone(),
                cost,
                Some(BreakdownDetail::Engraving {
                    characters,
                    base_price: pricing_impact.base_price,
                    price_per_letter: pricing_impact.price_per_letter,
                }),
            ));
        }
        (FieldKind::Toggle { pricing_impact }, FieldValue::Flag(true)) => {
            let cost = floor_zero(pricing_impact.flat_fee);
            if cost > Decimal::ZERO {
                out.push(item(field, "Included".to_string(), cost, None));
            }
        }
        (FieldKind::File { pricing_impact }, FieldValue::Flag(true)) => {
            let cost = floor_zero(pricing_impact.flat_fee);
            if cost > Decimal::ZERO {
                out.push(item(field, "Uploaded design".to_string(), cost, None));
            }
        }
        (FieldKind::File { pricing_impact }, FieldValue::Text(reference)) => {
            let cost = floor_zero(pricing_impact.flat_fee);
            if cost > Decimal::ZERO {
                out.push(item(field, reference.clone(), cost, None));
            }
        }
        _ => {}
    }
}

/// First match wins when a field carries duplicate option names.
fn find_option<'a>(options: &'a [FieldOption], name: &str) -> Option<&'a FieldOption> {
    options.iter().find(|option| option.name == name)
}

fn floor_zero(cost: Decimal) -> Decimal {
    cost.max(Decimal::ZERO)
}

fn item(field: &CustomizationField, selected_value: String, cost: Decimal, details: Option<BreakdownDetail>) -> PriceBreakdownItem {
    PriceBreakdownItem {
        field_name: field.field_name.clone(),
        field_label: field.display_label(),
        selected_value,
        cost,
        details,
    }
}
