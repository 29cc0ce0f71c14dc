//! Schema editor validation
//!
//! Runs before a schema is persisted. Every violation across the whole
//! field list is collected and reported together so the admin editor can
//! highlight all problems in one pass instead of fixing them one save at
//! a time.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

use crate::domain::schema::{CustomizationField, CustomizationSchema, FieldKind};

#[derive(Debug, Error)]
#[error("schema validation failed with {} violation(s)", .violations.len())]
pub struct SchemaValidationError {
    pub violations: Vec<Violation>,
}

/// One constraint violation, scoped to the offending field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field_name: String,
    pub message: String,
}

/// Validate a full schema; `Err` carries every violation found.
pub fn validate(schema: &CustomizationSchema) -> Result<(), SchemaValidationError> {
    let mut violations = Vec::new();
    let mut seen_names = HashSet::new();

    for field in &schema.fields {
        if field.field_name.trim().is_empty() {
            violations.push(flag(field, "field name must not be empty"));
        } else if !seen_names.insert(field.field_name.as_str()) {
            violations.push(flag(field, "field name duplicates an earlier field"));
        }

        match &field.kind {
            FieldKind::Dropdown { options }
            | FieldKind::Color { options }
            | FieldKind::Design { options }
            | FieldKind::MultiSelect { options } => {
                for (index, option) in options.iter().enumerate() {
                    if option.name.trim().is_empty() {
                        violations.push(flag(field, format!("option #{} has an empty name", index + 1)));
                    }
                    if option.price < Decimal::ZERO {
                        violations.push(flag(field, format!("option \"{}\" has a negative price", option.name)));
                    }
                    if let Some(color) = &option.color {
                        if !is_hex_color(color) {
                            violations.push(flag(field, format!("option \"{}\" has an invalid hex color \"{}\"", option.name, color)));
                        }
                    }
                }
            }
            FieldKind::Dimensions { pricing_impact } => {
                if pricing_impact.price_per_unit < Decimal::ZERO {
                    violations.push(flag(field, "price_per_unit must not be negative"));
                }
            }
            FieldKind::Text { pricing_impact } => {
                if pricing_impact.base_price < Decimal::ZERO {
                    violations.push(flag(field, "base_price must not be negative"));
                }
                if pricing_impact.price_per_letter < Decimal::ZERO {
                    violations.push(flag(field, "price_per_letter must not be negative"));
                }
            }
            FieldKind::Toggle { pricing_impact } | FieldKind::File { pricing_impact } => {
                if pricing_impact.flat_fee < Decimal::ZERO {
                    violations.push(flag(field, "flat_fee must not be negative"));
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError { violations })
    }
}

/// Duplicate option names within a field are legal (pricing takes the
/// first match) but worth a warning at save time. Returns
/// `(field_name, option_name)` pairs.
pub fn duplicate_option_names(schema: &CustomizationSchema) -> Vec<(String, String)> {
    let mut duplicates = Vec::new();
    for field in &schema.fields {
        let Some(options) = field.kind.options() else { continue };
        let mut seen = HashSet::new();
        for option in options {
            if !seen.insert(option.name.as_str()) {
                duplicates.push((field.field_name.clone(), option.name.clone()));
            }
        }
    }
    duplicates
}

fn flag(field: &CustomizationField, message: impl Into<String>) -> Violation {
    Violation { field_name: field.field_name.clone(), message: message.into() }
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else { return false };
    (digits.len() == 6 || digits.len() == 3) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{FieldOption, TextPricing, UnitPricing};

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    #[test]
    fn test_default_schema_is_valid() {
        assert!(validate(&CustomizationSchema::disabled_default()).is_ok());
    }

    #[test]
    fn test_all_violations_reported_together() {
        let schema = CustomizationSchema {
            fields: vec![
                CustomizationField::new(
                    "woodType",
                    true,
                    FieldKind::Dropdown {
                        options: vec![FieldOption::new("", dec(100)), FieldOption::new("Oak", dec(-5))],
                    },
                ),
                CustomizationField::new(
                    "size",
                    true,
                    FieldKind::Dimensions { pricing_impact: UnitPricing { price_per_unit: dec(-1) } },
                ),
                CustomizationField::new(
                    "engraving",
                    true,
                    FieldKind::Text {
                        pricing_impact: TextPricing { base_price: dec(-10), price_per_letter: dec(5) },
                    },
                ),
            ],
            pricing: Default::default(),
        };

        let err = validate(&schema).unwrap_err();
        assert_eq!(err.violations.len(), 4);
        assert_eq!(err.violations.iter().filter(|v| v.field_name == "woodType").count(), 2);
        assert_eq!(err.violations.iter().filter(|v| v.field_name == "size").count(), 1);
        assert_eq!(err.violations.iter().filter(|v| v.field_name == "engraving").count(), 1);
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let schema = CustomizationSchema {
            fields: vec![
                CustomizationField::new("woodType", true, FieldKind::Dropdown { options: vec![] }),
                CustomizationField::new("woodType", false, FieldKind::Color { options: vec![] }),
            ],
            pricing: Default::default(),
        };
        let err = validate(&schema).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert!(err.violations[0].message.contains("duplicates"));
    }

    #[test]
    fn test_invalid_hex_color_rejected() {
        let mut option = FieldOption::new("Walnut Stain", dec(150));
        option.color = Some("brown".into());
        let schema = CustomizationSchema {
            fields: vec![CustomizationField::new("finishColor", true, FieldKind::Color { options: vec![option] })],
            pricing: Default::default(),
        };
        assert!(validate(&schema).is_err());

        let mut ok = FieldOption::new("Walnut Stain", dec(150));
        ok.color = Some("#8b5a2b".into());
        let schema = CustomizationSchema {
            fields: vec![CustomizationField::new("finishColor", true, FieldKind::Color { options: vec![ok] })],
            pricing: Default::default(),
        };
        assert!(validate(&schema).is_ok());
    }

    #[test]
    fn test_duplicate_option_names_are_legal_but_reported() {
        let schema = CustomizationSchema {
            fields: vec![CustomizationField::new(
                "woodType",
                true,
                FieldKind::Dropdown {
                    options: vec![FieldOption::new("Oak", dec(500)), FieldOption::new("Oak", dec(900))],
                },
            )],
            pricing: Default::default(),
        };
        assert!(validate(&schema).is_ok());
        assert_eq!(duplicate_option_names(&schema), vec![("woodType".to_string(), "Oak".to_string())]);
    }
}
