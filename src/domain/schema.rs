//! Customization schema model
//!
//! One `CustomizationSchema` per product: the admin-configured set of
//! customizable fields and the pricing policy combining their costs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The full customization configuration for one product.
///
/// Saved wholesale: the admin editor always resubmits the complete field
/// list, and the latest save replaces whatever was stored before.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomizationSchema {
    #[serde(default)]
    pub fields: Vec<CustomizationField>,
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl CustomizationSchema {
    /// The schema substituted for products that were never configured:
    /// every field type present but disabled, no options, zero pricing
    /// parameters. Scaffolding for the admin editor, not a sample catalog.
    pub fn disabled_default() -> Self {
        Self {
            fields: vec![
                CustomizationField::disabled("woodType", FieldKind::Dropdown { options: vec![] }),
                CustomizationField::disabled("finishColor", FieldKind::Color { options: vec![] }),
                CustomizationField::disabled("size", FieldKind::Dimensions { pricing_impact: UnitPricing::default() }),
                CustomizationField::disabled("engraving", FieldKind::Text { pricing_impact: TextPricing::default() }),
                CustomizationField::disabled("carve", FieldKind::Design { options: vec![] }),
                CustomizationField::disabled("addOns", FieldKind::MultiSelect { options: vec![] }),
                CustomizationField::disabled("assemblyRequired", FieldKind::Toggle { pricing_impact: FlatFee::default() }),
                CustomizationField::disabled("customDesign", FieldKind::File { pricing_impact: FlatFee::default() }),
            ],
            pricing: PricingConfig::default(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&CustomizationField> {
        self.fields.iter().find(|f| f.field_name == name)
    }

    pub fn enabled_fields(&self) -> impl Iterator<Item = &CustomizationField> {
        self.fields.iter().filter(|f| f.enabled)
    }
}

impl Default for CustomizationSchema {
    fn default() -> Self {
        Self::disabled_default()
    }
}

/// One configurable dimension of a product (wood type, size, engraving...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomizationField {
    /// Stable identifier, unique within the product's schema.
    pub field_name: String,
    /// Display label; falls back to a humanized `field_name` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl CustomizationField {
    pub fn new(name: impl Into<String>, enabled: bool, kind: FieldKind) -> Self {
        Self { field_name: name.into(), label: None, enabled, kind }
    }

    pub fn disabled(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(name, false, kind)
    }

    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => humanize(&self.field_name),
        }
    }
}

/// Field type with its type-dependent pricing parameters.
///
/// A tagged union rather than a string-typed bag of optional parameters:
/// the valuation match is exhaustive, so a field type without a pricing
/// rule does not compile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field_type", rename_all = "kebab-case")]
pub enum FieldKind {
    Dropdown {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    Color {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    Dimensions {
        #[serde(default)]
        pricing_impact: UnitPricing,
    },
    Text {
        #[serde(default)]
        pricing_impact: TextPricing,
    },
    Design {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    MultiSelect {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    Toggle {
        #[serde(default)]
        pricing_impact: FlatFee,
    },
    File {
        #[serde(default)]
        pricing_impact: FlatFee,
    },
}

impl FieldKind {
    /// Option list for option-carrying field types.
    pub fn options(&self) -> Option<&[FieldOption]> {
        match self {
            Self::Dropdown { options }
            | Self::Color { options }
            | Self::Design { options }
            | Self::MultiSelect { options } => Some(options),
            Self::Dimensions { .. } | Self::Text { .. } | Self::Toggle { .. } | Self::File { .. } => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Dropdown { .. } => "dropdown",
            Self::Color { .. } => "color",
            Self::Dimensions { .. } => "dimensions",
            Self::Text { .. } => "text",
            Self::Design { .. } => "design",
            Self::MultiSelect { .. } => "multi-select",
            Self::Toggle { .. } => "toggle",
            Self::File { .. } => "file",
        }
    }
}

/// One selectable option of a dropdown/color/design/multi-select field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    /// Hex swatch for color fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Preview image for design/carve options; uploaded elsewhere, only the URL lands here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl FieldOption {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self { name: name.into(), price, color: None, image_url: None }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitPricing {
    /// Cost per cm^3 of the selected dimensions.
    #[serde(default)]
    pub price_per_unit: Decimal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextPricing {
    #[serde(default)]
    pub base_price: Decimal,
    #[serde(default)]
    pub price_per_letter: Decimal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatFee {
    #[serde(default)]
    pub flat_fee: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub calculation_method: CalculationMethod,
    #[serde(default = "default_show_breakdown")]
    pub show_breakdown: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { calculation_method: CalculationMethod::default(), show_breakdown: true }
    }
}

fn default_show_breakdown() -> bool {
    true
}

/// Policy combining the base price with the summed customization costs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMethod {
    /// `final = base + total`
    #[default]
    Additive,
    /// `final = total` when any customization cost applies, else `base`
    Replacement,
    /// `final = base * (1 + total / 100)`
    Percentage,
}

/// `woodType` -> `Wood Type`, for breakdown labels with no explicit label.
pub(crate) fn humanize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.push(' ');
            out.push(ch);
        } else if ch == '_' || ch == '-' {
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
    out
}
