//! Carbon impact estimation.
//!
//! Figures are a presentational estimate derived from catalog metadata
//! (category, material, tags). They are not measured or audited and should
//! not be shown as such.
//!
//! Each order line contributes
//! `category factor × material multiplier × Π tag multipliers × quantity`
//! kilograms of CO2e saved. The other metrics are linear scalings of that
//! total.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::order::OrderItem;

/// Category factor for products with an unmapped category.
pub const DEFAULT_CATEGORY_FACTOR: f64 = 0.25;

/// Trees-equivalent per kg CO2e.
pub const TREES_PER_KG: f64 = 0.12;
/// Litres of water per kg CO2e.
pub const WATER_LITRES_PER_KG: f64 = 380.0;
/// Grams of plastic per kg CO2e.
pub const PLASTIC_GRAMS_PER_KG: f64 = 250.0;
/// Car miles per kg CO2e.
pub const CAR_MILES_PER_KG: f64 = 2.5;

/// Base factor in kg CO2e saved per unit.
#[must_use]
pub fn category_factor(category: &str) -> f64 {
    match category {
        "Mailers & Envelopes" => 0.35,
        "Boxes & Containers" => 0.85,
        "Tape & Adhesives" => 0.12,
        "Void Fillers" => 0.45,
        "Labels & Stickers" => 0.08,
        _ => DEFAULT_CATEGORY_FACTOR,
    }
}

#[must_use]
pub fn material_multiplier(material: &str) -> f64 {
    match material {
        "Recycled Paper" => 1.2,
        "Recycled Cardboard" => 1.3,
        "Kraft Paper" => 1.1,
        "Cornstarch" => 1.5,
        "Bioplastic" => 1.4,
        _ => 1.0,
    }
}

#[must_use]
pub fn tag_multiplier(tag: &str) -> f64 {
    match tag {
        "Biodegradable" => 1.2,
        "Compostable" => 1.3,
        "Recyclable" => 1.1,
        "Plastic-Free" => 1.25,
        "FSC Certified" => 1.15,
        _ => 1.0,
    }
}

/// Per-unit factor for a product. `None` (a product missing from the
/// catalog) gets the default category factor and no multipliers.
#[must_use]
pub fn line_factor(product: Option<&Product>) -> f64 {
    let Some(product) = product else {
        return DEFAULT_CATEGORY_FACTOR;
    };
    let base = category_factor(&product.category)
        * product.material.as_deref().map_or(1.0, material_multiplier);
    product
        .tags
        .iter()
        .fold(base, |factor, tag| factor * tag_multiplier(tag))
}

/// Estimated environmental savings of an order, rounded for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarbonImpact {
    /// kg CO2e, 2 decimal places.
    pub carbon_saved: f64,
    /// 1 decimal place.
    pub trees_equivalent: f64,
    /// Litres.
    pub water_saved: f64,
    /// Grams.
    pub plastic_reduced: f64,
    pub car_miles_equivalent: f64,
}

impl CarbonImpact {
    /// Build the rounded record from an unrounded carbon total.
    #[must_use]
    pub fn from_carbon_total(total: f64) -> Self {
        Self {
            carbon_saved: round_to(total, 2),
            trees_equivalent: round_to(total * TREES_PER_KG, 1),
            water_saved: (total * WATER_LITRES_PER_KG).round(),
            plastic_reduced: (total * PLASTIC_GRAMS_PER_KG).round(),
            car_miles_equivalent: (total * CAR_MILES_PER_KG).round(),
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Estimate the impact of `items`, resolving products through `catalog`.
#[must_use]
pub fn calculate(items: &[OrderItem], catalog: &Catalog) -> CarbonImpact {
    let total: f64 = items
        .iter()
        .map(|item| line_factor(catalog.get(&item.product_id)) * f64::from(item.quantity))
        .sum();
    CarbonImpact::from_carbon_total(total)
}

/// Human-readable statements about an impact record.
#[must_use]
pub fn impact_facts(impact: &CarbonImpact) -> Vec<String> {
    let bathtubs = (impact.water_saved / 250.0).round();
    let phone_charges = (impact.carbon_saved * 121.0).round();
    vec![
        format!(
            "You've saved {} kg of CO2 emissions, equivalent to {} miles of driving!",
            impact.carbon_saved, impact.car_miles_equivalent
        ),
        format!(
            "Your order helps save {} liters of water, enough to fill {bathtubs} bathtubs!",
            impact.water_saved
        ),
        format!(
            "By choosing eco-friendly packaging, you've reduced plastic waste by {} grams!",
            impact.plastic_reduced
        ),
        format!(
            "Your environmental impact is equivalent to planting {} trees!",
            impact.trees_equivalent
        ),
        format!(
            "You've helped reduce carbon emissions equivalent to charging a smartphone {phone_charges} times!"
        ),
    ]
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::product;
    use crate::types::{Money, ProductId};

    fn item(id: &str, quantity: u32) -> OrderItem {
        OrderItem {
            product_id: ProductId::new(id),
            name: id.to_owned(),
            price: Money::from_minor(1000),
            quantity,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_order_has_zero_impact() {
        let impact = calculate(&[], &Catalog::new(Vec::new()));
        assert_eq!(impact, CarbonImpact::default());
        assert!(impact.is_zero());
    }

    #[test]
    fn test_factor_multiplies_category_material_and_tags() {
        let mut mailer = product("eco-mailer-1", 1078, "Mailers & Envelopes");
        mailer.material = Some("Recycled Paper".to_owned());
        mailer.tags = vec![
            "Biodegradable".to_owned(),
            "Recyclable".to_owned(),
            "Plastic-Free".to_owned(),
        ];
        // 0.35 × 1.2 × 1.2 × 1.1 × 1.25
        assert!(close(line_factor(Some(&mailer)), 0.693));
    }

    #[test]
    fn test_unmatched_tags_and_material_are_no_ops() {
        let mut waterproof = product("p", 100, "Boxes & Containers");
        waterproof.material = Some("Granite".to_owned());
        waterproof.tags = vec!["Waterproof".to_owned()];
        assert!(close(line_factor(Some(&waterproof)), 0.85));
    }

    #[test]
    fn test_unknown_product_uses_default_factor() {
        let impact = calculate(&[item("missing", 4)], &Catalog::new(Vec::new()));
        assert!(close(impact.carbon_saved, 1.0));
        assert!(close(impact.trees_equivalent, 0.1));
        assert!(close(impact.water_saved, 380.0));
        assert!(close(impact.plastic_reduced, 250.0));
        assert!(close(impact.car_miles_equivalent, 3.0));
    }

    #[test]
    fn test_quantity_scales_linearly() {
        let catalog = Catalog::new(vec![product("box", 2074, "Boxes & Containers")]);
        let one = calculate(&[item("box", 1)], &catalog);
        let ten = calculate(&[item("box", 10)], &catalog);
        assert!(close(one.carbon_saved, 0.85));
        assert!(close(ten.carbon_saved, 8.5));
        assert!(close(ten.water_saved, 3230.0));
    }

    #[test]
    fn test_facts_mention_the_figures() {
        let impact = CarbonImpact::from_carbon_total(2.0);
        let facts = impact_facts(&impact);
        assert_eq!(facts.len(), 5);
        assert!(facts.iter().any(|f| f.contains("760 liters")));
        assert!(facts.iter().any(|f| f.contains("242 times")));
    }
}
