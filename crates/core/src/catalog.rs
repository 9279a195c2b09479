//! Product catalog.
//!
//! Products are immutable reference data. The [`Catalog`] supports lookup by
//! ID plus the filter and sort combinations offered on the product listing.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

/// Stock count at or below which a product is flagged as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Physical dimensions in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width_cm: f64,
    pub height_cm: f64,
    pub depth_cm: f64,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Money>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_grams: Option<u32>,
    pub stock_count: u32,
}

impl Product {
    /// Stock level using [`LOW_STOCK_THRESHOLD`].
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        StockLevel::for_count(self.stock_count, LOW_STOCK_THRESHOLD)
    }

    /// Returns `true` if at least one unit is available.
    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.stock_count > 0
    }

    /// Returns `true` if the product carries `tag` (exact match).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whole-percent saving against the compare-at price, if the product is
    /// on sale.
    #[must_use]
    pub fn savings_percent(&self) -> Option<i64> {
        let compare = self.compare_at_price?.minor_units();
        let price = self.price.minor_units();
        if compare <= price || compare == 0 {
            return None;
        }
        Some((compare - price) * 100 / compare)
    }
}

/// Availability bucket shown next to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    LowStock(u32),
    InStock,
}

impl StockLevel {
    /// Classify a stock count.
    #[must_use]
    pub const fn for_count(count: u32, low_threshold: u32) -> Self {
        if count == 0 {
            Self::OutOfStock
        } else if count <= low_threshold {
            Self::LowStock(count)
        } else {
            Self::InStock
        }
    }

    /// Display text.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::OutOfStock => "Out of Stock".to_owned(),
            Self::LowStock(n) => format!("Only {n} left in stock!"),
            Self::InStock => "In Stock".to_owned(),
        }
    }
}

/// Price filter bands, in whole rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceBand {
    Under10,
    From10To20,
    From20To30,
    Over30,
}

impl PriceBand {
    /// Returns `true` if `price` falls inside the band.
    #[must_use]
    pub const fn contains(self, price: Money) -> bool {
        let p = price.minor_units();
        match self {
            Self::Under10 => p < 1000,
            Self::From10To20 => p >= 1000 && p < 2000,
            Self::From20To30 => p >= 2000 && p < 3000,
            Self::Over30 => p >= 3000,
        }
    }
}

impl FromStr for PriceBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "under-10" => Ok(Self::Under10),
            "10-20" => Ok(Self::From10To20),
            "20-30" => Ok(Self::From20To30),
            "over-30" => Ok(Self::Over30),
            _ => Err(format!("invalid price band: {s}")),
        }
    }
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Name,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "name" => Ok(Self::Name),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}

/// Product listing filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
    pub category: Option<String>,
    /// Matches if the product material is any of these.
    pub materials: Vec<String>,
    /// Matches if the product has any of these tags.
    pub tags: Vec<String>,
    pub price_band: Option<PriceBand>,
}

impl ProductFilter {
    /// Returns `true` if `product` passes every active criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = self.search.as_deref().is_none_or(|query| {
            let query = query.to_lowercase();
            product.name.to_lowercase().contains(&query)
                || product.description.to_lowercase().contains(&query)
        });
        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|c| product.category == c);
        let matches_material = self.materials.is_empty()
            || product
                .material
                .as_ref()
                .is_some_and(|m| self.materials.contains(m));
        let matches_tags =
            self.tags.is_empty() || self.tags.iter().any(|tag| product.has_tag(tag));
        let matches_price = self.price_band.is_none_or(|band| band.contains(product.price));

        matches_search && matches_category && matches_material && matches_tags && matches_price
    }
}

/// The static product catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog; insertion order is the "featured" order.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products in featured order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Filter then sort the catalog.
    #[must_use]
    pub fn search(&self, filter: &ProductFilter, sort: SortOrder) -> Vec<&Product> {
        let mut found: Vec<&Product> = self.products.iter().filter(|p| filter.matches(p)).collect();
        match sort {
            SortOrder::Featured => {}
            SortOrder::PriceLow => found.sort_by_key(|p| p.price),
            SortOrder::PriceHigh => found.sort_by_key(|p| std::cmp::Reverse(p.price)),
            SortOrder::Name => found.sort_by_cached_key(|p| p.name.to_lowercase()),
        }
        found
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        distinct(self.products.iter().map(|p| p.category.as_str()))
    }

    /// Distinct materials in first-seen order.
    #[must_use]
    pub fn materials(&self) -> Vec<&str> {
        distinct(self.products.iter().filter_map(|p| p.material.as_deref()))
    }

    /// Distinct tags in first-seen order.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        distinct(
            self.products
                .iter()
                .flat_map(|p| p.tags.iter().map(String::as_str)),
        )
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn product(id: &str, price: i64, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_owned(),
            description: String::new(),
            price: Money::from_minor(price),
            compare_at_price: None,
            category: category.to_owned(),
            material: None,
            tags: Vec::new(),
            dimensions: None,
            weight_grams: None,
            stock_count: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::product;
    use super::*;

    fn catalog() -> Catalog {
        let mut mailer = product("eco-mailer-1", 1078, "Mailers & Envelopes");
        mailer.name = "Biodegradable Kraft Mailers".to_owned();
        mailer.material = Some("Recycled Paper".to_owned());
        mailer.tags = vec!["Biodegradable".to_owned(), "Plastic-Free".to_owned()];
        mailer.compare_at_price = Some(Money::from_minor(1327));

        let mut boxes = product("eco-box-1", 2074, "Boxes & Containers");
        boxes.name = "Corrugated Shipping Boxes".to_owned();
        boxes.material = Some("Recycled Cardboard".to_owned());
        boxes.tags = vec!["Recyclable".to_owned(), "Plastic-Free".to_owned()];
        boxes.stock_count = 3;

        let mut tape = product("eco-tape-1", 746, "Tape & Adhesives");
        tape.name = "Paper Packaging Tape".to_owned();
        tape.description = "Water-activated paper tape".to_owned();
        tape.stock_count = 0;

        Catalog::new(vec![mailer, boxes, tape])
    }

    #[test]
    fn test_stock_levels() {
        let c = catalog();
        let levels: Vec<_> = c.products().iter().map(Product::stock_level).collect();
        assert_eq!(
            levels,
            vec![StockLevel::InStock, StockLevel::LowStock(3), StockLevel::OutOfStock]
        );
        assert_eq!(StockLevel::LowStock(3).label(), "Only 3 left in stock!");
    }

    #[test]
    fn test_savings_percent() {
        let c = catalog();
        let mailer = c.get(&ProductId::new("eco-mailer-1"));
        assert_eq!(mailer.and_then(Product::savings_percent), Some(18));
        let boxes = c.get(&ProductId::new("eco-box-1"));
        assert_eq!(boxes.and_then(Product::savings_percent), None);
    }

    #[test]
    fn test_search_is_case_insensitive_over_description() {
        let c = catalog();
        let filter = ProductFilter {
            search: Some("WATER".to_owned()),
            ..ProductFilter::default()
        };
        let ids: Vec<_> = c
            .search(&filter, SortOrder::Featured)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["eco-tape-1"]);
    }

    #[test]
    fn test_tag_filter_is_any_of() {
        let c = catalog();
        let filter = ProductFilter {
            tags: vec!["Recyclable".to_owned(), "Biodegradable".to_owned()],
            ..ProductFilter::default()
        };
        assert_eq!(c.search(&filter, SortOrder::Featured).len(), 2);
    }

    #[test]
    fn test_material_filter_excludes_products_without_material() {
        let c = catalog();
        let filter = ProductFilter {
            materials: vec!["Recycled Paper".to_owned()],
            ..ProductFilter::default()
        };
        let found = c.search(&filter, SortOrder::Featured);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_price_bands() {
        assert!(PriceBand::Under10.contains(Money::from_minor(999)));
        assert!(!PriceBand::Under10.contains(Money::from_minor(1000)));
        assert!(PriceBand::From10To20.contains(Money::from_minor(1000)));
        assert!(PriceBand::From20To30.contains(Money::from_minor(2074)));
        assert!(PriceBand::Over30.contains(Money::from_minor(3000)));
        assert_eq!("10-20".parse::<PriceBand>(), Ok(PriceBand::From10To20));
    }

    #[test]
    fn test_sorting() {
        let c = catalog();
        let all = ProductFilter::default();
        let by_price: Vec<_> = c
            .search(&all, SortOrder::PriceLow)
            .iter()
            .map(|p| p.price.minor_units())
            .collect();
        assert_eq!(by_price, vec![746, 1078, 2074]);

        let by_price_desc: Vec<_> = c
            .search(&all, SortOrder::PriceHigh)
            .iter()
            .map(|p| p.price.minor_units())
            .collect();
        assert_eq!(by_price_desc, vec![2074, 1078, 746]);

        let by_name: Vec<_> = c
            .search(&all, SortOrder::Name)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            by_name,
            vec![
                "Biodegradable Kraft Mailers",
                "Corrugated Shipping Boxes",
                "Paper Packaging Tape"
            ]
        );
    }

    #[test]
    fn test_distinct_facets() {
        let c = catalog();
        assert_eq!(c.tags(), vec!["Biodegradable", "Plastic-Free", "Recyclable"]);
        assert_eq!(c.materials(), vec!["Recycled Paper", "Recycled Cardboard"]);
        assert_eq!(c.categories().len(), 3);
    }
}
