//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! grooveo catalog list --search mailer --material Kraft --price under-10
//! grooveo catalog show eco-box-1
//! ```

use clap::Subcommand;
use grooveo_core::ProductId;
use grooveo_core::catalog::{PriceBand, Product, ProductFilter, SortOrder};
use grooveo_storefront::{AppError, AppState, Result};

use super::report;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List products matching the filters
    List {
        /// Free-text search over name and description
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Material to include (repeatable)
        #[arg(short, long = "material")]
        materials: Vec<String>,

        /// Tag to include (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Price band (`under-10`, `10-20`, `20-30`, `over-30`)
        #[arg(short, long)]
        price: Option<PriceBand>,

        /// Sort order (`featured`, `price-low`, `price-high`, `name`)
        #[arg(long, default_value = "featured")]
        sort: SortOrder,
    },
    /// Show one product
    Show { id: String },
}

pub fn run(state: &AppState, action: CatalogAction) -> Result<()> {
    match action {
        CatalogAction::List {
            search,
            category,
            materials,
            tags,
            price,
            sort,
        } => {
            let filter = ProductFilter {
                search,
                category,
                materials,
                tags,
                price_band: price,
            };
            let products = state.catalog().search(&filter, sort);
            tracing::info!("{} of {} products", products.len(), state.catalog().products().len());
            for product in products {
                tracing::info!(
                    "  {:<14} {:<32} {:>8}  {}",
                    product.id.as_str(),
                    product.name,
                    product.price.to_string(),
                    product.stock_level().label()
                );
            }
        }
        CatalogAction::Show { id } => {
            let id = ProductId::new(id);
            let product = state
                .catalog()
                .get(&id)
                .ok_or_else(|| report(AppError::NotFound(format!("product {id}"))))?;
            show(product);
        }
    }
    Ok(())
}

fn show(product: &Product) {
    tracing::info!("{} ({})", product.name, product.id);
    tracing::info!("  {}", product.description);
    match (product.compare_at_price, product.savings_percent()) {
        (Some(was), Some(pct)) => {
            tracing::info!("  Price:    {} (was {was}, save {pct}%)", product.price);
        }
        _ => tracing::info!("  Price:    {}", product.price),
    }
    tracing::info!("  Category: {}", product.category);
    if let Some(material) = &product.material {
        tracing::info!("  Material: {material}");
    }
    if !product.tags.is_empty() {
        tracing::info!("  Tags:     {}", product.tags.join(", "));
    }
    if let Some(d) = &product.dimensions {
        tracing::info!(
            "  Size:     {} x {} x {} cm",
            d.width_cm,
            d.height_cm,
            d.depth_cm
        );
    }
    if let Some(grams) = product.weight_grams {
        tracing::info!("  Weight:   {grams} g");
    }
    tracing::info!("  Stock:    {}", product.stock_level().label());
}
