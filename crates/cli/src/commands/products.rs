//! Catalog browsing with filters and pagination.

use clap::Args;

use superlian_client::{FilterCriteria, Storefront, derive_page};
use superlian_core::Product;

use super::CliError;

#[derive(Args)]
pub struct ProductsArgs {
    /// Search by name or brand (case-insensitive substring)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category filter ("Phones" and "Accessories" match their sub-categories)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Restrict to these colors (repeatable; default: all in-stock colors)
    #[arg(long)]
    pub color: Vec<String>,

    /// Restrict to these storage sizes (repeatable; default: all)
    #[arg(long)]
    pub storage: Vec<String>,

    /// Page index (0-based)
    #[arg(short, long, default_value_t = 0)]
    pub page: usize,
}

pub async fn list(
    store: &Storefront,
    args: &ProductsArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let products = store.load_products().await.map_err(CliError::Api)?;

    let mut criteria = criteria_for(&products, args);
    criteria.set_page(args.page);

    let page = derive_page(&products, &criteria);
    if page.total == 0 {
        println!("No products found.");
        return Ok(());
    }

    for product in &page.items {
        let marker = if store.wishlist().contains(product.id) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} [{id:>4}] {name} - {brand} - {category} - ${price} ({stock} in stock)",
            id = product.id,
            name = product.name,
            brand = product.brand,
            category = product.category,
            price = product.price,
            stock = product.stock,
        );
    }
    println!(
        "Page {} of {} ({} products)",
        page.page + 1,
        page.page_count,
        page.total
    );
    Ok(())
}

pub async fn categories(store: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let categories = store.load_categories().await.map_err(CliError::Api)?;
    if categories.is_empty() {
        println!("No categories.");
        return Ok(());
    }
    for category in categories {
        println!("[{:>3}] {}", category.id, category.name);
    }
    Ok(())
}

/// Build criteria from the flags. With no explicit color/storage flags every
/// option offered by the catalog counts as selected, the way the product
/// listing starts out.
fn criteria_for(products: &[Product], args: &ProductsArgs) -> FilterCriteria {
    let colors: Vec<String> = if args.color.is_empty() {
        distinct(products.iter().flat_map(|p| p.colors.iter().map(|c| c.color.clone())))
    } else {
        args.color.clone()
    };
    let storages: Vec<String> = if args.storage.is_empty() {
        distinct(products.iter().flat_map(|p| p.storage.iter().map(|s| s.size.clone())))
    } else {
        args.storage.clone()
    };

    let mut criteria = FilterCriteria::with_options(&colors, &storages);
    if let Some(search) = &args.search {
        criteria.set_search(search.clone());
    }
    if let Some(category) = &args.category {
        criteria.set_category(category.clone());
    }
    criteria
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        let value = value.to_lowercase();
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
