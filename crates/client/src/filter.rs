//! Filter/pagination engine.
//!
//! Pure derivation from `(products, criteria)` to the visible page. The
//! engine never reorders products and never touches the network; it re-runs
//! synchronously whenever criteria or the catalog change, so a page index is
//! never shown against a result set it was not computed from.

use std::collections::BTreeSet;

use superlian_core::Product;

/// Products shown per page.
pub const PRODUCTS_PER_PAGE: usize = 8;

/// Sub-categories rolled up under the "Accessories" filter.
const ACCESSORY_SUBCATEGORIES: &[&str] = &[
    "Bluetooth Speakers",
    "Headphones",
    "Wireless Earbuds",
    "Smartwatches",
    "Screen Protectors",
    "Phone Cases",
    "Chargers & Cables",
    "Power Banks",
    "Accessories",
    "Wearables",
];

/// Sub-categories rolled up under the "Phones" filter.
const PHONE_SUBCATEGORIES: &[&str] = &[
    "Budget Phones",
    "Flagship Phones",
    "Gaming Phones",
    "Tablets",
];

/// Strip everything from a raw search string except alphanumerics,
/// whitespace, and `- _ . , '`.
#[must_use]
pub fn sanitize_search_query(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(c, '-' | '_' | '.' | ',' | '\'')
        })
        .collect::<String>()
        .trim()
        .to_owned()
}

/// User-selected filter criteria. Ephemeral - never persisted.
///
/// Invariant: `page` resets to 0 whenever any other field changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    search_query: String,
    category: String,
    colors: BTreeSet<String>,
    storages: BTreeSet<String>,
    page: usize,
}

impl FilterCriteria {
    /// Empty criteria: everything matches, page 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria with every offered color/storage option pre-selected, the
    /// way the product listing starts out.
    #[must_use]
    pub fn with_options<S: AsRef<str>>(colors: &[S], storages: &[S]) -> Self {
        Self {
            colors: colors.iter().map(|c| c.as_ref().to_lowercase()).collect(),
            storages: storages.iter().map(|s| s.as_ref().to_lowercase()).collect(),
            ..Self::default()
        }
    }

    /// Set the search query, resetting the page if the query changed.
    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.search_query {
            self.search_query = query;
            self.page = 0;
        }
    }

    /// Set the selected category (empty string = all), resetting the page if
    /// it changed.
    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if category != self.category {
            self.category = category;
            self.page = 0;
        }
    }

    /// Toggle a color selection; returns whether it is selected afterwards.
    /// Resets the page.
    pub fn toggle_color(&mut self, color: &str) -> bool {
        let color = color.to_lowercase();
        self.page = 0;
        if self.colors.remove(&color) {
            false
        } else {
            self.colors.insert(color);
            true
        }
    }

    /// Toggle a storage-size selection; returns whether it is selected
    /// afterwards. Resets the page.
    pub fn toggle_storage(&mut self, storage: &str) -> bool {
        let storage = storage.to_lowercase();
        self.page = 0;
        if self.storages.remove(&storage) {
            false
        } else {
            self.storages.insert(storage);
            true
        }
    }

    /// Jump to a page. The only mutator that does not reset the page; the
    /// engine clamps out-of-range values at derivation time.
    pub const fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Current search query.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Current category ("" = all).
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Currently selected colors (lowercased).
    #[must_use]
    pub const fn colors(&self) -> &BTreeSet<String> {
        &self.colors
    }

    /// Currently selected storage sizes (lowercased).
    #[must_use]
    pub const fn storages(&self) -> &BTreeSet<String> {
        &self.storages
    }

    /// Requested page index (unclamped).
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Whether a product passes all four rules.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && self.matches_category(product)
            && self.matches_colors(product)
            && self.matches_storages(product)
    }

    fn matches_search(&self, product: &Product) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let query = self.search_query.to_lowercase();
        product.name.to_lowercase().contains(&query)
            || product.brand.to_lowercase().contains(&query)
    }

    fn matches_category(&self, product: &Product) -> bool {
        match self.category.as_str() {
            "" => true,
            "Accessories" => ACCESSORY_SUBCATEGORIES.contains(&product.category.as_str()),
            "Phones" => PHONE_SUBCATEGORIES.contains(&product.category.as_str()),
            other => product.category == other,
        }
    }

    fn matches_colors(&self, product: &Product) -> bool {
        let available: Vec<String> = product
            .colors
            .iter()
            .filter(|c| c.in_stock)
            .map(|c| c.color.to_lowercase())
            .collect();
        // A product with no in-stock colors is unconstrained by this rule
        if available.is_empty() {
            return true;
        }
        self.colors.iter().any(|color| available.contains(color))
    }

    fn matches_storages(&self, product: &Product) -> bool {
        let available: Vec<String> = product
            .storage
            .iter()
            .filter(|s| s.in_stock)
            .map(|s| s.size.to_lowercase())
            .collect();
        if available.is_empty() {
            return true;
        }
        self.storages.iter().any(|size| available.contains(size))
    }
}

/// Filter `products` by `criteria`, preserving source order.
///
/// Deterministic: identical inputs always yield the same list of references
/// in the same order.
#[must_use]
pub fn derive<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
    products.iter().filter(|p| criteria.matches(p)).collect()
}

/// One visible page of filtered products.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage<'a> {
    /// The products on this page, in source order.
    pub items: Vec<&'a Product>,
    /// Effective page index after clamping.
    pub page: usize,
    /// Total number of pages (0 when nothing matched).
    pub page_count: usize,
    /// Total number of products that matched the criteria.
    pub total: usize,
}

/// Filter and slice one page, clamping the requested page index into
/// `[0, page_count - 1]`.
#[must_use]
pub fn derive_page<'a>(products: &'a [Product], criteria: &FilterCriteria) -> ProductPage<'a> {
    let filtered = derive(products, criteria);
    let total = filtered.len();
    let page_count = total.div_ceil(PRODUCTS_PER_PAGE);
    let page = if page_count == 0 {
        0
    } else {
        criteria.page().min(page_count - 1)
    };

    let items = filtered
        .into_iter()
        .skip(page * PRODUCTS_PER_PAGE)
        .take(PRODUCTS_PER_PAGE)
        .collect();

    ProductPage {
        items,
        page,
        page_count,
        total,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use superlian_core::{ColorOption, ProductId, StorageOption};

    use super::*;

    fn product(id: i32, name: &str, brand: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            brand: brand.to_owned(),
            category: category.to_owned(),
            description: String::new(),
            image: String::new(),
            price: Decimal::new(99_900, 2),
            stock: 10,
            colors: vec![],
            storage: vec![],
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn with_colors(mut p: Product, colors: &[(&str, bool)]) -> Product {
        p.colors = colors
            .iter()
            .map(|(color, in_stock)| ColorOption {
                color: (*color).to_owned(),
                in_stock: *in_stock,
            })
            .collect();
        p
    }

    fn with_storage(mut p: Product, sizes: &[(&str, bool)]) -> Product {
        p.storage = sizes
            .iter()
            .map(|(size, in_stock)| StorageOption {
                size: (*size).to_owned(),
                in_stock: *in_stock,
            })
            .collect();
        p
    }

    #[test]
    fn test_search_matches_name_or_brand_case_insensitive() {
        let products = vec![
            product(1, "iPhone Case", "Generic", "Phone Cases"),
            product(2, "Charger", "CaseTech", "Chargers & Cables"),
            product(3, "Charger", "Volt", "Chargers & Cables"),
        ];
        let mut criteria = FilterCriteria::new();
        criteria.set_search("case");

        let ids: Vec<i32> = derive(&products, &criteria)
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_category_grouping_tables() {
        let products = vec![
            product(1, "ROG Phone", "Asus", "Gaming Phones"),
            product(2, "Pixel", "Google", "Flagship Phones"),
            product(3, "Buds", "Samsung", "Wireless Earbuds"),
        ];

        let mut criteria = FilterCriteria::new();
        criteria.set_category("Phones");
        assert_eq!(derive(&products, &criteria).len(), 2);

        criteria.set_category("Accessories");
        assert_eq!(derive(&products, &criteria).len(), 1);

        // Any other non-empty category requires exact equality
        criteria.set_category("Gaming Phones");
        assert_eq!(derive(&products, &criteria).len(), 1);

        criteria.set_category("");
        assert_eq!(derive(&products, &criteria).len(), 3);
    }

    #[test]
    fn test_product_without_in_stock_colors_is_unconstrained() {
        let sold_out = with_colors(
            product(1, "Watch", "Acme", "Smartwatches"),
            &[("black", false)],
        );
        let no_colors = product(2, "Cable", "Acme", "Chargers & Cables");
        let stocked = with_colors(
            product(3, "Phone", "Acme", "Budget Phones"),
            &[("gold", true)],
        );
        let products = vec![sold_out, no_colors, stocked];

        let criteria = FilterCriteria::with_options(&["black", "white"], &[]);
        let ids: Vec<i32> = derive(&products, &criteria)
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        // "gold" is not selected, so product 3 drops; 1 and 2 have no
        // in-stock colors and pass
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_storage_rule_mirrors_color_rule() {
        let small = with_storage(
            product(1, "Phone", "Acme", "Budget Phones"),
            &[("64gb", true)],
        );
        let big = with_storage(
            product(2, "Phone Pro", "Acme", "Flagship Phones"),
            &[("1tb", true)],
        );
        let products = vec![small, big];

        let criteria = FilterCriteria::with_options(&[], &["64gb", "128gb"]);
        let ids: Vec<i32> = derive(&products, &criteria)
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_filtering_preserves_source_order_and_is_deterministic() {
        let products: Vec<Product> = (0..20)
            .map(|i| product(i, &format!("Phone {i}"), "Acme", "Budget Phones"))
            .collect();
        let criteria = FilterCriteria::new();

        let first: Vec<i32> = derive(&products, &criteria)
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        let second: Vec<i32> = derive(&products, &criteria)
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(first, second);
        assert_eq!(first, (0..20).collect::<Vec<i32>>());
    }

    #[test]
    fn test_every_criteria_change_resets_page() {
        let mut criteria = FilterCriteria::new();

        criteria.set_page(3);
        criteria.set_search("case");
        assert_eq!(criteria.page(), 0);

        criteria.set_page(3);
        criteria.set_category("Phones");
        assert_eq!(criteria.page(), 0);

        criteria.set_page(3);
        criteria.toggle_color("black");
        assert_eq!(criteria.page(), 0);

        criteria.set_page(3);
        criteria.toggle_storage("64gb");
        assert_eq!(criteria.page(), 0);

        // An unchanged value is not a change
        criteria.set_page(3);
        criteria.set_search("case");
        assert_eq!(criteria.page(), 3);
    }

    #[test]
    fn test_pagination_slices_and_clamps() {
        let products: Vec<Product> = (0..20)
            .map(|i| product(i, &format!("Phone {i}"), "Acme", "Budget Phones"))
            .collect();
        let mut criteria = FilterCriteria::new();

        let page = derive_page(&products, &criteria);
        assert_eq!(page.total, 20);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.items.len(), PRODUCTS_PER_PAGE);
        assert_eq!(page.items[0].id.as_i32(), 0);

        criteria.set_page(2);
        let page = derive_page(&products, &criteria);
        assert_eq!(page.items.len(), 4);
        assert_eq!(page.items[0].id.as_i32(), 16);

        // Out of range clamps to the last page
        criteria.set_page(99);
        let page = derive_page(&products, &criteria);
        assert_eq!(page.page, 2);
        assert_eq!(page.items[0].id.as_i32(), 16);
    }

    #[test]
    fn test_empty_result_set_is_a_value_not_an_error() {
        let products = vec![product(1, "Phone", "Acme", "Budget Phones")];
        let mut criteria = FilterCriteria::new();
        criteria.set_search("zzzz");
        criteria.set_page(7);

        let page = derive_page(&products, &criteria);
        assert_eq!(page.total, 0);
        assert_eq!(page.page_count, 0);
        assert_eq!(page.page, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_sanitize_search_query() {
        assert_eq!(sanitize_search_query("  iphone 15  "), "iphone 15");
        assert_eq!(
            sanitize_search_query("<script>alert('x')</script>case"),
            "scriptalert'x'scriptcase"
        );
        assert_eq!(sanitize_search_query("o'neill-case_2.0,b"), "o'neill-case_2.0,b");
    }
}
