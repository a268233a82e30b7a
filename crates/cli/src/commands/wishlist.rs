//! Wishlist commands.

use clap::Subcommand;

use superlian_client::Storefront;
use superlian_core::ProductId;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Toggle a product in the wishlist
    Toggle {
        /// Product ID
        product: i32,
    },
    /// Empty the wishlist
    Clear,
}

pub async fn run(
    store: &Storefront,
    action: Option<WishlistAction>,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        None => {
            let items = store.wishlist().items();
            if items.is_empty() {
                println!("Wishlist is empty.");
                return Ok(());
            }
            // Resolve names where the product is fetchable; fall back to IDs
            for id in items {
                match store.fetch_product(id).await {
                    Ok(product) => println!("[{id:>4}] {} - ${}", product.name, product.price),
                    Err(_) => println!("[{id:>4}] (unavailable)"),
                }
            }
        }
        Some(WishlistAction::Toggle { product }) => {
            let id = ProductId::new(product);
            if store.wishlist().toggle(id) {
                println!("Added product {id} to the wishlist.");
            } else {
                println!("Removed product {id} from the wishlist.");
            }
        }
        Some(WishlistAction::Clear) => {
            store.wishlist().clear();
            println!("Wishlist cleared.");
        }
    }
    Ok(())
}
