//! Cart commands. Every mutation round-trips through the backend; the
//! printed cart is always the refetched server snapshot.

use clap::Subcommand;

use superlian_client::{OrderTotals, Storefront};
use superlian_core::{Cart, CartItemAction, CartItemId, NewCartItem, ProductId};

use super::CliError;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the current cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        product: i32,

        /// Quantity
        #[arg(long, default_value_t = 1)]
        quantity: u32,

        /// Color variant
        #[arg(long, default_value = "")]
        color: String,

        /// Storage-size variant
        #[arg(long, default_value = "")]
        size: String,
    },
    /// Increment a cart line's quantity
    Inc {
        /// Cart-item ID
        item: i32,
    },
    /// Decrement a cart line's quantity
    Dec {
        /// Cart-item ID
        item: i32,
    },
    /// Remove a cart line
    Rm {
        /// Cart-item ID
        item: i32,
    },
    /// Remove every line from the cart
    Clear,
}

pub async fn run(store: &Storefront, action: CartAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CartAction::Show => {
            let cart = store.load_cart().await.map_err(CliError::Api)?;
            print_cart(&cart);
        }
        CartAction::Add {
            product,
            quantity,
            color,
            size,
        } => {
            let cart = store
                .add_to_cart(NewCartItem {
                    product: ProductId::new(product),
                    quantity,
                    color,
                    size,
                })
                .await
                .map_err(CliError::Api)?;
            print_cart(&cart);
        }
        CartAction::Inc { item } => {
            let cart = store
                .update_cart_item(CartItemId::new(item), CartItemAction::Increment)
                .await
                .map_err(CliError::Api)?;
            print_cart(&cart);
        }
        CartAction::Dec { item } => {
            let cart = store
                .update_cart_item(CartItemId::new(item), CartItemAction::Decrement)
                .await
                .map_err(CliError::Api)?;
            print_cart(&cart);
        }
        CartAction::Rm { item } => {
            let cart = store
                .remove_cart_item(CartItemId::new(item))
                .await
                .map_err(CliError::Api)?;
            print_cart(&cart);
        }
        CartAction::Clear => {
            store.clear_cart().await.map_err(CliError::Api)?;
            println!("Cart cleared.");
        }
    }
    Ok(())
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for item in &cart.items {
        let mut variant = String::new();
        if !item.color.is_empty() {
            variant.push_str(&format!(" {}", item.color));
        }
        if !item.size.is_empty() {
            variant.push_str(&format!(" {}", item.size));
        }
        println!(
            "[{id:>4}] {name}{variant} x{quantity} = ${total}",
            id = item.id,
            name = item.product_name,
            quantity = item.quantity,
            total = item.total_price,
        );
    }

    let totals = OrderTotals::from_subtotal(cart.total_price);
    println!("Subtotal: ${}", totals.subtotal);
    println!("Shipping: ${}", totals.shipping);
    println!("Tax:      ${}", totals.tax);
    println!("Total:    ${}", totals.total);
}
