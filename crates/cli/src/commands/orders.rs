//! Order history commands.

use superlian_client::Storefront;
use superlian_core::{Order, OrderId};

use super::CliError;

pub async fn run(store: &Storefront, id: Option<i32>) -> Result<(), Box<dyn std::error::Error>> {
    match id {
        Some(id) => {
            let order = store
                .fetch_order(OrderId::new(id))
                .await
                .map_err(CliError::Api)?;
            print_order(&order);
        }
        None => {
            let orders = store.load_orders().await.map_err(CliError::Api)?;
            if orders.is_empty() {
                println!("No orders yet.");
                return Ok(());
            }
            for order in &orders {
                println!(
                    "[{id:>4}] {placed} - {status:?} - ${total} ({lines} items)",
                    id = order.id,
                    placed = order.placed_at.format("%Y-%m-%d"),
                    status = order.status,
                    total = order.total_price,
                    lines = order.items.len(),
                );
            }
        }
    }
    Ok(())
}

fn print_order(order: &Order) {
    println!("Order #{}", order.id);
    println!("Placed:   {}", order.placed_at.format("%Y-%m-%d %H:%M"));
    println!("Status:   {:?}", order.status);
    println!("Payment:  {}", order.payment_method);
    println!("Ship to:  {}", order.shipping_address);
    println!("Bill to:  {}", order.billing_address);
    for item in &order.items {
        println!(
            "  {name} x{quantity} = ${total}",
            name = item.product_name,
            quantity = item.quantity,
            total = item.total_price,
        );
    }
    println!("Subtotal: ${}", order.total_price);
}
