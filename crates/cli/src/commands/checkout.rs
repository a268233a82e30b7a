//! Checkout command.
//!
//! Uses the profile's saved addresses unless new-address flags are given.
//! The card number is masked to its last four digits before it enters the
//! order payload; the CVV never leaves the process.

use clap::Args;

use superlian_client::{
    AddressChoice, AddressForm, CardDetails, CheckoutForm, PaymentMethod, Storefront,
};

use super::CliError;

#[derive(Args)]
pub struct CheckoutArgs {
    /// Payment method
    #[arg(long, default_value = "card")]
    pub payment: String,

    /// Card number (required when paying by card)
    #[arg(long)]
    pub card_number: Option<String>,

    /// Card expiry, MM/YY
    #[arg(long)]
    pub expiry: Option<String>,

    /// Card security code
    #[arg(long)]
    pub cvv: Option<String>,

    /// New shipping address instead of the saved one, as
    /// "line1,city,state,postal,country"
    #[arg(long)]
    pub ship_to: Option<String>,

    /// New billing address instead of the saved one, same format
    #[arg(long)]
    pub bill_to: Option<String>,
}

pub async fn run(store: &Storefront, args: &CheckoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Saved addresses live on the profile; load it before resolving
    if store.session().profile().is_none() {
        let _ = store.fetch_profile().await;
    }
    // Checkout works from the stored snapshot
    store.load_cart().await.map_err(CliError::Api)?;

    let payment_method = match args.payment.as_str() {
        "card" => PaymentMethod::Card,
        "paypal" => PaymentMethod::Paypal,
        other => return Err(format!("unknown payment method: {other}").into()),
    };

    let card = match (&args.card_number, &args.expiry, &args.cvv) {
        (Some(card_number), Some(expiry), Some(cvv)) => Some(CardDetails {
            card_number: card_number.clone(),
            expiry: expiry.clone(),
            cvv: cvv.clone(),
        }),
        _ => None,
    };

    let form = CheckoutForm {
        shipping: address_choice(args.ship_to.as_deref()),
        billing: address_choice(args.bill_to.as_deref()),
        payment_method,
        card,
    };

    let order = store.place_order(&form).await.map_err(CliError::Api)?;
    println!("Order #{} placed.", order.id);
    Ok(())
}

/// Parse "line1,city,state,postal,country" into a new-address choice.
fn address_choice(raw: Option<&str>) -> AddressChoice {
    raw.map_or(AddressChoice::Saved, |raw| {
        let mut parts = raw.split(',').map(str::trim);
        AddressChoice::New(AddressForm {
            full_name: String::new(),
            address_line1: parts.next().unwrap_or_default().to_owned(),
            city: parts.next().unwrap_or_default().to_owned(),
            state: parts.next().unwrap_or_default().to_owned(),
            postal_code: parts.next().unwrap_or_default().to_owned(),
            country: parts.next().unwrap_or_default().to_owned(),
        })
    })
}
