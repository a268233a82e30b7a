//! Session commands: login, register, logout, whoami.

use clap::Subcommand;

use superlian_client::Storefront;

use super::CliError;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in and persist the session tokens
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create a new account
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Display username
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and clear all local state
    Logout,
    /// Show the signed-in user and profile
    Whoami,
}

pub async fn run(store: &Storefront, action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login { email, password } => {
            let user = store.login(&email, &password).await.map_err(CliError::Api)?;
            println!("Signed in as {} <{}>", user.username, user.email);
        }
        AuthAction::Register {
            email,
            username,
            password,
        } => {
            let user = store
                .register(&email, &username, &password)
                .await
                .map_err(CliError::Api)?;
            println!(
                "Account created for {} <{}>. Sign in with `sl-cli auth login`.",
                user.username, user.email
            );
        }
        AuthAction::Logout => {
            store.logout();
            println!("Signed out.");
        }
        AuthAction::Whoami => {
            if !store.session().is_authenticated() {
                println!("Not signed in.");
                return Ok(());
            }
            let user = store.fetch_current_user().await.map_err(CliError::Api)?;
            println!("{} <{}> (id {})", user.username, user.email, user.id);
            // The profile is optional until first checkout
            if let Ok(profile) = store.fetch_profile().await {
                println!("  name:     {} {}", profile.first_name, profile.last_name);
                println!("  phone:    {}", profile.phone_number);
                println!("  shipping: {}", profile.shipping_address);
                println!("  billing:  {}", profile.billing_address);
            }
        }
    }
    Ok(())
}
