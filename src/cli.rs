use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tempshop")]
#[command(about = "Command-line client for the TempShop marketplace API", long_about = None)]
pub struct Args {
    #[arg(
        long = "api-url",
        global = true,
        help = "API base URL (e.g., http://127.0.0.1:8000/api)"
    )]
    pub api_url: Option<String>,

    #[arg(
        long = "auth-mode",
        global = true,
        help = "Customer authentication: cookie or bearer"
    )]
    pub auth_mode: Option<String>,

    #[arg(
        long = "storage-dir",
        global = true,
        help = "Directory holding tokens, cached responses and notifications"
    )]
    pub storage_dir: Option<PathBuf>,

    #[arg(
        short = 's',
        long = "shopkeeper",
        global = true,
        help = "Act as the shopkeeper (seller) instead of the customer"
    )]
    pub shopkeeper: bool,

    #[arg(short = 'v', long = "verbose", global = true, help = "Log debug output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all products (cached for 30 minutes)
    Products,
    /// Show one product (cached for 30 minutes)
    Product { id: u64 },
    /// List categories (cached for 30 minutes)
    Categories,
    /// Fetch products and categories together
    Home,
    /// Show the cart
    Cart,
    /// Add a product to the cart
    Add {
        product_id: u64,
        #[arg(short = 'q', long = "quantity", default_value_t = 1)]
        quantity: u32,
    },
    /// Show order history (shopkeeper: incoming orders)
    Orders,
    /// Show the wishlist
    Wishlist,
    /// Show the wallet
    Wallet,
    /// Log in and store the returned credentials
    Login {
        #[arg(short = 'u', long = "username")]
        username: String,
        #[arg(short = 'p', long = "password")]
        password: String,
    },
    /// Log out and forget stored credentials
    Logout,
    /// Show the signed-in profile
    Profile,
    /// Shopkeeper sales dashboard
    Dashboard,
    /// Manage the local response cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
    /// Show or manage in-app notifications
    Notifications {
        #[command(subcommand)]
        action: Option<NotificationsCommand>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Drop one cached entry, or all of them
    Clear {
        #[arg(long = "key", help = "Only this cache key")]
        key: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotificationsCommand {
    List,
    ReadAll,
    Clear,
}
