mod cli;
mod ui;

use anyhow::{bail, Result};
use clap::Parser;
use colored::*;
use serde_json::json;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use cli::{Args, CacheCommand, Command, NotificationsCommand};
use tempshop::api::{account, auth, cart, catalog, shopkeeper};
use tempshop::cache::ResponseCache;
use tempshop::config::{AuthModeKind, Config, ConfigOverrides};
use tempshop::http::{AuthClient, ReqwestTransport};
use tempshop::notifications::NotificationLog;
use tempshop::storage::{FilesystemStore, KeyValueStore};

struct App {
    client: AuthClient,
    cache: ResponseCache,
    notifications: NotificationLog,
    shopkeeper: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let overrides = ConfigOverrides {
        api_url: args.api_url.clone(),
        auth_mode: args.auth_mode.clone(),
        storage_dir: args.storage_dir.clone(),
        verbose: args.verbose,
    };

    // Load configuration
    let config = match Config::from_env_and_args(&overrides) {
        Ok(config) => config,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            process::exit(1);
        }
    };

    if let Err(e) = tempshop::logging::init(&config.log_filter) {
        eprintln!("{}", format!("Warning: logging disabled: {}", e).dimmed());
    }

    if let Err(e) = run(args, config).await {
        ui::display_error(&format!("{:#}", e));
        process::exit(1);
    }
}

async fn run(args: Args, config: Config) -> Result<()> {
    debug!(api_url = %config.api_url, storage = %config.storage_dir.display(), "starting");

    let store: Arc<dyn KeyValueStore> = Arc::new(FilesystemStore::new(&config.storage_dir));
    let transport = Arc::new(ReqwestTransport::new(
        &config.api_url,
        Some(Duration::from_secs(config.timeout_secs)),
    )?);

    let client = if args.shopkeeper {
        AuthClient::shopkeeper(transport, store.clone())
    } else {
        match config.auth_mode {
            AuthModeKind::Cookie => AuthClient::customer_session(transport),
            AuthModeKind::Bearer => AuthClient::customer_bearer(transport, store.clone()),
        }
    };

    let app = App {
        client,
        cache: ResponseCache::new(store.clone()),
        notifications: NotificationLog::new(store),
        shopkeeper: args.shopkeeper,
    };

    execute(&app, args.command).await
}

async fn execute(app: &App, command: Command) -> Result<()> {
    let App {
        client,
        cache,
        notifications,
        shopkeeper: as_shopkeeper,
    } = app;

    match command {
        Command::Products => {
            let products = catalog::get_all_products(client, cache).await?;
            ui::display_listing("Products", &products);
        }
        Command::Product { id } => {
            let product = catalog::get_product_details(client, cache, id).await?;
            ui::display_value(&product);
        }
        Command::Categories => {
            let categories = catalog::get_all_categories(client, cache).await?;
            ui::display_listing("Categories", &categories);
        }
        Command::Home => {
            let (products, categories) = futures::try_join!(
                catalog::get_all_products(client, cache),
                catalog::get_all_categories(client, cache)
            )?;
            ui::display_listing("Categories", &categories);
            println!();
            ui::display_listing("Products", &products);
        }
        Command::Cart => {
            let cart = cart::get_cart(client).await?;
            ui::display_value(&cart);
        }
        Command::Add {
            product_id,
            quantity,
        } => {
            auth::csrf(client).await?;
            let cart = cart::add_to_cart(client, product_id, quantity).await?;
            notifications.add(
                "cart",
                "Added to cart",
                &format!("{} x product #{} added to your cart", quantity, product_id),
                Some("/cart"),
            )?;
            println!("{}", "Added to cart.".green());
            ui::display_value(&cart);
        }
        Command::Orders => {
            let orders = if *as_shopkeeper {
                shopkeeper::orders(client).await?
            } else {
                account::orders(client).await?
            };
            ui::display_value(&orders);
        }
        Command::Wishlist => {
            let wishlist = account::wishlist(client).await?;
            ui::display_value(&wishlist);
        }
        Command::Wallet => {
            let wallet = account::wallet(client).await?;
            ui::display_value(&wallet);
        }
        Command::Login { username, password } => {
            let credentials = json!({ "username": username, "password": password });
            if *as_shopkeeper {
                shopkeeper::login(client, credentials).await?;
            } else {
                auth::csrf(client).await?;
                auth::login(client, credentials).await?;
            }
            notifications.add("auth", "Signed in", &format!("Signed in as {}", username), None)?;
            println!("{}", format!("Logged in as {}.", username).green());
        }
        Command::Logout => {
            if *as_shopkeeper {
                shopkeeper::logout(client)?;
            } else {
                auth::csrf(client).await?;
                auth::logout(client).await?;
            }
            println!("{}", "Logged out.".green());
        }
        Command::Profile => {
            let profile = if *as_shopkeeper {
                shopkeeper::profile(client).await?
            } else {
                auth::profile(client).await?
            };
            ui::display_value(&profile);
        }
        Command::Dashboard => {
            if !*as_shopkeeper {
                bail!("The dashboard is only available with --shopkeeper");
            }
            let dashboard = shopkeeper::dashboard(client).await?;
            ui::display_value(&dashboard);
        }
        Command::Cache {
            action: CacheCommand::Clear { key },
        } => {
            cache.invalidate(key.as_deref())?;
            match key {
                Some(key) => println!("{}", format!("Cleared cache entry {}.", key).green()),
                None => println!("{}", "Cleared all cached responses.".green()),
            }
        }
        Command::Notifications { action } => match action.unwrap_or(NotificationsCommand::List) {
            NotificationsCommand::List => {
                let all = notifications.all();
                println!(
                    "{}",
                    format!("{} unread", notifications.unread_count()).dimmed()
                );
                ui::display_notifications(&all);
            }
            NotificationsCommand::ReadAll => {
                notifications.mark_all_as_read()?;
                println!("{}", "All notifications marked as read.".green());
            }
            NotificationsCommand::Clear => {
                notifications.clear()?;
                println!("{}", "Notifications cleared.".green());
            }
        },
    }

    Ok(())
}
