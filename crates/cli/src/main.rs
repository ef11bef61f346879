//! Shopfront CLI - a command-line storefront.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart reconciled against live products
//! shopfront cart show
//!
//! # Add two units of a product
//! shopfront cart add 665f1c 2
//!
//! # Adjust a line
//! shopfront cart inc 665f1c
//! shopfront cart set 665f1c 0 --yes
//!
//! # Create a product (needs an admin identity)
//! shopfront product create -n Lamp -d "A lamp" -p 19.90 -s 4 -c cat-1
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and change the cart
//! - `product` - Show or create products
//! - `categories` - List product categories
//! - `popup` - Show the pending popup message, once

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopfront_storefront::config::StorefrontConfig;
use shopfront_storefront::error::AppError;
use shopfront_storefront::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront command-line storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show or create products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// List product categories
    Categories,
    /// Show the pending popup message and clear it
    Popup,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show line items and the total
    Show,
    /// Add units of a product
    Add {
        /// Product id
        id: String,
        /// Units to add
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    /// Raise a line's quantity by one, up to stock
    Inc { id: String },
    /// Lower a line's quantity by one, never below 1
    Dec { id: String },
    /// Set a line's quantity, clamped to stock
    Set {
        id: String,
        quantity: u32,
        /// Confirm removal when the quantity is 0
        #[arg(long)]
        yes: bool,
    },
    /// Remove a line
    Remove { id: String },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Show one product
    Show { id: String },
    /// Create a product
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        description: String,

        /// Price as a decimal amount
        #[arg(short, long)]
        price: String,

        /// Units in stock
        #[arg(short, long)]
        stock: String,

        /// Category id
        #[arg(short, long)]
        category: String,

        /// Hosted image URL (repeatable, at most 5)
        #[arg(short, long = "image")]
        images: Vec<String>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_storefront=info,shopfront_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            AppError::from(e).report();
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result = match AppState::new(&config) {
        Ok(state) => run(cli, &state).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        e.report();
        std::process::exit(1);
    }
}

async fn run(cli: Cli, state: &AppState) -> Result<(), AppError> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state).await?,
            CartAction::Add { id, quantity } => commands::cart::add(state, &id, quantity).await?,
            CartAction::Inc { id } => commands::cart::increment(state, &id).await?,
            CartAction::Dec { id } => commands::cart::decrement(state, &id)?,
            CartAction::Set { id, quantity, yes } => {
                commands::cart::set(state, &id, quantity, yes).await?;
            }
            CartAction::Remove { id } => commands::cart::remove(state, &id)?,
        },
        Commands::Product { action } => match action {
            ProductAction::Show { id } => commands::product::show(state, &id).await?,
            ProductAction::Create {
                name,
                description,
                price,
                stock,
                category,
                images,
            } => {
                let form = shopfront_storefront::admin::NewProductForm {
                    name,
                    description,
                    price,
                    stock,
                    category,
                    image_urls: images,
                };
                commands::product::create(state, &form).await?;
            }
        },
        Commands::Categories => commands::product::categories(state).await?,
        Commands::Popup => commands::popup::show(state),
    }
    Ok(())
}
