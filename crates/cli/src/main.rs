//! Corner Shop CLI - browse the catalog, manage the cart, and check out.
//!
//! # Usage
//!
//! ```bash
//! # Browse in-stock electronics
//! corner-shop products list --category electronics --in-stock
//!
//! # Add two notebooks to the cart and review it
//! corner-shop cart add 3 -q 2
//! corner-shop cart show
//!
//! # Place the order
//! corner-shop checkout place --full-name "Jane Roe" --street-address "1 Elm St" \
//!     --city Springfield --state IL --postal-code 62701 --country USA \
//!     --email jane@example.com
//!
//! # Track an order
//! corner-shop orders track ORD-1234
//! ```
//!
//! Cart and checkout state persist under `STOREFRONT_DATA_DIR` between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use corner_shop_core::ShippingMethod;
use corner_shop_storefront::config::{ConfigError, StorefrontConfig};
use corner_shop_storefront::error::AppError;
use corner_shop_storefront::filter::ProductFilter;
use corner_shop_storefront::state::AppState;
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "corner-shop")]
#[command(author, version, about = "Corner Shop storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Shipping details and order placement
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
    /// Look up orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products matching the given filters
    List {
        /// Category id, or "all"
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Text to find in the name or description
        #[arg(short, long, default_value = "")]
        search: String,

        /// Minimum price in dollars
        #[arg(long, default_value = "0")]
        min_price: Decimal,

        /// Maximum price in dollars
        #[arg(long, default_value = "200")]
        max_price: Decimal,

        /// Only show products in stock
        #[arg(long)]
        in_stock: bool,
    },
    /// Show one product and related products
    Show {
        /// Product id
        id: String,
    },
    /// List featured products
    Featured,
    /// List categories
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and the order summary
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        id: String,

        /// Number of units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Set a line's quantity (zero or less removes it)
    Update {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove everything from the cart
    Clear,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Show saved shipping details
    Show,
    /// Set order notes
    Notes {
        /// Free-form notes for the order
        notes: String,
    },
    /// Choose a shipping method (`standard`, `express`)
    Method {
        method: String,
    },
    /// Clear saved shipping details
    Reset,
    /// Validate shipping details and place the order
    Place(commands::checkout::PlaceArgs),
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List sample orders
    List,
    /// Show an order's tracking timeline
    Track {
        /// Order id (e.g., ORD-1234)
        id: String,
    },
}

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Shopper mistakes are reported on the console only, never to Sentry.
    const fn is_user_error(&self) -> bool {
        match self {
            Self::App(e) => e.is_user_error(),
            Self::InvalidArgument(_) => true,
            Self::Config(_) => false,
        }
    }
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
            sample_rate: config.sentry_sample_rate,
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

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Sentry must be initialized before the tracing subscriber
    let config = StorefrontConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "corner_shop_cli=info,corner_shop_storefront=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false),
        )
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        match &e {
            CliError::App(app) => app.report(),
            _ if e.is_user_error() => tracing::info!("{e}"),
            _ => tracing::error!("Command failed: {e}"),
        }
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CliError> {
    let mut state = AppState::from_config(config)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List {
                category,
                search,
                min_price,
                max_price,
                in_stock,
            } => commands::products::list(
                &state,
                &ProductFilter {
                    category: category.into(),
                    search,
                    min_price,
                    max_price,
                    in_stock_only: in_stock,
                },
            ),
            ProductsAction::Show { id } => commands::products::show(&state, &id)?,
            ProductsAction::Featured => commands::products::featured(&state),
            ProductsAction::Categories => commands::products::categories(&state),
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { id, quantity } => commands::cart::add(&mut state, &id, quantity)?,
            CartAction::Remove { id } => commands::cart::remove(&mut state, &id),
            CartAction::Update { id, quantity } => {
                commands::cart::update(&mut state, &id, quantity);
            }
            CartAction::Clear => commands::cart::clear(&mut state),
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::Show => commands::checkout::show(&state),
            CheckoutAction::Notes { notes } => commands::checkout::notes(&mut state, notes),
            CheckoutAction::Method { method } => {
                let method = method
                    .parse::<ShippingMethod>()
                    .map_err(CliError::InvalidArgument)?;
                commands::checkout::method(&mut state, method);
            }
            CheckoutAction::Reset => commands::checkout::reset(&mut state),
            CheckoutAction::Place(args) => commands::checkout::place(&mut state, args).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&state),
            OrdersAction::Track { id } => commands::orders::track(&state, &id).await?,
        },
    }
    Ok(())
}
