use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use freshcart::application::checkout::CheckoutService;
use freshcart::application::engine::PricingEngine;
use freshcart::config::PricingConfig;
use freshcart::domain::cart::Cart;
use freshcart::domain::delivery::{DeliveryContext, FulfilmentMethod};
use freshcart::domain::ports::{
    CatalogStoreBox, ClockBox, FixedClock, RewardsLedger, RewardsLedgerBox, SystemClock,
};
use freshcart::infrastructure::in_memory::{InMemoryCatalogStore, InMemoryRewardsLedger};
use freshcart::interfaces::csv::cart_reader::CartReader;
use freshcart::interfaces::json::catalog_reader::read_catalog;
use freshcart::interfaces::json::report_writer::{CheckoutReport, ReportWriter};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Price a cart without committing anything
    Quote(OrderArgs),
    /// Price a cart and place the order, spending a free-delivery credit if one applies
    Checkout(OrderArgs),
}

#[derive(Args)]
struct OrderArgs {
    /// Product catalog JSON file
    #[arg(long)]
    catalog: PathBuf,

    /// Cart CSV file with `product_id, quantity` rows
    #[arg(long)]
    cart: PathBuf,

    /// `pickup` or `delivery`
    #[arg(long, default_value = "pickup")]
    fulfilment: FulfilmentMethod,

    /// Delivery postcode
    #[arg(long)]
    postcode: Option<String>,

    /// Free-delivery credits available to the customer
    #[arg(long, default_value_t = 0)]
    free_delivery_credits: u32,

    /// Evaluate at this local time (YYYY-MM-DDTHH:MM:SS) instead of now
    #[arg(long)]
    at: Option<NaiveDateTime>,

    /// Pricing config JSON (delivery tiers, postcodes, cutoff)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl OrderArgs {
    fn delivery_context(&self) -> DeliveryContext {
        DeliveryContext {
            method: self.fulfilment,
            postcode: self.postcode.clone(),
            has_free_delivery_credit: false,
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("freshcart=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

async fn build_service(args: &OrderArgs) -> Result<(CheckoutService, Cart)> {
    let config = match &args.config {
        Some(path) => PricingConfig::from_path(path).into_diagnostic()?,
        None => PricingConfig::default(),
    };
    let engine = PricingEngine::new(config).into_diagnostic()?;

    let records = read_catalog(File::open(&args.catalog).into_diagnostic()?).into_diagnostic()?;
    let catalog: CatalogStoreBox =
        Box::new(InMemoryCatalogStore::from_records(records).into_diagnostic()?);
    let ledger: RewardsLedgerBox =
        Box::new(InMemoryRewardsLedger::with_credits(args.free_delivery_credits));
    let clock: ClockBox = match args.at {
        Some(at) => Box::new(FixedClock(at)),
        None => Box::new(SystemClock),
    };
    let service = CheckoutService::new(engine, catalog, ledger, clock);

    // Build the cart
    let mut cart = Cart::new();
    let file = File::open(&args.cart).into_diagnostic()?;
    let reader = CartReader::new(file);
    for line_result in reader.lines() {
        match line_result {
            Ok(line) => {
                if let Err(e) = service
                    .add_to_cart(&mut cart, line.product_id, line.quantity)
                    .await
                {
                    warn!("Skipping cart line: {}", e);
                }
            }
            Err(e) => {
                warn!("Error reading cart line: {}", e);
            }
        }
    }
    info!(lines = cart.len(), "cart loaded");

    Ok((service, cart))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let report = match cli.command {
        Command::Quote(args) => {
            let (service, cart) = build_service(&args).await?;
            let preview = service
                .preview(&cart, &args.delivery_context())
                .await
                .into_diagnostic()?;
            CheckoutReport::quote(cart.items(), &preview)
        }
        Command::Checkout(args) => {
            let (service, mut cart) = build_service(&args).await?;
            let receipt = service
                .finalize(&mut cart, &args.delivery_context())
                .await
                .into_diagnostic()?;
            let remaining = service
                .ledger()
                .free_delivery_count()
                .await
                .into_diagnostic()?;
            CheckoutReport::order(&receipt, remaining)
        }
    };

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_report(&report).into_diagnostic()?;

    Ok(())
}
