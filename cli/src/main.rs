//! Command-line front end for the marketplace client.
//!
//! Prints each response as pretty JSON on stdout. Logging goes to stderr and
//! is controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use market_core::{ClientConfig, Language, MarketClient, ProductLine, RequestDirection};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Access key for the marketplace account
    #[arg(short, long, env = "MARKET_API_KEY", hide_env_values = true)]
    key: String,

    /// Marketplace: dota2, csgo, tf2 or gifts
    #[arg(short, long, default_value = "dota2")]
    product: ProductLine,

    /// Override the marketplace base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Language of item descriptions: ru or en
    #[arg(long, default_value = "ru")]
    lang: Language,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the key works and show account status
    Test,
    /// Keep the account online for selling
    Ping,
    /// Show the account balance
    Balance,
    /// Show an item's description and offers
    ItemInfo { class_id: String, instance_id: String },
    /// Show an item's recent sales
    ItemHistory { class_id: String, instance_id: String },
    /// List items on the "my items" page
    Trades,
    /// List standing buy orders
    Orders,
    /// List items available for instant purchase
    QuickItems,
    /// Ask a bot to send (out) or take (in) items
    ItemRequest {
        #[arg(value_enum)]
        direction: Direction,
        bot_id: String,
    },
    /// Download the current price database
    PriceFeed {
        /// Print at most this many records
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Direction {
    In,
    Out,
}

impl From<Direction> for RequestDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::In => RequestDirection::In,
            Direction::Out => RequestDirection::Out,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::new(args.key, args.product).with_language(args.lang);
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    let client = MarketClient::connect(config).context("connecting to marketplace")?;
    tracing::info!(product = %client.product(), "connected");

    match args.command {
        Command::Test => print(&client.test()?),
        Command::Ping => print(&client.ping_pong()?),
        Command::Balance => print(&client.get_money()?),
        Command::ItemInfo { class_id, instance_id } => print(&client.item_info(&class_id, &instance_id)?),
        Command::ItemHistory { class_id, instance_id } => {
            print(&client.item_history(&class_id, &instance_id)?)
        }
        Command::Trades => print(&client.trades()?),
        Command::Orders => print(&client.get_orders()?),
        Command::QuickItems => print(&client.quick_items()?),
        Command::ItemRequest { direction, bot_id } => print(&client.item_request(direction.into(), &bot_id)?),
        Command::PriceFeed { limit } => {
            let current = client.item_db_current()?;
            let records = client
                .item_db(&current.db)
                .with_context(|| format!("reading price database {}", current.db))?;
            eprintln!("{} records in {}", records.len(), current.db);
            print(&records.iter().take(limit).collect::<Vec<_>>())
        }
    }
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
