use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use jemallocator::Jemalloc;
use log::{error, info, warn, LevelFilter};
use simple_logger::SimpleLogger;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use onchain_monitor::{
    config::{validate_chain, DEFAULT_CHAIN},
    snapshot::{build_snapshot, diff, retained_addresses, JsonFileStore, SnapshotStore},
    utils::{format_balance, short_address},
    AnkrClient, HttpGateway, Settings,
};

/// Token holder analytics over the Ankr multichain API.
#[derive(Parser)]
#[command(name = "onchain-monitor", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Basic token info: metadata, price and the top 5 holders (fast)
    Basic {
        contract: String,
        #[arg(default_value = DEFAULT_CHAIN)]
        chain: String,
    },
    /// Show the top holders from a single page
    Holders {
        contract: String,
        #[arg(default_value = DEFAULT_CHAIN)]
        chain: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Collect every holder and save a snapshot (slow)
    Snapshot {
        contract: String,
        #[arg(default_value = DEFAULT_CHAIN)]
        chain: String,
    },
    /// Show the token price in USD
    Price {
        contract: String,
        #[arg(default_value = DEFAULT_CHAIN)]
        chain: String,
    },
    /// Compare two saved snapshots
    Compare {
        old: PathBuf,
        new: PathBuf,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show token balances held by a wallet
    Balance {
        wallet: String,
        #[arg(default_value = DEFAULT_CHAIN)]
        chain: String,
        #[arg(long)]
        only_whitelisted: bool,
    },
    /// Show recent token transfers for an address
    Transfers {
        address: String,
        #[arg(default_value = DEFAULT_CHAIN)]
        chain: String,
        #[arg(long)]
        contract: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

#[tokio::main()]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::new().context("Failed to load configuration")?;

    let level = LevelFilter::from_str(&settings.logging.level).unwrap_or(LevelFilter::Info);
    SimpleLogger::new()
        .with_level(level)
        .with_module_level("hyper_util", LevelFilter::Warn)
        .with_module_level("reqwest", LevelFilter::Warn)
        .init()
        .context("Failed to initialize logger")?;

    if let Err(e) = run(cli.command, &settings).await {
        error!("Command failed: {:#}", e);
        eprintln!("\n  Error: {:#}\n", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Command, settings: &Settings) -> Result<()> {
    let client = AnkrClient::from_settings(&settings.ankr).context("Failed to create Ankr client")?;

    match command {
        Command::Basic { contract, chain } => {
            check_target(&contract, &chain)?;
            cmd_basic(&client, &contract, &chain).await
        },
        Command::Holders {
            contract,
            chain,
            limit,
        } => {
            check_target(&contract, &chain)?;
            cmd_holders(&client, &contract, &chain, limit).await
        },
        Command::Snapshot { contract, chain } => {
            check_target(&contract, &chain)?;
            let store = JsonFileStore::new(&settings.snapshots.dir);
            cmd_snapshot(&client, &store, &contract, &chain).await
        },
        Command::Price { contract, chain } => {
            check_target(&contract, &chain)?;
            cmd_price(&client, &contract, &chain).await
        },
        Command::Compare { old, new, limit } => {
            let store = JsonFileStore::new(&settings.snapshots.dir);
            cmd_compare(&store, &old, &new, limit)
        },
        Command::Balance {
            wallet,
            chain,
            only_whitelisted,
        } => {
            check_target(&wallet, &chain)?;
            cmd_balance(&client, &wallet, &chain, only_whitelisted).await
        },
        Command::Transfers {
            address,
            chain,
            contract,
            limit,
        } => {
            check_target(&address, &chain)?;
            if let Some(contract) = &contract {
                check_address(contract)?;
            }
            cmd_transfers(&client, &address, &chain, contract.as_deref(), limit).await
        },
    }
}

fn check_address(address: &str) -> Result<()> {
    Address::from_str(address)
        .map(|_| ())
        .with_context(|| format!("Invalid address '{}'", address))
}

fn check_target(address: &str, chain: &str) -> Result<()> {
    check_address(address)?;
    validate_chain(chain)?;
    info!("Target {} on {}", address, chain);
    Ok(())
}

fn print_header(command: &str, token_name: Option<&str>) {
    println!();
    println!("{}", "=".repeat(80));
    match token_name {
        Some(name) => println!("  ON-CHAIN MONITOR - {} | {}", command, name),
        None => println!("  ON-CHAIN MONITOR - {}", command),
    }
    println!("{}", "=".repeat(80));
    println!();
    println!("  Started: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!();
    println!("{}", "-".repeat(80));
}

fn print_footer() {
    println!("{}", "-".repeat(80));
    println!("  Completed: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("{}", "=".repeat(80));
    println!();
}

/// "Name (SYMBOL)" when the token is listed, otherwise a truncated contract.
async fn display_name(client: &AnkrClient<HttpGateway>, contract: &str, chain: &str) -> String {
    match client.token_metadata(contract, chain).await {
        Ok(Some(metadata)) => metadata.display_name(),
        Ok(None) => short_address(contract, 20),
        Err(e) => {
            warn!("Could not fetch token metadata: {}", e);
            short_address(contract, 20)
        },
    }
}

async fn cmd_basic(client: &AnkrClient<HttpGateway>, contract: &str, chain: &str) -> Result<()> {
    print_header(&format!("Token Info ({})", chain), None);
    println!("  Contract: {}", contract);
    println!();

    if let Some(metadata) = client.token_metadata(contract, chain).await? {
        println!("  Name: {}", metadata.name);
        println!("  Symbol: {}", metadata.symbol);
        println!("  Decimals: {}", metadata.decimals);
    }

    match client.token_price(contract, chain).await {
        Ok(price) if price > 0.0 => println!("  Price: ${:.6}", price),
        Ok(_) => println!("  Price: Not available"),
        Err(e) => {
            warn!("Could not fetch token price: {}", e);
            println!("  Price: Not available");
        },
    }

    let page = client.holders_page(contract, chain, 5, None).await?;
    if !page.holders.is_empty() {
        println!();
        println!("  Top 5 Holders:");
        for (i, holder) in page.holders.iter().take(5).enumerate() {
            let label = if holder.label.is_empty() {
                String::new()
            } else {
                format!(" ({})", holder.label)
            };
            println!(
                "    {}. {} {}{}",
                i + 1,
                short_address(&holder.address, 20),
                format_balance(&holder.balance, 0),
                label
            );
        }
    }

    print_footer();
    Ok(())
}

async fn cmd_holders(
    client: &AnkrClient<HttpGateway>,
    contract: &str,
    chain: &str,
    limit: u32,
) -> Result<()> {
    let token_name = display_name(client, contract, chain).await;
    print_header(&format!("Top Holders ({})", chain), Some(&token_name));
    println!("  Contract: {}", contract);
    println!();

    let page = client.holders_page(contract, chain, limit, None).await?;
    let price = client.token_price(contract, chain).await.ok();

    let mut table = Table::new();
    table.set_header(vec!["#", "Address", "Balance", "Label"]);
    for (i, holder) in page.holders.iter().take(limit as usize).enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            holder.address.clone(),
            format_balance(&holder.balance, 2),
            holder.label.clone(),
        ]);
    }
    println!("{table}");

    if let Some(price) = price.filter(|p| *p > 0.0) {
        println!();
        println!("  Token price: ${:.6}", price);
    }

    print_footer();
    Ok(())
}

async fn cmd_snapshot(
    client: &AnkrClient<HttpGateway>,
    store: &JsonFileStore,
    contract: &str,
    chain: &str,
) -> Result<()> {
    let token_name = display_name(client, contract, chain).await;
    print_header(&format!("Holder Snapshot ({})", chain), Some(&token_name));
    println!("  Contract: {}", contract);
    println!("  Chain: {}", chain);
    println!();

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(120));

    let mut report = |count: usize| spinner.set_message(format!("Fetched {} holders...", count));
    let result = build_snapshot(client, store, contract, chain, Some(&mut report)).await;
    spinner.finish_and_clear();

    let (snapshot, path) = result.context("Snapshot failed")?;

    println!(
        "  Token: {} ({})",
        snapshot.token_name, snapshot.token_symbol
    );
    println!(
        "  Total holders: {}",
        format_balance(&snapshot.holder_count.to_string(), 0)
    );
    if let Some(price) = snapshot.price_usd.filter(|p| *p > 0.0) {
        println!("  Token price: ${:.6}", price);
    }
    println!("  Saved to: {}", path.display());

    print_footer();
    Ok(())
}

async fn cmd_price(client: &AnkrClient<HttpGateway>, contract: &str, chain: &str) -> Result<()> {
    let token_name = display_name(client, contract, chain).await;
    print_header(&format!("Token Price ({})", chain), Some(&token_name));

    let price = client.token_price(contract, chain).await?;
    if price > 0.0 {
        println!("  Price: ${:.6}", price);
    } else {
        println!("  Price: Not available");
    }

    print_footer();
    Ok(())
}

fn cmd_compare(store: &JsonFileStore, old: &PathBuf, new: &PathBuf, limit: usize) -> Result<()> {
    let old_snapshot = store
        .retrieve(old)
        .with_context(|| format!("Failed to load {}", old.display()))?;
    let new_snapshot = store
        .retrieve(new)
        .with_context(|| format!("Failed to load {}", new.display()))?;

    let token_name = format!(
        "{} ({})",
        new_snapshot.token_name, new_snapshot.token_symbol
    );
    print_header(
        &format!("Snapshot Compare ({})", new_snapshot.blockchain),
        Some(&token_name),
    );
    println!(
        "  Old: {} ({} holders)",
        old_snapshot.timestamp, old_snapshot.holder_count
    );
    println!(
        "  New: {} ({} holders)",
        new_snapshot.timestamp, new_snapshot.holder_count
    );
    if old_snapshot.contract.to_lowercase() != new_snapshot.contract.to_lowercase() {
        warn!(
            "Comparing snapshots of different contracts: {} vs {}",
            old_snapshot.contract,
            new_snapshot.contract
        );
    }
    println!();

    let changes = diff(&old_snapshot, &new_snapshot);
    let retained = retained_addresses(&old_snapshot, &new_snapshot);

    println!("  New holders: {}", changes.new_holders.len());
    println!("  Removed holders: {}", changes.removed_holders.len());
    println!("  Balance changes: {}", changes.balance_changes.len());
    println!(
        "  Unchanged holders: {}",
        retained.len() - changes.balance_changes.len().min(retained.len())
    );

    if changes.is_empty() {
        print_footer();
        return Ok(());
    }

    if !changes.new_holders.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["New holder", "Balance", "Label"]);
        for holder in changes.new_holders.iter().take(limit) {
            table.add_row(vec![
                holder.address.clone(),
                format_balance(&holder.balance, 2),
                holder.label.clone(),
            ]);
        }
        println!();
        println!("{table}");
    }

    if !changes.removed_holders.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Removed holder", "Last balance", "Label"]);
        for holder in changes.removed_holders.iter().take(limit) {
            table.add_row(vec![
                holder.address.clone(),
                format_balance(&holder.balance, 2),
                holder.label.clone(),
            ]);
        }
        println!();
        println!("{table}");
    }

    if !changes.balance_changes.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Address", "Old balance", "New balance"]);
        for change in changes.balance_changes.iter().take(limit) {
            table.add_row(vec![
                change.address.clone(),
                format_balance(&change.old_balance, 2),
                format_balance(&change.new_balance, 2),
            ]);
        }
        println!();
        println!("{table}");
    }

    print_footer();
    Ok(())
}

async fn cmd_balance(
    client: &AnkrClient<HttpGateway>,
    wallet: &str,
    chain: &str,
    only_whitelisted: bool,
) -> Result<()> {
    print_header(&format!("Wallet Balance ({})", chain), None);
    println!("  Wallet: {}", wallet);
    println!();

    let assets = client.account_balance(wallet, chain, only_whitelisted).await?;
    if assets.is_empty() {
        println!("  No token balances found");
        print_footer();
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Token", "Symbol", "Balance", "USD"]);
    for asset in &assets {
        table.add_row(vec![
            asset.token_name.clone(),
            asset.token_symbol.clone(),
            format_balance(&asset.balance, 4),
            format_balance(&asset.balance_usd, 2),
        ]);
    }
    println!("{table}");

    print_footer();
    Ok(())
}

async fn cmd_transfers(
    client: &AnkrClient<HttpGateway>,
    address: &str,
    chain: &str,
    contract: Option<&str>,
    limit: u32,
) -> Result<()> {
    print_header(&format!("Recent Transfers ({})", chain), None);
    println!("  Address: {}", address);
    if let Some(contract) = contract {
        println!("  Contract: {}", contract);
    }
    println!();

    let transfers = client
        .token_transfers(address, chain, contract, limit)
        .await?;
    if transfers.is_empty() {
        println!("  No transfers found");
        print_footer();
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Block", "From", "To", "Value", "Token"]);
    for transfer in &transfers {
        table.add_row(vec![
            transfer
                .block_height
                .map(|b| b.to_string())
                .unwrap_or_default(),
            short_address(&transfer.from_address, 14),
            short_address(&transfer.to_address, 14),
            format_balance(&transfer.value, 4),
            transfer.token_symbol.clone(),
        ]);
    }
    println!("{table}");

    print_footer();
    Ok(())
}
