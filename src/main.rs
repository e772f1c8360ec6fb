use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use calamar::config::{self, NetworkConfig};
use calamar::domain::account::{account_target, get_account};
use calamar::domain::filter::FilterExpr;
use calamar::domain::pagination::{ItemsPage, Page};
use calamar::domain::search::{signer_filter, SearchResolver};
use calamar::infrastructure::archive::{ArchiveEntity, Repository};
use calamar::infrastructure::{Archive, HexAddressCodec, HttpQueryExecutor};
use calamar::modules::detail::load_extrinsic_detail;
use calamar::modules::export::{export_rows, CsvRow, ExportFormat};

#[derive(Debug, Parser)]
#[command(
    name = "calamar",
    version,
    about = "Calamar: search and browse Substrate archives"
)]
struct Args {
    /// Network name from the config file (defaults to the configured default)
    #[arg(long, global = true)]
    network: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a hash, height, address, or name to its page
    Search { query: String },
    /// List extrinsics, optionally by call name
    Extrinsics(ListArgs),
    /// List blocks
    Blocks(ListArgs),
    /// List events, optionally by name
    Events(ListArgs),
    /// List calls, optionally by name
    Calls(ListArgs),
    /// Show one extrinsic with its events and calls
    Extrinsic { id: String },
    /// Validate an address and list the extrinsics it signed
    Account { address: String },
}

#[derive(Debug, ClapArgs)]
struct ListArgs {
    /// Filter by name (call name for extrinsics)
    #[arg(long)]
    name: Option<String>,

    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    page_size: Option<usize>,

    /// Archive order token, e.g. id_DESC
    #[arg(long)]
    order: Option<String>,

    /// Write the listed rows to a file
    #[arg(long, value_enum)]
    export: Option<ExportFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("CALAMAR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load();

    let network = match args.network.as_deref() {
        Some(name) => config
            .network(name)
            .with_context(|| format!("unknown network `{name}`"))?,
        None => config
            .default_network()
            .context("no networks configured")?,
    };
    let archive = connect(network)?;
    let page_size = config.page_size;

    match args.command {
        Command::Search { query } => {
            let target = SearchResolver::new(archive).resolve(&query).await?;
            let route = target.route(&network.name);
            print_json(&json!({ "target": target, "route": route }))?;
        }
        Command::Extrinsics(list) => {
            let filter = list
                .name
                .as_deref()
                .map(|name| FilterExpr::relation("call", FilterExpr::eq("name", name)));
            run_list(archive.extrinsics(), "extrinsics", filter, &list, page_size).await?;
        }
        Command::Blocks(list) => {
            if list.name.is_some() {
                anyhow::bail!("blocks cannot be filtered by name");
            }
            run_list(archive.blocks(), "blocks", None, &list, page_size).await?;
        }
        Command::Events(list) => {
            let filter = list.name.as_deref().map(|name| FilterExpr::eq("name", name));
            run_list(archive.events(), "events", filter, &list, page_size).await?;
        }
        Command::Calls(list) => {
            let filter = list.name.as_deref().map(|name| FilterExpr::eq("name", name));
            run_list(archive.calls(), "calls", filter, &list, page_size).await?;
        }
        Command::Extrinsic { id } => {
            let detail = load_extrinsic_detail(&archive, &id).await?;
            if detail.extrinsic.not_found() {
                anyhow::bail!("extrinsic {id} not found");
            }
            print_json(&detail.to_json()?)?;
        }
        Command::Account { address } => {
            let account = get_account(&HexAddressCodec, &address)?;
            let page = archive
                .extrinsics()
                .fetch_page(Some(&signer_filter(&account.address)), Page::first(page_size)?, None)
                .await?;
            let target = account_target(&HexAddressCodec, &account, network.prefix);
            let route = target.route(&network.name);
            print_json(&json!({
                "account": account,
                "route": route,
                "extrinsics": page,
            }))?;
        }
    }

    Ok(())
}

fn connect(network: &NetworkConfig) -> Result<Archive> {
    tracing::debug!(network = %network.name, url = %network.archive_url, "connecting to archive");
    let executor = HttpQueryExecutor::new(&network.archive_url)?;
    Ok(Archive::new(Arc::new(executor)))
}

async fn run_list<T>(
    repository: Repository<T>,
    prefix: &str,
    filter: Option<FilterExpr>,
    list: &ListArgs,
    default_page_size: usize,
) -> Result<()>
where
    T: ArchiveEntity + CsvRow + Serialize,
{
    let page = Page::new(list.page, list.page_size.unwrap_or(default_page_size))?;
    let rows: ItemsPage<T> = repository
        .fetch_page(filter.as_ref(), page, list.order.as_deref())
        .await?;

    match list.export {
        Some(format) => {
            let path = export_rows(prefix, &rows.items, format)?;
            println!("Exported {} {} to {}", rows.items.len(), prefix, path.display());
        }
        None => print_json(&rows)?,
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
