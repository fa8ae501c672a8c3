//! `orders` - an admin orders screen on the terminal.
//!
//! Loads orders from a simulated service, applies search, filters, sort
//! and paging, and can bulk-delete a selection:
//!
//! ```text
//! orders --search smith --status pending --sort -total
//! orders --within 7 --page 2 --json
//! orders delete --all
//! orders delete 3 4 5
//! RUST_LOG=listkit_bulk=debug orders delete --all --scope page
//! ```

mod api;
mod orders;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use listkit::{
    Category, DateWindow, ListController, ListError, PageButton, SearchDebouncer, SelectScope,
    SortSpec, Timestamp, ViewConfig, WindowDays,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::{DeleteOrder, OrdersApi};
use crate::orders::{seed, Order, STATUSES};

#[derive(Parser)]
#[command(name = "orders")]
#[command(about = "Browse and bulk-edit orders", long_about = None)]
struct Cli {
    #[command(flatten)]
    view: ViewArgs,

    /// View settings (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of seeded orders
    #[arg(long, default_value_t = 42, global = true)]
    seed: u32,

    /// Simulated service latency in milliseconds
    #[arg(long, default_value_t = 40, global = true)]
    latency_ms: u64,

    /// Pretend the orders service is down
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Args)]
struct ViewArgs {
    /// Free-text search over customer and email
    #[arg(long, short, global = true)]
    search: Option<String>,

    /// Status filter; "all" clears it
    #[arg(long, global = true)]
    status: Option<String>,

    /// Only orders placed within this many days (7, 30 or 90)
    #[arg(long, global = true)]
    within: Option<u32>,

    /// Sort field; prefix with '-' for descending
    #[arg(long, global = true, allow_hyphen_values = true)]
    sort: Option<String>,

    /// 1-based page index
    #[arg(long, short, global = true)]
    page: Option<usize>,

    /// Rows per page (overrides the config file)
    #[arg(long, global = true)]
    page_size: Option<usize>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Show one page of orders (the default)
    List {
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete orders by id or everything "select all" picks
    Delete {
        ids: Vec<u32>,

        /// Select all instead of listing ids
        #[arg(long, conflicts_with = "ids")]
        all: bool,

        /// What "select all" covers (defaults to the config file)
        #[arg(long, value_enum)]
        scope: Option<ScopeArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    Filtered,
    Page,
}

impl From<ScopeArg> for SelectScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Filtered => SelectScope::Filtered,
            ScopeArg::Page => SelectScope::Page,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ViewConfig::from_file(path)
            .with_context(|| format!("reading view config {}", path.display()))?,
        None => ViewConfig::default(),
    };

    let mut api = OrdersApi::new(
        seed(cli.seed, Timestamp::now()),
        Duration::from_millis(cli.latency_ms),
    );
    if cli.offline {
        api = api.offline();
    }

    let debouncer = SearchDebouncer::new(config.search_debounce());
    let mut screen: ListController<Order> = ListController::new(config)?;
    screen.refresh(&api).await;
    apply_view_args(&mut screen, &cli.view, &debouncer).await?;

    match cli.cmd.unwrap_or(Cmd::List { json: false }) {
        Cmd::List { json } => show(&screen, json),
        Cmd::Delete { ids, all, scope } => {
            if all {
                let scope = scope.map(SelectScope::from);
                let selected = match scope {
                    Some(scope) => screen.select_all(scope)?,
                    None => screen.select_all_default()?,
                };
                info!(selected, "select all");
            } else if ids.is_empty() {
                bail!("nothing to delete: pass ids or --all");
            } else {
                for id in ids {
                    screen.toggle(id);
                }
            }

            let report = screen.run_bulk(&DeleteOrder::new(api.clone())).await;
            println!("{}", report.message);
            for failure in &report.outcome.failed {
                println!("  #{}: {}", failure.id, failure.reason);
            }
            println!("{} orders left on the service", api.len().await);
            println!();
            show(&screen, false)
        }
    }
}

async fn apply_view_args(
    screen: &mut ListController<Order>,
    args: &ViewArgs,
    debouncer: &SearchDebouncer,
) -> Result<()> {
    if let Some(term) = &args.search {
        // Replay the term as keystrokes; only the last one survives.
        let mut typed = String::new();
        let mut pending = Vec::new();
        for c in term.chars() {
            typed.push(c);
            pending.push(debouncer.submit(&typed));
        }
        for released in settle_keystrokes(pending).await {
            screen.set_search(released);
        }
    }
    if let Some(status) = &args.status {
        if status != "all" && !STATUSES.contains(&status.as_str()) {
            bail!(
                "unknown status '{}' (expected one of: all, {})",
                status,
                STATUSES.join(", ")
            );
        }
        screen.set_category(Order::STATUS, Category::parse(status));
    }
    if let Some(days) = args.within {
        let days = WindowDays::try_from(days)?;
        screen.set_date_window(DateWindow::Within {
            field: Order::PLACED.into(),
            days,
        });
    }
    if let Some(sort) = &args.sort {
        screen.set_sort(SortSpec::parse(sort));
    }
    if let Some(size) = args.page_size {
        screen.set_page_size(size)?;
    }
    if let Some(page) = args.page {
        screen.set_page(page);
    }
    Ok(())
}

/// Awaits every debounced keystroke and yields the ones released.
async fn settle_keystrokes<F>(pending: Vec<F>) -> Vec<String>
where
    F: std::future::Future<Output = Option<String>> + Send + 'static,
{
    let handles: Vec<_> = pending.into_iter().map(tokio::spawn).collect();
    let mut released = Vec::new();
    for handle in handles {
        if let Ok(Some(term)) = handle.await {
            released.push(term);
        }
    }
    released
}

fn show(screen: &ListController<Order>, json: bool) -> Result<()> {
    let now = Timestamp::now();
    let view = match screen.view_at(now) {
        Ok(view) => view,
        Err(ListError::Unavailable(reason)) => {
            println!("Orders could not be loaded: {}", reason);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if let Some(summary) = &view.filter_summary {
        println!("filtered by: {}", summary);
    }
    println!(
        "{:>4}  {:<12} {:<24} {:<10} {:>8}  {:>6}",
        "id", "customer", "email", "status", "total", "placed"
    );
    for order in &view.items {
        let mark = if screen.selection().is_selected(&order.id) {
            "*"
        } else {
            " "
        };
        println!(
            "{}{:>3}  {:<12} {:<24} {:<10} {:>8.2}  {:>5}d",
            mark,
            order.id,
            order.customer,
            order.email,
            order.status,
            order.total,
            now.abs_diff_days(order.placed)
        );
    }
    for message in &view.messages {
        println!("{}", message);
    }

    let buttons: Vec<String> = view
        .pages
        .iter()
        .map(|button| match button {
            PageButton::Page(n) if *n == view.index => format!("[{}]", n),
            PageButton::Page(n) => n.to_string(),
            PageButton::Ellipsis => "…".to_string(),
        })
        .collect();
    println!(
        "page {} of {} ({} of {} orders)   {}",
        view.index,
        view.page_count,
        view.total,
        view.unfiltered_total,
        buttons.join(" ")
    );
    Ok(())
}
