use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use coinbox::money::format_dollars;
use coinbox::{MachineBuilder, Notification, Snapshot, VendingMachine, RETURN_TOKEN};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Console driver for a coin-operated vending machine.
///
/// Feeds one event token per step: a coin (5, 10, 25, loonie, toonie),
/// a product (chips, gum, drink, candy, surprise) or RETURN. Tokens come
/// from the command line, or from stdin one per line when none are given.
#[derive(Parser, Debug)]
#[command(name = "vend", version, about)]
struct Cli {
    /// Event tokens to feed, in order.
    events: Vec<String>,

    /// Output format for the state printed after each step.
    #[arg(long, value_enum, default_value_t = Format::Text, env = "VEND_FORMAT")]
    format: Format,

    /// Number of transitions kept in the machine's history.
    #[arg(long, default_value_t = 64, env = "VEND_HISTORY_LIMIT")]
    history_limit: usize,

    /// Print the coin and product menu before processing events.
    #[arg(long)]
    menu: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct StepReport<'a> {
    event: &'a str,
    #[serde(flatten)]
    snapshot: Snapshot,
    notifications: Vec<Notification>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut machine = MachineBuilder::new()
        .standard_states()
        .history_limit(cli.history_limit)
        .build()
        .context("failed to start vending machine")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.menu {
        print_menu(&machine, &mut out)?;
    }

    if cli.events.is_empty() {
        feed_lines(&mut machine, io::stdin().lock(), cli.format, &mut out)?;
    } else {
        for token in &cli.events {
            feed(&mut machine, token, cli.format, &mut out)?;
        }
    }

    Ok(())
}

/// Feed one token per non-blank line of `input`.
fn feed_lines(
    machine: &mut VendingMachine,
    input: impl BufRead,
    format: Format,
    out: &mut impl Write,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read event from stdin")?;
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        feed(machine, token, format, out)?;
    }
    Ok(())
}

fn feed(
    machine: &mut VendingMachine,
    token: &str,
    format: Format,
    out: &mut impl Write,
) -> Result<()> {
    machine
        .handle(token)
        .with_context(|| format!("event '{token}' failed"))?;

    let report = StepReport {
        event: token,
        snapshot: machine.snapshot(),
        notifications: machine.take_notifications(),
    };

    match format {
        Format::Json => writeln!(out, "{}", serde_json::to_string(&report)?)?,
        Format::Text => {
            writeln!(out, "> {token}")?;
            for notification in &report.notifications {
                writeln!(out, "  {notification}")?;
            }
            writeln!(out, "  {}", report.snapshot)?;
        }
    }
    Ok(())
}

fn print_menu(machine: &VendingMachine, out: &mut impl Write) -> Result<()> {
    writeln!(out, "ENTER COINS")?;
    for coin in machine.catalog().coins() {
        writeln!(out, "  {:<8} {}", coin.token, coin.label)?;
    }
    writeln!(out, "SELECT ITEM")?;
    for product in machine.catalog().products() {
        writeln!(
            out,
            "  {:<8} {} — {}",
            product.token,
            product.label,
            format_dollars(product.price)
        )?;
    }
    writeln!(out, "  {RETURN_TOKEN:<8} return coins")?;
    if let Some(price) = machine.catalog().cheapest_price() {
        writeln!(out, "Items from {}", format_dollars(price))?;
    }
    Ok(())
}
