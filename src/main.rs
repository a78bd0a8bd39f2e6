//! # solo-dashboard
//!
//! Command-line front end: runs the dashboard's view models against a live
//! API and prints what a page would show.
//!
//! ```bash
//! solo-dashboard --config solo.toml networks
//! solo-dashboard nodes --network 3
//! solo-dashboard register --network 3 --code ABCD-1234
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use solo_dashboard::accounts::AccountsView;
use solo_dashboard::alerts::{AlertSubscription, DEFAULT_CHANNEL};
use solo_dashboard::chrome::NavView;
use solo_dashboard::config::DashboardConfig;
use solo_dashboard::layout::OneOrBoth;
use solo_dashboard::lifecycle::tracing::setup_tracing;
use solo_dashboard::lifecycle::Dashboard;
use solo_dashboard::navigation::Location;
use solo_dashboard::networks::NetworksView;
use solo_dashboard::nodes::{NodeField, NodeScope, NodesView, RegisterNodeView};
use solo_dashboard::session::GuardOutcome;
use tracing::{info, Instrument};

#[derive(Parser)]
#[command(name = "solo-dashboard", about = "Solo admin dashboard client")]
struct Cli {
    /// TOML file with a [dashboard] table. Environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the logged-in user.
    Whoami,
    /// List accounts.
    Accounts,
    /// List networks.
    Networks,
    /// List nodes, optionally for one network.
    Nodes {
        #[arg(long)]
        network: Option<u64>,
    },
    /// Join a host to a network with its activation code.
    Register {
        #[arg(long)]
        network: u64,
        #[arg(long)]
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path),
        None => DashboardConfig::from_env(),
    }
    .map_err(|e| e.to_string())?;

    let dashboard = Dashboard::new(&config).map_err(|e| e.to_string())?;
    let mut alerts = dashboard.context().alerts.subscribe(DEFAULT_CHANNEL);

    let span = tracing::info_span!("command");
    let result = run(&dashboard, cli.command).instrument(span).await;

    print_alerts(&mut alerts);
    if let Some(url) = redirected(&dashboard) {
        println!("Login required: {}", url);
    }
    dashboard.shutdown().await?;
    result
}

async fn run(dashboard: &Dashboard, command: Command) -> Result<(), String> {
    let ctx = dashboard.context();
    match command {
        Command::Whoami => {
            let nav = NavView::new(ctx);
            let mut identity = nav.mount().await.map_err(|e| e.to_string())?;
            if let GuardOutcome::Ready(_) = nav.identity(&identity.settled().await) {
                println!("{}", nav.greeting().unwrap_or_default());
            }
        }
        Command::Accounts => {
            let view = AccountsView::new(ctx);
            let mut list = view.mount().await.map_err(|e| e.to_string())?;
            if let GuardOutcome::Ready(rows) = view.rows(&list.settled().await) {
                for row in rows {
                    let provider = match row.provider {
                        OneOrBoth::Both { big, .. } => big,
                        OneOrBoth::Small(icon) => format!("{:?}", icon),
                    };
                    println!("{:>6}  {:<32} {:<12} {:?}", row.id.unwrap_or_default(), row.name, provider, row.actions);
                }
            }
        }
        Command::Networks => {
            let view = NetworksView::new(ctx);
            let mut list = view.mount().await.map_err(|e| e.to_string())?;
            if let GuardOutcome::Ready(rows) = view.rows(&list.settled().await) {
                for row in rows {
                    println!("{:>6}  {:<24} {}", row.id.unwrap_or_default(), row.name, row.cidr);
                }
            }
        }
        Command::Nodes { network } => {
            let scope = network.map_or(NodeScope::All, NodeScope::Network);
            let view = NodesView::new(ctx, scope);
            let mut list = view.mount().await.map_err(|e| e.to_string())?;
            if let GuardOutcome::Ready(rows) = view.rows(&list.settled().await) {
                for row in rows {
                    let os = row.os.map(|icon| format!("{:?}", icon)).unwrap_or_default();
                    println!(
                        "{:>6}  {:<8} {:<24} {:<8} {}",
                        row.id.unwrap_or_default(),
                        os,
                        row.hostname,
                        row.arch,
                        row.ip
                    );
                }
            }
        }
        Command::Register { network, code } => {
            let mut view = RegisterNodeView::new(ctx);
            view.edit(NodeField::Code(code));
            view.edit(NodeField::NetworkId(network.to_string()));
            view.submit().await.map_err(|e| e.to_string())?;
            info!(network, "Node registered");
        }
    }
    Ok(())
}

fn print_alerts(alerts: &mut AlertSubscription) {
    while let Some(alert) = alerts.try_recv() {
        if let (Some(severity), Some(message)) = (alert.severity, alert.message) {
            eprintln!("[{}] {}", severity.variant(), message);
        }
    }
}

fn redirected(dashboard: &Dashboard) -> Option<String> {
    match dashboard.context().router.location() {
        Location::External(url) => Some(url),
        Location::Internal(_) => None,
    }
}
