use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use proxy_switchboard_lib::app::{serve, MessageBus, PageContext, PageObserver, Router, UiClient};
use proxy_switchboard_lib::core::ip::{IpEndpoints, IpService};
use proxy_switchboard_lib::core::proxy::{ProxyController, SystemProxyPlatform};
use proxy_switchboard_lib::core::store::{JsonFileStore, StateStore};
use proxy_switchboard_lib::logging::init_logging;

/// Selectable system proxy switcher with persisted state
#[derive(Parser, Debug)]
#[command(name = "proxy-switchboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Override the state directory (defaults to the platform config dir)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available proxy servers
    List,
    /// Show current proxy status
    Status,
    /// Connect to a proxy by id (use `list` to see ids)
    Connect { id: String },
    /// Disconnect and restore the direct connection
    Disconnect,
    /// Show the current public IP
    Ip,
    /// Test connectivity through the live configuration
    Test,
    /// Send a raw JSON message envelope (e.g. '{"action":"getProxyStatus"}')
    Send { json: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let store = match &cli.state_dir {
        Some(dir) => JsonFileStore::at_base_dir(dir),
        None => JsonFileStore::default_location(),
    };
    store.load_or_init()?;

    if let Some(ambient) = SystemProxyPlatform::detect_from_env() {
        tracing::info!(proxy = %ambient, "proxy already configured in the environment");
    }

    let endpoints = IpEndpoints::default();
    let controller = Arc::new(ProxyController::new(
        Arc::new(SystemProxyPlatform),
        Arc::new(store) as Arc<dyn StateStore>,
        IpService::new(endpoints.clone()),
    ));
    controller.initialize()?;

    let (bus, inbox) = MessageBus::channel();
    let observer = Arc::new(PageObserver::new(
        PageContext::for_session(),
        Some(bus.notifier()),
    ));
    let router = Router::new(controller, observer.clone());
    tokio::spawn(serve(router, inbox));

    let client = UiClient::new(bus.clone());

    match cli.command {
        Commands::List => {
            for proxy in client.proxy_list().await {
                println!("{proxy}  [{}]", proxy.country);
            }
        }
        Commands::Status => {
            let status = client.status().await;
            if status.is_active {
                match &status.active_proxy {
                    Some(proxy) => println!("connected: {proxy}"),
                    None => println!("connected"),
                }
            } else {
                println!("not connected");
            }
            if let Some(fault) = status.last_error {
                println!("last error: {} ({})", fault.message, fault.timestamp);
            }
        }
        Commands::Connect { id } => {
            let report = client.connect(&id).await?;
            println!("{}", report.feedback);
            println!("current IP: {} ({})", report.ip.ip, report.ip.location);
        }
        Commands::Disconnect => {
            let report = client.disconnect().await?;
            println!("{}", report.feedback);
            println!("current IP: {} ({})", report.ip.ip, report.ip.location);
        }
        Commands::Ip => {
            observer.observe_request(&endpoints.ip_echo);
            let ip = client.current_ip().await;
            println!("{} ({})", ip.ip, ip.location);
        }
        Commands::Test => {
            observer.observe_request(&endpoints.connectivity);
            let outcome = client.test_connection().await;
            println!("{}", outcome.message);
            if let Some(ip) = outcome.ip {
                println!("origin: {ip}");
            }
        }
        Commands::Send { json } => {
            let value: serde_json::Value = serde_json::from_str(&json)?;
            let reply = bus.request_raw(value).await?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
    }

    Ok(())
}
