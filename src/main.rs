use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use dialoguer::{Input, Password};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use switchtalk::{
    config::Config,
    fetch::MISSING_SWITCH_NAME,
    report, ApiConfig, Credentials, PortRecord, SwitchApiClient, SwitchApiError, SwitchState,
    TlsVersion,
};

#[derive(Parser)]
#[command(name = "switchtalk")]
#[command(about = "CLI SwitchTalker: show port, VLAN and MAC state of a switch")]
#[command(version)]
struct Cli {
    /// Your SSO username (prompted when omitted)
    #[arg(short = 'u', long = "user", value_name = "SSO")]
    user: Option<String>,

    /// Switch name, e.g. bg77-2e.dfw1
    #[arg(short = 's', long = "switch", value_name = "SWITCH")]
    switch: Option<String>,

    /// Only show the port that learned this MAC address
    #[arg(short = 'm', long = "mac", value_name = "MAC")]
    mac: Option<String>,

    /// Increase log verbosity (-d for debug, -dd for trace)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    debug: u8,

    /// API base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Oldest TLS version to negotiate
    #[arg(long, value_enum)]
    min_tls: Option<TlsVersion>,

    /// Newest TLS version to negotiate
    #[arg(long, value_enum)]
    max_tls: Option<TlsVersion>,

    /// Ignore proxy settings from the environment
    #[arg(long)]
    no_proxy: bool,

    /// Config file to read instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print port records as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let cfg = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    debug!(?cfg, "loaded configuration");

    let switch_name = cli
        .switch
        .clone()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| SwitchApiError::Configuration(MISSING_SWITCH_NAME.to_string()))?;

    let credentials = prompt_credentials(cli.user.clone().or_else(|| cfg.username.clone()))?;

    let client = SwitchApiClient::new(ApiConfig {
        base_url: cli
            .base_url
            .clone()
            .unwrap_or_else(|| cfg.base_url_or_default().to_string()),
        switch_name,
        credentials,
        min_tls_version: cli.min_tls.or(cfg.min_tls_version),
        max_tls_version: cli.max_tls.or(cfg.max_tls_version),
        use_system_proxy: !(cli.no_proxy || cfg.no_proxy),
    })?;

    let state = SwitchState::build(&client)?;

    match cli.mac.as_deref() {
        Some(mac) => cmd_show_mac(&state, mac, cli.json),
        None => cmd_show_all(&state, cli.json),
    }
}

fn init_logging(debug: u8) {
    let default_filter = match debug {
        0 => "warn",
        1 => "warn,switchtalk=debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn prompt_credentials(user: Option<String>) -> Result<Credentials> {
    let username = match user {
        Some(u) => u,
        None => Input::<String>::new()
            .with_prompt("SSO Username")
            .interact_text()
            .context("Failed to read username")?,
    };

    let password = Password::new()
        .with_prompt(format!("Password for {}", username))
        .interact()
        .context("Failed to read password")?;

    Ok(Credentials::new(username, password))
}

fn cmd_show_mac(state: &SwitchState, mac: &str, json: bool) -> Result<()> {
    let record = state
        .find_by_mac(mac)
        .and_then(|port| state.port(port))
        .ok_or_else(|| SwitchApiError::LookupNotFound {
            kind: "MAC address",
            value: mac.to_string(),
        })?;

    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("{}", report::render_line(record));
        println!("{}", report::render_mac_list(record));
    }

    Ok(())
}

fn cmd_show_all(state: &SwitchState, json: bool) -> Result<()> {
    if json {
        let records: Vec<&PortRecord> = state.ports().values().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if state.ports().is_empty() {
        println!("No ports found.");
        return Ok(());
    }

    for record in state.ports().values() {
        println!("{}", report::render_line(record));
    }

    Ok(())
}
