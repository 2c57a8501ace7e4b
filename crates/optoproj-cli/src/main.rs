//! Command-line interface for Optoma cloud projectors.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use optoproj_client::config::env_vars;
use optoproj_client::InputSource;
use optoproj_integration::{
    validate_login, ConfigEntry, EntryRegistry, EntryRuntime, ProjectorApi, ProjectorDevice,
};

use crate::config::{Overrides, Settings};

/// Control Optoma projectors through the Optoma cloud.
#[derive(Parser, Debug)]
#[command(name = "optoproj")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Path to config.toml.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Account user name (overrides OPTOMA_USERNAME).
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Account password (overrides OPTOMA_PASSWORD).
    #[arg(short, long, global = true)]
    password: Option<String>,

    /// Cloud base URL (overrides OPTOMA_BASE_URL).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Check the credentials against the cloud.
    Login,
    /// List projectors on the account.
    Devices {
        /// Print the raw device records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Turn a projector on.
    On {
        /// Device id as shown by `devices`.
        device_id: String,
    },
    /// Turn a projector off.
    Off {
        /// Device id as shown by `devices`.
        device_id: String,
    },
    /// Switch the input source of a projector.
    Input {
        /// Device id as shown by `devices`.
        device_id: String,
        /// HDMI1, HDMI2 or HDMI3.
        source: InputSource,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    let file = config::load_file(args.config.as_deref())?;
    let settings = config::resolve(
        Overrides {
            username: args.username.clone(),
            password: args.password.clone(),
            base_url: args.base_url.clone(),
        },
        |key| std::env::var(key).ok(),
        file,
    )?;

    match args.command {
        Command::Login => run_login(settings).await,
        Command::Devices { json } => list_devices(settings, json).await,
        Command::On { device_id } => {
            let runtime = setup(settings).await?;
            let device = find_device(&runtime, &device_id)?;
            device.remote.turn_on().await?;
            println!("Turned on {}", device_id);
            Ok(())
        }
        Command::Off { device_id } => {
            let runtime = setup(settings).await?;
            let device = find_device(&runtime, &device_id)?;
            device.remote.turn_off().await?;
            println!("Turned off {}", device_id);
            Ok(())
        }
        Command::Input { device_id, source } => {
            let runtime = setup(settings).await?;
            let device = find_device(&runtime, &device_id)?;
            device.select.select_option(source.as_str()).await?;
            println!("Switched {} to {}", device_id, source);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    // JSON output for containers and log collectors
    let json_logging = std::env::var(env_vars::LOG_JSON)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    let default_directive = if verbose { "optoproj=debug" } else { "optoproj=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(default_directive)
            .add_directive(tracing::Level::WARN.into())
    });

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }
}

fn build_api(settings: &Settings, entry: &ConfigEntry) -> Arc<dyn ProjectorApi> {
    Arc::new(entry.client(reqwest::Client::new(), settings.client.clone()))
}

/// Set up a one-off entry for the configured account.
async fn setup(settings: Settings) -> Result<EntryRuntime> {
    let entry = ConfigEntry::new(settings.credentials.clone());
    let api = build_api(&settings, &entry);

    EntryRegistry::new()
        .setup_entry(entry, api)
        .await
        .context("Failed to set up Optoma account")
}

fn find_device<'a>(runtime: &'a EntryRuntime, device_id: &str) -> Result<&'a ProjectorDevice> {
    runtime.device(device_id).ok_or_else(|| {
        let known: Vec<&str> = runtime.devices.iter().map(ProjectorDevice::id).collect();
        anyhow!(
            "Unknown device '{}'. Known devices: {}",
            device_id,
            if known.is_empty() {
                "none".to_string()
            } else {
                known.join(", ")
            }
        )
    })
}

/// Validate credentials like the config flow does.
async fn run_login(settings: Settings) -> Result<()> {
    let entry = ConfigEntry::new(settings.credentials.clone());
    let api = build_api(&settings, &entry);

    let errors = validate_login(api.as_ref()).await;
    match errors.get("base") {
        None => {
            println!("Login successful for {}", settings.credentials.username);
            Ok(())
        }
        Some(reason) => Err(anyhow!(
            "Login failed for {}: {}",
            settings.credentials.username,
            reason
        )),
    }
}

/// List projectors on the account.
async fn list_devices(settings: Settings, json: bool) -> Result<()> {
    let runtime = setup(settings).await?;

    if json {
        let records: Vec<_> = runtime.devices.iter().map(|d| &d.record).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if runtime.devices.is_empty() {
        println!("No projectors found.");
        return Ok(());
    }

    println!("{:<16} {:<20} NAME", "ID", "MODEL");
    for device in &runtime.devices {
        println!(
            "{:<16} {:<20} {}",
            device.id(),
            device.info.model,
            device.record.name().unwrap_or("-")
        );
    }

    Ok(())
}
