use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use hey_lens::client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use hey_lens::{EvmAddress, LensClient, LensClientOpts};
use hey_profile_manager::account;
use hey_profile_manager::config::{self, Environment};
use hey_profile_manager::list::{ListDriver, UiEvent, View};
use hey_profile_manager::reporting::{self, ReportingOptions};
use hey_profile_manager::terminal::{self, Command, TerminalToaster};

/// Manage the Lens profiles your wallet can act on behalf of
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Lens GraphQL endpoint
    #[arg(long, env = "LENS_API_URL", default_value = DEFAULT_ENDPOINT)]
    api_url: String,

    /// Lens access token, required for hide/unhide
    #[arg(long, env = "LENS_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Connected wallet address
    #[arg(long, env = "HEY_ADDRESS")]
    address: Option<EvmAddress>,

    /// Start on the managed list instead of the un-managed one
    #[arg(long)]
    managed: bool,

    #[arg(long, env = "HEY_ENVIRONMENT", default_value = "development")]
    environment: Environment,

    #[arg(long, env = "SENTRY_DSN", hide_env_values = true)]
    sentry_dsn: Option<String>,

    #[arg(long, env = "LENS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("ERROR: {}", err);

        let mut source = err.source();
        while let Some(err) = source {
            eprintln!("  - {}", err);
            source = err.source();
        }

        reporting::capture_error(&*err);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let env_file = config::load_env().context("Failed to load environment file")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Some(path) = env_file {
        tracing::info!("loaded environment from {}", path.display());
    }

    reporting::init(
        ReportingOptions::for_environment(args.environment).with_dsn(args.sentry_dsn.clone()),
    );

    let client = LensClient::new(LensClientOpts {
        endpoint: Some(args.api_url.clone()),
        access_token: args.access_token.clone(),
        timeout: Some(Duration::from_secs(args.timeout_secs)),
    })
    .context("Failed to build Lens API client")?;
    tracing::info!("using Lens API at {}", client.endpoint());

    let (account_handle, account) = account::connection(args.address.clone());
    let (event_tx, event_rx) = mpsc::channel(32);
    let (view_tx, mut view_rx) = watch::channel(View::Loading);

    let driver = ListDriver::new(Arc::new(client), TerminalToaster);
    let driver_task = tokio::spawn(driver.run(args.managed, event_rx, account, view_tx));

    let mut managed = args.managed;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", terminal::help());

    loop {
        tokio::select! {
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                print!("{}", terminal::render(&view_rx.borrow_and_update(), managed));
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(err) => {
                        print!("{err}");
                        continue;
                    }
                };

                let event = match command {
                    Command::More => {
                        if !view_rx.borrow().has_sentinel() {
                            println!("No more profiles to load");
                            continue;
                        }
                        // scroll the sentinel in and back out so the next `more` fires again
                        send(&event_tx, UiEvent::SentinelVisibility(true)).await?;
                        UiEvent::SentinelVisibility(false)
                    }
                    Command::Toggle { target } => {
                        let resolved = terminal::resolve_toggle(&view_rx.borrow(), &target);
                        match resolved {
                            Some(profile_id) => UiEvent::Toggle(profile_id),
                            None => {
                                println!("No profile `{target}` on screen");
                                continue;
                            }
                        }
                    }
                    Command::Managed => {
                        managed = true;
                        UiEvent::SetManaged(true)
                    }
                    Command::Unmanaged => {
                        managed = false;
                        UiEvent::SetManaged(false)
                    }
                    Command::Connect { address } => {
                        account_handle.connect(address);
                        continue;
                    }
                    Command::Disconnect => {
                        account_handle.disconnect();
                        continue;
                    }
                    Command::Quit => break,
                };
                send(&event_tx, event).await?;
            }
        }
    }

    drop(event_tx);
    driver_task.await.context("Profile list task panicked")?;
    Ok(())
}

async fn send(events: &mpsc::Sender<UiEvent>, event: UiEvent) -> Result<()> {
    events
        .send(event)
        .await
        .context("Profile list is no longer running")
}
