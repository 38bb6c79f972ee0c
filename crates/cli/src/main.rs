use anyhow::{Context, Result};
use clap::Parser;
use keyward_cli::{output, Cli, Command, Config, ConfigCommand};
use keyward_client::{ApplicationClient, CancelHandle, HttpTransport};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output on stdout stays pipeable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level())),
        )
        .init();

    // Precedence: config file < environment < command-line flags
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(base_url) = &cli.base_url {
        config.api.base_url.clone_from(base_url);
    }

    let command = match &cli.command {
        Command::Config(ConfigCommand::Example) => {
            print!("{}", Config::example());
            return Ok(());
        }
        Command::Config(ConfigCommand::Show) => {
            print!("{}", config.redacted().to_toml()?);
            return Ok(());
        }
        Command::Api(command) => command,
    };

    let transport =
        HttpTransport::new(config.transport_config()).context("Failed to set up HTTP client")?;
    let client = ApplicationClient::new(transport);

    // Ctrl-C cancels the in-flight request
    let interrupt = CancelHandle::new();
    let watcher = {
        let interrupt = interrupt.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling request");
                interrupt.cancel();
            }
        })
    };

    let result = keyward_cli::run(&client, command, cli.output_format(), &interrupt).await;
    watcher.abort();

    match result {
        Ok(rendered) => {
            println!("{rendered}");
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            eprintln!("Cancelled");
            std::process::exit(130);
        }
        Err(e) => anyhow::bail!("{}", output::failure(&e)),
    }
}
