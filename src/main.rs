use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use parley_gateway::api::ApiServer;
use parley_gateway::Config;

/// Parley - single-turn voice assistant HTTP gateway
#[derive(Parser)]
#[command(name = "parley", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "PARLEY_PORT", default_value = "3000")]
    port: u16,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,parley_gateway=info",
        1 => "info,parley_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env(cli.port)?;
    tracing::debug!(
        stt_model = %config.groq.stt_model,
        chat_model = %config.groq.chat_model,
        tts_model = %config.cartesia.model,
        "loaded configuration"
    );

    tracing::info!(port = cli.port, "starting parley gateway");

    let server = ApiServer::new(&config)?;
    server.run().await?;

    Ok(())
}
