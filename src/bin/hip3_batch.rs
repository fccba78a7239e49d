//! Run a batch of HIP-3 trading intents and print one JSON result per item.
//!
//! Run with: cargo run --bin hip3-batch -- --input intents.json --isolate-errors
//!
//! Credentials come from `HYPERLIQUID_*` environment variables (a `.env` file is loaded).

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hyperliquid_hip3_client::{
    BaseUrl, BatchContext, BatchRunner, CredentialProvider, EnvCredentials, Error, ErrorPolicy,
    HttpClient, TradeIntent,
};

#[derive(Parser)]
#[command(name = "hip3-batch")]
#[command(version, about = "Sign and send Hyperliquid HIP-3 trading intents", long_about = None)]
struct Cli {
    /// JSON file holding an array of intents ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    /// Turn per-item failures into {"error": ...} results instead of aborting
    #[arg(long)]
    isolate_errors: bool,

    /// Override network from the environment (mainnet, testnet, localhost)
    #[arg(long)]
    network: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (pretty, compact, json)
    #[arg(long, default_value = "pretty")]
    log_format: String,
}

fn setup_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(&cli.log_level)
            .add_directive("hyper=warn".parse().expect("static directive"))
            .add_directive("reqwest=warn".parse().expect("static directive"))
    });

    // Results go to stdout; logs stay on stderr
    match cli.log_format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init(),
        "compact" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init(),
    }
}

async fn read_intents(input: &Path) -> Result<Vec<TradeIntent>, Box<dyn std::error::Error>> {
    let content = if input.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(input).await?
    };
    Ok(serde_json::from_str(&content)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(&cli);

    let mut credentials = EnvCredentials.credentials()?;
    if let Some(network) = &cli.network {
        credentials.network = network.parse::<BaseUrl>()?;
    }
    let context = BatchContext::from_credentials(&credentials)?;
    info!(
        network = %context.base_url,
        address = %context.identity.effective_address(),
        "Loaded signing identity"
    );

    let intents = read_intents(&cli.input).await?;
    let policy = if cli.isolate_errors {
        ErrorPolicy::Isolate
    } else {
        ErrorPolicy::FailFast
    };

    let transport = HttpClient::default();
    let runner = BatchRunner::new(&context, &transport, policy);
    match runner.run(&intents).await {
        Ok(results) => {
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
        Err(Error::BatchAborted {
            index,
            completed,
            source,
        }) => {
            println!("{}", serde_json::to_string_pretty(&completed)?);
            error!(index, error = %source, "Batch aborted");
            Err((*source).into())
        }
        Err(e) => Err(e.into()),
    }
}
