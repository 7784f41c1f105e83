//! Tripwire CLI - classify agent output with the moderation guardrail.

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tripwire_cli::{CheckConfig, ProviderKind, build_guardrail, exit_code};

/// Classify text with the moderation guardrail and print the result as JSON
#[derive(Parser, Debug)]
#[command(name = "tripwire")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Text to classify (read from stdin when omitted)
    text: Option<String>,

    /// Provider backend
    #[arg(short, long, value_enum, default_value_t = ProviderKind::Openai)]
    provider: ProviderKind,

    /// Model id (deployment name for Azure)
    #[arg(short, long)]
    model: Option<String>,

    /// API base URL (Azure resource endpoint for the azure provider)
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// API key (bearer token for the proxy provider)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API version query parameter
    #[arg(long, env = "OPENAI_API_VERSION")]
    api_version: Option<String>,

    /// Responses-style proxy endpoint URL
    #[arg(long, env = "TRIPWIRE_ENDPOINT")]
    endpoint: Option<String>,

    /// Company or brand the classifier protects
    #[arg(long)]
    company: Option<String>,

    /// Provider deadline in seconds (0 disables it)
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Exit with status 2 when the tripwire triggers
    #[arg(long)]
    fail_on_trip: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tripwire=debug,tripwire_cli=debug")
    } else {
        EnvFilter::new("tripwire=warn,tripwire_cli=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
#[allow(clippy::print_stdout)]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let config = CheckConfig {
        provider: args.provider,
        model: args.model,
        base_url: args.base_url,
        api_key: args.api_key,
        api_version: args.api_version,
        endpoint: args.endpoint,
        company: args.company,
        timeout_secs: args.timeout_secs,
    };
    let guardrail = build_guardrail(&config)?;

    let result = guardrail.check(&text).await;
    tracing::info!(triggered = result.tripwire_triggered, "Check complete");
    println!("{}", serde_json::to_string_pretty(&result)?);

    let code = exit_code(&result, args.fail_on_trip);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
