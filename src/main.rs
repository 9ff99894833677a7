use checkout_engine::application::session::CheckoutSession;
use checkout_engine::config::{CheckoutConfig, ProcessorMode};
use checkout_engine::domain::ports::{PaymentProcessorBox, ProfileStoreBox, WalletAuthorizerBox};
use checkout_engine::infrastructure::in_memory::InMemoryProfileStore;
use checkout_engine::infrastructure::simulated::{SimulatedProcessor, SimulatedWalletAuthorizer};
use checkout_engine::interfaces::csv::action_reader::ActionReader;
use checkout_engine::interfaces::csv::summary_writer::{SummaryRow, SummaryWriter};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Checkout script CSV file (action,target,value)
    input: PathBuf,

    /// Fixed processor latency in milliseconds. Defaults to a random 1200-1800 ms.
    #[arg(long, env = "CHECKOUT_LATENCY_MS")]
    latency_ms: Option<u64>,

    /// Wallet approval latency in milliseconds.
    #[arg(long, default_value_t = 1200)]
    wallet_latency_ms: u64,

    /// Make the simulated processor decline every payment.
    #[arg(long, env = "CHECKOUT_DECLINE")]
    decline: bool,

    /// Day card expiry is checked against (YYYY-MM-DD). Defaults to today.
    #[arg(long, env = "CHECKOUT_TODAY")]
    today: Option<NaiveDate>,

    /// Summary format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
}

impl Cli {
    fn config(&self) -> CheckoutConfig {
        let mut config = CheckoutConfig {
            processor_mode: if self.decline {
                ProcessorMode::Decline
            } else {
                ProcessorMode::Approve
            },
            wallet_latency: Duration::from_millis(self.wallet_latency_ms),
            ..CheckoutConfig::default()
        };
        if let Some(today) = self.today {
            config.reference_date = today;
        }
        if let Some(ms) = self.latency_ms {
            config = config.with_fixed_latency(Duration::from_millis(ms));
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config();

    let profiles: ProfileStoreBox = Box::new(InMemoryProfileStore::with_demo_profiles());
    let processor: PaymentProcessorBox = Box::new(SimulatedProcessor::from_config(&config));
    let wallets: WalletAuthorizerBox = Box::new(SimulatedWalletAuthorizer::new(config.wallet_latency));
    let mut session = CheckoutSession::new(&config, profiles, processor, wallets);

    // Replay the script
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = ActionReader::new(file);
    for action_result in reader.actions() {
        match action_result {
            Ok(action) => {
                if let Err(e) = session.apply(action).await {
                    eprintln!("Error applying action: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading action: {}", e);
            }
        }
    }

    // Output final state
    let rows = SummaryRow::from_session(&session);
    let writer = SummaryWriter::new(io::stdout().lock());
    match cli.format {
        OutputFormat::Csv => writer.write_csv(&rows)?,
        OutputFormat::Json => writer.write_json(&rows)?,
    }

    Ok(())
}

/// Logs go to stderr so the summary on stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
