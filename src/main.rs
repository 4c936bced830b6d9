use clap::{Parser, Subcommand};
use dmoney_e2e::application::scenario::TransactionFlow;
use dmoney_e2e::config::ConfigArgs;
use dmoney_e2e::domain::ports::{AccountStore, AccountStoreRef};
use dmoney_e2e::error::PlatformError;
use dmoney_e2e::infrastructure::dmoney_client::DmoneyClient;
use dmoney_e2e::infrastructure::json_file::JsonFileAccountStore;
use miette::{IntoDiagnostic, Result};
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Reset the accounts file and run the complete transaction flow (default)
    Run,
    /// Print the actors recorded in the accounts file
    Accounts,
    /// Reset the accounts file
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(cli.config).await,
        Command::Accounts => {
            let store = JsonFileAccountStore::new(&cli.config.accounts_file);
            let document = store.load_all().await.into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&document).into_diagnostic()?
            );
            Ok(())
        }
        Command::Clear => {
            let store = JsonFileAccountStore::new(&cli.config.accounts_file);
            store.clear_all().await.into_diagnostic()
        }
    }
}

async fn run(args: ConfigArgs) -> Result<()> {
    let config = args.into_config().into_diagnostic()?;

    // Each run starts from an empty accounts file
    let store: AccountStoreRef = Arc::new(JsonFileAccountStore::new(&config.accounts_file));
    store.clear_all().await.into_diagnostic()?;

    let client = DmoneyClient::from_config(&config, Arc::clone(&store)).into_diagnostic()?;
    let mut flow = TransactionFlow::new(client, config.credentials.clone());

    eprintln!("Starting Dmoney API Automation against {}", config.base_url);
    let report = match tokio::time::timeout(config.run_timeout, flow.run()).await {
        Ok(result) => result.into_diagnostic()?,
        Err(_) => return Err(PlatformError::Timeout(config.run_timeout)).into_diagnostic(),
    };

    println!("customer1,{}", report.customer1.phone);
    println!("customer2,{}", report.customer2.phone);
    println!("agent,{}", report.agent.phone);
    println!("merchant,{}", report.merchant.phone);
    println!("customer2_balance,{}", report.customer2_balance);
    eprintln!("All {} steps passed", report.completed.len());
    Ok(())
}
