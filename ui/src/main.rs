use clap::{Parser, Subcommand};
use phonebook::client::api::{HttpPersonsApi, PersonsApi};
use phonebook::client::state::Controller;
use phonebook::persons::types::PersonPayload;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt};

mod shell;
mod view;

use shell::Shell;

#[derive(Parser)]
#[command(name = "phonebook-ui", about = "Terminal client for the phonebook API")]
struct Cli {
    /// Base URL of the phonebook server.
    #[arg(long, env = "PHONEBOOK_API", default_value = "http://localhost:3001")]
    api: String,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Interactive phonebook (default).
    Shell,
    /// Print every entry.
    List,
    /// Add one entry.
    Add { name: String, number: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = HttpPersonsApi::new(&cli.api);
    tracing::info!("Using phonebook API at {}", api.base_url());

    match cli.mode.unwrap_or(Mode::Shell) {
        Mode::Shell => {
            let lines = BufReader::new(tokio::io::stdin()).lines();
            Shell::new(Controller::new(api), lines, std::io::stdout())
                .run()
                .await?;
        }
        Mode::List => {
            let persons = api
                .list()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("phonebook:");
            for person in persons {
                println!("{} {}", person.name, person.number);
            }
        }
        Mode::Add { name, number } => {
            let person = api
                .create(&PersonPayload::new(name, number))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("added {} number {} to phonebook", person.name, person.number);
        }
    }

    Ok(())
}
