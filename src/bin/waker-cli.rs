use clap::{Parser, Subcommand};
use std::process::ExitCode;
use waker_sdk::WakerClient;

#[derive(Parser)]
#[command(name = "waker-cli")]
#[command(about = "Signal or wait on a wake relay", long_about = None)]
struct Cli {
    #[arg(short, long, env = "WAKER_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the event flag
    Signal,
    /// Long-poll once; exits 0 on event, 1 on timeout
    Wait,
    /// Long-poll repeatedly until an event arrives
    Listen,
    /// Show relay version and status
    Health,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = WakerClient::new(&cli.url);

    match cli.command {
        Commands::Signal => {
            client.signal().await?;
            println!("signalled");
        }
        Commands::Wait => {
            if !client.wait().await? {
                println!("timeout");
                return Ok(ExitCode::FAILURE);
            }
            println!("event");
        }
        Commands::Listen => {
            while !client.wait().await? {}
            println!("event");
        }
        Commands::Health => {
            let health = client.health().await?;
            println!("{} {}", health.version, health.status);
        }
    }

    Ok(ExitCode::SUCCESS)
}
