use clap::{Parser, Subcommand};
use pvc_plumber::CheckResult;
use serde_json::Value;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "plumber-cli")]
#[command(about = "Query a running pvc-plumber service", long_about = None)]
struct Cli {
    #[arg(short, long, env = "PLUMBER_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a backup exists for a namespace/PVC pair
    Exists {
        namespace: String,
        pvc: String,
    },
    /// Query the liveness endpoint
    Health,
    /// Query the readiness endpoint
    Ready,
    /// Print the counter exposition
    Metrics,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Exists { namespace, pvc } => {
            let res = client
                .get(format!("{}/exists/{}/{}", base, encode(&namespace), encode(&pvc)))
                .send()
                .await?;
            let status = res.status();
            let json: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&json)?);

            if !status.is_success() {
                eprintln!("Error: service returned status {}", status);
                return Ok(ExitCode::FAILURE);
            }
            let result: CheckResult = serde_json::from_value(json)?;
            if result.exists {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Health => print_json(client.get(format!("{}/healthz", base)).send().await?).await,
        Commands::Ready => print_json(client.get(format!("{}/readyz", base)).send().await?).await,
        Commands::Metrics => {
            let res = client.get(format!("{}/metrics", base)).send().await?;
            let status = res.status();
            print!("{}", res.text().await?);
            Ok(exit_code(status))
        }
    }
}

fn encode(segment: &str) -> String {
    percent_encoding::utf8_percent_encode(segment, percent_encoding::NON_ALPHANUMERIC).to_string()
}

fn exit_code(status: reqwest::StatusCode) -> ExitCode {
    if status.is_success() {
        ExitCode::SUCCESS
    } else {
        eprintln!("Error: service returned status {}", status);
        ExitCode::FAILURE
    }
}

async fn print_json(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(exit_code(status))
}
